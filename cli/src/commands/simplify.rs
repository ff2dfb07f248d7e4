use anyhow::Result;
use geoslice::{simplify_file, SimplifyOptions};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SimplifyArgs) -> Result<()> {
    let options = SimplifyOptions { tolerance: args.tolerance };

    simplify_file(&args.input, args.output.as_deref(), options, cli.verbose)?;

    Ok(())
}
