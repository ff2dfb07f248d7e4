use anyhow::Result;
use geoslice::split_file;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SplitArgs) -> Result<()> {
    let written = split_file(&args.regions, &args.input, &args.output_dir, &args.name_field, cli.verbose)?;

    if cli.verbose > 0 { eprintln!("[split] wrote {} files to {}", written.len(), args.output_dir.display()); }

    Ok(())
}
