use anyhow::Result;
use geoslice::shapefile_to_geojson;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::Shp2GeojsonArgs) -> Result<()> {
    shapefile_to_geojson(&args.input, &args.output, cli.verbose)?;

    Ok(())
}
