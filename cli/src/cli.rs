use std::path::PathBuf;

/// GeoJSON simplification and splitting CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "geoslice", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Simplify polygons in a GeoJSON file (plain, .zip or .gz)
    Simplify(SimplifyArgs),

    /// Split a GeoJSON file by the regions its features intersect
    Split(SplitArgs),

    /// Convert a zipped shapefile to GeoJSON
    #[command(name = "shp2geojson")]
    Shp2Geojson(Shp2GeojsonArgs),
}

#[derive(clap::Args, Debug)]
pub struct SimplifyArgs {
    /// Input GeoJSON file, or a zip/gzip archive containing one
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output GeoJSON file, defaults to "<input>_simplified.<ext>" next to the input
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Simplification tolerance (in degrees for lat/long)
    #[arg(short, long, default_value_t = geoslice::DEFAULT_TOLERANCE)]
    pub tolerance: f64,
}

#[derive(clap::Args, Debug)]
pub struct SplitArgs {
    /// GeoJSON file with the region boundaries
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub regions: PathBuf,

    /// GeoJSON file to split
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Directory for the per-region files (created if missing)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// Region property holding the region name, e.g. STATE_NAME
    pub name_field: String,
}

#[derive(clap::Args, Debug)]
pub struct Shp2GeojsonArgs {
    /// Zip archive containing a .shp with its .shx and .dbf
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output GeoJSON file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn schema_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simplify_defaults() {
        let cli = Cli::parse_from(["geoslice", "simplify", "in.geojson"]);
        let Commands::Simplify(args) = cli.command else { panic!("expected simplify") };
        assert_eq!(args.tolerance, geoslice::DEFAULT_TOLERANCE);
        assert!(args.output.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn split_positionals() {
        let cli = Cli::parse_from(["geoslice", "-vv", "split", "states.zip", "places.json", "out", "STATE_NAME"]);
        let Commands::Split(args) = cli.command else { panic!("expected split") };
        assert_eq!(args.name_field, "STATE_NAME");
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn shp2geojson_requires_output() {
        assert!(Cli::try_parse_from(["geoslice", "shp2geojson", "a.zip"]).is_err());
    }
}
