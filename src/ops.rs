use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{common, io, partition, simplify};
use crate::simplify::SimplifyOptions;

/// Simplify every polygonal feature of `input` and write the result.
///
/// Without an explicit `output`, writes next to the input as
/// `<stem>_simplified.<ext>`, never overwriting an existing file.
/// Returns the path written.
pub fn simplify_file(input: &Path, output: Option<&Path>, options: SimplifyOptions, verbose: u8) -> Result<PathBuf> {
    let SimplifyOptions { tolerance } = options;
    if verbose > 0 { eprintln!("[read] {}", input.display()); }
    let mut fc = io::read_feature_collection(input)?;

    if verbose > 0 { eprintln!("[simplify] {} features, tolerance {tolerance}", fc.len()); }
    let reports = simplify::simplify_collection(&mut fc, tolerance)
        .with_context(|| format!("Failed to simplify {}", input.display()))?;
    for report in &reports {
        println!("{report}");
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => common::derive_simplified_path(input),
    };

    if verbose > 0 { eprintln!("[write] {}", output.display()); }
    io::write_feature_collection(&output, &fc)?;
    println!("Input: {}. Output: {}.", input.display(), output.display());

    Ok(output)
}

/// Split the features of `input` into one file per region of `regions`
/// they intersect, writing `<stem>_<region>.json` files into `out_dir`.
///
/// Regions are read and validated before anything is written, and the files
/// are written as a unit: a failed run leaves none of them behind. Returns
/// the written paths with their feature counts, in first-match order.
pub fn split_file(regions: &Path, input: &Path, out_dir: &Path, field: &str, verbose: u8) -> Result<Vec<(PathBuf, usize)>> {
    if verbose > 0 { eprintln!("[read] regions {}", regions.display()); }
    let region_fc = io::read_feature_collection(regions)?;
    if verbose > 0 { eprintln!("[read] features {}", input.display()); }
    let fc = io::read_feature_collection(input)?;

    let region_set = partition::RegionSet::from_collection(&region_fc, field)
        .with_context(|| format!("Failed to read regions from {}", regions.display()))?;
    if verbose > 0 { eprintln!("[split] {} features x {} regions", fc.len(), region_set.len()); }

    let assigned = partition::assign_features(&fc, &region_set)
        .with_context(|| format!("Failed to split {}", input.display()))?;
    if verbose > 0 && assigned.is_empty() { eprintln!("[split] no feature intersects any region"); }

    // Serialize every bucket up front so a failure leaves no files behind.
    let mut files = Vec::with_capacity(assigned.len());
    let mut summary = Vec::with_capacity(assigned.len());
    for (region, bucket) in assigned.into_collections() {
        let path = common::split_output_path(out_dir, input, &region);
        files.push((path.clone(), io::to_geojson_bytes(&bucket)?));
        summary.push((path, region, bucket.len()));
    }

    let created = !out_dir.exists();
    common::ensure_dir_exists(out_dir)?;
    if verbose > 0 { eprintln!("[write] {} files to {}", files.len(), out_dir.display()); }
    if let Err(err) = io::write_all_atomic(&files) {
        if created { let _ = std::fs::remove_dir(out_dir); }
        return Err(err);
    }

    let mut written = Vec::with_capacity(summary.len());
    for (path, region, count) in summary {
        println!("Output: {}. {count} features saved for {region}", path.display());
        written.push((path, count));
    }

    Ok(written)
}

/// Convert a zipped ESRI shapefile to a GeoJSON FeatureCollection file.
/// Returns the number of features written.
pub fn shapefile_to_geojson(zip_path: &Path, output: &Path, verbose: u8) -> Result<usize> {
    if verbose > 0 { eprintln!("[shp2geojson] {} -> {}", zip_path.display(), output.display()); }
    let fc = io::read_zipped_shapefile(zip_path)?;

    io::write_feature_collection(output, &fc)?;
    println!("Conversion complete: {}. {} features converted.", output.display(), fc.len());

    Ok(fc.len())
}
