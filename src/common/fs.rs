use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::ZipArchive;

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Extracts the given `.zip` file to the target directory.
pub fn extract_zip(zip_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("failed to open {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive {}", zip_path.display()))?;

    archive.extract(dest_dir)
        .with_context(|| format!("failed to extract {} to {}", zip_path.display(), dest_dir.display()))?;

    Ok(())
}

/// Split a file name at its last `.`, e.g. `a.b.json` -> (`a.b`, Some(`json`)).
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// File name of `path` without its last extension.
pub fn file_stem(path: &Path) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    split_extension(&name).0.to_string()
}

/// Return `path` if nothing exists there, otherwise the first of
/// `<stem>_1.<ext>`, `<stem>_2.<ext>`, ... that is free.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() { return path.to_path_buf() }

    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let (stem, ext) = split_extension(&name);

    let mut counter = 1;
    loop {
        let candidate = path.with_file_name(match ext {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        });
        if !candidate.exists() { return candidate }
        counter += 1;
    }
}

/// Default output path for a simplified copy of `input`:
/// `<input without last extension>_simplified.<ext>`, where `<ext>` is
/// `geojson` for `.geojson` inputs and `json` otherwise, made unique.
pub fn derive_simplified_path(input: &Path) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = if name.to_ascii_lowercase().ends_with(".geojson") { "geojson" } else { "json" };
    let stem = split_extension(&name).0;

    unique_path(&input.with_file_name(format!("{stem}_simplified.{ext}")))
}

/// Output path for one region's bucket: `<dir>/<input stem>_<region>.json`.
pub fn split_output_path(dir: &Path, input: &Path, region: &str) -> PathBuf {
    dir.join(format!("{}_{region}.json", file_stem(input)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_strip_last_extension_only() {
        assert_eq!(file_stem(Path::new("/data/places.geojson")), "places");
        assert_eq!(file_stem(Path::new("places.json.gz")), "places.json");
        assert_eq!(file_stem(Path::new("README")), "README");
        assert_eq!(file_stem(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn simplified_path_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            derive_simplified_path(&dir.path().join("counties.geojson")),
            dir.path().join("counties_simplified.geojson")
        );
        assert_eq!(
            derive_simplified_path(&dir.path().join("counties.zip")),
            dir.path().join("counties_simplified.json")
        );
        assert_eq!(
            derive_simplified_path(&dir.path().join("counties.json.gz")),
            dir.path().join("counties.json_simplified.json")
        );
    }

    #[test]
    fn simplified_path_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.geojson");
        fs::write(dir.path().join("a_simplified.geojson"), "{}").unwrap();
        fs::write(dir.path().join("a_simplified_1.geojson"), "{}").unwrap();

        assert_eq!(derive_simplified_path(&input), dir.path().join("a_simplified_2.geojson"));
    }

    #[test]
    fn split_paths() {
        assert_eq!(
            split_output_path(Path::new("out"), Path::new("/in/places.geojson"), "Nevada"),
            Path::new("out").join("places_Nevada.json")
        );
    }

    #[test]
    fn ensure_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());

        let file = dir.path().join("f");
        fs::write(&file, "x").unwrap();
        assert!(ensure_dir_exists(&file).is_err());
    }
}
