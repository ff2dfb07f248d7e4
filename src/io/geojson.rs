use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use flate2::read::GzDecoder;
use tempfile::NamedTempFile;
use zip::ZipArchive;

use crate::collection::FeatureCollection;

/// How a GeoJSON document is wrapped on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Zip,
    Gzip,
    Plain,
}

impl Container {
    /// Sniff the container from the leading bytes of a file.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes {
            [b'P', b'K', 3, 4, ..] | [b'P', b'K', 5, 6, ..] => Container::Zip,
            [0x1f, 0x8b, ..] => Container::Gzip,
            _ => Container::Plain,
        }
    }
}

/// Read the first `.geojson`/`.json` member of a zip archive, in archive order.
fn read_zip_member(bytes: Vec<u8>, path: &Path) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .with_context(|| format!("Failed to read zip archive {}", path.display()))?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)
            .with_context(|| format!("Failed to read member {i} of {}", path.display()))?;
        if file.is_dir() { continue }

        let name = file.name().to_ascii_lowercase();
        if name.ends_with(".geojson") || name.ends_with(".json") {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .with_context(|| format!("Failed to extract {} from {}", file.name(), path.display()))?;
            return Ok(contents);
        }
    }

    bail!("No GeoJSON file found in the zip archive: {}", path.display())
}

/// Parse a FeatureCollection from raw file contents, unwrapping zip or gzip.
pub fn parse_feature_collection(bytes: Vec<u8>, path: &Path) -> Result<FeatureCollection> {
    let json = match Container::detect(&bytes) {
        Container::Zip => read_zip_member(bytes, path)?,
        Container::Gzip => {
            let mut decompressed = Vec::new();
            GzDecoder::new(&bytes[..]).read_to_end(&mut decompressed)
                .with_context(|| format!("Failed to decompress {}", path.display()))?;
            decompressed
        }
        Container::Plain => bytes,
    };

    let value = serde_json::from_slice(&json)
        .with_context(|| format!("Failed to parse GeoJSON from {}", path.display()))?;
    FeatureCollection::from_value(value)
        .with_context(|| format!("Invalid FeatureCollection in {}", path.display()))
}

/// Load a FeatureCollection from a plain, zipped or gzipped GeoJSON file.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_feature_collection(bytes, path)
}

/// Serialize a FeatureCollection as pretty-printed JSON (2-space indent).
pub fn to_geojson_bytes(fc: &FeatureCollection) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(fc).context("Failed to serialize GeoJSON to bytes")
}

/// Write `bytes` to a temporary file in the directory of `path`, ready to be
/// moved into place.
fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .map_err(|e| anyhow!(e.error))
        .with_context(|| format!("Failed to move output into place at {}", path.display()))?;
    Ok(())
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so the destination either holds the full contents or is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    persist(stage(path, bytes)?, path)
}

/// Write several files as one unit: every file is staged before any is moved
/// into place, and if a move fails the files already placed are removed.
pub fn write_all_atomic(files: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    let staged = files.iter()
        .map(|(path, bytes)| Ok((stage(path, bytes)?, path)))
        .collect::<Result<Vec<_>>>()?;

    let mut placed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(err) = persist(tmp, path) {
            for done in placed {
                let _ = fs::remove_file(done);
            }
            return Err(err);
        }
        placed.push(path);
    }

    Ok(())
}

/// Write a FeatureCollection to `path` as pretty-printed GeoJSON.
pub fn write_feature_collection(path: &Path, fc: &FeatureCollection) -> Result<()> {
    write_atomic(path, &to_geojson_bytes(fc)?)
}
