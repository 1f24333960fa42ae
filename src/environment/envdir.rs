//! Directory-of-files environment loading.
//!
//! Each regular file directly inside the directory becomes one variable:
//! the file name is the key and the trimmed contents are the value.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::layer::{EnvLayer, LayerSource};

/// Read an env directory into a layer.
///
/// Returns `Ok(None)` when `path` does not exist or is not a directory.
/// Subdirectories and other non-file entries are ignored.
pub fn load_envdir(path: &Path) -> Result<Option<EnvLayer>> {
    if !path.is_dir() {
        return Ok(None);
    }

    let mut layer = EnvLayer::new(LayerSource::EnvDir(path.to_path_buf()));

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }

        let key = entry.file_name().to_string_lossy().into_owned();
        let bytes = fs::read(&entry_path)?;
        let value = String::from_utf8_lossy(&bytes).trim().to_string();
        layer.set(key, value);
    }

    Ok(Some(layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_yields_none() {
        let temp = TempDir::new().unwrap();
        let result = load_envdir(&temp.path().join("nope")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn file_instead_of_directory_yields_none() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        assert!(load_envdir(&file).unwrap().is_none());
    }

    #[test]
    fn one_key_per_regular_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("IMAGE_NAME"), "travis-ci-garnet-trusty\n").unwrap();
        fs::write(temp.path().join("DIST"), "  trusty  ").unwrap();
        fs::write(temp.path().join("EMPTY"), "").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("INNER"), "ignored").unwrap();

        let layer = load_envdir(temp.path()).unwrap().unwrap();

        assert_eq!(layer.len(), 3);
        assert_eq!(layer.get("IMAGE_NAME"), Some("travis-ci-garnet-trusty"));
        assert_eq!(layer.get("DIST"), Some("trusty"));
        assert_eq!(layer.get("EMPTY"), Some(""));
        assert!(!layer.contains("nested"));
        assert!(!layer.contains("INNER"));
    }

    #[test]
    fn layer_records_its_source() {
        let temp = TempDir::new().unwrap();
        let layer = load_envdir(temp.path()).unwrap().unwrap();

        assert!(layer.is_empty());
        assert_eq!(layer.source, LayerSource::EnvDir(temp.path().to_path_buf()));
    }
}
