//! Metadata tarball extraction.
//!
//! The build pipeline leaves `<name>.tar.bz2` next to a `job-board-env/`
//! directory. The tarball unpacks into a sibling `<name>/` directory holding
//! an optional `env/` directory and an optional `job-board-register` script.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{RegistrarError, Result};
use crate::shell;

/// Suffix stripped from the tarball name to find its working directory.
pub const TARBALL_SUFFIX: &str = ".tar.bz2";

/// Paths derived from the location of a metadata tarball.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLayout {
    tarball: PathBuf,
    base: PathBuf,
    workdir: PathBuf,
}

impl MetadataLayout {
    /// Derive the layout for `tarball`. Nothing is touched on disk.
    pub fn new(tarball: &Path) -> Self {
        let base = match tarball.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let file_name = tarball
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = match file_name.strip_suffix(TARBALL_SUFFIX) {
            Some(stem) if !stem.is_empty() => stem,
            _ => file_name.as_str(),
        };

        Self {
            tarball: tarball.to_path_buf(),
            workdir: base.join(stem),
            base,
        }
    }

    /// The tarball itself.
    pub fn tarball(&self) -> &Path {
        &self.tarball
    }

    /// Directory containing the tarball; extraction target.
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Directory the tarball unpacks into.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Env directory loaded before extraction.
    pub fn pre_env_dir(&self) -> PathBuf {
        self.base.join("job-board-env")
    }

    /// Env directory loaded after extraction.
    pub fn post_env_dir(&self) -> PathBuf {
        self.workdir.join("env")
    }

    /// Script sourced after extraction, if present.
    pub fn register_script(&self) -> PathBuf {
        self.workdir.join("job-board-register")
    }
}

/// Unpacks metadata tarballs with `tar`.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    tar: String,
}

impl MetadataExtractor {
    /// Create an extractor that runs `tar` from `PATH`.
    pub fn new() -> Self {
        Self::with_tar("tar")
    }

    /// Create an extractor that runs a specific `tar` executable.
    pub fn with_tar(tar: impl Into<String>) -> Self {
        Self { tar: tar.into() }
    }

    /// Unpack `layout.tarball()` into its base directory.
    ///
    /// Returns the working directory the archive unpacked into. The caller
    /// is expected to have checked that the tarball exists.
    pub fn extract(&self, layout: &MetadataLayout) -> Result<PathBuf> {
        let tarball = std::path::absolute(layout.tarball())?;
        let args: [&OsStr; 4] = [
            "-C".as_ref(),
            layout.base_dir().as_os_str(),
            "-xjvf".as_ref(),
            tarball.as_os_str(),
        ];

        let result = shell::execute(&self.tar, &args).map_err(|e| {
            RegistrarError::ExtractionFailed {
                path: layout.tarball().to_path_buf(),
                message: e.to_string(),
            }
        })?;

        for entry in result.stdout.lines().chain(result.stderr.lines()) {
            tracing::debug!("extracted {}", entry);
        }

        if !result.success {
            return Err(RegistrarError::ExtractionFailed {
                path: layout.tarball().to_path_buf(),
                message: format!(
                    "{} exited with {:?}: {}",
                    self.tar,
                    result.exit_code,
                    result.stderr.trim()
                ),
            });
        }

        Ok(layout.workdir().to_path_buf())
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}
