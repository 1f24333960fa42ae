//! Environment variable deltas.
//!
//! A loader never mutates the [`Environment`](super::Environment) it feeds;
//! it produces an [`EnvLayer`] which the environment then applies.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Where a layer's variables came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    /// A directory of single-value files.
    EnvDir(PathBuf),
    /// The exported environment of a sourced shell script.
    Script(PathBuf),
}

impl LayerSource {
    /// Verb used when logging each variable this source sets.
    pub fn verb(&self) -> &'static str {
        match self {
            LayerSource::EnvDir(_) => "loading",
            LayerSource::Script(_) => "setting",
        }
    }
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSource::EnvDir(path) => write!(f, "envdir {}", path.display()),
            LayerSource::Script(path) => write!(f, "script {}", path.display()),
        }
    }
}

/// A set of variables produced by one loader.
///
/// Variables are kept in key order so that applying a layer is
/// deterministic.
///
/// # Example
///
/// ```
/// use job_board_register::environment::{EnvLayer, LayerSource};
/// use std::path::PathBuf;
///
/// let mut layer = EnvLayer::new(LayerSource::EnvDir(PathBuf::from("job-board-env")));
/// layer.set("IMAGE_NAME", "travis-ci-sugilite-trusty");
///
/// assert_eq!(layer.get("IMAGE_NAME"), Some("travis-ci-sugilite-trusty"));
/// assert_eq!(layer.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EnvLayer {
    /// Variables in this layer.
    vars: BTreeMap<String, String>,
    /// Source of this layer.
    pub source: LayerSource,
}

impl EnvLayer {
    /// Create an empty layer for the given source.
    pub fn new(source: LayerSource) -> Self {
        Self {
            vars: BTreeMap::new(),
            source,
        }
    }

    /// Add a variable to this layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Look up a variable in this layer.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Check if this layer has a variable.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Get the number of variables in this layer.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if this layer is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
