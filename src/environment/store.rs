//! The merged environment a registration run works from.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::envdir::load_envdir;
use super::layer::EnvLayer;
use super::script::ScriptSource;

/// Variables worth echoing into the log before the request is built.
static RELEVANT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(PACKER|TRAVIS|TAGS|IMAGE_NAME)").unwrap());

/// Case-sensitive variable mapping with last-writer-wins merges.
///
/// An `Environment` is an owned value: each merge step consumes it and
/// returns the updated copy, so the pipeline threads it from stage to stage
/// instead of mutating the process environment. Keys are never removed.
///
/// # Example
///
/// ```
/// use job_board_register::environment::Environment;
///
/// let env = Environment::from_pairs([("OS", " linux "), ("EMPTY", "")]);
///
/// assert_eq!(env.get("OS"), "linux");
/// assert_eq!(env.get("EMPTY"), "");
/// assert_eq!(env.get("UNSET"), "");
/// assert!(env.contains("EMPTY"));
/// assert!(!env.contains("UNSET"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .map(|(k, v)| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
                .collect(),
        }
    }

    /// Build an environment from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Trimmed value of `key`, or `""` when unset.
    pub fn get(&self, key: &str) -> &str {
        self.vars.get(key).map(|v| v.trim()).unwrap_or("")
    }

    /// Whether `key` is set at all, even to an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Set a single variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are set.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Apply a layer, logging every variable it sets.
    pub fn merge(mut self, layer: EnvLayer) -> Self {
        let verb = layer.source.verb();
        tracing::debug!("merging {} variables from {}", layer.len(), layer.source);
        for (key, value) in layer.iter() {
            tracing::info!("{} {}={}", verb, key, value);
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Merge every regular file directly inside `path`.
    ///
    /// A missing or non-directory `path` leaves the environment unchanged
    /// and logs a warning.
    pub fn merge_dir(self, path: &Path) -> Result<Self> {
        match load_envdir(path)? {
            Some(layer) => Ok(self.merge(layer)),
            None => {
                tracing::warn!("{} does not exist", path.display());
                Ok(self)
            }
        }
    }

    /// Merge the variables the script at `path` exports.
    pub fn merge_script(self, path: &Path, source: &dyn ScriptSource) -> Result<Self> {
        let layer = source.exported_vars(path)?;
        Ok(self.merge(layer))
    }

    /// Variables relevant to registration, sorted by key, with trimmed
    /// keys and values.
    pub fn relevant(&self) -> Vec<(&str, &str)> {
        self.vars
            .iter()
            .filter(|(k, _)| RELEVANT_KEY.is_match(k))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect()
    }
}
