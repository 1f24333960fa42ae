//! Shell script sourcing.
//!
//! The post-extraction `job-board-register` script may compute variables
//! that the registration needs. [`ScriptSource`] is the single seam through
//! which the registrar learns what such a script exports.

use std::ffi::OsStr;
use std::path::Path;

use crate::error::{RegistrarError, Result};
use crate::shell;

use super::layer::{EnvLayer, LayerSource};

/// Shell-internal variables that are never copied out of a sourced script.
const EXCLUDED_KEYS: &[&str] = &["PWD", "SHLVL", "_"];

/// Something that can report the variables a script exports.
pub trait ScriptSource {
    /// Return the variables present after sourcing the script at `path`.
    fn exported_vars(&self, path: &Path) -> Result<EnvLayer>;
}

/// Sources a script with bash in an empty environment.
///
/// Runs `env -i bash -c 'source "$1" && env' bash <path>` and parses the
/// resulting `KEY=VALUE` listing.
#[derive(Debug, Clone)]
pub struct BashScriptSource {
    shell: String,
}

impl BashScriptSource {
    /// Create a source that uses `bash` from `PATH`.
    pub fn new() -> Self {
        Self::with_shell("bash")
    }

    /// Create a source that uses a specific shell executable.
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for BashScriptSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptSource for BashScriptSource {
    fn exported_vars(&self, path: &Path) -> Result<EnvLayer> {
        let args: [&OsStr; 6] = [
            "-i".as_ref(),
            self.shell.as_ref(),
            "-c".as_ref(),
            "source \"$1\" && env".as_ref(),
            self.shell.as_ref(),
            path.as_os_str(),
        ];
        let result = shell::execute("env", &args)?;

        if !result.success {
            return Err(RegistrarError::CommandFailed {
                command: shell::describe("env", &args),
                code: result.exit_code,
            });
        }

        Ok(parse_env_listing(&result.stdout, path))
    }
}

/// Parse `env` output into a layer attributed to the script at `path`.
///
/// Lines are split on the first `=`; key and value are trimmed. Lines
/// without `=` are continuation lines of multi-line values and are skipped.
pub fn parse_env_listing(listing: &str, path: &Path) -> EnvLayer {
    let mut layer = EnvLayer::new(LayerSource::Script(path.to_path_buf()));

    for line in listing.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || EXCLUDED_KEYS.contains(&key) {
            continue;
        }
        layer.set(key, value.trim());
    }

    layer
}
