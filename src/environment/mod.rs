//! Layered environment state.
//!
//! The registrar starts from the process environment and layers on:
//!
//! 1. the `job-board-env/` directory next to the metadata tarball
//! 2. the variables exported by the extracted `job-board-register` script
//! 3. the extracted `env/` directory
//!
//! Later layers win. See [`Environment`] for the merge operations.

mod envdir;
mod layer;
mod script;
mod store;

pub use envdir::load_envdir;
pub use layer::{EnvLayer, LayerSource};
pub use script::{parse_env_listing, BashScriptSource, ScriptSource};
pub use store::Environment;
