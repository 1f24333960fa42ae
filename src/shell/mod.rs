//! Subprocess boundary.

pub mod command;

pub use command::{capture_stdout, describe, execute, CommandResult};
