//! Error types for registration runs.
//!
//! This module defines [`RegistrarError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `RegistrarError` for failures the orchestrator reports by name
//! - Use `anyhow::Error` (via `RegistrarError::Other`) for unexpected errors
//! - Errors stop at the orchestrator: one log line, exit status 1

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for registration runs.
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// No metadata tarball was given on the command line.
    #[error("missing image metadata tarball")]
    MissingTarball,

    /// A required environment variable is unset or empty.
    #[error("missing ${name}")]
    MissingVariable { name: String },

    /// The metadata tarball path does not exist.
    #[error("image metadata tarball does not exist: {path}")]
    TarballNotFound { path: PathBuf },

    /// The archive tool could not unpack the tarball.
    #[error("failed to extract image metadata tarball {path}: {message}")]
    ExtractionFailed { path: PathBuf, message: String },

    /// An external command exited unsuccessfully or could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The registration call failed in transport or returned a non-success status.
    #[error("registration failed: {message}")]
    RegistrationFailed { message: String },

    /// The registration call succeeded but its body is not JSON.
    #[error("invalid registration response: {message}")]
    InvalidResponse { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RegistrarError>;
