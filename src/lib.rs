//! job-board-register - register machine images with the job board.
//!
//! After an image build, the builder leaves a metadata tarball describing
//! the image. This crate unpacks it, merges the environment it carries,
//! classifies the image and registers it with the job board images API.
//!
//! # Modules
//!
//! - [`classify`] - Operating system, distribution, group and infra detection
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings read from the merged environment
//! - [`environment`] - Environment store, env directories and script sourcing
//! - [`error`] - Error types and result aliases
//! - [`extract`] - Metadata tarball layout and extraction
//! - [`logging`] - Logfmt-style event formatting
//! - [`registrar`] - Orchestration of a registration run
//! - [`registration`] - Request encoding, transports and the registration client
//! - [`shell`] - External command execution
//! - [`tags`] - Image tag construction and overrides
//!
//! # Example
//!
//! ```
//! use job_board_register::classify::{Classification, ReleaseProbe};
//! use job_board_register::environment::Environment;
//! use job_board_register::registration::RegistrationRequest;
//! use job_board_register::tags::build_tags;
//!
//! struct NoProbe;
//! impl ReleaseProbe for NoProbe {
//!     fn release(&self, _os: &str) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let env = Environment::from_pairs([
//!     ("OS", "linux"),
//!     ("DIST", "trusty"),
//!     ("PACKER_BUILDER_TYPE", "docker"),
//! ]);
//! let classification = Classification::from_env(&env, &NoProbe);
//! let tags = build_tags(&env, &classification);
//! let request = RegistrationRequest::new(classification.infra, "travis-ci-garnet-trusty", &tags);
//!
//! assert_eq!(request.infra, "docker");
//! assert!(request.url("http://jb/images").starts_with("http://jb/images?infra=docker&name="));
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod extract;
pub mod logging;
pub mod registrar;
pub mod registration;
pub mod shell;
pub mod tags;

pub use error::{RegistrarError, Result};
