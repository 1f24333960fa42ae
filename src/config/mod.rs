//! Registration configuration.
//!
//! All configuration comes from environment variables, after the env
//! directories and the post-extraction script have been merged in. See
//! [`Settings`] for the variables read here; image metadata variables are
//! read by [`crate::classify`] and [`crate::tags`].

pub mod settings;

pub use settings::{
    Settings, CURL_EXE_VAR, DEFAULT_CURL_EXE, IMAGES_URL_VAR, IMAGE_NAME_VAR,
};
