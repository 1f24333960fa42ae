//! Registration settings read from the merged environment.

use crate::environment::Environment;
use crate::error::{RegistrarError, Result};

/// Base URL of the job board images endpoint.
pub const IMAGES_URL_VAR: &str = "JOB_BOARD_IMAGES_URL";

/// Name the image is registered under.
pub const IMAGE_NAME_VAR: &str = "IMAGE_NAME";

/// Override for the curl-compatible executable used to register.
pub const CURL_EXE_VAR: &str = "CURL_EXE";

/// Default executable when `CURL_EXE` is set but empty.
pub const DEFAULT_CURL_EXE: &str = "curl";

/// Values the registration call needs beyond the image metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `JOB_BOARD_IMAGES_URL`.
    pub images_url: String,
    /// `IMAGE_NAME`.
    pub image_name: String,
    /// Curl executable, when registration should go through curl.
    pub curl_exe: Option<String>,
}

impl Settings {
    /// Read settings from `env`, failing on the first missing required
    /// variable (`JOB_BOARD_IMAGES_URL` is checked before `IMAGE_NAME`).
    ///
    /// # Example
    ///
    /// ```
    /// use job_board_register::config::Settings;
    /// use job_board_register::environment::Environment;
    ///
    /// let env = Environment::from_pairs([
    ///     ("JOB_BOARD_IMAGES_URL", "https://job-board.example.com/images"),
    ///     ("IMAGE_NAME", "travis-ci-garnet-trusty"),
    /// ]);
    ///
    /// let settings = Settings::from_env(&env).unwrap();
    /// assert_eq!(settings.image_name, "travis-ci-garnet-trusty");
    /// assert_eq!(settings.curl_exe, None);
    /// ```
    pub fn from_env(env: &Environment) -> Result<Self> {
        Ok(Self {
            images_url: required(env, IMAGES_URL_VAR)?,
            image_name: required(env, IMAGE_NAME_VAR)?,
            curl_exe: curl_exe(env),
        })
    }
}

fn required(env: &Environment, name: &str) -> Result<String> {
    let value = env.get(name);
    if value.is_empty() {
        return Err(RegistrarError::MissingVariable {
            name: name.to_string(),
        });
    }
    Ok(value.to_string())
}

fn curl_exe(env: &Environment) -> Option<String> {
    if !env.contains(CURL_EXE_VAR) {
        return None;
    }
    let exe = env.get(CURL_EXE_VAR);
    Some(if exe.is_empty() { DEFAULT_CURL_EXE } else { exe }.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_reported_first() {
        let err = Settings::from_env(&Environment::new()).unwrap_err();
        assert_eq!(err.to_string(), "missing $JOB_BOARD_IMAGES_URL");
    }

    #[test]
    fn missing_image_name() {
        let env = Environment::from_pairs([(IMAGES_URL_VAR, "http://jb/images")]);
        let err = Settings::from_env(&env).unwrap_err();
        assert_eq!(err.to_string(), "missing $IMAGE_NAME");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let env =
            Environment::from_pairs([(IMAGES_URL_VAR, "http://jb/images"), (IMAGE_NAME_VAR, "  ")]);
        assert!(matches!(
            Settings::from_env(&env),
            Err(RegistrarError::MissingVariable { .. })
        ));
    }

    #[test]
    fn curl_override() {
        let mut env = Environment::from_pairs([
            (IMAGES_URL_VAR, "http://jb/images"),
            (IMAGE_NAME_VAR, "img"),
            (CURL_EXE_VAR, "/opt/bin/curl"),
        ]);
        assert_eq!(
            Settings::from_env(&env).unwrap().curl_exe.as_deref(),
            Some("/opt/bin/curl")
        );

        env.set(CURL_EXE_VAR, "");
        assert_eq!(
            Settings::from_env(&env).unwrap().curl_exe.as_deref(),
            Some("curl")
        );
    }
}
