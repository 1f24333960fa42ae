//! HTTP transports for the registration call.
//!
//! The job board registers an image on a bodiless `POST` to the
//! registration URL. [`HttpTransport`] does this in-process; [`CurlTransport`]
//! delegates to an external curl-compatible executable.

use reqwest::blocking::Client;

use crate::error::{RegistrarError, Result};
use crate::shell;

/// Performs the registration `POST` and returns the response body.
pub trait Transport {
    /// `POST` to `url` with an empty body.
    ///
    /// Transport failures and non-success statuses are errors.
    fn post(&self, url: &str) -> Result<String>;
}

/// In-process transport backed by a blocking reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the client's default settings.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("job-board-register/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistrarError::RegistrationFailed {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str) -> Result<String> {
        let response =
            self.client
                .post(url)
                .send()
                .map_err(|e| RegistrarError::RegistrationFailed {
                    message: format!("POST {} failed: {}", url, e),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistrarError::RegistrationFailed {
                message: format!("HTTP {} from {}", status, url),
            });
        }

        response
            .text()
            .map_err(|e| RegistrarError::RegistrationFailed {
                message: format!("failed to read response from {}: {}", url, e),
            })
    }
}

/// Transport that shells out to `curl -f -s -X POST <url>`.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    exe: String,
}

impl CurlTransport {
    /// Create a transport that runs `exe`.
    pub fn new(exe: impl Into<String>) -> Self {
        Self { exe: exe.into() }
    }
}

impl Transport for CurlTransport {
    fn post(&self, url: &str) -> Result<String> {
        let args = ["-f", "-s", "-X", "POST", url];
        let result =
            shell::execute(&self.exe, &args).map_err(|e| RegistrarError::RegistrationFailed {
                message: e.to_string(),
            })?;

        if !result.success {
            return Err(RegistrarError::RegistrationFailed {
                message: format!(
                    "{} exited with code {:?}",
                    shell::describe(&self.exe, &args),
                    result.exit_code
                ),
            });
        }

        Ok(result.stdout)
    }
}
