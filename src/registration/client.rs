//! Registration client.

use std::io::Write;

use serde_json::Value;

use crate::error::{RegistrarError, Result};

use super::request::RegistrationRequest;
use super::transport::Transport;

/// Registers images with the job board through a [`Transport`].
pub struct RegistrationClient {
    transport: Box<dyn Transport>,
}

impl RegistrationClient {
    /// Create a client that sends requests through `transport`.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Register an image, writing the pretty-printed response to `out`.
    ///
    /// Nothing is written unless the response parses as JSON.
    pub fn register(
        &self,
        request: &RegistrationRequest,
        base_url: &str,
        out: &mut dyn Write,
    ) -> Result<Value> {
        let url = request.url(base_url);
        tracing::debug!("registering image via {}", url);

        let body = self.transport.post(&url)?;
        let response = parse_response(&body)?;

        let rendered = serde_json::to_string_pretty(&response).map_err(anyhow::Error::from)?;
        writeln!(out, "{}", rendered)?;

        Ok(response)
    }
}

/// Parse a registration response body.
pub fn parse_response(body: &str) -> Result<Value> {
    serde_json::from_str(body.trim()).map_err(|e| RegistrarError::InvalidResponse {
        message: e.to_string(),
    })
}
