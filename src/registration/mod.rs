//! The job board registration call.
//!
//! - [`request`] - request parameters and the URL encoding the job board expects
//! - [`transport`] - in-process and curl-based `POST` transports
//! - [`client`] - sends a request and re-emits the JSON response

pub mod client;
pub mod request;
pub mod transport;

pub use client::{parse_response, RegistrationClient};
pub use request::{encode_query_value, RegistrationRequest};
pub use transport::{CurlTransport, HttpTransport, Transport};
