//! Registration request and URL encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::classify::Infra;
use crate::tags::TagSet;

/// Bytes left alone by the first encoding pass: the RFC 2396 unreserved
/// and reserved characters.
const FIRST_PASS: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'[')
    .remove(b']');

/// Bytes escaped by the second pass. Control bytes never survive the first
/// pass, so in practice only `+`, `,` and `:` are affected.
const SECOND_PASS: &AsciiSet = &percent_encoding::CONTROLS.add(b'+').add(b',').add(b':');

/// Encode a query value the way the job board expects.
///
/// The first pass escapes everything outside the RFC 2396 character set;
/// the second escapes `+`, `,` and `:` in that result. The job board
/// decodes accordingly, so both passes must stay.
///
/// # Example
///
/// ```
/// use job_board_register::registration::encode_query_value;
///
/// assert_eq!(encode_query_value("os:linux,dist:trusty"), "os%3Alinux%2Cdist%3Atrusty");
/// assert_eq!(encode_query_value("a b"), "a%20b");
/// ```
pub fn encode_query_value(value: &str) -> String {
    let first = utf8_percent_encode(value, FIRST_PASS).to_string();
    utf8_percent_encode(&first, SECOND_PASS).to_string()
}

/// The parameters of one registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub infra: String,
    pub name: String,
    pub tags: String,
}

impl RegistrationRequest {
    /// Assemble a request for the image `name`.
    pub fn new(infra: Infra, name: impl Into<String>, tags: &TagSet) -> Self {
        Self {
            infra: infra.as_str().to_string(),
            name: name.into(),
            tags: tags.to_string(),
        }
    }

    /// `infra=…&name=…&tags=…` with encoded values.
    pub fn query_string(&self) -> String {
        [
            ("infra", &self.infra),
            ("name", &self.name),
            ("tags", &self.tags),
        ]
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode_query_value(value)))
        .collect::<Vec<_>>()
        .join("&")
    }

    /// Full registration URL below `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.query_string())
    }
}
