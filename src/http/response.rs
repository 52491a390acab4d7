//! Outgoing-response value type.

use ::http::{StatusCode, Version};
use serde::Serialize;

/// HTTP response produced by route handlers and fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Default fallback for an unmatched path, keeping the request's
    /// protocol version.
    #[must_use]
    pub fn not_found(version: Version) -> Self {
        Self::new(StatusCode::NOT_FOUND).with_version(version)
    }

    /// Fallback for a path that matched under a different method.
    #[must_use]
    pub fn method_not_allowed(version: Version) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED).with_version(version)
    }

    /// Plain-text response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain")
            .with_body(body.into().into_bytes())
    }

    /// JSON response serialized from any `Serialize` value.
    pub fn json(status: StatusCode, body: &impl Serialize) -> anyhow::Result<Self> {
        Ok(Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(serde_json::to_vec(body)?))
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// First header with the given name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn not_found_preserves_protocol_version() {
        let response = Response::not_found(Version::HTTP_10);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.version(), Version::HTTP_10);
    }

    #[test]
    fn json_sets_content_type_and_body() {
        #[derive(Serialize)]
        struct Pet {
            name: &'static str,
        }

        let response = Response::json(StatusCode::OK, &Pet { name: "Fluffy" }).unwrap();
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.body(), br#"{"name":"Fluffy"}"#);
    }
}
