//! Incoming-request value type.
//!
//! The wire protocol is a collaborator concern; a `ServerRequest` is already
//! parsed. Besides method/path/version/headers/body it carries the
//! environment fields a server hands over with each request, which seed the
//! per-request [`Environment`](crate::Environment).

use ::http::{Method, Version};

/// Parsed HTTP request handed to `run_http`.
#[derive(Debug, Clone)]
pub struct ServerRequest {
    method: Method,
    target: String,
    version: Version,
    headers: Vec<(String, String)>,
    environment: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ServerRequest {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            version: Version::HTTP_11,
            headers: Vec::new(),
            environment: Vec::new(),
            body: Vec::new(),
        }
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

    /// Attach one server-carried environment variable.
    #[must_use]
    pub fn with_environment_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request target as received, query string included.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Path portion of the target, query string stripped.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.target.find('?') {
            Some(pos) => &self.target[..pos],
            None => &self.target,
        }
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

    /// Environment fields carried alongside the request.
    pub fn environment(&self) -> impl Iterator<Item = (&str, &str)> {
        self.environment
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
