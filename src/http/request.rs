use std::collections::HashMap;

/// HTTP request methods.
///
/// The status server only ever serves GET (a browser loading the page or
/// following the force-run link), but the parser recognizes the common verbs
/// so unexpected methods surface as requests rather than parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// OPTIONS - Describe communication options
    OPTIONS,
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Method tokens are case-sensitive per RFC 9110; lowercase input is
    /// rejected.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Some(Method::GET));
    /// assert_eq!(Method::parse("get"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "OPTIONS" => Some(Method::OPTIONS),
            _ => None,
        }
    }

    /// Returns the canonical token for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

/// A parsed HTTP request from a client.
///
/// Header names are stored lowercased so lookups are case-insensitive, which
/// is what HTTP requires and what clients actually send.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, ...)
    pub method: Method,
    /// The request path (e.g. "/force-run")
    pub path: String,
    /// HTTP version as sent (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Request body, empty unless Content-Length said otherwise
    pub body: Vec<u8>,
}

impl Request {
    /// Looks up a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// The declared Content-Length, or 0 when absent or malformed.
    pub fn content_length(&self) -> usize {
        self.header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Builder for constructing Request values in tests and helpers.
pub struct RequestBuilder {
    method: Method,
    path: String,
    version: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            version: "HTTP/1.1".to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            path: self.path,
            version: self.version,
            headers: self.headers,
            body: self.body,
        }
    }
}
