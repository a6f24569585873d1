use std::collections::HashMap;

/// HTTP status codes the status server emits.
///
/// - `Ok` (200): the rendered page
/// - `Found` (302): redirect back to `/` after a forced run
/// - `BadRequest` (400): unparseable request
/// - `NotFound` (404): reserved for future path handling
/// - `InternalServerError` (500): handler failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 302 Found
    Found,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Found.as_u16(), 302);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Found => 302,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Found => "Found",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html; charset=utf-8")
///     .body(page.into_bytes())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header based on body size unless one was set
    /// explicitly.
    pub fn build(mut self) -> Response {
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body.into()).build()
    }

    /// Creates a 200 OK response carrying an HTML document.
    pub fn html(document: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(document.into().into_bytes())
            .build()
    }

    /// Creates a 302 redirect to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Found)
            .header("Location", location.into())
            .build()
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .body(b"400 Bad Request".to_vec())
            .build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(b"404 Not Found".to_vec())
            .build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .body(b"500 Internal Server Error".to_vec())
            .build()
    }
}
