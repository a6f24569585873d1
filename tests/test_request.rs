use beacon::http::request::{Method, RequestBuilder};

#[test]
fn test_request_header_retrieval_is_case_insensitive() {
    let req = RequestBuilder::new(Method::GET, "/")
        .header("Host", "example.com")
        .header("Content-Type", "application/json")
        .build();

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("HOST"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let req = RequestBuilder::new(Method::POST, "/api")
        .header("Content-Length", "42")
        .build();

    assert_eq!(req.content_length(), 42);
}

#[test]
fn test_request_content_length_missing_defaults_to_zero() {
    let req = RequestBuilder::new(Method::GET, "/").build();

    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_request_content_length_malformed_defaults_to_zero() {
    let req = RequestBuilder::new(Method::POST, "/")
        .header("Content-Length", "not-a-number")
        .build();

    assert_eq!(req.content_length(), 0);
}

#[test]
fn test_request_builder_defaults() {
    let req = RequestBuilder::new(Method::GET, "/status").build();

    assert_eq!(req.method, Method::GET);
    assert_eq!(req.path, "/status");
    assert_eq!(req.version, "HTTP/1.1");
    assert!(req.headers.is_empty());
    assert!(req.body.is_empty());
}

#[test]
fn test_request_builder_body_and_version() {
    let req = RequestBuilder::new(Method::POST, "/api")
        .version("HTTP/1.0")
        .body(b"payload".to_vec())
        .build();

    assert_eq!(req.version, "HTTP/1.0");
    assert_eq!(req.body, b"payload".to_vec());
}

#[test]
fn test_method_parse_and_as_str() {
    assert_eq!(Method::parse("GET"), Some(Method::GET));
    assert_eq!(Method::parse("DELETE"), Some(Method::DELETE));
    assert_eq!(Method::parse("get"), None);
    assert_eq!(Method::parse("TRACE"), None);

    assert_eq!(Method::GET.as_str(), "GET");
    assert_eq!(Method::OPTIONS.as_str(), "OPTIONS");
}
