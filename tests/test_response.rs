use beacon::http::response::{Response, ResponseBuilder, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Found.as_u16(), 302);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Found.reason_phrase(), "Found");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("X-Custom").unwrap(), "value");
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok).body(body.clone()).build();

    let content_length = response.headers.get("Content-Length").unwrap();
    assert_eq!(content_length, &body.len().to_string());
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Length").unwrap(), "999");
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert_eq!(response.body.len(), 0);
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok(b"test content".to_vec());

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"test content".to_vec());
}

#[test]
fn test_response_html_helper() {
    let response = Response::html("<html></html>");

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        response.headers.get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(response.body, b"<html></html>".to_vec());
}

#[test]
fn test_response_redirect_helper() {
    let response = Response::redirect("/");

    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.headers.get("Location").unwrap(), "/");
    assert!(response.body.is_empty());
    assert_eq!(response.headers.get("Content-Length").unwrap(), "0");
}

#[test]
fn test_response_error_helpers() {
    assert_eq!(Response::bad_request().status, StatusCode::BadRequest);
    assert_eq!(Response::not_found().status, StatusCode::NotFound);
    assert_eq!(
        Response::internal_error().status,
        StatusCode::InternalServerError
    );
}
