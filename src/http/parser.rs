use std::collections::HashMap;

use crate::http::request::{Method, Request};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    BadRequestLine,
    BadMethod,
    BadHeader,
    BadContentLength,
    BadEncoding,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            ParseError::BadRequestLine => "malformed request line",
            ParseError::BadMethod => "unknown method",
            ParseError::BadHeader => "malformed header line",
            ParseError::BadContentLength => "invalid Content-Length",
            ParseError::BadEncoding => "header bytes are not UTF-8",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for ParseError {}

/// Tries to parse one HTTP request from the front of `buf`.
///
/// Returns `Ok(None)` while the buffer does not yet hold a complete request
/// (headers still open, or body shorter than Content-Length), so the caller
/// can keep reading and retry. On success the parsed request is returned
/// together with the number of bytes it consumed.
pub fn parse_request(buf: &[u8]) -> Result<Option<(Request, usize)>, ParseError> {
    let Some(headers_end) = find_headers_end(buf) else {
        return Ok(None);
    };
    let body_start = headers_end + 4;

    let head = std::str::from_utf8(&buf[..headers_end]).map_err(|_| ParseError::BadEncoding)?;
    let mut lines = head.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::BadRequestLine)?;
    let (method, path, version) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or(ParseError::BadHeader)?;
        headers.insert(
            name.trim().to_ascii_lowercase(),
            value.trim().to_string(),
        );
    }

    let content_length = match headers.get("content-length") {
        Some(v) => v.parse::<usize>().map_err(|_| ParseError::BadContentLength)?,
        None => 0,
    };

    let body_bytes = &buf[body_start..];
    if body_bytes.len() < content_length {
        return Ok(None);
    }

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..content_length].to_vec(),
    };

    Ok(Some((request, body_start + content_length)))
}

fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split_whitespace();
    let method_token = parts.next().ok_or(ParseError::BadRequestLine)?;
    let path = parts.next().ok_or(ParseError::BadRequestLine)?;
    let version = parts.next().ok_or(ParseError::BadRequestLine)?;
    if parts.next().is_some() {
        return Err(ParseError::BadRequestLine);
    }

    let method = Method::parse(method_token).ok_or(ParseError::BadMethod)?;
    Ok((method, path, version))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_request(raw).unwrap().unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.header("Host").unwrap(), "example.com");
        assert_eq!(consumed, raw.len());
    }

    #[test]
    fn incomplete_headers_want_more_data() {
        assert!(parse_request(b"GET / HTTP/1.1\r\nHost:").unwrap().is_none());
    }

    #[test]
    fn body_shorter_than_content_length_wants_more_data() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        assert!(parse_request(raw).unwrap().is_none());
    }
}
