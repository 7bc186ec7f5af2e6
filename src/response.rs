//! Response parsing from an untrusted byte stream
use std::io::{BufRead, BufReader, Read};

use crate::error::{Error, ParseError};
use crate::request::Request;

/// An HTTP response as it came off the wire.
///
/// Header lines are stored exactly as received, in wire order, duplicates
/// and all. Nothing about the server's reply is required to be
/// well-formed beyond the presence of a status line.
#[derive(Debug, Clone)]
pub struct Response {
    raw_status: String,
    headers: Vec<String>,
    body: Vec<u8>,
}

impl Response {
    /// Reads a response from a byte stream.
    ///
    /// The stream is consumed up to the end of the message body. Body
    /// length comes from a positive `Content-Length` header when one is
    /// present; otherwise everything up to the end of the stream is the
    /// body. Chunked transfer-encoding is not decoded, so a chunked reply
    /// carries its chunk-size lines inside the body verbatim.
    pub fn read_from<R: Read>(input: R) -> Result<Self, Error> {
        let mut reader = BufReader::new(input);
        let mut line = Vec::new();

        let read_length = reader.read_until(b'\n', &mut line)?;

        if read_length == 0 {
            return Err(ParseError::MissingStatusLine.into());
        }

        if !line.ends_with(b"\n") {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }

        let raw_status = String::from_utf8_lossy(&line).trim().to_string();
        tracing::trace!(raw_status = %raw_status, "read status line");

        let mut headers = Vec::new();

        loop {
            line.clear();

            match reader.read_until(b'\n', &mut line) {
                // A read failure or a stream that ends mid-header section
                // means no more headers, not a failed response.
                Ok(0) | Err(_) => break,
                // An unterminated final line is dropped.
                Ok(_) if !line.ends_with(b"\n") => break,
                Ok(_) => {}
            }

            let header = String::from_utf8_lossy(&line);
            let header = header.trim();

            if header.is_empty() {
                break;
            }

            headers.push(header.to_string());
        }

        tracing::trace!(header_count = headers.len(), "read header section");

        let mut body = Vec::new();

        match crate::fields::find_value(&headers, "Content-Length") {
            Some(value) => {
                let length = value
                    .parse::<i64>()
                    .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?;

                if length > 0 {
                    tracing::trace!(length, "read body with declared length");
                    body.resize(length as usize, 0);
                    reader.read_exact(&mut body)?;
                }
            }
            None => {
                tracing::trace!("no Content-Length, read body to end of stream");
                reader.read_to_end(&mut body)?;
            }
        }

        Ok(Self {
            raw_status,
            headers,
            body,
        })
    }

    /// Finds the value of a header, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::fields::find_value(&self.headers, name)
    }

    /// Returns the status line as received, whitespace-trimmed.
    pub fn status_line(&self) -> &str {
        &self.raw_status
    }

    /// Returns the status code portion of the status line. E.g. `200`.
    ///
    /// `None` when the status line does not split into three parts.
    pub fn status_code(&self) -> Option<&str> {
        crate::parse::status_line(&self.raw_status)
            .ok()
            .map(|(_remain, line)| line.status_code)
    }

    /// Returns the header lines as received.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Resolves the `Location` header against the originating request.
    ///
    /// Protocol-relative and absolute-path locations need the request for
    /// the scheme and hostname; anything else is returned unchanged.
    pub fn resolve_location(&self, request: &Request) -> Option<String> {
        let location = self.header("Location")?;

        if location.len() > 2 && location.starts_with("//") {
            return Some(format!("{}:{}", request.scheme, location));
        }

        if location.starts_with('/') {
            return Some(format!(
                "{}://{}{}",
                request.scheme, request.hostname, location
            ));
        }

        Some(location.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read(input: &[u8]) -> Response {
        Response::read_from(Cursor::new(input.to_vec())).unwrap()
    }

    #[test]
    fn test_read_with_content_length() {
        let response = read(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhelloEXTRA");

        assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(response.status_code(), Some("200"));
        // Only the declared five bytes are consumed.
        assert_eq!(response.body(), b"hello");
    }

    #[test]
    fn test_read_without_content_length() {
        let response = read(b"HTTP/1.1 200 OK\r\nServer: x\r\n\r\neverything until close");

        assert_eq!(response.body(), b"everything until close");
    }

    #[test]
    fn test_read_zero_content_length() {
        let response = read(b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n");

        assert_eq!(response.body(), b"");
    }

    #[test]
    fn test_read_negative_content_length() {
        let response = read(b"HTTP/1.1 200 OK\r\nContent-Length: -5\r\n\r\nignored");

        assert_eq!(response.body(), b"");
    }

    #[test]
    fn test_read_invalid_content_length() {
        let result =
            Response::read_from(Cursor::new(b"HTTP/1.1 200 OK\r\nContent-Length: abc\r\n\r\n".to_vec()));

        assert!(result.unwrap_err().is_parse());
    }

    #[test]
    fn test_read_short_body() {
        let result =
            Response::read_from(Cursor::new(b"HTTP/1.1 200 OK\r\nContent-Length: 50\r\n\r\nshort".to_vec()));

        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_read_empty_stream() {
        let result = Response::read_from(Cursor::new(Vec::new()));

        assert!(result.unwrap_err().is_parse());
    }

    #[test]
    fn test_read_unterminated_status_line() {
        let result = Response::read_from(Cursor::new(b"HTTP/1.1 200 OK".to_vec()));

        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_read_truncated_header_section() {
        // Stream ends in the middle of the headers: whatever lines were
        // complete are kept and the body is empty.
        let response = read(b"HTTP/1.1 200 OK\r\nServer: x\r\n");

        assert_eq!(response.headers(), &["Server: x".to_string()]);
        assert_eq!(response.body(), b"");
    }

    #[test]
    fn test_read_headers_keep_wire_order() {
        let response = read(b"HTTP/1.1 200 OK\r\nHost: x\r\nAccept: y\r\n\r\n");

        assert_eq!(
            response.headers(),
            &["Host: x".to_string(), "Accept: y".to_string()]
        );
    }

    #[test]
    fn test_read_bare_lf_lines() {
        let response = read(b"HTTP/1.1 200 OK\nServer: x\n\nbody");

        assert_eq!(response.status_line(), "HTTP/1.1 200 OK");
        assert_eq!(response.headers(), &["Server: x".to_string()]);
        assert_eq!(response.body(), b"body");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = read(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n");

        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.header("Missing"), None);
    }

    #[test]
    fn test_status_code_malformed_line() {
        let response = read(b"HTTP/1.1 200\r\n\r\n");

        assert_eq!(response.status_code(), None);
    }

    #[test]
    fn test_resolve_location_absolute_path() {
        let request = Request::from_url("GET", "https://a.com/start").unwrap();
        let response = read(b"HTTP/1.1 302 Found\r\nLocation: /p\r\n\r\n");

        assert_eq!(
            response.resolve_location(&request),
            Some("https://a.com/p".to_string())
        );
    }

    #[test]
    fn test_resolve_location_protocol_relative() {
        let request = Request::from_url("GET", "https://a.com/start").unwrap();
        let response = read(b"HTTP/1.1 302 Found\r\nLocation: //b.com/p\r\n\r\n");

        assert_eq!(
            response.resolve_location(&request),
            Some("https://b.com/p".to_string())
        );
    }

    #[test]
    fn test_resolve_location_already_absolute() {
        let request = Request::from_url("GET", "https://a.com/start").unwrap();
        let response = read(b"HTTP/1.1 302 Found\r\nLocation: http://c.com/p\r\n\r\n");

        assert_eq!(
            response.resolve_location(&request),
            Some("http://c.com/p".to_string())
        );
    }

    #[test]
    fn test_resolve_location_missing() {
        let request = Request::from_url("GET", "https://a.com/").unwrap();
        let response = read(b"HTTP/1.1 200 OK\r\n\r\n");

        assert_eq!(response.resolve_location(&request), None);
    }
}
