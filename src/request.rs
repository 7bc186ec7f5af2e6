//! Request descriptions and their wire serialization
use std::io::Write;
use std::time::Duration;

use url::Url;

use crate::error::{Error, UrlError};

/// Connect timeout applied when a request does not specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The bare minimum a value must expose to be dispatched as an HTTP request.
///
/// Exactly two implementations exist: [`Request`] for requests assembled
/// from fields, and [`RawRequest`] for caller-supplied literals.
pub trait Requester {
    /// Returns whether the connection should be made using TLS.
    fn is_tls(&self) -> bool;

    /// Returns the `hostname:port` pair to connect to.
    fn host(&self) -> String;

    /// Returns the connect timeout for the request.
    fn timeout(&self) -> Duration;

    /// Writes the request exactly as it should appear on the wire.
    fn serialize<W: Write>(&self, buf: W) -> std::io::Result<()>;
}

/// A structured HTTP request.
///
/// Every part of the message is an ordinary field under the caller's
/// control. Serialization makes no attempt to validate, deduplicate, or
/// complete what the caller put in; headers such as `Host` and
/// `Content-Length` are only added through the explicit
/// [`auto_set_host`](Self::auto_set_host) and
/// [`auto_set_content_length`](Self::auto_set_content_length) calls.
#[derive(Debug, Clone)]
pub struct Request {
    /// Whether to use TLS.
    pub tls: bool,

    /// HTTP verb. E.g. `GET`.
    pub method: String,

    /// Protocol scheme. E.g. `https`.
    pub scheme: String,

    /// Hostname to connect to. E.g. `localhost`.
    pub hostname: String,

    /// Port to connect to. E.g. `80`.
    pub port: String,

    /// Path to request. E.g. `/security.txt`.
    pub path: String,

    /// Query string without the leading `?`. E.g. `q=searchterm&page=3`.
    pub query: String,

    /// Fragment without the leading `#`.
    pub fragment: String,

    /// Protocol specifier for the request line. E.g. `HTTP/1.1`.
    pub proto: String,

    /// Header lines to send, in order, duplicates allowed. E.g.
    /// `["Host: localhost", "Accept: text/plain"]`.
    pub headers: Vec<String>,

    /// Body to send after the blank line.
    pub body: String,

    /// Line terminator. E.g. `\r\n`.
    pub eol: String,

    /// Connect timeout; [`DEFAULT_TIMEOUT`] when unset.
    pub timeout: Option<Duration>,
}

impl Request {
    /// Builds a `Request` for the given method and URL.
    ///
    /// The scheme, hostname, and port come from URL parsing; the port
    /// defaults to `443` under TLS and `80` otherwise. The path, query,
    /// and fragment are taken from the literal URL string, not from the
    /// parsed form: the parser percent-encodes and removes dot segments,
    /// and the bytes given here must be the bytes sent on the wire.
    pub fn from_url(method: &str, rawurl: &str) -> Result<Self, Error> {
        let parsed = Url::parse(rawurl).map_err(UrlError::from)?;

        let (path, query, fragment) =
            split_target(rawurl).ok_or_else(|| UrlError::MissingAuthority(rawurl.to_string()))?;

        let tls = parsed.scheme() == "https";
        let port = match parsed.port() {
            Some(port) => port.to_string(),
            None if tls => "443".to_string(),
            None => "80".to_string(),
        };

        Ok(Self {
            tls,
            method: method.to_string(),
            scheme: parsed.scheme().to_string(),
            hostname: parsed.host_str().unwrap_or_default().to_string(),
            port,
            path,
            query,
            fragment,
            proto: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            body: String::new(),
            eol: "\r\n".to_string(),
            timeout: None,
        })
    }

    /// Appends a raw header line. E.g. `Accept: text/plain`.
    pub fn add_header<S: Into<String>>(&mut self, header: S) {
        self.headers.push(header.into());
    }

    /// Finds the value of a header on the request, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::fields::find_value(&self.headers, name)
    }

    /// Appends a `Host` header using [`hostname`](Self::hostname).
    ///
    /// The port is never included, even when it is not the default for
    /// the scheme.
    pub fn auto_set_host(&mut self) {
        self.add_header(format!("Host: {}", self.hostname));
    }

    /// Appends a `Content-Length` header for the current body.
    ///
    /// The length is computed now, not at serialization time: call this
    /// after the body has its final value.
    pub fn auto_set_content_length(&mut self) {
        self.add_header(format!("Content-Length: {}", self.body.len()));
    }

    /// Returns the complete URL for the request.
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host(), self.full_path())
    }

    /// Returns the request line. E.g. `GET / HTTP/1.1`.
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.full_path(), self.proto)
    }

    /// Returns the path including the query string and fragment.
    ///
    /// An empty path renders as `/`. The query and fragment are appended
    /// with their `?`/`#` separators when non-empty; any further `?` or
    /// `#` bytes inside them are left alone.
    fn full_path(&self) -> String {
        let path = if self.path.is_empty() { "/" } else { &self.path };

        let mut target = path.to_string();

        if !self.query.is_empty() {
            target.push('?');
            target.push_str(&self.query);
        }

        if !self.fragment.is_empty() {
            target.push('#');
            target.push_str(&self.fragment);
        }

        target
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            tls: false,
            method: "GET".to_string(),
            scheme: "http".to_string(),
            hostname: String::new(),
            port: "80".to_string(),
            path: "/".to_string(),
            query: String::new(),
            fragment: String::new(),
            proto: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            body: String::new(),
            eol: "\r\n".to_string(),
            timeout: None,
        }
    }
}

impl Requester for Request {
    fn is_tls(&self) -> bool {
        self.tls
    }

    fn host(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    fn serialize<W: Write>(&self, mut buf: W) -> std::io::Result<()> {
        write!(buf, "{}{}", self.request_line(), self.eol)?;

        for header in &self.headers {
            write!(buf, "{}{}", header, self.eol)?;
        }

        buf.write_all(self.eol.as_bytes())?;
        buf.write_all(self.body.as_bytes())?;

        Ok(())
    }
}

/// A request where the caller supplies the wire text.
///
/// The stored string is sent to the server as-is; nothing is parsed,
/// validated, or completed. For when [`Request`] is still too helpful.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// Whether to use TLS.
    pub tls: bool,

    /// Hostname to connect to. E.g. `localhost`.
    pub hostname: String,

    /// Port to connect to. E.g. `80`.
    pub port: String,

    /// The message to send to the server. E.g.
    /// `GET / HTTP/1.1\r\nHost: localhost\r\n`.
    pub request: String,

    /// Connect timeout; [`DEFAULT_TIMEOUT`] when unset.
    pub timeout: Option<Duration>,
}

impl Requester for RawRequest {
    fn is_tls(&self) -> bool {
        self.tls
    }

    fn host(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    fn serialize<W: Write>(&self, mut buf: W) -> std::io::Result<()> {
        buf.write_all(self.request.as_bytes())
    }
}

/// Recovers the literal path, query, and fragment from a raw URL string.
///
/// The first `#` starts the fragment, the first `?` before it starts the
/// query, and the path runs from the first `/` after the authority. A URL
/// without a `//` authority separator returns `None`.
fn split_target(rawurl: &str) -> Option<(String, String, String)> {
    let (_scheme, rest) = rawurl.split_once("//")?;

    let (rest, fragment) = match rest.split_once('#') {
        Some((rest, fragment)) => (rest, fragment),
        None => (rest, ""),
    };

    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, query),
        None => (rest, ""),
    };

    let path = match rest.find('/') {
        Some(index) => &rest[index..],
        None => "/",
    };

    Some((path.to_string(), query.to_string(), fragment.to_string()))
}
