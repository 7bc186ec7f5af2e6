//! Error representations

/// Error for any failure during request construction or dispatch.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(..))
    }

    pub fn as_url(&self) -> Option<&UrlError> {
        if let Self::Url(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(..))
    }

    pub fn as_connect(&self) -> Option<&ConnectError> {
        if let Self::Connect(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(..))
    }

    pub fn as_parse(&self) -> Option<&ParseError> {
        if let Self::Parse(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(..))
    }

    pub fn as_io(&self) -> Option<&std::io::Error> {
        if let Self::Io(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

/// Error for a request URL that could not be understood.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UrlError {
    #[error(transparent)]
    Parse(#[from] url::ParseError),

    /// The URL has no `//` authority separator, so there is no host to
    /// connect to.
    #[error("invalid URL: {0}")]
    MissingAuthority(String),
}

/// Error for failures while establishing the connection to the server.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConnectError {
    /// TCP connection failure, refusal, or connect timeout.
    #[error("connection failed")]
    Connection(#[source] std::io::Error),

    /// The platform root certificate store could not be loaded.
    #[error("root certificate store unavailable")]
    CertPool(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The hostname is not usable as a TLS server name.
    #[error("invalid TLS server name")]
    ServerName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// TLS session setup failure.
    #[error("TLS error")]
    Tls(#[from] rustls::Error),

    /// The TLS handshake failed or timed out.
    #[error("TLS handshake failed")]
    Handshake(#[source] std::io::Error),
}

/// Error for a response that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The stream ended before a status line was read.
    #[error("missing status line")]
    MissingStatusLine,

    /// The `Content-Length` header value is not an integer.
    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),
}
