//! Socket establishment for plain and TLS connections
//!
//! # Security
//!
//! TLS connections made by this module do **not** verify the server
//! certificate. The platform root store is still loaded, and a missing
//! store is still an error, but the verifier installed on top of it
//! accepts every certificate: this client exists to probe servers with
//! expired, self-signed, or otherwise broken TLS setups. The verifier has
//! its own name, [`danger::NoCertificateVerification`], so the choice is
//! visible wherever the configuration is built. Do not reuse this module
//! anywhere the identity of the peer matters.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::error::ConnectError;

/// A single-use duplex byte stream to a server.
pub enum Stream {
    Tcp(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            Self::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            Self::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            Self::Tls(stream) => stream.flush(),
        }
    }
}

/// Opens a connection to a `hostname:port` pair.
///
/// The timeout bounds address resolution, the TCP connect, and the TLS
/// handshake. It does not bound data transfer on the returned stream:
/// reads and writes after setup block for as long as the server keeps the
/// connection alive.
pub fn open(host: &str, tls: bool, timeout: Duration) -> Result<Stream, ConnectError> {
    tracing::debug!(host = %host, tls, timeout_ms = timeout.as_millis() as u64, "open connection");

    let socket = connect_tcp(host, timeout)?;

    if tls {
        handshake(host, socket, timeout)
    } else {
        Ok(Stream::Tcp(socket))
    }
}

fn connect_tcp(host: &str, timeout: Duration) -> Result<TcpStream, ConnectError> {
    let addrs = host.to_socket_addrs().map_err(ConnectError::Connection)?;
    let mut last_error = None;

    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(socket) => return Ok(socket),
            Err(error) => last_error = Some(error),
        }
    }

    Err(ConnectError::Connection(last_error.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved")
    })))
}

fn handshake(host: &str, mut socket: TcpStream, timeout: Duration) -> Result<Stream, ConnectError> {
    let config = tls_config()?;
    let server_name = server_name(host)?;

    let mut connection = ClientConnection::new(Arc::new(config), server_name)?;

    // The deadline covers the handshake only; it is lifted again so that
    // data transfer stays unbounded.
    socket
        .set_read_timeout(Some(timeout))
        .and_then(|()| socket.set_write_timeout(Some(timeout)))
        .map_err(ConnectError::Handshake)?;

    while connection.is_handshaking() {
        connection
            .complete_io(&mut socket)
            .map_err(ConnectError::Handshake)?;
    }

    tracing::debug!(host = %host, "TLS handshake complete");

    socket
        .set_read_timeout(None)
        .and_then(|()| socket.set_write_timeout(None))
        .map_err(ConnectError::Handshake)?;

    Ok(Stream::Tls(Box::new(StreamOwned::new(connection, socket))))
}

/// Builds the client configuration: platform roots, no client auth, and
/// server certificate verification switched off.
fn tls_config() -> Result<ClientConfig, ConnectError> {
    let loaded = rustls_native_certs::load_native_certs();

    let mut roots = RootCertStore::empty();
    roots.add_parsable_certificates(loaded.certs);

    if roots.is_empty() {
        let source: Box<dyn std::error::Error + Send + Sync> = match loaded.errors.into_iter().next()
        {
            Some(error) => Box::new(error),
            None => "no trusted roots found".into(),
        };

        return Err(ConnectError::CertPool(source));
    }

    let mut config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    config
        .dangerous()
        .set_certificate_verifier(Arc::new(danger::NoCertificateVerification::new(
            rustls::crypto::aws_lc_rs::default_provider(),
        )));

    Ok(config)
}

fn server_name(host: &str) -> Result<ServerName<'static>, ConnectError> {
    let hostname = match host.rsplit_once(':') {
        Some((hostname, _port)) => hostname,
        None => host,
    };

    // Bracketed IPv6 literals parse as addresses, not DNS names.
    let hostname = hostname.trim_start_matches('[').trim_end_matches(']');

    Ok(ServerName::try_from(hostname.to_string())?)
}

pub mod danger {
    //! A server certificate verifier that verifies nothing.

    use rustls::DigitallySignedStruct;
    use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
    use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
    use rustls::pki_types::{CertificateDer, ServerName, UnixTime};

    /// Accepts any server certificate.
    ///
    /// Handshake signatures are still checked against the presented
    /// certificate so the session itself is sound; the certificate is
    /// simply never validated against the roots or the server name.
    #[derive(Debug)]
    pub struct NoCertificateVerification(CryptoProvider);

    impl NoCertificateVerification {
        pub fn new(provider: CryptoProvider) -> Self {
            Self(provider)
        }
    }

    impl ServerCertVerifier for NoCertificateVerification {
        fn verify_server_cert(
            &self,
            _end_entity: &CertificateDer<'_>,
            _intermediates: &[CertificateDer<'_>],
            _server_name: &ServerName<'_>,
            _ocsp_response: &[u8],
            _now: UnixTime,
        ) -> Result<ServerCertVerified, rustls::Error> {
            Ok(ServerCertVerified::assertion())
        }

        fn verify_tls12_signature(
            &self,
            message: &[u8],
            cert: &CertificateDer<'_>,
            dss: &DigitallySignedStruct,
        ) -> Result<HandshakeSignatureValid, rustls::Error> {
            verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
        }

        fn verify_tls13_signature(
            &self,
            message: &[u8],
            cert: &CertificateDer<'_>,
            dss: &DigitallySignedStruct,
        ) -> Result<HandshakeSignatureValid, rustls::Error> {
            verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
        }

        fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
            self.0.signature_verification_algorithms.supported_schemes()
        }
    }
}
