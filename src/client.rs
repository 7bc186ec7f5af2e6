//! Request dispatch
use std::io::Write;

use crate::connect;
use crate::error::Error;
use crate::request::Requester;
use crate::response::Response;

/// Performs one request/response round trip.
///
/// Opens a connection to the request's destination, writes the request's
/// serialized bytes followed by one extra `\r\n`, and parses the reply.
/// The extra terminator is always `\r\n` regardless of the request's line
/// endings: it guarantees the header section is terminated even when a
/// hand-typed [`RawRequest`](crate::RawRequest) literal leaves out the
/// final blank line.
///
/// The connection is used for exactly one exchange and closed when this
/// function returns, on success and on error alike.
pub fn perform<R: Requester>(request: &R) -> Result<Response, Error> {
    let mut stream = connect::open(&request.host(), request.is_tls(), request.timeout())?;

    let mut wire = Vec::new();
    request.serialize(&mut wire)?;

    tracing::trace!(wire_length = wire.len(), "send request");

    stream.write_all(&wire)?;
    stream.write_all(b"\r\n")?;
    stream.flush()?;

    Response::read_from(&mut stream)
}
