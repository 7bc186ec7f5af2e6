//! A library for making HTTP requests with exact control over the bytes
//! sent on the wire.
//!
//! Most HTTP clients exist to shield the caller from the protocol. This
//! one does the opposite: what the caller puts in the request is what
//! goes down the socket, byte for byte, and whatever comes back is handed
//! over with as little interpretation as possible. That makes it suited
//! to security testing, protocol fuzzing, and probing servers that do not
//! speak HTTP correctly, and unsuited to nearly everything else.
//!
//! Two request forms exist: [`Request`] is assembled from individual
//! fields and serialized by the library, while [`RawRequest`] sends a
//! caller-supplied string verbatim. Either is dispatched with
//! [`perform`], which returns a [`Response`] parsed tolerantly from the
//! server's reply.
//!
//! ```no_run
//! use rawhttp::{Request, perform};
//!
//! let mut request = Request::from_url("GET", "https://example.com/robots.txt")?;
//! request.auto_set_host();
//!
//! let response = perform(&request)?;
//! println!("{}", response.status_line());
//! # Ok::<(), rawhttp::Error>(())
//! ```
//!
//! # Security
//!
//! TLS connections do **not** verify the server certificate. See the
//! [`connect`] module documentation before using this crate anywhere the
//! identity of the peer matters.

pub mod client;
pub mod connect;
pub mod error;
mod fields;
mod parse;
pub mod request;
pub mod response;

pub use client::perform;
pub use error::{ConnectError, Error, ParseError, UrlError};
pub use request::{DEFAULT_TIMEOUT, RawRequest, Request, Requester};
pub use response::Response;
