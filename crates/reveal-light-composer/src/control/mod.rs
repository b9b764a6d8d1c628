//! Control-surface HTTP codec
//!
//! Socket-free pieces of the HTTP/1.1 control endpoint: request head
//! parsing, routing and response headers. The firmware owns the socket and
//! feeds bytes through these.

mod headers;
mod route;

use core::fmt;

pub use headers::{
    ContentHeaders, ContentType, HttpMethod, RequestHead, ResponseHeaders, StatusCode,
    TargetWriter, find_content_length, find_header_end, parse_request_head, parse_request_line,
    reason_phrase,
};
pub use route::{Route, resolve_route};

/// Maximum accepted request path length
pub const MAX_PATH_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peer closed the connection
    Closed,
    /// Request line or headers are not valid HTTP
    Parse,
    /// Request head or body exceeds the buffers
    TooLarge,
    FormatHeaders,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "connection closed",
            Self::Parse => "malformed request",
            Self::TooLarge => "request too large",
            Self::FormatHeaders => "failed to format headers",
        })
    }
}

impl From<fmt::Error> for Error {
    fn from(_error: fmt::Error) -> Self {
        Error::FormatHeaders
    }
}
