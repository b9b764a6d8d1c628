use core::fmt::Write;

use heapless::String;

use super::{Error, MAX_PATH_SIZE};

pub type StatusCode = u16;

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_METHODS: &str = "GET,POST,OPTIONS";
const CORS_ALLOW_HEADERS: &str = "Content-Type";

pub fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// HTTP Content Type.
#[derive(Debug, Clone, Copy)]
pub enum ContentType {
    Json,
}

impl ContentType {
    fn as_str(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
        }
    }
}

/// HTTP socket connection policy.
#[derive(Debug, Clone, Copy)]
enum ConnectionPolicy {
    Close,
}

impl ConnectionPolicy {
    fn as_str(self) -> &'static str {
        match self {
            ConnectionPolicy::Close => "close",
        }
    }
}

pub trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error>;
}

/// HTTP Content Headers.
#[derive(Debug, Clone, Copy)]
pub struct ContentHeaders {
    content_type: ContentType,
    content_length: usize,
}

impl ContentHeaders {
    pub const fn new(content_type: ContentType, length: usize) -> Self {
        Self {
            content_type,
            content_length: length,
        }
    }

    pub const fn json(length: usize) -> Self {
        Self::new(ContentType::Json, length)
    }
}

impl TargetWriter for ContentHeaders {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        write!(writer, "Content-Type: {}\r\n", self.content_type.as_str())?;
        write!(writer, "Content-Length: {}\r\n", self.content_length)?;
        Ok(())
    }
}

/// Response Headers.
///
/// Every response carries the CORS headers so browser front-ends on any
/// origin can drive the strip.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeaders {
    status: StatusCode,
    connection: ConnectionPolicy,
    content: Option<ContentHeaders>,
}

impl ResponseHeaders {
    /// Create response headers with a status code and no body.
    pub const fn from_code(code: StatusCode) -> Self {
        Self {
            status: code,
            connection: ConnectionPolicy::Close,
            content: None,
        }
    }

    pub const fn success() -> Self {
        Self::from_code(200)
    }

    /// Answer to a CORS preflight
    pub const fn preflight() -> Self {
        Self::from_code(204)
    }

    /// Set the content headers.
    #[must_use]
    pub const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl TargetWriter for ResponseHeaders {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        let reason = reason_phrase(self.status);
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason)?;
        write!(writer, "Access-Control-Allow-Origin: {CORS_ALLOW_ORIGIN}\r\n")?;
        write!(writer, "Access-Control-Allow-Methods: {CORS_ALLOW_METHODS}\r\n")?;
        write!(writer, "Access-Control-Allow-Headers: {CORS_ALLOW_HEADERS}\r\n")?;
        match &self.content {
            Some(content) => content.write_to(writer)?,
            None => write!(writer, "Content-Length: 0\r\n")?,
        }
        write!(writer, "Connection: {}\r\n", self.connection.as_str())?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => return None,
        })
    }
}

/// Parse the request line from the header string.
///
/// Returns the method, path, and rest of the header string.
pub fn parse_request_line(header_str: &str) -> Option<(HttpMethod, &str, &str)> {
    let line_end = header_str.find("\r\n").unwrap_or(header_str.len());
    let first_line = &header_str[..line_end];
    let mut parts = first_line.split_whitespace();
    let method = parts.next().and_then(HttpMethod::parse)?;
    let path = parts.next()?;
    let rest = header_str.get(line_end + 2..).unwrap_or("");

    Some((method, path, rest))
}

/// Position just past the `\r\n\r\n` terminating the request head
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

/// Find the content length in the header string.
///
/// Returns `None` if the header is absent or not a number.
pub fn find_content_length(header: &str) -> Option<usize> {
    const TARGET: &str = "content-length:";
    header.lines().find_map(|line| {
        let name = line.get(..TARGET.len())?;
        if !name.eq_ignore_ascii_case(TARGET) {
            return None;
        }
        line[TARGET.len()..].trim().parse::<usize>().ok()
    })
}

/// Method, path and body length of a request
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: HttpMethod,
    pub path: String<MAX_PATH_SIZE>,
    pub content_length: usize,
    /// Bytes taken by the request line and headers, terminator included
    pub header_len: usize,
}

/// Parse a request head from the start of `buf`
///
/// Returns `Ok(None)` while the head is still incomplete.
pub fn parse_request_head(buf: &[u8]) -> Result<Option<RequestHead>, Error> {
    let Some(header_len) = find_header_end(buf) else {
        return Ok(None);
    };
    let header_str = core::str::from_utf8(&buf[..header_len]).map_err(|_| Error::Parse)?;
    let (method, raw_path, rest) = parse_request_line(header_str).ok_or(Error::Parse)?;

    let mut path = String::new();
    path.push_str(raw_path).map_err(|()| Error::TooLarge)?;

    Ok(Some(RequestHead {
        method,
        path,
        content_length: find_content_length(rest).unwrap_or(0),
        header_len,
    }))
}
