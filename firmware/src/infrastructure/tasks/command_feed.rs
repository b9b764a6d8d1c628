//! Push-feed client task
//!
//! Holds a plain-TCP `text/event-stream` subscription to the command queue
//! and forwards decoded entries to the render loop. Connection failures are
//! logged and retried here; the render loop never sees them.

use core::fmt::{self, Write as _};

use embassy_net::{
    Stack,
    tcp::{ConnectError, Error as TcpError, TcpSocket},
};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write as _;
use esp_println::println;
use heapless::{String, Vec};

use reveal_light_composer::{
    EventStreamDecoder, QueueEntry, QueueSender, control::find_header_end,
};

use crate::infrastructure::config::FEED;
use crate::infrastructure::drivers::{NetworkError, resolve_host};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);
/// Longer than the server keep-alive interval
const SOCKET_TIMEOUT: Duration = Duration::from_secs(90);
const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 512;
const READ_CHUNK_SIZE: usize = 512;
const REQUEST_SIZE: usize = 256;
/// Decoder input per step; a complete command event is at least 29 bytes,
/// so one slice finishes at most three of them
const FEED_SLICE_SIZE: usize = 64;
const PENDING_ENTRIES: usize = 4;

#[derive(Debug)]
enum FeedClientError {
    Network(NetworkError),
    Connect(ConnectError),
    Tcp(TcpError),
    Request,
    ResponseHead,
    Status,
    Closed,
}

impl From<NetworkError> for FeedClientError {
    fn from(err: NetworkError) -> Self {
        Self::Network(err)
    }
}

impl From<ConnectError> for FeedClientError {
    fn from(err: ConnectError) -> Self {
        Self::Connect(err)
    }
}

impl From<TcpError> for FeedClientError {
    fn from(err: TcpError) -> Self {
        Self::Tcp(err)
    }
}

impl fmt::Display for FeedClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "{err}"),
            Self::Connect(err) => write!(f, "connect failed: {err:?}"),
            Self::Tcp(err) => write!(f, "socket error: {err:?}"),
            Self::Request => f.write_str("request does not fit"),
            Self::ResponseHead => f.write_str("response head too large"),
            Self::Status => f.write_str("unexpected response status"),
            Self::Closed => f.write_str("closed by server"),
        }
    }
}

/// Task subscribing to the command queue, reconnecting forever
#[embassy_executor::task]
pub async fn command_feed_task(stack: Stack<'static>, queue: QueueSender<'static>) {
    let mut decoder = EventStreamDecoder::new();
    loop {
        if let Err(err) = run_feed_client(stack, &queue, &mut decoder).await {
            println!("feed: {}, reconnecting in 2s...", err);
        }
        decoder.reset();
        Timer::after(RECONNECT_DELAY).await;
    }
}

async fn run_feed_client(
    stack: Stack<'static>,
    queue: &QueueSender<'static>,
    decoder: &mut EventStreamDecoder,
) -> Result<(), FeedClientError> {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(SOCKET_TIMEOUT));

    let address = resolve_host(stack, FEED.host).await?;
    println!("feed: connecting to {:?}:{}...", address, FEED.port);
    if let Err(err) = socket.connect((address, FEED.port)).await {
        socket.abort();
        return Err(err.into());
    }

    let request = format_request(decoder)?;
    socket.write_all(request.as_bytes()).await?;
    socket.flush().await?;

    let mut buf = [0u8; READ_CHUNK_SIZE];
    let (header_end, len) = read_response_head(&mut socket, &mut buf).await?;
    check_status(&buf[..header_end])?;
    println!("feed: subscribed");

    forward(queue, decoder, &buf[header_end..len]).await;
    loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Err(FeedClientError::Closed);
        }
        forward(queue, decoder, &buf[..n]).await;
    }
}

/// HTTP/1.0 keeps the body free of chunked framing
fn format_request(decoder: &EventStreamDecoder) -> Result<String<REQUEST_SIZE>, FeedClientError> {
    let mut request = String::new();
    write!(
        request,
        "GET {} HTTP/1.0\r\nHost: {}\r\nAccept: text/event-stream\r\nCache-Control: no-cache\r\n",
        FEED.path, FEED.host
    )
    .map_err(|_| FeedClientError::Request)?;
    if let Some(id) = decoder.last_id() {
        write!(request, "Last-Event-ID: {}\r\n", id).map_err(|_| FeedClientError::Request)?;
    }
    request
        .push_str("\r\n")
        .map_err(|()| FeedClientError::Request)?;
    Ok(request)
}

/// Read until the end of the response head
///
/// Returns the head length and the number of bytes read; bytes past the head
/// are the start of the stream.
async fn read_response_head(
    socket: &mut TcpSocket<'_>,
    buf: &mut [u8],
) -> Result<(usize, usize), FeedClientError> {
    let mut len = 0;
    loop {
        if len == buf.len() {
            return Err(FeedClientError::ResponseHead);
        }
        let n = socket.read(&mut buf[len..]).await?;
        if n == 0 {
            return Err(FeedClientError::Closed);
        }
        len += n;
        if let Some(end) = find_header_end(&buf[..len]) {
            return Ok((end, len));
        }
    }
}

fn check_status(head: &[u8]) -> Result<(), FeedClientError> {
    let line_end = head
        .iter()
        .position(|&b| b == b'\r')
        .unwrap_or(head.len());
    let status_line = core::str::from_utf8(&head[..line_end]).map_err(|_| FeedClientError::Status)?;
    let mut parts = status_line.split_whitespace();
    let version_ok = parts.next().is_some_and(|v| v.starts_with("HTTP/1."));
    if version_ok && parts.next() == Some("200") {
        Ok(())
    } else {
        println!("feed: rejected: {}", status_line);
        Err(FeedClientError::Status)
    }
}

/// Decode a chunk and hand its entries to the render loop
///
/// Waits for queue space: backpressure lands on this task, not on the loop.
async fn forward(queue: &QueueSender<'static>, decoder: &mut EventStreamDecoder, chunk: &[u8]) {
    for slice in chunk.chunks(FEED_SLICE_SIZE) {
        let mut pending: Vec<QueueEntry, PENDING_ENTRIES> = Vec::new();
        decoder.feed(slice, |entry| {
            if let Err(entry) = pending.push(entry) {
                println!("feed: too many entries in one slice, dropping {}", entry.id);
            }
        });
        for entry in pending {
            queue.send(entry).await;
        }
    }
}
