use embassy_net::tcp::TcpSocket;
use embedded_io_async::Write as _;
use heapless::{String, Vec};

use reveal_light_composer::control::{
    ContentHeaders, HttpMethod, MAX_PATH_SIZE, ResponseHeaders, StatusCode, TargetWriter as _,
    parse_request_head,
};
use reveal_light_composer::source::CONTROL_BODY_SIZE;

use super::{Error, HttpResult, tcp_error};

const HEADER_BUFFER_SIZE: usize = 1024;
const RESPONSE_HEADER_SIZE: usize = 256;
const BODY_RX_CHUNK_SIZE: usize = 256;

/// HTTP connection context
///
/// Holds the parsed request head. The body is read on demand, so routes that
/// never look at it do not pay for it.
pub(crate) struct HttpConnection<'a> {
    pub method: HttpMethod,
    pub path: String<MAX_PATH_SIZE>,

    socket: TcpSocket<'a>,
    content_length: usize,
    /// Request bytes read past the head: the start of the body
    body_buf: Vec<u8, CONTROL_BODY_SIZE>,
    /// Bytes past the head did not fit the body buffer
    overflow: bool,
}

impl<'a> HttpConnection<'a> {
    /// Read and parse the request head from a freshly accepted socket
    pub(crate) async fn from_socket(mut socket: TcpSocket<'a>) -> Result<Self, Error> {
        let mut header_buf = [0u8; HEADER_BUFFER_SIZE];
        let mut header_len = 0;

        let head = loop {
            if header_len == header_buf.len() {
                return Err(Error::TooLarge);
            }
            let n = socket
                .read(&mut header_buf[header_len..])
                .await
                .map_err(tcp_error)?;
            if n == 0 {
                return Err(Error::Closed);
            }
            header_len += n;
            if let Some(head) = parse_request_head(&header_buf[..header_len])? {
                break head;
            }
        };

        // Anything read past the head already belongs to the body
        let mut body_buf = Vec::new();
        let tail = &header_buf[head.header_len..header_len];
        let overflow = body_buf.extend_from_slice(tail).is_err();

        Ok(Self {
            method: head.method,
            path: head.path,
            socket,
            content_length: head.content_length,
            body_buf,
            overflow,
        })
    }

    /// Whether the announced body exceeds the control body buffer
    pub(crate) fn body_too_large(&self) -> bool {
        self.overflow || self.content_length > self.body_buf.capacity()
    }

    /// Read the request body
    ///
    /// A missing body reads as empty; one larger than the control body
    /// buffer is rejected with [`Error::TooLarge`].
    pub(crate) async fn read_body(&mut self) -> Result<&[u8], Error> {
        if self.body_too_large() {
            return Err(Error::TooLarge);
        }

        while self.body_buf.len() < self.content_length {
            let mut buf = [0u8; BODY_RX_CHUNK_SIZE];
            let wanted = (self.content_length - self.body_buf.len()).min(buf.len());
            let n = self
                .socket
                .read(&mut buf[..wanted])
                .await
                .map_err(tcp_error)?;
            if n == 0 {
                return Err(Error::Closed);
            }
            self.body_buf
                .extend_from_slice(&buf[..n])
                .map_err(|()| Error::TooLarge)?;
        }

        let len = self.content_length.min(self.body_buf.len());
        Ok(&self.body_buf[..len])
    }

    /// Write the headers to the connection
    pub(crate) async fn write_headers(&mut self, headers: &ResponseHeaders) -> HttpResult {
        let mut header_buf = String::<RESPONSE_HEADER_SIZE>::new();
        headers.write_to(&mut header_buf)?;
        self.write_all(header_buf.as_bytes()).await
    }

    /// Write a JSON response with the given status code
    pub(crate) async fn write_json(&mut self, code: StatusCode, body: &[u8]) -> HttpResult {
        let headers = ResponseHeaders::from_code(code).with_content(ContentHeaders::json(body.len()));
        self.write_headers(&headers).await?;
        self.write_all(body).await
    }

    /// Send FIN and flush before the socket is dropped
    pub(crate) async fn finish(mut self) {
        self.socket.close();
        let _ = self.socket.flush().await;
    }

    async fn write_all(&mut self, buf: &[u8]) -> HttpResult {
        self.socket.write_all(buf).await.map_err(tcp_error)?;
        self.socket.flush().await.map_err(tcp_error)?;
        Ok(())
    }
}

