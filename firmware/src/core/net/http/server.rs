use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::Duration;
#[cfg(feature = "log")]
use esp_println::println;

use super::{HttpResult, connection::HttpConnection};

/// Idle limit for a client connection
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) trait HttpHandler {
    async fn handle_request(&self, conn: &mut HttpConnection<'_>) -> HttpResult;
}

pub(crate) struct HttpServer<'a, T: HttpHandler> {
    handler: &'a T,
}

impl<'a, T: HttpHandler> HttpServer<'a, T> {
    pub(crate) fn new(handler: &'a T) -> Self {
        Self { handler }
    }

    /// Accept and serve connections one at a time, forever
    pub(crate) async fn listen_and_serve(
        &self,
        stack: Stack<'static>,
        port: u16,
        rx_buffer: &mut [u8],
        tx_buffer: &mut [u8],
    ) -> ! {
        loop {
            let mut socket = TcpSocket::new(stack, rx_buffer, tx_buffer);
            socket.set_timeout(Some(SOCKET_TIMEOUT));

            if socket.accept(port).await.is_err() {
                continue;
            }

            let mut conn = match HttpConnection::from_socket(socket).await {
                Ok(connection) => connection,
                Err(_e) => {
                    #[cfg(feature = "log")]
                    println!("http_server: connection startup error: {}", _e);
                    continue;
                }
            };

            if let Err(_e) = self.handler.handle_request(&mut conn).await {
                #[cfg(feature = "log")]
                println!("http_server: connection error: {}", _e);
            }
            conn.finish().await;
        }
    }
}
