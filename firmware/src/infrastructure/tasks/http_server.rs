//! Control-surface HTTP task
//!
//! Serves one connection at a time; each request is answered by the render
//! loop through [`ControlHttpController`].

use embassy_net::Stack;
use esp_println::println;

use crate::controllers::ControlHttpController;
use crate::core::net::http::HttpServer;
use crate::infrastructure::config::HTTP_PORT;

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 1024;

#[embassy_executor::task]
pub async fn http_server_task(stack: Stack<'static>, controller: &'static ControlHttpController) {
    let server = HttpServer::new(controller);
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    println!("http: listening on port {}", HTTP_PORT);
    server
        .listen_and_serve(stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await
}
