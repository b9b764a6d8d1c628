use embassy_time::{Duration, with_timeout};
use esp_println::println;

use reveal_light_composer::{
    CommandName, ControlRequest, ControlSender, ReplySignal, Response, SharedStatus,
    StatusSnapshot,
    control::{Error as HttpError, ResponseHeaders, Route, StatusCode, resolve_route},
};

use crate::core::net::http::{HttpConnection, HttpHandler, HttpResult};

/// Upper bound on waiting for the render loop to pick up a request
const REPLY_TIMEOUT: Duration = Duration::from_millis(500);
const JSON_BUFFER_SIZE: usize = 128;

/// Control surface: one route per command, plus `/status`
pub struct ControlHttpController {
    control: ControlSender<'static>,
    replies: &'static ReplySignal,
    status: &'static SharedStatus,
}

impl ControlHttpController {
    pub fn new(
        control: ControlSender<'static>,
        replies: &'static ReplySignal,
        status: &'static SharedStatus,
    ) -> Self {
        Self {
            control,
            replies,
            status,
        }
    }

    /// Hand the command to the render loop and wait for its acknowledgement
    async fn forward(&self, name: CommandName, body: &[u8]) -> Result<Response, StatusCode> {
        let request = ControlRequest::new(name.as_str(), body).ok_or(413)?;

        // drop a reply left over from a request that timed out
        self.replies.reset();
        self.control.try_send(request).map_err(|_| 503)?;

        with_timeout(REPLY_TIMEOUT, self.replies.wait())
            .await
            .map_err(|_| 503)
    }

    async fn handle_command(&self, conn: &mut HttpConnection<'_>, name: CommandName) -> HttpResult {
        if conn.body_too_large() {
            return write_error(conn, 413).await;
        }
        let body = conn.read_body().await?;

        match self.forward(name, body).await {
            Ok(response) => {
                let code = if response.is_ok() { 200 } else { 400 };
                write_response(conn, code, response).await
            }
            Err(code) => {
                println!("control: {} not delivered ({})", name.as_str(), code);
                write_error(conn, code).await
            }
        }
    }

    async fn handle_status(&self, conn: &mut HttpConnection<'_>) -> HttpResult {
        let mut buf = [0u8; JSON_BUFFER_SIZE];
        let n = StatusSnapshot::from_shared(self.status)
            .to_json(&mut buf)
            .map_err(|_| HttpError::FormatHeaders)?;
        conn.write_json(200, &buf[..n]).await
    }
}

impl HttpHandler for ControlHttpController {
    async fn handle_request(&self, conn: &mut HttpConnection<'_>) -> HttpResult {
        match resolve_route(conn.method, conn.path.as_str()) {
            Route::Command(name) => self.handle_command(conn, name).await,
            Route::Status => self.handle_status(conn).await,
            Route::Preflight => conn.write_headers(&ResponseHeaders::preflight()).await,
            route @ (Route::NotFound | Route::MethodNotAllowed) => {
                write_error(conn, route.status_code().unwrap_or(404)).await
            }
        }
    }
}

async fn write_response(
    conn: &mut HttpConnection<'_>,
    code: StatusCode,
    response: Response,
) -> HttpResult {
    let mut buf = [0u8; JSON_BUFFER_SIZE];
    let n = response
        .to_json(&mut buf)
        .map_err(|_| HttpError::FormatHeaders)?;
    conn.write_json(code, &buf[..n]).await
}

async fn write_error(conn: &mut HttpConnection<'_>, code: StatusCode) -> HttpResult {
    let message = match code {
        404 => "not found",
        405 => "method not allowed",
        413 => "payload too large",
        503 => "render loop busy",
        _ => "request failed",
    };
    write_response(conn, code, Response::Error(message)).await
}
