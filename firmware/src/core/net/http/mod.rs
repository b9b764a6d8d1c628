pub(crate) mod connection;
pub(crate) mod server;

pub(crate) use connection::HttpConnection;
pub(crate) use server::{HttpHandler, HttpServer};

pub(crate) use reveal_light_composer::control::Error;

pub(crate) fn tcp_error(err: embassy_net::tcp::Error) -> Error {
    match err {
        embassy_net::tcp::Error::ConnectionReset => Error::Closed,
    }
}

pub(crate) type HttpResult = Result<(), Error>;
