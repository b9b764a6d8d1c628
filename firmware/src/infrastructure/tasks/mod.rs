pub mod command_feed;
pub mod http_server;
pub mod light_composer;
pub(crate) mod network;

pub use command_feed::command_feed_task;
pub use http_server::http_server_task;
pub use network::{network_runner_task, wifi_connection_task};
