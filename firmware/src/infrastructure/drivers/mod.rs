mod led_ws2812;
mod network;

pub use led_ws2812::EspLedDriver;
pub use network::{NetworkError, init_network_stack, resolve_host, wait_for_connection};
