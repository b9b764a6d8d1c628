#![allow(clippy::unreadable_literal)]

use embassy_time::Duration;
use reveal_light_composer::EngineConfig;

pub struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
}

/// Push-feed endpoint serving the command queue as `text/event-stream`
pub struct FeedConfig {
    pub host: &'static str,
    pub port: u16,
    pub path: &'static str,
}

pub struct DeviceConfig {
    pub hostname: &'static str,
}

pub struct LightConfig {
    /// Brightness of the ambient rainbow, limits current on the full strip
    pub ambient_brightness: u8,
    pub static_window_ms: u64,
}

/// Number of pixels on the strip
pub const LED_COUNT: usize = 300;

pub const HTTP_PORT: u16 = 80;

pub const WIFI: WifiConfig = WifiConfig {
    ssid: env!("WIFI_SSID"),
    password: env!("WIFI_PASSWORD"),
};

pub const FEED: FeedConfig = FeedConfig {
    host: env!("FEED_HOST"),
    port: parse_port(option_env!("FEED_PORT"), 80),
    path: env!("FEED_PATH"),
};

pub const DEVICE: DeviceConfig = DeviceConfig {
    hostname: "reveal-strip",
};

pub const LIGHT: LightConfig = LightConfig {
    ambient_brightness: 160,
    static_window_ms: 5000,
};

/// Engine settings for this board
pub const fn engine_config() -> EngineConfig {
    EngineConfig::new()
        .with_ambient_brightness(LIGHT.ambient_brightness)
        .with_static_window(Duration::from_millis(LIGHT.static_window_ms))
}

/// Parse a decimal port at compile time, falling back to `default`
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
const fn parse_port(value: Option<&str>, default: u16) -> u16 {
    let Some(value) = value else {
        return default;
    };
    let bytes = value.as_bytes();
    if bytes.is_empty() {
        return default;
    }
    let mut port: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            return default;
        }
        port = port * 10 + (digit - b'0') as u32;
        if port > u16::MAX as u32 {
            return default;
        }
        i += 1;
    }
    port as u16
}

#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO25
    };
}
