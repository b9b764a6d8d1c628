use core::fmt;
use core::str::FromStr;

use heapless::String;

use embassy_net::{DhcpConfig, IpAddress, Runner, Stack, StackResources, dns::DnsQueryType};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};

use static_cell::make_static;

use crate::infrastructure::config;

/// HTTP server, push-feed client and DNS
const MAX_CONNECTIONS: usize = 4;

#[derive(Debug)]
pub enum NetworkError {
    Radio(esp_radio::InitializationError),
    Wifi(esp_radio::wifi::WifiError),
    Hostname,
    Dns,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(err) => write!(f, "radio init failed: {err:?}"),
            Self::Wifi(err) => write!(f, "wifi init failed: {err:?}"),
            Self::Hostname => f.write_str("invalid hostname"),
            Self::Dns => f.write_str("host lookup failed"),
        }
    }
}

pub fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> Result<
    (
        Stack<'static>,
        Runner<'static, WifiDevice<'static>>,
        WifiController<'static>,
    ),
    NetworkError,
> {
    let esp_radio_ctrl = esp_radio::init().map_err(NetworkError::Radio)?;
    let esp_radio_ctrl = &*make_static!(esp_radio_ctrl);
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, WifiConfig::default())
            .map_err(NetworkError::Wifi)?;

    let mut dhcp_config = DhcpConfig::default();
    let hostname =
        String::from_str(config::DEVICE.hostname).map_err(|()| NetworkError::Hostname)?;
    dhcp_config.hostname = Some(hostname);

    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, network_resources, get_seed());

    Ok((stack, runner, controller))
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}

/// Wait for full network connectivity (link + IP address)
/// Returns the obtained IPv4 configuration
pub async fn wait_for_connection(stack: Stack<'_>) -> embassy_net::StaticConfigV4 {
    // Wait for the network link to become active
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(100)).await;
    }

    // Wait for the network stack to obtain an IPv4 address via DHCP
    loop {
        if let Some(config) = stack.config_v4() {
            return config;
        }
        Timer::after(Duration::from_millis(100)).await;
    }
}

/// Resolves a hostname to an IP address
pub async fn resolve_host(stack: Stack<'static>, host: &str) -> Result<IpAddress, NetworkError> {
    if let Ok(ip) = host.parse::<embassy_net::Ipv4Address>() {
        return Ok(IpAddress::Ipv4(ip));
    }

    let addresses = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|_| NetworkError::Dns)?;

    addresses.first().copied().ok_or(NetworkError::Dns)
}
