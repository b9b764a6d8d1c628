use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_println::println;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiError, WifiEvent,
    WifiStaState,
};

use crate::infrastructure::config;

/// Settle time after the access point drops us
const RECONNECT_DELAY: Duration = Duration::from_millis(2000);
/// Back-off after a failed start or association
const RETRY_DELAY: Duration = Duration::from_millis(5000);

/// Keeps the strip associated with the configured access point
///
/// The render loop never depends on this task: while the station is down the
/// strip keeps animating and only the HTTP and feed tasks stall.
#[embassy_executor::task]
pub async fn wifi_connection_task(mut controller: WifiController<'static>) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            println!("network: link to {} lost", config::WIFI.ssid);
            Timer::after(RECONNECT_DELAY).await;
        }

        if let Err(e) = ensure_station_started(&mut controller).await {
            println!("network: station start failed: {e:?}");
            Timer::after(RETRY_DELAY).await;
            continue;
        }

        println!("network: associating with {}", config::WIFI.ssid);
        match controller.connect_async().await {
            Ok(()) => println!("network: associated"),
            Err(e) => {
                println!("network: association failed: {e:?}");
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

async fn ensure_station_started(controller: &mut WifiController<'static>) -> Result<(), WifiError> {
    if matches!(controller.is_started(), Ok(true)) {
        return Ok(());
    }
    controller.set_config(&ModeConfig::Client(station_config()))?;
    controller.start_async().await
}

/// Station credentials; an empty password selects an open network
fn station_config() -> ClientConfig {
    let station = ClientConfig::default().with_ssid(config::WIFI.ssid.into());
    if config::WIFI.password.is_empty() {
        station.with_auth_method(AuthMethod::None)
    } else {
        station.with_password(config::WIFI.password.into())
    }
}

/// Drives the embassy-net stack
#[embassy_executor::task]
pub async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
