use embassy_sync::{channel::Channel, signal::Signal};
use embassy_time::Instant;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::peripherals::RMT;
use esp_println::println;

use reveal_light_composer::{
    CommandSources, ControlChannel, ControlSender, LightEngine, QueueChannel, QueueSender,
    ReplySignal, SharedStatus,
};

use crate::infrastructure::config::{self, LED_COUNT};
use crate::infrastructure::drivers::EspLedDriver;

static CONTROL_CHANNEL: ControlChannel = Channel::new();
static QUEUE_CHANNEL: QueueChannel = Channel::new();
static REPLY_SIGNAL: ReplySignal = Signal::new();
static SHARED_STATUS: SharedStatus = SharedStatus::new();

pub type LightDriver = EspLedDriver<'static>;

/// Endpoints the network tasks use to reach the render loop
pub struct LightHandles {
    pub control: ControlSender<'static>,
    pub queue: QueueSender<'static>,
    pub replies: &'static ReplySignal,
    pub status: &'static SharedStatus,
}

/// Task for running the light engine
///
/// Owns the animation context; commands arrive through the static channels.
#[embassy_executor::task]
pub async fn light_composer_task(driver: LightDriver) {
    let sources = CommandSources {
        control: CONTROL_CHANNEL.receiver(),
        replies: &REPLY_SIGNAL,
        queue: QUEUE_CHANNEL.receiver(),
    };

    let engine: Result<LightEngine<'static, LightDriver, LED_COUNT>, _> =
        LightEngine::new(driver, config::engine_config(), sources, Instant::now());
    match engine {
        Ok(engine) => engine.with_shared_status(&SHARED_STATUS).run().await,
        Err(err) => println!("light: engine not started: {}", err),
    }
}

pub fn init_light_composer<O>(
    rmt: RMT<'static>,
    pin: O,
) -> Result<(LightDriver, LightHandles), esp_hal::rmt::Error>
where
    O: PeripheralOutput<'static>,
{
    let driver = EspLedDriver::new(rmt, pin)?;
    let handles = LightHandles {
        control: CONTROL_CHANNEL.sender(),
        queue: QUEUE_CHANNEL.sender(),
        replies: &REPLY_SIGNAL,
        status: &SHARED_STATUS,
    };

    Ok((driver, handles))
}
