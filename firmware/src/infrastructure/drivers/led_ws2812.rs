use esp_hal::xtensa_lx::interrupt;
use esp_hal::{gpio::interconnect::PeripheralOutput, peripherals::RMT, rmt::Rmt, time::Rate};
use esp_hal_smartled::{LedAdapterError, SmartLedsAdapter, buffer_size, smart_led_buffer};
use smart_leds::SmartLedsWrite;
use static_cell::make_static;

use reveal_light_composer::{LedDriver, Rgb};

use crate::infrastructure::config::LED_COUNT;

/// ESP-specific LED driver using RMT peripheral
///
/// This driver uses the ESP32's RMT (Remote Control) peripheral
/// to generate the precise timing signals required by WS2812B LEDs.
pub struct EspLedDriver<'a> {
    adapter: SmartLedsAdapter<'a, { buffer_size(LED_COUNT) }>,
}

impl<'a> EspLedDriver<'a> {
    /// Create a new ESP LED driver
    ///
    /// # Arguments
    /// * `rmt` - RMT peripheral
    /// * `pin` - GPIO pin connected to the LED data line
    pub fn new<O>(rmt: RMT<'a>, pin: O) -> Result<Self, esp_hal::rmt::Error>
    where
        O: PeripheralOutput<'a>,
    {
        let rmt = Rmt::new(rmt, Rate::from_mhz(80))?;

        // One pulse buffer for the whole program, sized for the full strip
        let rmt_buffer = make_static!(smart_led_buffer!(LED_COUNT));
        let adapter = SmartLedsAdapter::new(rmt.channel0, pin, rmt_buffer);

        Ok(Self { adapter })
    }
}

impl LedDriver<LED_COUNT> for EspLedDriver<'static> {
    type Error = LedAdapterError;

    fn write(&mut self, colors: &[Rgb; LED_COUNT]) -> Result<(), Self::Error> {
        // RMT timing must not be interrupted mid-frame
        interrupt::free(|| self.adapter.write(colors.iter().copied()))
    }
}
