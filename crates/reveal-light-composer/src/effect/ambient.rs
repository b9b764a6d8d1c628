//! Ambient rainbow: a full hue wheel spread over the strip, rotating slowly

use embassy_time::Duration;

use super::EffectImpl;
use crate::color::{Hsv, Rgb, hsv2rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientEffect {
    /// Duration of one complete hue rotation
    cycle: Duration,
    /// Brightness value (0-255)
    value: u8,
}

impl AmbientEffect {
    pub const fn new(cycle: Duration, value: u8) -> Self {
        Self { cycle, value }
    }
}

impl EffectImpl for AmbientEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, elapsed: Duration, leds: &mut [Rgb]) {
        let count = leds.len() as u64;
        if count == 0 {
            return;
        }

        let cycle_ms = self.cycle.as_millis().max(1);
        let progress_ms = elapsed.as_millis() % cycle_ms;
        let base_hue = ((progress_ms * 256) / cycle_ms) as u8;

        for (i, pixel) in leds.iter_mut().enumerate() {
            let offset = ((i as u64 * 256) / count) as u8;
            *pixel = hsv2rgb(Hsv {
                hue: base_hue.wrapping_add(offset),
                sat: 255,
                val: self.value,
            });
        }
    }
}
