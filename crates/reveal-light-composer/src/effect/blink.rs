//! Two-color blink with a fixed half-period

use embassy_time::Duration;

use super::{EffectImpl, Expiry};
use crate::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkEffect {
    colors: (Rgb, Rgb),
    half_period: Duration,
    duration: Duration,
}

impl BlinkEffect {
    pub const fn new(colors: (Rgb, Rgb), half_period: Duration, duration: Duration) -> Self {
        Self {
            colors,
            half_period,
            duration,
        }
    }

    /// Color shown at `elapsed`
    pub fn color_at(&self, elapsed: Duration) -> Rgb {
        let half_ms = self.half_period.as_millis().max(1);
        if (elapsed.as_millis() / half_ms) % 2 == 0 {
            self.colors.0
        } else {
            self.colors.1
        }
    }
}

impl EffectImpl for BlinkEffect {
    fn render(&self, elapsed: Duration, leds: &mut [Rgb]) {
        leds.fill(self.color_at(elapsed));
    }

    fn expiry(&self) -> Expiry {
        Expiry::Freeze(self.duration)
    }
}
