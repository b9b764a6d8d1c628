//! Comet: bright head pixel with an exponentially fading tail, wrapping
//! around the strip

use embassy_time::Duration;

use super::{EffectImpl, Expiry};
use crate::color::{Rgb, scale_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CometEffect {
    color: Rgb,
    duration: Duration,
    /// Pixels advanced per step
    step: u16,
    /// Time between two steps
    step_interval: Duration,
    start_position: u16,
    tail_length: u8,
    tail_decay: u8,
}

impl CometEffect {
    pub const fn new(color: Rgb, duration: Duration, step: u16, step_interval: Duration) -> Self {
        Self {
            color,
            duration,
            step,
            step_interval,
            start_position: 0,
            tail_length: 0,
            tail_decay: 255,
        }
    }

    /// Set the tail length and per-pixel falloff
    #[must_use]
    pub const fn with_tail(mut self, length: u8, decay: u8) -> Self {
        self.tail_length = length;
        self.tail_decay = decay;
        self
    }

    #[must_use]
    pub const fn with_start_position(mut self, position: u16) -> Self {
        self.start_position = position;
        self
    }

    /// Head pixel index at `elapsed` on a strip of `count` pixels
    #[allow(clippy::cast_possible_truncation)]
    pub fn head_position(&self, elapsed: Duration, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let interval_ms = self.step_interval.as_millis().max(1);
        let steps = elapsed.as_millis() / interval_ms;
        let travelled = steps.wrapping_mul(u64::from(self.step)) % count as u64;
        ((u64::from(self.start_position) % count as u64 + travelled) % count as u64) as usize
    }
}

impl EffectImpl for CometEffect {
    fn render(&self, elapsed: Duration, leds: &mut [Rgb]) {
        leds.fill(Rgb::default());
        let count = leds.len();
        if count == 0 {
            return;
        }

        let head = self.head_position(elapsed, count);
        leds[head] = self.color;

        let tail = usize::from(self.tail_length).min(count - 1);
        let mut color = self.color;
        for k in 1..=tail {
            color = scale_color(color, self.tail_decay);
            leds[(head + count - k) % count] = color;
        }
    }

    fn expiry(&self) -> Expiry {
        Expiry::Revert(self.duration)
    }
}
