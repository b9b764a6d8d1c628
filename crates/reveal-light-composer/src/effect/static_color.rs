//! Flat effects: a single static color, or all pixels dark

use embassy_time::Duration;

use super::{EffectImpl, Expiry, Hold};
use crate::color::Rgb;

/// Static color effect - fills all LEDs with one color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticColorEffect {
    color: Rgb,
    hold: Hold,
}

impl StaticColorEffect {
    pub const fn new(color: Rgb, hold: Hold) -> Self {
        Self { color, hold }
    }

    /// Create from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8, hold: Hold) -> Self {
        Self::new(Rgb { r, g, b }, hold)
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl EffectImpl for StaticColorEffect {
    fn render(&self, _elapsed: Duration, leds: &mut [Rgb]) {
        leds.fill(self.color);
    }

    fn expiry(&self) -> Expiry {
        self.hold.expiry()
    }
}

/// Blackout effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffEffect {
    hold: Hold,
}

impl OffEffect {
    pub const fn new(hold: Hold) -> Self {
        Self { hold }
    }
}

impl EffectImpl for OffEffect {
    fn render(&self, _elapsed: Duration, leds: &mut [Rgb]) {
        leds.fill(Rgb::default());
    }

    fn expiry(&self) -> Expiry {
        self.hold.expiry()
    }
}
