//! Effect library with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations. Rendering is a
//! pure function of the effect parameters and the time elapsed since the
//! effect was activated; no effect keeps state between frames.

mod ambient;
mod blink;
mod comet;
mod gradient;
mod static_color;

pub use ambient::AmbientEffect;
pub use blink::BlinkEffect;
pub use comet::CometEffect;
pub use gradient::{GradientEffect, MAX_GRADIENT_COLORS};
pub use static_color::{OffEffect, StaticColorEffect};

use embassy_time::Duration;

use crate::color::Rgb;

const EFFECT_NAME_AMBIENT: &str = "ambient";
const EFFECT_NAME_BLINK: &str = "blink";
const EFFECT_NAME_COMET: &str = "comet";
const EFFECT_NAME_GRADIENT: &str = "gradient";
const EFFECT_NAME_STATIC: &str = "static";
const EFFECT_NAME_OFF: &str = "off";

/// Trait for effect implementations
pub trait EffectImpl {
    /// Render a single frame
    ///
    /// Every pixel of `leds` must be written.
    fn render(&self, elapsed: Duration, leds: &mut [Rgb]);

    /// What happens to the effect once its timer runs out
    fn expiry(&self) -> Expiry {
        Expiry::Never
    }
}

/// Duration policy of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Runs until replaced
    Never,
    /// Stops animating after the duration and holds its last frame
    Freeze(Duration),
    /// Hands the strip back to the ambient effect after the duration
    Revert(Duration),
}

impl Expiry {
    /// Time after activation at which the effect expires, if it ever does
    pub const fn deadline(self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Freeze(duration) | Self::Revert(duration) => Some(duration),
        }
    }
}

/// How long a flat effect (static color, blackout) is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Held until another effect is activated
    Permanent,
    /// Held for the window, then the ambient effect resumes
    Window(Duration),
}

impl Hold {
    pub const fn expiry(self) -> Expiry {
        match self {
            Self::Permanent => Expiry::Never,
            Self::Window(window) => Expiry::Revert(window),
        }
    }
}

/// Effect identifier for external observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Ambient = 0,
    Blink = 1,
    Comet = 2,
    Gradient = 3,
    Static = 4,
    Off = 5,
}

impl EffectId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ambient => EFFECT_NAME_AMBIENT,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Comet => EFFECT_NAME_COMET,
            Self::Gradient => EFFECT_NAME_GRADIENT,
            Self::Static => EFFECT_NAME_STATIC,
            Self::Off => EFFECT_NAME_OFF,
        }
    }
}

impl From<u8> for EffectId {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Blink,
            2 => Self::Comet,
            3 => Self::Gradient,
            4 => Self::Static,
            5 => Self::Off,
            _ => Self::Ambient,
        }
    }
}

/// The effect variants the engine can show, one at a time
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Continuous hue rotation, the default background
    Ambient(AmbientEffect),
    /// Two colors alternating for a fixed duration
    Blink(BlinkEffect),
    /// Moving head with a fading tail, reverts to ambient when done
    Comet(CometEffect),
    /// Ordered palette cycled with hold and crossfade timing
    GradientTheme(GradientEffect),
    /// Single flat color
    Static(StaticColorEffect),
    /// All pixels dark
    Off(OffEffect),
}

impl Effect {
    /// Render the effect for the given time since activation
    pub fn render(&self, elapsed: Duration, leds: &mut [Rgb]) {
        match self {
            Self::Ambient(effect) => effect.render(elapsed, leds),
            Self::Blink(effect) => effect.render(elapsed, leds),
            Self::Comet(effect) => effect.render(elapsed, leds),
            Self::GradientTheme(effect) => effect.render(elapsed, leds),
            Self::Static(effect) => effect.render(elapsed, leds),
            Self::Off(effect) => effect.render(elapsed, leds),
        }
    }

    /// Render the effect into a fresh pixel buffer
    pub fn frame<const N: usize>(&self, elapsed: Duration) -> [Rgb; N] {
        let mut leds = [Rgb::default(); N];
        self.render(elapsed, &mut leds);
        leds
    }

    pub fn expiry(&self) -> Expiry {
        match self {
            Self::Ambient(effect) => effect.expiry(),
            Self::Blink(effect) => effect.expiry(),
            Self::Comet(effect) => effect.expiry(),
            Self::GradientTheme(effect) => effect.expiry(),
            Self::Static(effect) => effect.expiry(),
            Self::Off(effect) => effect.expiry(),
        }
    }

    pub fn id(&self) -> EffectId {
        match self {
            Self::Ambient(_) => EffectId::Ambient,
            Self::Blink(_) => EffectId::Blink,
            Self::Comet(_) => EffectId::Comet,
            Self::GradientTheme(_) => EffectId::Gradient,
            Self::Static(_) => EffectId::Static,
            Self::Off(_) => EffectId::Off,
        }
    }

    /// Whether the effect stays on the strip until explicitly replaced
    pub fn is_permanent(&self) -> bool {
        self.expiry() == Expiry::Never
    }
}
