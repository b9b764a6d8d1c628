//! Engine configuration
//!
//! All timing and palette knobs the effects and the dispatcher read. The
//! defaults match the strip installation; boards override individual fields
//! with the `with_*` builders.

use embassy_time::Duration;

use crate::color::{BOY, GIRL, Rgb};

/// Default frame period (50 fps)
const DEFAULT_FRAME_PERIOD_MS: u64 = 20;
/// Duration of one full ambient hue rotation
const DEFAULT_AMBIENT_CYCLE_MS: u64 = 10_000;
/// Half of a blink period: how long each of the two colors is shown
const DEFAULT_BLINK_HALF_PERIOD_MS: u64 = 300;
/// How long a non-permanent static color (or blackout) is held
const DEFAULT_STATIC_WINDOW_MS: u64 = 5_000;
const DEFAULT_COMET_DURATION_MS: u64 = 3_000;
const DEFAULT_BLINK_DURATION_MS: u64 = 10_000;
const DEFAULT_COMET_TAIL_LENGTH: u8 = 12;
const DEFAULT_COMET_TAIL_DECAY: u8 = 176;

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Target render cadence
    pub frame_period: Duration,
    /// Duration of one full ambient hue rotation
    pub ambient_cycle: Duration,
    /// Brightness applied to the ambient rainbow (0-255)
    pub ambient_brightness: u8,
    /// How long each blink color is shown
    pub blink_half_period: Duration,
    /// The fixed blink color pair: first half-period, second half-period
    pub blink_colors: (Rgb, Rgb),
    /// Comet tail length in pixels, not counting the head
    pub comet_tail_length: u8,
    /// Per-pixel tail falloff (255 = no fade)
    pub comet_tail_decay: u8,
    /// Time between two comet advances
    pub comet_step_interval: Duration,
    /// Hold window for non-permanent static colors and blackouts
    pub static_window: Duration,
    /// Comet lifetime when `run_effect` carries no `duration_ms`
    pub default_comet_duration: Duration,
    /// Blink lifetime when `set_blinking` carries no `duration_ms`
    pub default_blink_duration: Duration,
}

impl EngineConfig {
    pub const fn new() -> Self {
        Self {
            frame_period: Duration::from_millis(DEFAULT_FRAME_PERIOD_MS),
            ambient_cycle: Duration::from_millis(DEFAULT_AMBIENT_CYCLE_MS),
            ambient_brightness: 255,
            blink_half_period: Duration::from_millis(DEFAULT_BLINK_HALF_PERIOD_MS),
            blink_colors: (GIRL, BOY),
            comet_tail_length: DEFAULT_COMET_TAIL_LENGTH,
            comet_tail_decay: DEFAULT_COMET_TAIL_DECAY,
            comet_step_interval: Duration::from_millis(DEFAULT_FRAME_PERIOD_MS),
            static_window: Duration::from_millis(DEFAULT_STATIC_WINDOW_MS),
            default_comet_duration: Duration::from_millis(DEFAULT_COMET_DURATION_MS),
            default_blink_duration: Duration::from_millis(DEFAULT_BLINK_DURATION_MS),
        }
    }

    /// Set the frame period (the comet advances once per frame by default)
    #[must_use]
    pub const fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = period;
        self.comet_step_interval = period;
        self
    }

    #[must_use]
    pub const fn with_ambient_brightness(mut self, brightness: u8) -> Self {
        self.ambient_brightness = brightness;
        self
    }

    #[must_use]
    pub const fn with_static_window(mut self, window: Duration) -> Self {
        self.static_window = window;
        self
    }

    #[must_use]
    pub const fn with_comet_tail(mut self, length: u8, decay: u8) -> Self {
        self.comet_tail_length = length;
        self.comet_tail_decay = decay;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
