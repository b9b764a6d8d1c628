//! Gradient theme: an ordered palette, each color held in turn with an
//! optional crossfade into the next one

use embassy_time::Duration;
use heapless::Vec;

use super::EffectImpl;
use crate::{
    color::{Rgb, blend_colors},
    math8::progress8,
};

pub const MAX_GRADIENT_COLORS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientEffect {
    colors: Vec<Rgb, MAX_GRADIENT_COLORS>,
    hold: Duration,
    transition: Duration,
    looping: bool,
}

impl GradientEffect {
    pub fn new(colors: Vec<Rgb, MAX_GRADIENT_COLORS>, hold: Duration) -> Self {
        Self {
            colors,
            hold,
            transition: Duration::from_millis(0),
            looping: true,
        }
    }

    /// Create from a slice, keeping at most [`MAX_GRADIENT_COLORS`] colors
    pub fn from_colors(colors: &[Rgb], hold: Duration) -> Self {
        let mut palette = Vec::new();
        for color in colors.iter().take(MAX_GRADIENT_COLORS) {
            let _ = palette.push(*color);
        }
        Self::new(palette, hold)
    }

    #[must_use]
    pub const fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    #[must_use]
    pub const fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color shown at `elapsed`
    #[allow(clippy::cast_possible_truncation)]
    pub fn color_at(&self, elapsed: Duration) -> Rgb {
        let count = self.colors.len();
        let Some(last) = self.colors.last().copied() else {
            return Rgb::default();
        };

        let hold_ms = self.hold.as_millis();
        let slot_ms = (hold_ms + self.transition.as_millis()).max(1);
        let elapsed_ms = elapsed.as_millis();

        let position_ms = if self.looping {
            elapsed_ms % (slot_ms * count as u64)
        } else {
            elapsed_ms
        };
        let index = (position_ms / slot_ms) as usize;
        if index >= count - 1 && !self.looping {
            return last;
        }
        let index = index.min(count - 1);

        let offset_ms = position_ms % slot_ms;
        let current = self.colors[index];
        if offset_ms < hold_ms {
            return current;
        }

        let next = self.colors[(index + 1) % count];
        let amount = progress8(Duration::from_millis(offset_ms - hold_ms), self.transition);
        blend_colors(current, next, amount)
    }
}

impl EffectImpl for GradientEffect {
    fn render(&self, elapsed: Duration, leds: &mut [Rgb]) {
        leds.fill(self.color_at(elapsed));
    }
}
