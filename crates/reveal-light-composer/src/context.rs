//! Effect state machine
//!
//! [`AnimationContext`] holds the one active effect and the instant it was
//! activated. It is owned by the render loop; command handlers receive it by
//! mutable reference, so there is no hidden global effect state.

use embassy_time::{Duration, Instant};
use log::info;

use crate::{
    color::Rgb,
    config::EngineConfig,
    effect::{AmbientEffect, Effect, Expiry},
};

/// Active effect state: the effect and its activation instant
#[derive(Debug, Clone)]
pub struct ActiveEffect {
    pub effect: Effect,
    pub start_time: Instant,
}

pub struct AnimationContext<const N: usize> {
    config: EngineConfig,
    active: ActiveEffect,
    /// Bumped on every activation and auto-revert
    revision: u32,
}

impl<const N: usize> AnimationContext<N> {
    /// Create a context showing the ambient effect from `now`
    pub fn new(config: EngineConfig, now: Instant) -> Self {
        let effect = ambient_effect(&config);
        Self {
            config,
            active: ActiveEffect {
                effect,
                start_time: now,
            },
            revision: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The ambient effect as configured for this strip
    pub fn ambient(&self) -> Effect {
        ambient_effect(&self.config)
    }

    /// Replace the active effect immediately
    ///
    /// Whatever was running is dropped together with its timing.
    pub fn activate(&mut self, effect: Effect, now: Instant) {
        info!(
            "composer: {} -> {}",
            self.active.effect.id().as_str(),
            effect.id().as_str()
        );
        self.active = ActiveEffect {
            effect,
            start_time: now,
        };
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn active(&self) -> &ActiveEffect {
        &self.active
    }

    pub fn effect(&self) -> &Effect {
        &self.active.effect
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Time since activation; a `now` before the start counts as zero
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.checked_duration_since(self.active.start_time)
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Whether the active effect's timer has run out
    pub fn is_expired(&self, now: Instant) -> bool {
        self.active
            .effect
            .expiry()
            .deadline()
            .is_some_and(|deadline| self.elapsed(now) >= deadline)
    }

    /// Apply a due auto-revert
    ///
    /// The ambient effect starts at the expiry instant, not at `now`, so the
    /// rendered frame does not depend on when the loop noticed the expiry.
    /// Returns `true` if the active effect changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        let Expiry::Revert(duration) = self.active.effect.expiry() else {
            return false;
        };
        if self.elapsed(now) < duration {
            return false;
        }

        let expired_at = self.active.start_time + duration;
        info!(
            "composer: {} expired, back to ambient",
            self.active.effect.id().as_str()
        );
        self.active = ActiveEffect {
            effect: self.ambient(),
            start_time: expired_at,
        };
        self.revision = self.revision.wrapping_add(1);
        true
    }

    /// Advance to `now` and render the frame
    pub fn tick(&mut self, now: Instant) -> [Rgb; N] {
        self.settle(now);

        let mut elapsed = self.elapsed(now);
        if let Expiry::Freeze(duration) = self.active.effect.expiry() {
            elapsed = elapsed.min(duration);
        }
        self.active.effect.frame(elapsed)
    }
}

fn ambient_effect(config: &EngineConfig) -> Effect {
    Effect::Ambient(AmbientEffect::new(
        config.ambient_cycle,
        config.ambient_brightness,
    ))
}
