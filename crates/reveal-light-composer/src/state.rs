//! Shared status for external observation
//!
//! Lets network tasks see which effect is on the strip without touching the
//! animation context. The render loop publishes; readers never block it.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::effect::{Effect, EffectId};

/// Shared status that can be observed from outside the engine
///
/// Uses atomics for lock-free access.
pub struct SharedStatus {
    /// Current effect ID
    effect: AtomicU8,
    /// Whether the effect holds until replaced
    permanent: AtomicBool,
}

impl SharedStatus {
    /// Create a new shared status reporting the ambient effect
    pub const fn new() -> Self {
        Self {
            effect: AtomicU8::new(EffectId::Ambient as u8),
            permanent: AtomicBool::new(true),
        }
    }

    /// Get current effect ID
    pub fn effect(&self) -> EffectId {
        self.effect.load(Ordering::Relaxed).into()
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent.load(Ordering::Relaxed)
    }

    /// Publish the active effect
    pub fn publish(&self, effect: &Effect) {
        self.effect.store(effect.id() as u8, Ordering::Relaxed);
        self.permanent.store(effect.is_permanent(), Ordering::Relaxed);
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}
