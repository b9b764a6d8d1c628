use serde::Serialize;

use crate::{SharedStatus, effect::EffectId};

/// A snapshot of the strip status for external systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Active effect
    pub effect: EffectId,
    /// Whether the effect holds until replaced
    pub permanent: bool,
}

/// Wire form of [`StatusSnapshot`]
#[derive(Serialize)]
struct StatusBody<'a> {
    effect: &'a str,
    permanent: bool,
}

impl StatusSnapshot {
    /// Create a snapshot from the shared status
    pub fn from_shared(shared: &SharedStatus) -> Self {
        Self {
            effect: shared.effect(),
            permanent: shared.is_permanent(),
        }
    }

    /// Serialize as `{"effect":"<name>","permanent":<bool>}`
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
        serde_json_core::to_slice(
            &StatusBody {
                effect: self.effect.as_str(),
                permanent: self.permanent,
            },
            buf,
        )
    }
}
