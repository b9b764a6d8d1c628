//! Command payload structures
//!
//! Every numeric field is read as a signed integer and clamped into range by
//! the builders, so out-of-range values are corrected instead of rejected.

use embassy_time::Duration;
use heapless::Vec;
use serde::Deserialize;

use super::CommandError;
use crate::{color::Rgb, effect::MAX_GRADIENT_COLORS, math8::clamp_u8};

/// `{"r": 0-255, "g": 0-255, "b": 0-255}`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ColorParam {
    #[serde(default)]
    pub r: i64,
    #[serde(default)]
    pub g: i64,
    #[serde(default)]
    pub b: i64,
}

impl ColorParam {
    pub fn to_rgb(self) -> Rgb {
        Rgb {
            r: clamp_u8(self.r),
            g: clamp_u8(self.g),
            b: clamp_u8(self.b),
        }
    }
}

/// `{"colors": [Color, ...], "duration": ms, "transitionTime": ms, "loop": bool}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradientParam {
    #[serde(default)]
    pub colors: Vec<ColorParam, MAX_GRADIENT_COLORS>,
    /// Hold time per color
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default, rename = "transitionTime")]
    pub transition_time: Option<i64>,
    #[serde(default, rename = "loop")]
    pub looping: Option<bool>,
}

/// Parameters shared by every command; each command reads the fields it needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameters<'a> {
    #[serde(default)]
    pub color: Option<ColorParam>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub speed: Option<i64>,
    #[serde(default)]
    pub brightness: Option<i64>,
    #[serde(default, borrow)]
    pub theme: Option<&'a str>,
    #[serde(default)]
    pub permanent: Option<bool>,
    #[serde(default)]
    pub gradient: Option<GradientParam>,
}

/// Parameters whose `theme` is an inline gradient object instead of a name
///
/// `serde-json-core` cannot deserialize untagged enums, so this shape is tried
/// as a second parse when the named form fails.
#[derive(Debug, Clone, Default, Deserialize)]
struct InlineThemeParameters {
    #[serde(default)]
    color: Option<ColorParam>,
    #[serde(default)]
    duration_ms: Option<i64>,
    #[serde(default)]
    speed: Option<i64>,
    #[serde(default)]
    brightness: Option<i64>,
    #[serde(default)]
    theme: Option<GradientParam>,
    #[serde(default)]
    permanent: Option<bool>,
    #[serde(default)]
    gradient: Option<GradientParam>,
}

impl From<InlineThemeParameters> for Parameters<'_> {
    fn from(params: InlineThemeParameters) -> Self {
        Self {
            color: params.color,
            duration_ms: params.duration_ms,
            speed: params.speed,
            brightness: params.brightness,
            theme: None,
            permanent: params.permanent,
            gradient: params.gradient.or(params.theme),
        }
    }
}

impl<'a> Parameters<'a> {
    /// Parse a control-surface body; an empty body means no parameters
    pub fn from_body(body: &'a [u8]) -> Result<Self, CommandError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        if let Ok((params, _)) = serde_json_core::from_slice::<Self>(body) {
            return Ok(params);
        }
        serde_json_core::from_slice::<InlineThemeParameters>(body)
            .map(|(params, _)| params.into())
            .map_err(|_| CommandError::Malformed)
    }

    /// Brightness clamped to 0-255, full brightness when absent
    pub fn brightness_or_full(&self) -> u8 {
        self.brightness.map_or(255, clamp_u8)
    }

    /// Requested duration, clamped to `0..=MAX_DURATION_MS`
    pub fn duration_or(&self, default: Duration) -> Duration {
        self.duration_ms.map_or(default, duration_from_ms)
    }
}

/// Queue entry body as delivered by the push feed
#[derive(Debug, Clone, Deserialize)]
pub struct QueuePayload<'a> {
    pub command: &'a str,
    #[serde(default, borrow)]
    pub parameters: Parameters<'a>,
    /// Producer clock, informational only
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default, borrow, rename = "createdBy")]
    pub created_by: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct InlineThemePayload<'a> {
    command: &'a str,
    #[serde(default)]
    parameters: InlineThemeParameters,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default, borrow, rename = "createdBy")]
    created_by: Option<&'a str>,
}

impl<'a> QueuePayload<'a> {
    pub fn from_slice(payload: &'a [u8]) -> Result<Self, CommandError> {
        if let Ok((entry, _)) = serde_json_core::from_slice::<Self>(payload) {
            return Ok(entry);
        }
        serde_json_core::from_slice::<InlineThemePayload<'a>>(payload)
            .map(|(entry, _)| Self {
                command: entry.command,
                parameters: entry.parameters.into(),
                timestamp: entry.timestamp,
                created_by: entry.created_by,
            })
            .map_err(|_| CommandError::Malformed)
    }
}

/// Longest accepted duration, about 49 days
pub const MAX_DURATION_MS: i64 = 4_294_967_295;

/// Requested milliseconds clamped to `0..=MAX_DURATION_MS`
#[allow(clippy::cast_sign_loss)]
pub(crate) fn duration_from_ms(ms: i64) -> Duration {
    Duration::from_millis(ms.clamp(0, MAX_DURATION_MS) as u64)
}
