//! Command vocabulary
//!
//! Names, parameter payloads and the dispatch table that turns a command
//! into the effect it activates.

mod params;
mod table;
mod theme;

use core::fmt;

pub use params::{ColorParam, GradientParam, MAX_DURATION_MS, Parameters, QueuePayload};
pub use table::{Builder, DispatchTable};
pub use theme::{Theme, find_theme};

const COMMAND_START_AMBIENT: &str = "start_ambient";
const COMMAND_RUN_EFFECT: &str = "run_effect";
const COMMAND_SET_BLINKING: &str = "set_blinking";
const COMMAND_SET_THEME: &str = "set_theme";
const COMMAND_TURN_OFF: &str = "turn_off";
const COMMAND_RUN_RESET: &str = "run_reset";

/// Known command names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandName {
    /// Return to the ambient rainbow
    StartAmbient,
    /// Comet run, then back to ambient
    RunEffect,
    /// Timed two-color blink
    SetBlinking,
    /// Named or inline static color / gradient theme
    SetTheme,
    /// Blackout
    TurnOff,
    /// Force ambient regardless of permanence
    RunReset,
}

impl CommandName {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::StartAmbient,
        Self::RunEffect,
        Self::SetBlinking,
        Self::SetTheme,
        Self::TurnOff,
        Self::RunReset,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartAmbient => COMMAND_START_AMBIENT,
            Self::RunEffect => COMMAND_RUN_EFFECT,
            Self::SetBlinking => COMMAND_SET_BLINKING,
            Self::SetTheme => COMMAND_SET_THEME,
            Self::TurnOff => COMMAND_TURN_OFF,
            Self::RunReset => COMMAND_RUN_RESET,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Some(match s {
            COMMAND_START_AMBIENT => Self::StartAmbient,
            COMMAND_RUN_EFFECT => Self::RunEffect,
            COMMAND_SET_BLINKING => Self::SetBlinking,
            COMMAND_SET_THEME => Self::SetTheme,
            COMMAND_TURN_OFF => Self::TurnOff,
            COMMAND_RUN_RESET => Self::RunReset,
            _ => return None,
        })
    }
}

/// Why a command could not be turned into an effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Payload is not valid JSON or does not match the schema
    Malformed,
    /// Command name is not part of the vocabulary
    UnknownCommand,
    /// `set_theme` without a theme, color or gradient
    MissingTheme,
    /// Theme name is not in the palette
    UnknownTheme,
    /// Inline gradient without colors
    EmptyGradient,
    /// Dispatch table has no single entry for this command
    Unregistered(CommandName),
}

impl CommandError {
    /// Short human-readable message, used in control-surface responses
    pub const fn message(self) -> &'static str {
        match self {
            Self::Malformed => "malformed payload",
            Self::UnknownCommand => "unknown command",
            Self::MissingTheme => "missing theme",
            Self::UnknownTheme => "unknown theme",
            Self::EmptyGradient => "gradient has no colors",
            Self::Unregistered(_) => "command not registered",
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unregistered(name) => write!(f, "{}: {}", self.message(), name.as_str()),
            _ => f.write_str(self.message()),
        }
    }
}
