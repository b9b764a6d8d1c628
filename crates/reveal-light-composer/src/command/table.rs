//! Dispatch table: command name -> effect builder

use embassy_time::Duration;

use super::{
    CommandError, CommandName, Parameters, Theme, find_theme, params::duration_from_ms,
};
use crate::{
    color::{WHITE, scale_color},
    config::EngineConfig,
    effect::{
        AmbientEffect, BlinkEffect, CometEffect, Effect, GradientEffect, Hold,
        MAX_GRADIENT_COLORS, OffEffect, StaticColorEffect,
    },
};

/// Hold time per color for inline gradients without a `duration`
const DEFAULT_GRADIENT_HOLD_MS: u64 = 1000;

/// Builds the effect a command activates from its parameters
pub type Builder = fn(&Parameters<'_>, &EngineConfig) -> Result<Effect, CommandError>;

/// Enum-keyed table mapping every command to its builder
pub struct DispatchTable {
    entries: [(CommandName, Builder); CommandName::COUNT],
}

impl DispatchTable {
    pub fn new() -> Self {
        Self {
            entries: [
                (CommandName::StartAmbient, build_ambient as Builder),
                (CommandName::RunEffect, build_comet as Builder),
                (CommandName::SetBlinking, build_blink as Builder),
                (CommandName::SetTheme, build_theme as Builder),
                (CommandName::TurnOff, build_off as Builder),
                (CommandName::RunReset, build_ambient as Builder),
            ],
        }
    }

    /// Check that every command of the vocabulary has exactly one builder
    pub fn validate(&self) -> Result<(), CommandError> {
        for name in CommandName::ALL {
            let count = self.entries.iter().filter(|(entry, _)| *entry == name).count();
            if count != 1 {
                return Err(CommandError::Unregistered(name));
            }
        }
        Ok(())
    }

    /// Build the effect for `name`
    pub fn build(
        &self,
        name: CommandName,
        params: &Parameters<'_>,
        config: &EngineConfig,
    ) -> Result<Effect, CommandError> {
        let (_, builder) = self
            .entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .ok_or(CommandError::Unregistered(name))?;
        builder(params, config)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

fn build_ambient(_params: &Parameters<'_>, config: &EngineConfig) -> Result<Effect, CommandError> {
    Ok(Effect::Ambient(AmbientEffect::new(
        config.ambient_cycle,
        config.ambient_brightness,
    )))
}

fn build_comet(params: &Parameters<'_>, config: &EngineConfig) -> Result<Effect, CommandError> {
    let color = params.color.map_or(WHITE, |color| color.to_rgb());
    let duration = params.duration_or(config.default_comet_duration);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let step = params
        .speed
        .map_or(1, |speed| speed.clamp(1, i64::from(u16::MAX)) as u16);

    let comet = CometEffect::new(color, duration, step, config.comet_step_interval)
        .with_tail(config.comet_tail_length, config.comet_tail_decay);
    Ok(Effect::Comet(comet))
}

fn build_blink(params: &Parameters<'_>, config: &EngineConfig) -> Result<Effect, CommandError> {
    let brightness = params.brightness_or_full();
    let (first, second) = config.blink_colors;
    let colors = (
        scale_color(first, brightness),
        scale_color(second, brightness),
    );
    let duration = params.duration_or(config.default_blink_duration);

    Ok(Effect::Blink(BlinkEffect::new(
        colors,
        config.blink_half_period,
        duration,
    )))
}

fn build_theme(params: &Parameters<'_>, config: &EngineConfig) -> Result<Effect, CommandError> {
    let brightness = params.brightness_or_full();
    let hold = flat_hold(params, config, false);

    if let Some(gradient) = &params.gradient {
        if gradient.colors.is_empty() {
            return Err(CommandError::EmptyGradient);
        }
        let mut colors = heapless::Vec::<_, MAX_GRADIENT_COLORS>::new();
        for color in &gradient.colors {
            let _ = colors.push(scale_color(color.to_rgb(), brightness));
        }
        let hold = gradient
            .duration
            .map_or(Duration::from_millis(DEFAULT_GRADIENT_HOLD_MS), duration_from_ms);
        let transition = gradient
            .transition_time
            .map_or(Duration::from_millis(0), duration_from_ms);
        let effect = GradientEffect::new(colors, hold)
            .with_transition(transition)
            .with_looping(gradient.looping.unwrap_or(true));
        return Ok(Effect::GradientTheme(effect));
    }

    if let Some(color) = params.color {
        let color = scale_color(color.to_rgb(), brightness);
        return Ok(Effect::Static(StaticColorEffect::new(color, hold)));
    }

    let name = params.theme.ok_or(CommandError::MissingTheme)?;
    match find_theme(name).ok_or(CommandError::UnknownTheme)? {
        Theme::Static(color) => Ok(Effect::Static(StaticColorEffect::new(
            scale_color(color, brightness),
            hold,
        ))),
        Theme::Gradient {
            colors,
            hold,
            transition,
        } => {
            let mut palette = heapless::Vec::<_, MAX_GRADIENT_COLORS>::new();
            for color in colors.iter().take(MAX_GRADIENT_COLORS) {
                let _ = palette.push(scale_color(*color, brightness));
            }
            Ok(Effect::GradientTheme(
                GradientEffect::new(palette, hold).with_transition(transition),
            ))
        }
    }
}

fn build_off(params: &Parameters<'_>, config: &EngineConfig) -> Result<Effect, CommandError> {
    Ok(Effect::Off(OffEffect::new(flat_hold(params, config, false))))
}

/// Hold policy of a flat effect from its `permanent` flag and `duration_ms`
fn flat_hold(params: &Parameters<'_>, config: &EngineConfig, permanent_by_default: bool) -> Hold {
    if params.permanent.unwrap_or(permanent_by_default) {
        Hold::Permanent
    } else {
        Hold::Window(params.duration_or(config.static_window))
    }
}
