//! Integration tests for the effect state machine and the command table.

use embassy_time::{Duration, Instant};
use reveal_light_composer::{
    AnimationContext, ControlRequest, Dispatcher, EffectId, EngineConfig, Response, Rgb,
    color::{BOY, GIRL, WHITE, scale_color},
    effect::{AmbientEffect, Effect, Hold, OffEffect, StaticColorEffect},
};

const LEDS: usize = 30;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn at(start: Instant, offset_ms: u64) -> Instant {
    start + ms(offset_ms)
}

fn setup() -> (AnimationContext<LEDS>, Dispatcher, Instant) {
    let start = Instant::from_millis(1_000);
    let ctx = AnimationContext::new(EngineConfig::default(), start);
    let dispatcher = Dispatcher::new().expect("dispatch table covers the vocabulary");
    (ctx, dispatcher, start)
}

fn control(
    dispatcher: &mut Dispatcher,
    ctx: &mut AnimationContext<LEDS>,
    command: &str,
    body: &str,
    now: Instant,
) -> Response {
    let request = ControlRequest::new(command, body.as_bytes()).expect("request fits");
    dispatcher.handle_control_request(ctx, &request, now)
}

fn ambient_frame(elapsed: Duration) -> [Rgb; LEDS] {
    let config = EngineConfig::default();
    Effect::Ambient(AmbientEffect::new(
        config.ambient_cycle,
        config.ambient_brightness,
    ))
    .frame(elapsed)
}

fn assert_flat(frame: &[Rgb], color: Rgb) {
    assert!(
        frame.iter().all(|pixel| *pixel == color),
        "expected every pixel to be {color:?}, got {frame:?}"
    );
}

// -----------------------------------------------------------------------------
// Activation
// -----------------------------------------------------------------------------

#[test]
fn starts_in_ambient() {
    let (mut ctx, _, start) = setup();

    assert_eq!(ctx.effect().id(), EffectId::Ambient);
    assert_eq!(ctx.tick(at(start, 700)), ambient_frame(ms(700)));
}

#[test]
fn activation_replaces_effect_without_blending() {
    let (mut ctx, _, start) = setup();

    ctx.activate(
        Effect::Static(StaticColorEffect::new(BOY, Hold::Permanent)),
        at(start, 100),
    );
    ctx.activate(
        Effect::Static(StaticColorEffect::new(GIRL, Hold::Permanent)),
        at(start, 100),
    );
    assert_flat(&ctx.tick(at(start, 100)), GIRL);

    ctx.activate(Effect::Off(OffEffect::new(Hold::Permanent)), at(start, 150));
    assert_flat(&ctx.tick(at(start, 151)), Rgb::default());
    assert_eq!(ctx.revision(), 3);
}

#[test]
fn time_before_activation_counts_as_zero() {
    let (mut ctx, _, start) = setup();

    assert_eq!(ctx.elapsed(Instant::from_millis(0)), Duration::from_ticks(0));
    assert_eq!(ctx.tick(Instant::from_millis(0)), ambient_frame(ms(0)));
    assert!(!ctx.is_expired(start));
}

// -----------------------------------------------------------------------------
// Timing policies
// -----------------------------------------------------------------------------

#[test]
fn comet_reverts_to_ambient_after_duration() {
    let (mut ctx, mut dispatcher, start) = setup();
    let response = control(&mut dispatcher, &mut ctx, "run_effect", r#"{"duration_ms":3000}"#, start);
    assert_eq!(response, Response::Ok);

    let frame = ctx.tick(at(start, 2999));
    assert_eq!(ctx.effect().id(), EffectId::Comet);
    // 2999 ms at one pixel per 20 ms step
    assert_eq!(frame[149 % LEDS], WHITE);
    assert!(ctx.is_expired(at(start, 3000)));

    let frame = ctx.tick(at(start, 3001));
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
    assert_eq!(frame, ambient_frame(ms(1)));
    assert_eq!(ctx.active().start_time, at(start, 3000));
}

#[test]
fn permanent_static_theme_never_reverts() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "set_theme",
        r#"{"theme":"boy","permanent":true}"#,
        start,
    );

    assert_flat(&ctx.tick(at(start, 10_000_000)), BOY);
    assert_eq!(ctx.effect().id(), EffectId::Static);
    assert!(!ctx.is_expired(at(start, 10_000_000)));
}

#[test]
fn temporary_static_theme_reverts_after_window() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "set_theme",
        r#"{"theme":"boy","permanent":false}"#,
        start,
    );

    assert_flat(&ctx.tick(at(start, 4999)), BOY);
    ctx.tick(at(start, 5000));
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
    assert_eq!(ctx.tick(at(start, 5400)), ambient_frame(ms(400)));
}

#[test]
fn blink_alternates_then_freezes() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "set_blinking",
        r#"{"duration_ms":10000}"#,
        start,
    );

    for t in (0..10_000).step_by(25) {
        let expected = if t % 600 < 300 { GIRL } else { BOY };
        assert_flat(&ctx.tick(at(start, t)), expected);
    }

    // frozen on the frame at 10 000 ms, still the active effect
    let frozen = ctx.tick(at(start, 10_000));
    assert_eq!(ctx.tick(at(start, 10_299)), frozen);
    assert_eq!(ctx.tick(at(start, 60_000)), frozen);
    assert_eq!(ctx.effect().id(), EffectId::Blink);
}

#[test]
fn blink_brightness_scales_both_colors() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "set_blinking",
        r#"{"brightness":100}"#,
        start,
    );

    assert_flat(&ctx.tick(at(start, 0)), scale_color(GIRL, 100));
    assert_flat(&ctx.tick(at(start, 300)), scale_color(BOY, 100));
}

#[test]
fn gradient_theme_loops_forever() {
    let (mut ctx, mut dispatcher, start) = setup();
    let body = r#"{"gradient":{"colors":[{"r":255,"g":0,"b":0},{"r":0,"g":255,"b":0},{"r":0,"g":0,"b":255}],"duration":1000}}"#;
    assert_eq!(
        control(&mut dispatcher, &mut ctx, "set_theme", body, start),
        Response::Ok
    );

    let red = Rgb { r: 255, g: 0, b: 0 };
    let green = Rgb { r: 0, g: 255, b: 0 };
    let blue = Rgb { r: 0, g: 0, b: 255 };
    assert_flat(&ctx.tick(at(start, 500)), red);
    assert_flat(&ctx.tick(at(start, 1500)), green);
    assert_flat(&ctx.tick(at(start, 2500)), blue);
    assert_flat(&ctx.tick(at(start, 3500)), red);
    assert_flat(&ctx.tick(at(start, 3_000_500)), red);
    assert_eq!(ctx.effect().id(), EffectId::Gradient);
}

#[test]
fn named_gradient_theme_starts_on_first_color() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "set_theme",
        r#"{"theme":"celebration"}"#,
        start,
    );

    assert_eq!(ctx.effect().id(), EffectId::Gradient);
    assert_flat(&ctx.tick(at(start, 10)), GIRL);
    assert_flat(&ctx.tick(at(start, 1310)), WHITE);
}

#[test]
fn turn_off_reverts_after_static_window() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(&mut dispatcher, &mut ctx, "turn_off", "", start);

    assert_flat(&ctx.tick(at(start, 4999)), Rgb::default());
    assert_eq!(ctx.effect().id(), EffectId::Off);
    ctx.tick(at(start, 5000));
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
}

#[test]
fn permanent_turn_off_holds() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(&mut dispatcher, &mut ctx, "turn_off", r#"{"permanent":true}"#, start);

    assert_flat(&ctx.tick(at(start, 10_000_000)), Rgb::default());
    assert_eq!(ctx.effect().id(), EffectId::Off);
}

#[test]
fn temporary_turn_off_reverts() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "turn_off",
        r#"{"permanent":false,"duration_ms":2000}"#,
        start,
    );

    assert_flat(&ctx.tick(at(start, 1999)), Rgb::default());
    ctx.tick(at(start, 2001));
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
}

// -----------------------------------------------------------------------------
// Parameters
// -----------------------------------------------------------------------------

#[test]
fn out_of_range_color_is_clamped() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "set_theme",
        r#"{"color":{"r":300,"g":-20,"b":12},"permanent":true}"#,
        start,
    );
    assert_flat(&ctx.tick(at(start, 10)), Rgb { r: 255, g: 0, b: 12 });

    control(
        &mut dispatcher,
        &mut ctx,
        "run_effect",
        r#"{"color":{"r":300,"g":0,"b":0},"speed":-4}"#,
        at(start, 20),
    );
    let frame = ctx.tick(at(start, 20));
    assert_eq!(frame[0], Rgb { r: 255, g: 0, b: 0 });
}

#[test]
fn huge_duration_is_clamped() {
    let (mut ctx, mut dispatcher, start) = setup();
    let response = control(
        &mut dispatcher,
        &mut ctx,
        "run_effect",
        r#"{"duration_ms":9223372036854775807}"#,
        start,
    );
    assert_eq!(response, Response::Ok);

    let frame = ctx.tick(at(start, 1000));
    assert_eq!(ctx.effect().id(), EffectId::Comet);
    assert_eq!(frame[50 % LEDS], WHITE);
    assert!(!ctx.is_expired(at(start, 10_000_000)));
    assert!(ctx.is_expired(at(start, u64::from(u32::MAX))));
}

#[test]
fn huge_gradient_timings_are_clamped() {
    let (mut ctx, mut dispatcher, start) = setup();
    let body = r#"{"gradient":{"colors":[{"r":255,"g":0,"b":0},{"r":0,"g":0,"b":255}],"duration":9223372036854775807,"transitionTime":9223372036854775807}}"#;
    assert_eq!(
        control(&mut dispatcher, &mut ctx, "set_theme", body, start),
        Response::Ok
    );

    assert_flat(&ctx.tick(at(start, 10_000_000)), Rgb { r: 255, g: 0, b: 0 });
}

#[test]
fn theme_accepts_inline_gradient_object() {
    let (mut ctx, mut dispatcher, start) = setup();
    let body = r#"{"theme":{"colors":[{"r":0,"g":255,"b":0},{"r":0,"g":0,"b":255}],"duration":1000,"transitionTime":0,"loop":true},"brightness":255}"#;
    assert_eq!(
        control(&mut dispatcher, &mut ctx, "set_theme", body, start),
        Response::Ok
    );

    assert_eq!(ctx.effect().id(), EffectId::Gradient);
    assert_flat(&ctx.tick(at(start, 500)), Rgb { r: 0, g: 255, b: 0 });
    assert_flat(&ctx.tick(at(start, 1500)), Rgb { r: 0, g: 0, b: 255 });
}

#[test]
fn negative_duration_expires_immediately() {
    let (mut ctx, mut dispatcher, start) = setup();
    control(
        &mut dispatcher,
        &mut ctx,
        "run_effect",
        r#"{"duration_ms":-50}"#,
        start,
    );

    ctx.tick(start);
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
}

// -----------------------------------------------------------------------------
// Reset
// -----------------------------------------------------------------------------

#[test]
fn reset_always_lands_on_ambient() {
    let (mut ctx, mut dispatcher, start) = setup();
    let commands = [
        ("set_theme", r#"{"theme":"girl","permanent":true}"#),
        ("turn_off", ""),
        ("set_blinking", ""),
        ("run_effect", ""),
        ("set_theme", r#"{"theme":"tie"}"#),
        ("start_ambient", ""),
        ("run_reset", ""),
    ];

    for (i, (command, body)) in commands.into_iter().enumerate() {
        let now = at(start, i as u64 * 100);
        assert_eq!(control(&mut dispatcher, &mut ctx, command, body, now), Response::Ok);
        control(&mut dispatcher, &mut ctx, "run_reset", "", now);
        assert_eq!(ctx.effect().id(), EffectId::Ambient, "after {command}");
        assert!(ctx.effect().is_permanent());
        assert_eq!(ctx.tick(now), ambient_frame(ms(0)));
    }
}
