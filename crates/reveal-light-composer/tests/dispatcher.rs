//! Integration tests for the command dispatcher and push-feed dedup.

use embassy_time::{Duration, Instant};
use reveal_light_composer::{
    AnimationContext, CommandError, CommandName, ControlRequest, DedupCursor, Dispatcher, EffectId,
    EngineConfig, EntryId, QueueEntry, QueueOutcome, Response,
    color::{BOY, GIRL},
    command::DispatchTable,
};

const LEDS: usize = 16;

fn setup() -> (AnimationContext<LEDS>, Dispatcher, Instant) {
    let start = Instant::from_millis(0);
    let ctx = AnimationContext::new(EngineConfig::default(), start);
    let dispatcher = Dispatcher::new().expect("dispatch table covers the vocabulary");
    (ctx, dispatcher, start)
}

fn entry(id: &str, payload: &str) -> QueueEntry {
    QueueEntry::new(id, payload.as_bytes()).expect("entry fits")
}

fn id(value: &str) -> EntryId {
    EntryId::new(value).expect("valid id")
}

// -----------------------------------------------------------------------------
// Entry ids and the cursor
// -----------------------------------------------------------------------------

#[test]
fn entry_ids_order_by_length_then_bytes() {
    assert!(id("9") < id("10"));
    assert!(id("10") < id("11"));
    assert!(id("-NaaaA") < id("-NaaaB"));
    assert_eq!(id(" 42 "), id("42"));
}

#[test]
fn entry_id_rejects_empty_and_oversize() {
    assert!(EntryId::new("").is_none());
    assert!(EntryId::new("   ").is_none());
    assert!(EntryId::new(&"x".repeat(33)).is_none());
    assert!(EntryId::new(&"x".repeat(32)).is_some());
}

#[test]
fn cursor_only_moves_forward() {
    let mut cursor = DedupCursor::new();
    assert!(cursor.position().is_none());

    assert!(cursor.advance(&id("5")));
    assert!(cursor.is_stale(&id("5")));
    assert!(cursor.is_stale(&id("4")));
    assert!(!cursor.advance(&id("3")));
    assert_eq!(cursor.position(), Some(&id("5")));

    assert!(cursor.advance(&id("12")));
    assert_eq!(cursor.position(), Some(&id("12")));
}

// -----------------------------------------------------------------------------
// Queue entries
// -----------------------------------------------------------------------------

#[test]
fn queue_entry_applies_command() {
    let (mut ctx, mut dispatcher, start) = setup();
    let outcome = dispatcher.handle_queue_entry(
        &mut ctx,
        &entry(
            "1",
            r#"{"command":"set_theme","parameters":{"theme":"girl","permanent":true},"timestamp":1700000000000,"createdBy":"admin"}"#,
        ),
        start,
    );

    assert_eq!(outcome, QueueOutcome::Applied(CommandName::SetTheme));
    assert_eq!(ctx.effect().id(), EffectId::Static);
    assert!(ctx.tick(start).iter().all(|pixel| *pixel == GIRL));
    assert_eq!(dispatcher.cursor(), Some(&id("1")));
}

#[test]
fn queue_entry_without_parameters_uses_defaults() {
    let (mut ctx, mut dispatcher, start) = setup();
    let outcome =
        dispatcher.handle_queue_entry(&mut ctx, &entry("1", r#"{"command":"run_effect"}"#), start);

    assert_eq!(outcome, QueueOutcome::Applied(CommandName::RunEffect));
    assert_eq!(ctx.effect().id(), EffectId::Comet);
}

#[test]
fn queue_entry_accepts_inline_theme_gradient() {
    let (mut ctx, mut dispatcher, start) = setup();
    let outcome = dispatcher.handle_queue_entry(
        &mut ctx,
        &entry(
            "4",
            r#"{"command":"set_theme","parameters":{"theme":{"colors":[{"r":255,"g":0,"b":0}],"duration":1000}},"createdBy":"admin"}"#,
        ),
        start,
    );

    assert_eq!(outcome, QueueOutcome::Applied(CommandName::SetTheme));
    assert_eq!(ctx.effect().id(), EffectId::Gradient);
    assert_eq!(dispatcher.cursor(), Some(&id("4")));
}

#[test]
fn stale_entries_are_no_ops() {
    let (mut ctx, mut dispatcher, start) = setup();
    let boy = r#"{"command":"set_theme","parameters":{"theme":"boy","permanent":true}}"#;
    dispatcher.handle_queue_entry(&mut ctx, &entry("7", boy), start);

    let now = start + Duration::from_millis(250);
    let before = ctx.tick(now);
    let revision = ctx.revision();

    for stale in ["7", "6", "1"] {
        let outcome =
            dispatcher.handle_queue_entry(&mut ctx, &entry(stale, r#"{"command":"turn_off"}"#), now);
        assert_eq!(outcome, QueueOutcome::Stale);
    }

    assert_eq!(ctx.tick(now), before);
    assert_eq!(ctx.revision(), revision);
    assert!(before.iter().all(|pixel| *pixel == BOY));
    assert_eq!(dispatcher.cursor(), Some(&id("7")));
}

#[test]
fn redelivered_backlog_applies_once() {
    let (mut ctx, mut dispatcher, start) = setup();
    let backlog = [
        ("1", r#"{"command":"turn_off"}"#),
        ("2", r#"{"command":"set_blinking"}"#),
        ("3", r#"{"command":"start_ambient"}"#),
    ];

    let applied = backlog
        .iter()
        .chain(backlog.iter())
        .filter(|(entry_id, payload)| {
            matches!(
                dispatcher.handle_queue_entry(&mut ctx, &entry(entry_id, payload), start),
                QueueOutcome::Applied(_)
            )
        })
        .count();

    assert_eq!(applied, 3);
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
}

#[test]
fn malformed_entry_advances_cursor() {
    let (mut ctx, mut dispatcher, start) = setup();

    let outcome = dispatcher.handle_queue_entry(&mut ctx, &entry("3", "{not json"), start);
    assert_eq!(outcome, QueueOutcome::Malformed(CommandError::Malformed));
    assert_eq!(dispatcher.cursor(), Some(&id("3")));
    assert_eq!(ctx.effect().id(), EffectId::Ambient);

    let outcome = dispatcher.handle_queue_entry(
        &mut ctx,
        &entry("3", r#"{"command":"turn_off"}"#),
        start,
    );
    assert_eq!(outcome, QueueOutcome::Stale);
}

#[test]
fn unknown_command_and_theme_are_rejected() {
    let (mut ctx, mut dispatcher, start) = setup();

    let outcome =
        dispatcher.handle_queue_entry(&mut ctx, &entry("1", r#"{"command":"explode"}"#), start);
    assert_eq!(outcome, QueueOutcome::Malformed(CommandError::UnknownCommand));

    let outcome = dispatcher.handle_queue_entry(
        &mut ctx,
        &entry("2", r#"{"command":"set_theme","parameters":{"theme":"plaid"}}"#),
        start,
    );
    assert_eq!(outcome, QueueOutcome::Malformed(CommandError::UnknownTheme));

    let outcome = dispatcher.handle_queue_entry(
        &mut ctx,
        &entry("3", r#"{"command":"set_theme","parameters":{}}"#),
        start,
    );
    assert_eq!(outcome, QueueOutcome::Malformed(CommandError::MissingTheme));

    let outcome = dispatcher.handle_queue_entry(
        &mut ctx,
        &entry("4", r#"{"command":"set_theme","parameters":{"gradient":{"colors":[]}}}"#),
        start,
    );
    assert_eq!(outcome, QueueOutcome::Malformed(CommandError::EmptyGradient));

    assert_eq!(ctx.effect().id(), EffectId::Ambient);
    assert_eq!(dispatcher.cursor(), Some(&id("4")));
}

// -----------------------------------------------------------------------------
// Control requests
// -----------------------------------------------------------------------------

#[test]
fn control_requests_are_not_deduplicated() {
    let (mut ctx, mut dispatcher, start) = setup();
    let request = ControlRequest::new("turn_off", b"").expect("request fits");

    assert_eq!(
        dispatcher.handle_control_request(&mut ctx, &request, start),
        Response::Ok
    );
    assert_eq!(
        dispatcher.handle_control_request(&mut ctx, &request, start),
        Response::Ok
    );
    assert_eq!(ctx.revision(), 2);
    assert!(dispatcher.cursor().is_none());
}

#[test]
fn control_errors_produce_error_response() {
    let (mut ctx, mut dispatcher, start) = setup();

    let request = ControlRequest::new("set_theme", br#"{"theme":"plaid"}"#).expect("request fits");
    assert_eq!(
        dispatcher.handle_control_request(&mut ctx, &request, start),
        Response::Error("unknown theme")
    );

    let request = ControlRequest::new("run_effect", b"{\"speed\":").expect("request fits");
    assert_eq!(
        dispatcher.handle_control_request(&mut ctx, &request, start),
        Response::Error("malformed payload")
    );

    let request = ControlRequest::new("dance", b"").expect("request fits");
    assert_eq!(
        dispatcher.handle_control_request(&mut ctx, &request, start),
        Response::Error("unknown command")
    );
    assert_eq!(ctx.effect().id(), EffectId::Ambient);
}

#[test]
fn response_serializes_to_json() {
    let mut buf = [0u8; 64];

    let n = Response::Ok.to_json(&mut buf).expect("fits");
    assert_eq!(&buf[..n], br#"{"status":"ok"}"#);

    let n = Response::Error("unknown theme").to_json(&mut buf).expect("fits");
    assert_eq!(&buf[..n], br#"{"status":"error","message":"unknown theme"}"#);
}

#[test]
fn command_names_round_trip() {
    for name in CommandName::ALL {
        assert_eq!(CommandName::parse_from_str(name.as_str()), Some(name));
    }
    assert_eq!(CommandName::parse_from_str("RUN_RESET"), None);
}

#[test]
fn dispatch_table_covers_vocabulary() {
    assert_eq!(DispatchTable::new().validate(), Ok(()));
}
