//! Integration tests for the push-feed event-stream decoder.

use reveal_light_composer::{EntryId, EventStreamDecoder, QueueEntry};

fn decode_all<C: AsRef<[u8]>>(decoder: &mut EventStreamDecoder, chunks: &[C]) -> Vec<QueueEntry> {
    let mut entries = Vec::new();
    for chunk in chunks {
        decoder.feed(chunk.as_ref(), |entry| entries.push(entry));
    }
    entries
}

fn payload(entry: &QueueEntry) -> &str {
    core::str::from_utf8(&entry.payload).expect("utf-8 payload")
}

#[test]
fn decodes_single_event() {
    let mut decoder = EventStreamDecoder::new();
    let entries = decode_all(
        &mut decoder,
        &[b"id: 17\ndata: {\"command\":\"turn_off\"}\n\n"],
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.as_str(), "17");
    assert_eq!(payload(&entries[0]), r#"{"command":"turn_off"}"#);
}

#[test]
fn decodes_across_arbitrary_chunks() {
    let stream = b"id: 1\r\ndata: {\"command\":\"run_effect\"}\r\n\r\nid: 2\r\ndata: {\"command\":\"run_reset\"}\r\n\r\n";

    for split in 1..stream.len() {
        let mut decoder = EventStreamDecoder::new();
        let (head, tail) = stream.split_at(split);
        let entries = decode_all(&mut decoder, &[head, tail]);

        assert_eq!(entries.len(), 2, "split at {split}");
        assert_eq!(payload(&entries[0]), r#"{"command":"run_effect"}"#);
        assert_eq!(entries[1].id.as_str(), "2");
    }

    let mut decoder = EventStreamDecoder::new();
    let bytes: Vec<&[u8]> = stream.chunks(1).collect();
    assert_eq!(decode_all(&mut decoder, bytes.as_slice()).len(), 2);
}

#[test]
fn joins_multiline_data() {
    let mut decoder = EventStreamDecoder::new();
    let entries = decode_all(&mut decoder, &[b"id: 3\ndata: {\"command\":\ndata:\"turn_off\"}\n\n"]);

    assert_eq!(payload(&entries[0]), "{\"command\":\n\"turn_off\"}");
}

#[test]
fn skips_comments_and_keep_alives() {
    let mut decoder = EventStreamDecoder::new();
    let entries = decode_all(
        &mut decoder,
        &[b": ping\n\nevent: keep-alive\ndata: null\n\nid: 4\nevent: put\ndata: {}\n\n"],
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.as_str(), "4");
    assert_eq!(decoder.dropped(), 0);
}

#[test]
fn id_persists_across_events() {
    let mut decoder = EventStreamDecoder::new();
    let entries = decode_all(&mut decoder, &[b"id: 9\ndata: a\n\ndata: b\n\n"]);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].id, EntryId::new("9").expect("valid id"));
    assert_eq!(payload(&entries[1]), "b");
}

#[test]
fn event_without_id_is_dropped() {
    let mut decoder = EventStreamDecoder::new();
    let entries = decode_all(&mut decoder, &[b"data: {}\n\n"]);

    assert!(entries.is_empty());
    assert_eq!(decoder.dropped(), 1);
    assert!(decoder.last_id().is_none());
}

#[test]
fn oversize_event_is_dropped_and_stream_resyncs() {
    let mut decoder = EventStreamDecoder::new();
    let big = "x".repeat(2_000);
    let oversize = format!("id: 5\ndata: {big}\n\n");
    let split_data = format!("id: 6\ndata: {}\ndata: {}\n\n", "y".repeat(300), "z".repeat(300));

    let entries = decode_all(
        &mut decoder,
        &[
            oversize.as_bytes(),
            split_data.as_bytes(),
            b"id: 7\ndata: ok\n\n",
        ],
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.as_str(), "7");
    assert_eq!(payload(&entries[0]), "ok");
    assert_eq!(decoder.dropped(), 2);
}

#[test]
fn reset_discards_partial_event_but_keeps_id() {
    let mut decoder = EventStreamDecoder::new();
    let mut entries = decode_all(&mut decoder, &[b"id: 8\ndata: {}\n\nid: 9\ndata: half"]);
    decoder.reset();
    entries.extend(decode_all(&mut decoder, &[b"\n\n"]));

    assert_eq!(entries.len(), 1);
    assert_eq!(decoder.last_id().map(EntryId::as_str), Some("9"));
}
