//! Push-feed frame decoder
//!
//! The remote command feed is a `text/event-stream`. [`EventStreamDecoder`]
//! accepts the stream in arbitrary chunks and yields one [`QueueEntry`] per
//! complete event carrying both an id and data.

use core::fmt;

use heapless::Vec;
use log::{debug, warn};

use crate::{
    cursor::EntryId,
    source::{QUEUE_PAYLOAD_SIZE, QueueEntry},
};

/// Longest line kept: a full payload plus the `data: ` field name
const LINE_SIZE: usize = QUEUE_PAYLOAD_SIZE + 8;

const FIELD_ID: &[u8] = b"id";
const FIELD_DATA: &[u8] = b"data";
const FIELD_EVENT: &[u8] = b"event";
const EVENT_KEEP_ALIVE: &[u8] = b"keep-alive";

/// Why an event was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedError {
    /// A single line exceeded the line buffer
    LineTooLong,
    /// Joined `data:` lines exceeded the payload buffer
    PayloadTooLarge,
    /// `id:` value is not a usable entry id
    InvalidId,
    /// Event had data but no id was ever set
    MissingId,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LineTooLong => "line too long",
            Self::PayloadTooLarge => "payload too large",
            Self::InvalidId => "invalid id",
            Self::MissingId => "event without id",
        })
    }
}

#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    line: Vec<u8, LINE_SIZE>,
    line_overflow: bool,
    /// Previous byte was a CR, so a following LF belongs to the same break
    after_cr: bool,
    /// Last event id, kept across events
    id: Option<EntryId>,
    data: Vec<u8, QUEUE_PAYLOAD_SIZE>,
    has_data: bool,
    keep_alive: bool,
    /// Current event is broken, skip until the next blank line
    discard: bool,
    dropped: u32,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events dropped since creation
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Last event id seen on the stream
    pub fn last_id(&self) -> Option<&EntryId> {
        self.id.as_ref()
    }

    /// Forget any partial line or event, e.g. after a reconnect
    ///
    /// The last event id survives.
    pub fn reset(&mut self) {
        self.line.clear();
        self.line_overflow = false;
        self.after_cr = false;
        self.clear_event();
    }

    /// Decode a chunk of the stream, calling `on_entry` for each complete event
    pub fn feed(&mut self, chunk: &[u8], mut on_entry: impl FnMut(QueueEntry)) {
        for &byte in chunk {
            match byte {
                b'\n' if self.after_cr => self.after_cr = false,
                b'\r' | b'\n' => {
                    self.after_cr = byte == b'\r';
                    if let Some(entry) = self.end_line() {
                        on_entry(entry);
                    }
                }
                _ => {
                    self.after_cr = false;
                    if self.line.push(byte).is_err() {
                        self.line_overflow = true;
                    }
                }
            }
        }
    }

    fn end_line(&mut self) -> Option<QueueEntry> {
        if self.line_overflow {
            self.line.clear();
            self.line_overflow = false;
            self.fail(FeedError::LineTooLong);
            return None;
        }
        if self.line.is_empty() {
            return self.dispatch();
        }

        let line = core::mem::take(&mut self.line);
        if !self.discard {
            if let Err(err) = self.process_field(&line) {
                self.fail(err);
            }
        }
        None
    }

    fn process_field(&mut self, line: &[u8]) -> Result<(), FeedError> {
        // comment
        if line.first() == Some(&b':') {
            return Ok(());
        }

        let (field, value) = match line.iter().position(|&b| b == b':') {
            Some(pos) => {
                let value = &line[pos + 1..];
                (&line[..pos], value.strip_prefix(b" ").unwrap_or(value))
            }
            None => (line, &[][..]),
        };

        match field {
            FIELD_ID => {
                let id = core::str::from_utf8(value).map_err(|_| FeedError::InvalidId)?;
                self.id = Some(EntryId::new(id).ok_or(FeedError::InvalidId)?);
            }
            FIELD_DATA => {
                if self.has_data {
                    self.data
                        .push(b'\n')
                        .map_err(|_| FeedError::PayloadTooLarge)?;
                }
                self.data
                    .extend_from_slice(value)
                    .map_err(|()| FeedError::PayloadTooLarge)?;
                self.has_data = true;
            }
            FIELD_EVENT => self.keep_alive = value == EVENT_KEEP_ALIVE,
            _ => debug!("feed: ignoring field {:?}", field),
        }
        Ok(())
    }

    fn dispatch(&mut self) -> Option<QueueEntry> {
        let ready = !self.discard && !self.keep_alive && self.has_data;
        let entry = if ready {
            match self.id.clone() {
                Some(id) => Some(QueueEntry {
                    id,
                    payload: core::mem::take(&mut self.data),
                }),
                None => {
                    self.fail(FeedError::MissingId);
                    None
                }
            }
        } else {
            None
        };
        self.clear_event();
        entry
    }

    fn fail(&mut self, err: FeedError) {
        if !self.discard {
            warn!("feed: dropping event: {}", err);
            self.dropped = self.dropped.wrapping_add(1);
        }
        self.discard = true;
    }

    fn clear_event(&mut self) {
        self.data.clear();
        self.has_data = false;
        self.keep_alive = false;
        self.discard = false;
    }
}
