//! Command sources
//!
//! Both sources reach the render loop through bounded channels that it
//! drains without waiting: the control surface posts [`ControlRequest`]s and
//! gets a [`Response`] back through a signal, the push feed posts
//! [`QueueEntry`]s.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use heapless::{String, Vec};
use serde::Serialize;

use crate::cursor::EntryId;

pub const COMMAND_NAME_SIZE: usize = 32;
pub const CONTROL_BODY_SIZE: usize = 512;
pub const QUEUE_PAYLOAD_SIZE: usize = 512;

const CONTROL_CHANNEL_SIZE: usize = 2;
const QUEUE_CHANNEL_SIZE: usize = 8;

/// A synchronous control-surface call: command name plus raw JSON parameters
#[derive(Debug, Clone)]
pub struct ControlRequest {
    pub command: String<COMMAND_NAME_SIZE>,
    pub body: Vec<u8, CONTROL_BODY_SIZE>,
}

impl ControlRequest {
    /// Returns `None` if the name or body does not fit
    pub fn new(command: &str, body: &[u8]) -> Option<Self> {
        let mut name = String::new();
        name.push_str(command).ok()?;
        let body = Vec::from_slice(body).ok()?;
        Some(Self {
            command: name,
            body,
        })
    }
}

/// A push-feed delivery: id from the transport, JSON payload from the producer
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub id: EntryId,
    pub payload: Vec<u8, QUEUE_PAYLOAD_SIZE>,
}

impl QueueEntry {
    /// Returns `None` if the id is invalid or the payload does not fit
    pub fn new(id: &str, payload: &[u8]) -> Option<Self> {
        Some(Self {
            id: EntryId::new(id)?,
            payload: Vec::from_slice(payload).ok()?,
        })
    }
}

/// Acknowledgement for a control-surface call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ok,
    Error(&'static str),
}

#[derive(Serialize)]
struct ResponseBody<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl Response {
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Serialize as `{"status":"ok"}` or `{"status":"error","message":"..."}`
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
        let body = match self {
            Self::Ok => ResponseBody {
                status: "ok",
                message: None,
            },
            Self::Error(message) => ResponseBody {
                status: "error",
                message: Some(message),
            },
        };
        serde_json_core::to_slice(&body, buf)
    }
}

/// Type alias for the control request channel
pub type ControlChannel = Channel<CriticalSectionRawMutex, ControlRequest, CONTROL_CHANNEL_SIZE>;

/// Type alias for control request sender
pub type ControlSender<'a> =
    Sender<'a, CriticalSectionRawMutex, ControlRequest, CONTROL_CHANNEL_SIZE>;

/// Type alias for control request receiver
pub type ControlReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, ControlRequest, CONTROL_CHANNEL_SIZE>;

/// Signal carrying the render loop's answer to the last control request
pub type ReplySignal = Signal<CriticalSectionRawMutex, Response>;

/// Type alias for the push-feed queue channel
pub type QueueChannel = Channel<CriticalSectionRawMutex, QueueEntry, QUEUE_CHANNEL_SIZE>;

/// Type alias for queue sender
pub type QueueSender<'a> = Sender<'a, CriticalSectionRawMutex, QueueEntry, QUEUE_CHANNEL_SIZE>;

/// Type alias for queue receiver
pub type QueueReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, QueueEntry, QUEUE_CHANNEL_SIZE>;
