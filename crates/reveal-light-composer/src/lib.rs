#![no_std]

//! Reveal light composer
//!
//! Effect engine for a single addressable LED strip driven by two command
//! sources: a synchronous HTTP control surface and an asynchronous push feed.
//!
//! Architecture layers:
//! - `effect` - pure effect renderers and the [`Effect`] enum
//! - `context` - the one active effect and its timing ([`AnimationContext`])
//! - `command` - command vocabulary, parameters and the dispatch table
//! - `dispatcher` - applies commands, deduplicates the push feed
//! - `control` / `feed` - socket-free codecs for both sources
//! - `engine` - the render loop ([`LightEngine`])
//!
//! The engine is generic over [`LedDriver`], allowing different hardware backends.

pub mod color;
pub mod command;
pub mod config;
pub mod context;
pub mod control;
pub mod cursor;
pub mod dispatcher;
pub mod driver;
pub mod effect;
pub mod engine;
pub mod feed;
pub mod math8;
pub mod models;
pub mod source;
pub mod state;

pub use color::Rgb;
pub use command::{CommandError, CommandName};
pub use config::EngineConfig;
pub use context::{ActiveEffect, AnimationContext};
pub use cursor::{DedupCursor, EntryId};
pub use dispatcher::{Dispatcher, QueueOutcome};
pub use driver::LedDriver;
pub use effect::{Effect, EffectId, Expiry};
pub use engine::{CommandSources, FrameReport, LightEngine};
pub use feed::{EventStreamDecoder, FeedError};
pub use models::StatusSnapshot;
pub use source::{
    ControlChannel, ControlReceiver, ControlRequest, ControlSender, QueueChannel, QueueEntry,
    QueueReceiver, QueueSender, ReplySignal, Response,
};
pub use state::SharedStatus;
