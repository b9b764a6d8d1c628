//! Command dispatcher
//!
//! Turns commands from either source into activations on the
//! [`AnimationContext`]. Only the push feed is deduplicated: control-surface
//! calls are synchronous and always apply.

use embassy_time::Instant;
use log::{debug, info, warn};

use crate::{
    command::{CommandError, CommandName, DispatchTable, Parameters, QueuePayload},
    context::AnimationContext,
    cursor::{DedupCursor, EntryId},
    source::{ControlRequest, QueueEntry, Response},
};

/// What happened to a push-feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    /// The command's effect is now active
    Applied(CommandName),
    /// Id at or below the cursor, ignored
    Stale,
    /// Cursor advanced but the payload was rejected
    Malformed(CommandError),
}

pub struct Dispatcher {
    table: DispatchTable,
    cursor: DedupCursor,
}

impl Dispatcher {
    /// Create a dispatcher, checking the table covers the whole vocabulary
    pub fn new() -> Result<Self, CommandError> {
        let table = DispatchTable::new();
        table.validate()?;
        Ok(Self {
            table,
            cursor: DedupCursor::new(),
        })
    }

    /// Highest push-feed entry id processed so far
    pub fn cursor(&self) -> Option<&EntryId> {
        self.cursor.position()
    }

    /// Process one push-feed entry
    ///
    /// Any id newer than the cursor moves it, whether or not the payload is
    /// usable, so a broken entry is never retried on redelivery.
    pub fn handle_queue_entry<const N: usize>(
        &mut self,
        ctx: &mut AnimationContext<N>,
        entry: &QueueEntry,
        now: Instant,
    ) -> QueueOutcome {
        if !self.cursor.advance(&entry.id) {
            debug!("dispatcher: skipping stale entry {}", entry.id);
            return QueueOutcome::Stale;
        }

        let applied = QueuePayload::from_slice(&entry.payload).and_then(|payload| {
            info!(
                "dispatcher: entry {} {} from {} at {}",
                entry.id,
                payload.command,
                payload.created_by.unwrap_or("?"),
                payload.timestamp.unwrap_or_default()
            );
            let name =
                CommandName::parse_from_str(payload.command).ok_or(CommandError::UnknownCommand)?;
            self.apply(ctx, name, &payload.parameters, now)?;
            Ok(name)
        });

        match applied {
            Ok(name) => QueueOutcome::Applied(name),
            Err(err) => {
                warn!("dispatcher: ignoring entry {}: {}", entry.id, err);
                QueueOutcome::Malformed(err)
            }
        }
    }

    /// Process one control-surface call and build its acknowledgement
    pub fn handle_control_request<const N: usize>(
        &mut self,
        ctx: &mut AnimationContext<N>,
        request: &ControlRequest,
        now: Instant,
    ) -> Response {
        let result = CommandName::parse_from_str(&request.command)
            .ok_or(CommandError::UnknownCommand)
            .and_then(|name| {
                let params = Parameters::from_body(&request.body)?;
                self.apply(ctx, name, &params, now)
            });

        match result {
            Ok(()) => Response::Ok,
            Err(err) => {
                warn!("dispatcher: control {} rejected: {}", request.command, err);
                Response::Error(err.message())
            }
        }
    }

    fn apply<const N: usize>(
        &self,
        ctx: &mut AnimationContext<N>,
        name: CommandName,
        params: &Parameters<'_>,
        now: Instant,
    ) -> Result<(), CommandError> {
        let effect = self.table.build(name, params, ctx.config())?;
        ctx.activate(effect, now);
        Ok(())
    }
}
