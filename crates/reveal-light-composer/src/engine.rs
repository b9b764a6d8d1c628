//! Light Engine - the render loop
//!
//! Each frame the engine:
//! - drains control requests and answers each through the reply signal
//! - drains push-feed entries
//! - advances the active effect and renders it
//! - writes the frame to the driver
//! - publishes the status snapshot
//!
//! Nothing in a frame waits on the network: both sources are drained with
//! `try_receive`, and the only await is the frame timer.

use embassy_time::{Instant, Timer};
use log::{debug, warn};

use crate::{
    color::Rgb,
    command::CommandError,
    config::EngineConfig,
    context::AnimationContext,
    dispatcher::{Dispatcher, QueueOutcome},
    driver::LedDriver,
    source::{ControlReceiver, QueueReceiver, ReplySignal},
    state::SharedStatus,
};

/// Inbound command sources of the render loop
pub struct CommandSources<'a> {
    pub control: ControlReceiver<'a>,
    pub replies: &'a ReplySignal,
    pub queue: QueueReceiver<'a>,
}

/// What one frame did, for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub control_requests: usize,
    pub queue_entries: usize,
    pub written: bool,
}

/// Light Engine - owns the animation context and the driver
///
/// Generic over `D: LedDriver` to support different hardware backends.
pub struct LightEngine<'a, D: LedDriver<N>, const N: usize> {
    driver: D,
    context: AnimationContext<N>,
    dispatcher: Dispatcher,
    sources: CommandSources<'a>,
    /// Optional shared status for external observation
    shared_status: Option<&'a SharedStatus>,
    /// Consecutive failed driver writes
    write_failures: u32,
}

impl<'a, D: LedDriver<N>, const N: usize> LightEngine<'a, D, N> {
    /// Create an engine showing the ambient effect from `now`
    pub fn new(
        driver: D,
        config: EngineConfig,
        sources: CommandSources<'a>,
        now: Instant,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            driver,
            context: AnimationContext::new(config, now),
            dispatcher: Dispatcher::new()?,
            sources,
            shared_status: None,
            write_failures: 0,
        })
    }

    /// Attach shared status for external observation
    #[must_use]
    pub fn with_shared_status(mut self, shared: &'a SharedStatus) -> Self {
        shared.publish(self.context.effect());
        self.shared_status = Some(shared);
        self
    }

    pub fn context(&self) -> &AnimationContext<N> {
        &self.context
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run one frame at `now` without waiting
    pub fn step(&mut self, now: Instant) -> FrameReport {
        let mut report = FrameReport::default();

        while let Ok(request) = self.sources.control.try_receive() {
            let response =
                self.dispatcher
                    .handle_control_request(&mut self.context, &request, now);
            self.sources.replies.signal(response);
            report.control_requests += 1;
        }

        while let Ok(entry) = self.sources.queue.try_receive() {
            let outcome = self
                .dispatcher
                .handle_queue_entry(&mut self.context, &entry, now);
            if let QueueOutcome::Applied(name) = outcome {
                debug!("engine: applied {} from feed", name.as_str());
            }
            report.queue_entries += 1;
        }

        let frame = self.context.tick(now);
        report.written = self.write_frame(&frame);

        if let Some(shared) = self.shared_status {
            shared.publish(self.context.effect());
        }
        report
    }

    /// Run the engine loop indefinitely
    pub async fn run(&mut self) -> ! {
        let frame_period = self.context.config().frame_period;
        loop {
            let frame_start = Instant::now();
            self.step(frame_start);

            let render_time = frame_start.elapsed();
            if render_time < frame_period {
                Timer::after(frame_period - render_time).await;
            }
        }
    }

    fn write_frame(&mut self, frame: &[Rgb; N]) -> bool {
        match self.driver.write(frame) {
            Ok(()) => {
                if self.write_failures > 0 {
                    debug!(
                        "engine: driver recovered after {} failed frames",
                        self.write_failures
                    );
                }
                self.write_failures = 0;
                true
            }
            Err(err) => {
                if self.write_failures == 0 {
                    warn!("engine: driver write failed: {:?}", err);
                }
                self.write_failures = self.write_failures.saturating_add(1);
                false
            }
        }
    }
}
