//! Telemetry utilities for event timing and log correlation.

use std::time::Instant;

/// Guard for timing engine event handling and recording metrics.
///
/// Records event latency when dropped.
pub struct EventTimer {
    event: &'static str,
    start: Instant,
}

impl EventTimer {
    /// Start timing an event.
    pub fn new(event: &'static str) -> Self {
        Self {
            event,
            start: Instant::now(),
        }
    }
}

impl Drop for EventTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_event(self.event, duration);
    }
}

/// Standardized span constructors for trivia observability.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span covering the handling of one chat line.
    pub fn chat(player: &str) -> Span {
        debug_span!("chat", player = %player)
    }

    /// Span covering a privileged command.
    pub fn admin(command: &str, player_id: u64) -> Span {
        info_span!("admin", command = %command, player_id = player_id)
    }

    /// Span covering a timer firing.
    pub fn timer(epoch: u64) -> Span {
        debug_span!("timer", epoch = epoch)
    }
}
