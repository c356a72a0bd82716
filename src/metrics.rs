//! Prometheus metrics collection for trivia-ng.
//!
//! - `trivia_rounds_started_total` - Rounds that reached the question phase
//! - `trivia_rounds_solved_total` / `trivia_rounds_timed_out_total` - Round outcomes
//! - `trivia_solve_seconds` - Time taken by winning answers
//! - `trivia_hints_released_total` - Hints granted
//! - `trivia_stale_timers_total` - Timer firings ignored because state moved on
//! - `trivia_admin_commands_total{command,outcome}` - Privileged command attempts
//! - `trivia_event_duration_seconds{event}` - Engine event latency

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

pub static ROUNDS_STARTED: OnceLock<IntCounter> = OnceLock::new();

pub static ROUNDS_SOLVED: OnceLock<IntCounter> = OnceLock::new();

pub static ROUNDS_TIMED_OUT: OnceLock<IntCounter> = OnceLock::new();

pub static HINTS_RELEASED: OnceLock<IntCounter> = OnceLock::new();

pub static STALE_TIMERS: OnceLock<IntCounter> = OnceLock::new();

/// Chat lines received by the engine.
pub static CHAT_EVENTS: OnceLock<IntCounter> = OnceLock::new();

pub static ADMIN_COMMANDS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges and Histograms
// ========================================================================

/// Connected participants as last reported to the engine.
pub static PLAYERS: OnceLock<IntGauge> = OnceLock::new();

pub static SOLVE_TIME: OnceLock<Histogram> = OnceLock::new();

pub static EVENT_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup. Recording before `init` is a silent no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(ROUNDS_STARTED, IntCounter::new("trivia_rounds_started_total", "Rounds started"));
    register!(ROUNDS_SOLVED, IntCounter::new("trivia_rounds_solved_total", "Rounds solved"));
    register!(ROUNDS_TIMED_OUT, IntCounter::new("trivia_rounds_timed_out_total", "Rounds that ran out of time"));
    register!(HINTS_RELEASED, IntCounter::new("trivia_hints_released_total", "Hints released"));
    register!(STALE_TIMERS, IntCounter::new("trivia_stale_timers_total", "Timer firings ignored as stale"));
    register!(CHAT_EVENTS, IntCounter::new("trivia_chat_events_total", "Chat lines received"));
    register!(ADMIN_COMMANDS, IntCounterVec::new(Opts::new("trivia_admin_commands_total", "Admin commands by outcome"), &["command", "outcome"]));
    register!(PLAYERS, IntGauge::new("trivia_players", "Connected players"));
    register!(SOLVE_TIME, Histogram::with_opts(
        HistogramOpts::new("trivia_solve_seconds", "Time taken by winning answers")
            .buckets(vec![1.0, 2.5, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0])));
    register!(EVENT_LATENCY, HistogramVec::new(
        HistogramOpts::new("trivia_event_duration_seconds", "Engine event latency by type")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["event"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

#[inline]
fn inc(metric: &OnceLock<IntCounter>) {
    if let Some(c) = metric.get() {
        c.inc();
    }
}

#[inline]
pub fn record_round_started() {
    inc(&ROUNDS_STARTED);
}

/// Record a solved round and how long the winner took.
#[inline]
pub fn record_round_solved(time_taken_secs: f64) {
    inc(&ROUNDS_SOLVED);
    if let Some(h) = SOLVE_TIME.get() {
        h.observe(time_taken_secs);
    }
}

#[inline]
pub fn record_round_timed_out() {
    inc(&ROUNDS_TIMED_OUT);
}

#[inline]
pub fn record_hint() {
    inc(&HINTS_RELEASED);
}

#[inline]
pub fn record_stale_timer() {
    inc(&STALE_TIMERS);
}

#[inline]
pub fn record_chat() {
    inc(&CHAT_EVENTS);
}

/// Record an admin command attempt. `outcome` is `"ok"` or an error code.
#[inline]
pub fn record_admin(command: &str, outcome: &str) {
    if let Some(c) = ADMIN_COMMANDS.get() {
        c.with_label_values(&[command, outcome]).inc();
    }
}

#[inline]
pub fn set_players(count: usize) {
    if let Some(g) = PLAYERS.get() {
        g.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

/// Record engine event handling latency.
#[inline]
pub fn record_event(event: &str, duration_secs: f64) {
    if let Some(h) = EVENT_LATENCY.get() {
        h.with_label_values(&[event]).observe(duration_secs);
    }
}
