use chrono::Utc;

/// Source of "now" for enqueue stamps and expiry checks.
///
/// The node reads the clock at several points during dispatch; injecting it
/// lets tests control elapsed time instead of sleeping for real.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}
