/// Wall-clock source for the tick producer. A seam so tick accumulation and
/// backward-step clamping can be driven by scripted clocks in tests.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch. Not monotonic; callers must
    /// tolerate the value stepping backwards.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
