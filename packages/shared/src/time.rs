//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the clock's display offset
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Create a system clock that reports time in the given offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Create a new fixed clock with the given instant
    pub fn new(fixed_time: DateTime<FixedOffset>) -> Self {
        Self { fixed_time }
    }

    /// Create a fixed clock from a Unix timestamp in milliseconds.
    ///
    /// Returns `None` when the timestamp is out of range.
    pub fn from_millis(timestamp_millis: i64, offset: FixedOffset) -> Option<Self> {
        offset
            .timestamp_millis_opt(timestamp_millis)
            .single()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.fixed_time
    }
}

/// Build a fixed offset from whole hours east of UTC.
///
/// Returns `None` outside of ±23 hours.
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}

/// Render a time as `HH:MM`, the format shown next to chat lines.
pub fn format_clock_time(time: &DateTime<FixedOffset>) -> String {
    time.format("%H:%M").to_string()
}
