//! Time abstraction for testable timestamp capture.
//!
//! Submissions derive both their `saved_at` metadata and their filename
//! stamp from a single clock read, so tests need full control over what
//! that read returns. Production code uses `SystemClock`, tests inject
//! `TestClock`.

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};

/// Clock abstraction for timestamp capture.
///
/// Enables dependency injection of time sources so filename generation and
/// metadata timestamps are reproducible in tests.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Production clock reading actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock with controllable time progression.
///
/// Stores microseconds since the UNIX epoch; clones share the same
/// underlying instant, so a handle kept by a test sees the same time as
/// the handle injected into the code under test.
#[derive(Debug, Clone)]
pub struct TestClock {
    epoch_micros: Arc<AtomicI64>,
}

impl TestClock {
    /// Creates a test clock starting at the current system time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a test clock pinned to a specific time.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self { epoch_micros: Arc::new(AtomicI64::new(time.timestamp_micros())) }
    }

    /// Moves the clock to a specific time, forwards or backwards.
    pub fn set(&self, time: DateTime<Utc>) {
        self.epoch_micros.store(time.timestamp_micros(), Ordering::Release);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        let micros = i64::try_from(duration.as_micros()).unwrap_or(i64::MAX);
        self.epoch_micros.fetch_add(micros, Ordering::AcqRel);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let micros = self.epoch_micros.load(Ordering::Acquire);
        DateTime::from_timestamp_micros(micros).unwrap_or_default()
    }
}
