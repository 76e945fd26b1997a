use std::{
    fmt,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

#[inline]
fn saturating_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

/// Handle to move a mockable [`Clock`] around in time
#[derive(Clone)]
pub struct MockHandle {
    delta: Arc<AtomicI64>,
}

impl MockHandle {
    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        self.delta
            .fetch_add(saturating_nanos(duration), Ordering::AcqRel);
    }

    /// Move the clock backward
    pub fn rewind(&self, duration: Duration) {
        self.delta
            .fetch_sub(saturating_nanos(duration), Ordering::AcqRel);
    }

    /// Return to the system time
    pub fn reset(&self) {
        self.delta.store(0, Ordering::Release);
    }
}

impl fmt::Debug for MockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHandle")
            .field("delta", &self.delta.load(Ordering::Relaxed))
            .finish()
    }
}

/// Time source of the verifier
///
/// The default clock reads the system time. A mockable clock applies an adjustable delta on top of it.
#[derive(Clone, Default)]
pub struct Clock {
    delta: Option<Arc<AtomicI64>>,
}

impl Clock {
    /// Construct a clock reading the system time
    #[must_use]
    pub fn system() -> Self {
        Self::default()
    }

    /// Construct a mockable clock together with the handle adjusting it
    #[must_use]
    pub fn mockable() -> (Self, MockHandle) {
        let delta = Arc::new(AtomicI64::default());

        let mock_handle = MockHandle {
            delta: Arc::clone(&delta),
        };
        let clock = Self { delta: Some(delta) };

        (clock, mock_handle)
    }

    /// Read the current time
    #[must_use]
    pub fn now(&self) -> SystemTime {
        let now = SystemTime::now();

        let Some(ref delta) = self.delta else {
            return now;
        };

        let ns_delta = delta.load(Ordering::Acquire);
        let adjusted = if ns_delta.is_negative() {
            now.checked_sub(Duration::from_nanos(ns_delta.unsigned_abs()))
        } else {
            now.checked_add(Duration::from_nanos(ns_delta.unsigned_abs()))
        };

        adjusted.unwrap_or(now)
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("mocked", &self.delta.is_some())
            .finish_non_exhaustive()
    }
}
