//! Cooperative cancellation.
//!
//! A [`Timeout`] is threaded through every reducer, enumerator and solver.
//! Long-running loops call [`Timeout::check`] at the head of each outer
//! iteration; there is no background thread and no implicit yielding.

use std::time::{Duration, Instant};

use crate::error::Error;

/// A wall-clock deadline, or the absence of one.
#[derive(Clone, Copy, Debug)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    /// No deadline: `check` never fails.
    pub fn indefinite() -> Self {
        Self { deadline: None }
    }

    /// A deadline `seconds` from now. `seconds <= 0` elapses immediately.
    pub fn after_seconds(seconds: i64) -> Self {
        let now = Instant::now();
        let deadline = if seconds <= 0 {
            now
        } else {
            now + Duration::from_secs(seconds as u64)
        };
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn after(duration: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + duration),
        }
    }

    /// Parse a raw optional integer as "seconds from now"; `None` is indefinite.
    pub fn from_raw_seconds(seconds: Option<i64>) -> Self {
        match seconds {
            None => Self::indefinite(),
            Some(s) => Self::after_seconds(s),
        }
    }

    /// Query without failing.
    pub fn is_elapsed(&self) -> bool {
        match self.deadline {
            None => false,
            Some(d) => Instant::now() >= d,
        }
    }

    /// Fail with [`Error::TimedOut`] iff the deadline has passed.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_elapsed() {
            Err(Error::TimedOut)
        } else {
            Ok(())
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::indefinite()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn indefinite_never_elapses() {
        let t = Timeout::indefinite();
        assert!(!t.is_elapsed());
        assert!(t.check().is_ok());
    }

    #[test]
    fn zero_or_negative_seconds_elapses_immediately() {
        assert!(Timeout::after_seconds(0).is_elapsed());
        assert!(Timeout::after_seconds(-5).is_elapsed());
    }

    #[test]
    fn future_deadline_has_not_elapsed_yet() {
        let t = Timeout::after_seconds(60);
        assert!(!t.is_elapsed());
        assert!(t.check().is_ok());
    }

    #[test]
    fn from_raw_seconds_none_is_indefinite() {
        assert!(!Timeout::from_raw_seconds(None).is_elapsed());
    }
}
