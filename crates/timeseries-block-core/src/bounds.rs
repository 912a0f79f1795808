//! Time bounds and step arithmetic.
//!
//! A [`Bounds`] is a time window `[start, end]` discretized by a fixed step
//! size. Step `i` sits at `start + i * step`; a timestamp `t` maps back to
//! step `floor((t - start) / step)`. The step count is
//! `ceil((end - start) / step)`.
//!
//! All arithmetic is done in integer nanoseconds. Bounds whose span or step
//! does not fit in an `i64` nanosecond count are rejected at construction, so
//! the lookups below never overflow.

pub mod step_size;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use snafu::prelude::*;

use crate::error::{InvalidBoundsSnafu, Result, StepOutOfBoundsSnafu, TimeOutOfBoundsSnafu};

pub use step_size::{ParseStepSizeError, StepSize};

/// A time window plus a fixed sampling step size.
///
/// Immutable once constructed; use [`Bounds::new`] to validate the invariants
/// `start < end` and `step > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_nanos: i64,
    span_nanos: i64,
}

impl Bounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// Returns [`BlockError::InvalidBounds`](crate::BlockError::InvalidBounds)
    /// if `end <= start`, `step <= 0`, or either the span or the step cannot be
    /// expressed in `i64` nanoseconds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Result<Self> {
        let step_nanos = step.num_nanoseconds().filter(|n| *n > 0);
        let span_nanos = (end - start).num_nanoseconds().filter(|n| *n > 0);

        match (step_nanos, span_nanos) {
            (Some(step_nanos), Some(span_nanos)) => Ok(Self {
                start,
                end,
                step_nanos,
                span_nanos,
            }),
            _ => InvalidBoundsSnafu { start, end, step }.fail(),
        }
    }

    /// Inclusive start of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window. Lookups accept timestamps up to and including it.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The sampling step size.
    pub fn step_size(&self) -> Duration {
        Duration::nanoseconds(self.step_nanos)
    }

    /// Length of the window, `end - start`.
    pub fn span(&self) -> Duration {
        Duration::nanoseconds(self.span_nanos)
    }

    /// Number of steps, `ceil((end - start) / step)`.
    pub fn steps(&self) -> usize {
        let whole = self.span_nanos / self.step_nanos;
        let steps = if self.span_nanos % self.step_nanos == 0 {
            whole
        } else {
            whole + 1
        };
        usize::try_from(steps).unwrap_or(usize::MAX)
    }

    /// Whether `t` lies within `[start, end]`.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }

    /// Timestamp of step `index`, `start + index * step`.
    ///
    /// # Errors
    /// Returns [`BlockError::StepOutOfBounds`](crate::BlockError::StepOutOfBounds)
    /// when the timestamp would fall after `end`.
    pub fn time_at_step(&self, index: usize) -> Result<DateTime<Utc>> {
        let offset = i64::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(self.step_nanos))
            .filter(|offset| *offset <= self.span_nanos);

        let Some(offset) = offset else {
            return StepOutOfBoundsSnafu {
                index,
                bounds: *self,
            }
            .fail();
        };

        Ok(self.start + Duration::nanoseconds(offset))
    }

    /// Step index of timestamp `t`, `floor((t - start) / step)`.
    ///
    /// Inverse of [`Bounds::time_at_step`] for every valid step.
    ///
    /// # Errors
    /// Returns [`BlockError::TimeOutOfBounds`](crate::BlockError::TimeOutOfBounds)
    /// when `t` is before `start` or after `end`.
    pub fn step_at_time(&self, t: DateTime<Utc>) -> Result<usize> {
        ensure!(
            self.contains(t),
            TimeOutOfBoundsSnafu {
                time: t,
                bounds: *self,
            }
        );

        // t is within [start, end], so the elapsed time fits in the validated span.
        let elapsed = (t - self.start)
            .num_nanoseconds()
            .context(TimeOutOfBoundsSnafu {
                time: t,
                bounds: *self,
            })?;

        Ok((elapsed / self.step_nanos) as usize)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] step {}",
            self.start.to_rfc3339(),
            self.end.to_rfc3339(),
            self.step_size()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockError;
    use crate::test_util::ts;

    fn hourly(hours: i64) -> Bounds {
        Bounds::new(ts(0), ts(hours * 3600), Duration::hours(1)).unwrap()
    }

    #[test]
    fn rejects_empty_or_inverted_window() {
        let err = Bounds::new(ts(10), ts(10), Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, BlockError::InvalidBounds { .. }));

        let err = Bounds::new(ts(10), ts(0), Duration::seconds(1)).unwrap_err();
        assert!(matches!(err, BlockError::InvalidBounds { .. }));
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = Bounds::new(ts(0), ts(10), Duration::zero()).unwrap_err();
        assert!(matches!(err, BlockError::InvalidBounds { .. }));

        let err = Bounds::new(ts(0), ts(10), Duration::seconds(-1)).unwrap_err();
        assert!(matches!(err, BlockError::InvalidBounds { .. }));
    }

    #[test]
    fn step_count_rounds_up() {
        assert_eq!(hourly(3).steps(), 3);

        let b = Bounds::new(ts(0), ts(3 * 3600 + 1), Duration::hours(1)).unwrap();
        assert_eq!(b.steps(), 4);

        let b = Bounds::new(ts(0), ts(1), Duration::hours(1)).unwrap();
        assert_eq!(b.steps(), 1);
    }

    #[test]
    fn time_at_step_accepts_end_and_rejects_past_it() {
        let b = hourly(3);
        assert_eq!(b.time_at_step(0).unwrap(), ts(0));
        assert_eq!(b.time_at_step(2).unwrap(), ts(2 * 3600));
        assert_eq!(b.time_at_step(3).unwrap(), ts(3 * 3600));

        let err = b.time_at_step(4).unwrap_err();
        assert_eq!(err, BlockError::StepOutOfBounds { index: 4, bounds: b });

        assert!(b.time_at_step(usize::MAX).is_err());
    }

    #[test]
    fn step_at_time_floors_within_window() {
        let b = hourly(3);
        assert_eq!(b.step_at_time(ts(0)).unwrap(), 0);
        assert_eq!(b.step_at_time(ts(3599)).unwrap(), 0);
        assert_eq!(b.step_at_time(ts(3600)).unwrap(), 1);
        assert_eq!(b.step_at_time(ts(3 * 3600)).unwrap(), 3);
    }

    #[test]
    fn step_at_time_rejects_outside_window() {
        let b = hourly(3);
        let before = ts(0) - Duration::nanoseconds(1);
        let err = b.step_at_time(before).unwrap_err();
        assert_eq!(
            err,
            BlockError::TimeOutOfBounds {
                time: before,
                bounds: b
            }
        );
        assert!(b.step_at_time(ts(3 * 3600 + 1)).is_err());
    }

    #[test]
    fn round_trips_every_step() {
        let b = Bounds::new(ts(0), ts(1000), Duration::seconds(7)).unwrap();
        for i in 0..b.steps() {
            let t = b.time_at_step(i).unwrap();
            assert_eq!(b.step_at_time(t).unwrap(), i);
        }
    }

    #[test]
    fn display_includes_window_and_step() {
        let shown = hourly(1).to_string();
        assert!(shown.starts_with("[1970-01-01T00:00:00+00:00, 1970-01-01T01:00:00+00:00]"));
        assert!(shown.contains("step"));
    }
}
