//! Gap analysis over the step domain of a series or block.
//!
//! [`StepCoverage`] records which step indices in `0..steps` carry a real
//! value. Missing steps are either never written (a series shorter than its
//! bounds) or hold the `NaN` missing sentinel.
//!
//! ```
//! use timeseries_block_core::coverage::StepCoverage;
//!
//! let values = [1.0, f64::NAN, f64::NAN, 4.0];
//! let cov = StepCoverage::from_values(&values, 6);
//!
//! assert_eq!(cov.missing().iter().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
//! assert_eq!(cov.max_gap_len(), 2);
//! assert!((cov.ratio() - 2.0 / 6.0).abs() < 1e-12);
//! ```

use std::ops::RangeInclusive;

use roaring::RoaringBitmap;

/// Set of present step indices within a fixed step domain `0..steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepCoverage {
    present: RoaringBitmap,
    steps: u32,
}

impl StepCoverage {
    /// Coverage with no step present.
    pub fn empty(steps: u32) -> Self {
        Self {
            present: RoaringBitmap::new(),
            steps,
        }
    }

    /// Coverage with every step present.
    pub fn full(steps: u32) -> Self {
        Self {
            present: (0..steps).collect(),
            steps,
        }
    }

    /// Coverage of `values` laid out from step 0. Steps past the end of
    /// `values`, and steps holding `NaN`, are missing. Values past `steps` are
    /// ignored.
    pub fn from_values(values: &[f64], steps: u32) -> Self {
        let present = values
            .iter()
            .take(steps as usize)
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, _)| i as u32)
            .collect();
        Self { present, steps }
    }

    /// Number of steps in the domain.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Borrow the bitmap of present steps.
    pub fn present(&self) -> &RoaringBitmap {
        &self.present
    }

    /// Number of present steps.
    pub fn cardinality(&self) -> u64 {
        self.present.len()
    }

    /// Whether every step in the domain is present.
    pub fn is_complete(&self) -> bool {
        self.present.len() == u64::from(self.steps)
    }

    /// Steps in the domain that are not present.
    pub fn missing(&self) -> RoaringBitmap {
        let mut missing: RoaringBitmap = (0..self.steps).collect();
        missing -= &self.present;
        missing
    }

    /// Missing steps grouped into contiguous inclusive runs. With
    /// `max_run_len`, longer runs are split into chunks of at most that length;
    /// `Some(0)` yields no runs.
    pub fn missing_runs(&self, max_run_len: Option<u32>) -> Vec<RangeInclusive<u32>> {
        let runs = contiguous_runs(&self.missing());
        match max_run_len {
            None => runs,
            Some(0) => Vec::new(),
            Some(max) => runs
                .into_iter()
                .flat_map(|run| {
                    let (start, end) = (*run.start(), *run.end());
                    (start..=end)
                        .step_by(max as usize)
                        .map(move |s| s..=s.saturating_add(max - 1).min(end))
                })
                .collect(),
        }
    }

    /// Fraction of the domain that is present, in `[0.0, 1.0]`. An empty
    /// domain counts as fully covered.
    pub fn ratio(&self) -> f64 {
        if self.steps == 0 {
            return 1.0;
        }
        self.present.len() as f64 / f64::from(self.steps)
    }

    /// Length of the longest missing run, 0 when nothing is missing.
    pub fn max_gap_len(&self) -> u32 {
        contiguous_runs(&self.missing())
            .into_iter()
            .map(|r| r.end() - r.start() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Steps present in either coverage. The domain is the larger of the two.
    pub fn union(&self, other: &StepCoverage) -> StepCoverage {
        StepCoverage {
            present: &self.present | &other.present,
            steps: self.steps.max(other.steps),
        }
    }

    /// Steps present in both coverages. The domain is the smaller of the two.
    pub fn intersect(&self, other: &StepCoverage) -> StepCoverage {
        StepCoverage {
            present: &self.present & &other.present,
            steps: self.steps.min(other.steps),
        }
    }
}

fn contiguous_runs(bitmap: &RoaringBitmap) -> Vec<RangeInclusive<u32>> {
    let mut runs: Vec<RangeInclusive<u32>> = Vec::new();
    for step in bitmap {
        match runs.last_mut() {
            Some(run) if run.end().checked_add(1) == Some(step) => *run = *run.start()..=step,
            _ => runs.push(step..=step),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_empty_domains() {
        let full = StepCoverage::full(5);
        assert!(full.is_complete());
        assert!(full.missing().is_empty());
        assert_eq!(full.max_gap_len(), 0);
        assert_eq!(full.ratio(), 1.0);

        let empty = StepCoverage::empty(5);
        assert_eq!(empty.missing_runs(None), vec![0..=4]);
        assert_eq!(empty.max_gap_len(), 5);
        assert_eq!(empty.ratio(), 0.0);

        let zero = StepCoverage::empty(0);
        assert!(zero.is_complete());
        assert_eq!(zero.ratio(), 1.0);
    }

    #[test]
    fn short_values_leave_a_tail_gap() {
        let cov = StepCoverage::from_values(&[1.0, 2.0], 4);
        assert_eq!(cov.cardinality(), 2);
        assert_eq!(cov.missing_runs(None), vec![2..=3]);
    }

    #[test]
    fn values_past_the_domain_are_ignored() {
        let cov = StepCoverage::from_values(&[1.0, 2.0, 3.0], 2);
        assert!(cov.is_complete());
        assert!(!cov.present().contains(2));
    }

    #[test]
    fn nan_gaps_are_split_into_runs() {
        let nan = f64::NAN;
        let values = [1.0, nan, nan, 4.0, nan, nan, nan, 8.0, nan];
        let cov = StepCoverage::from_values(&values, 9);

        assert_eq!(cov.missing_runs(None), vec![1..=2, 4..=6, 8..=8]);
        assert_eq!(
            cov.missing_runs(Some(2)),
            vec![1..=2, 4..=5, 6..=6, 8..=8]
        );
        assert!(cov.missing_runs(Some(0)).is_empty());
        assert_eq!(cov.max_gap_len(), 3);
    }

    #[test]
    fn union_and_intersect() {
        let a = StepCoverage::from_values(&[1.0, f64::NAN, 3.0], 3);
        let b = StepCoverage::from_values(&[f64::NAN, 2.0, 3.0, 4.0], 4);

        let u = a.union(&b);
        assert_eq!(u.steps(), 4);
        assert!(u.is_complete());

        let i = a.intersect(&b);
        assert_eq!(i.steps(), 3);
        assert_eq!(i.present().iter().collect::<Vec<_>>(), vec![2]);
    }
}
