//! Immutable problem definition: the win-range table plus the target RTP.

use crate::table::WinRangeTable;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ProblemError {
    #[display("win range table has no tiers")]
    DegenerateProblem,
    #[display("target RTP must be a percentage in [0, 100], got {percent}")]
    InvalidTargetRtp { percent: f64 },
    #[display("invalid genetic algorithm parameters: {reason}")]
    InvalidParams { reason: &'static str },
}

/// Target return-to-player ratio as a decimal fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TargetRtp(f64);

impl TargetRtp {
    /// Converts a percentage (e.g. `96.5`) into a target ratio.
    ///
    /// ```
    /// use rtpcalc_optimizer::problem::TargetRtp;
    ///
    /// let target = TargetRtp::from_percent(96.5).unwrap();
    /// assert_eq!(target.value(), 0.965);
    /// assert!(TargetRtp::from_percent(-1.0).is_err());
    /// ```
    pub fn from_percent(percent: f64) -> Result<Self, ProblemError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(ProblemError::InvalidTargetRtp { percent });
        }
        Ok(Self(percent / 100.0))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// The fixed input of one optimizer run.
///
/// Guarantees at least one tier, so every probability vector derived from it
/// can be normalized.
#[derive(Debug, Clone)]
pub struct Problem {
    table: WinRangeTable,
    target: TargetRtp,
}

impl Problem {
    pub fn new(table: WinRangeTable, target: TargetRtp) -> Result<Self, ProblemError> {
        if table.is_empty() {
            return Err(ProblemError::DegenerateProblem);
        }
        Ok(Self { table, target })
    }

    #[must_use]
    pub fn target(&self) -> TargetRtp {
        self.target
    }

    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.table.len()
    }

    /// Dot product of `probabilities` with the per-tier payouts.
    #[must_use]
    pub fn expected_payout(&self, probabilities: &[f64]) -> f64 {
        debug_assert_eq!(probabilities.len(), self.tier_count());
        probabilities
            .iter()
            .zip(self.table.payouts())
            .map(|(p, payout)| p * payout)
            .sum()
    }

    /// Closeness of the expected payout to the target, `1.0` being an exact match.
    ///
    /// ```
    /// use rtpcalc_optimizer::{problem::{Problem, TargetRtp}, table::WinRangeTable};
    ///
    /// let table = WinRangeTable::from_payouts([0.0, 1.0]);
    /// let problem = Problem::new(table, TargetRtp::from_percent(50.0).unwrap()).unwrap();
    /// assert_eq!(problem.fitness(&[0.5, 0.5]), 1.0);
    /// assert_eq!(problem.fitness(&[1.0, 0.0]), 0.5);
    /// ```
    #[must_use]
    pub fn fitness(&self, probabilities: &[f64]) -> f64 {
        1.0 - (self.target.value() - self.expected_payout(probabilities)).abs()
    }
}
