//! Win-range table: the fixed problem input.
//!
//! The table is read once per run from a JSON array of records:
//!
//! ```json
//! [
//!     { "payout": 0.0, "ranges": [] },
//!     { "payout": 5.0, "ranges": [1.0, 2.5] }
//! ]
//! ```
//!
//! Array order defines the tier index used by every probability vector. The
//! `ranges` values are opaque boundary markers: they are carried through
//! unchanged and never interpreted by the optimizer.

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// One payout tier of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRange {
    /// Payout multiplier paid when this tier is selected.
    pub payout: f64,
    /// Eligible range boundaries, copied verbatim from input.
    pub ranges: Vec<f64>,
}

impl WinRange {
    #[must_use]
    pub fn new(payout: f64, ranges: Vec<f64>) -> Self {
        Self { payout, ranges }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadTableError {
    #[display("failed to open win range file: {}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },
    #[display("failed to parse win range file: {}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Ordered, immutable list of win-range tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinRangeTable(Vec<WinRange>);

impl WinRangeTable {
    #[must_use]
    pub fn new(tiers: Vec<WinRange>) -> Self {
        Self(tiers)
    }

    /// Builds a table from payouts alone, with empty range sets.
    ///
    /// ```
    /// use rtpcalc_optimizer::table::WinRangeTable;
    ///
    /// let table = WinRangeTable::from_payouts([0.0, 5.0, 20.0]);
    /// assert_eq!(table.len(), 3);
    /// assert!(table.tiers().iter().all(|tier| tier.ranges.is_empty()));
    /// ```
    #[must_use]
    pub fn from_payouts<I>(payouts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self(
            payouts
                .into_iter()
                .map(|payout| WinRange::new(payout, vec![]))
                .collect(),
        )
    }

    /// Reads a table from a JSON file.
    pub fn open<P>(path: P) -> Result<Self, LoadTableError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadTableError::Unreadable {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            LoadTableError::Malformed {
                path: path.to_owned(),
                source,
            }
        })
    }

    /// Number of tiers (the length of every probability vector).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn tiers(&self) -> &[WinRange] {
        &self.0
    }

    /// Payout of each tier, in tier order.
    pub fn payouts(&self) -> impl Iterator<Item = f64> + '_ {
        self.tiers().iter().map(|tier| tier.payout)
    }
}
