//! Statistical summaries for optimizer progress reporting.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing a population's fitness
//!
//! # Examples
//!
//! ```
//! use rtpcalc_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [0.5, 0.75, 1.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 1.0);
//! assert_eq!(stats.mean, 0.75);
//! ```

pub mod descriptive;
