//! Genetic-algorithm search for slot payout probabilities.
//!
//! Given a table of payout tiers ("win ranges") and a target return-to-player
//! (RTP) ratio, this crate searches for a probability per tier such that the
//! probabilities sum to 1.0 and the expected payout matches the target as
//! closely as possible.
//!
//! # How the Search Works
//!
//! 1. **Population** - Create individuals with random normalized probability vectors
//! 2. **Evaluation** - Score each vector by `1 - |target - expected payout|`
//! 3. **Selection** - Keep the top half unchanged
//! 4. **Crossover** - Refill the population by splicing pairs of survivors
//! 5. **Mutation** - Occasionally redraw a single tier
//! 6. **Repeat** - Run a fixed number of generations, then return the best individual
//!
//! # Architecture
//!
//! ```text
//! WinRangeTable + TargetRtp
//!     ↓ validated into
//! Problem (immutable, shared by reference)
//!     ↓ scored against by
//! Population of Individuals
//!     ↓ evolved by
//! genetic::step (evaluate → select → crossover → mutate)
//!     ↓ folded over generations by
//! optimizer::optimize
//!     ↓ produces
//! Solution (probabilities, fitness, expected payout)
//! ```
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use rtpcalc_optimizer::{
//!     genetic::GeneticParams,
//!     optimizer,
//!     problem::{Problem, TargetRtp},
//!     table::WinRangeTable,
//! };
//!
//! let table = WinRangeTable::from_payouts([0.0, 5.0, 20.0]);
//! let problem = Problem::new(table, TargetRtp::from_percent(90.0)?)?;
//! let params = GeneticParams {
//!     population_size: 100,
//!     generations: 100,
//!     ..GeneticParams::default()
//! };
//!
//! let mut rng = Pcg32::seed_from_u64(1);
//! let solution = optimizer::optimize(&problem, &params, &mut rng)?;
//! assert_eq!(solution.probabilities().len(), 3);
//! # Ok::<(), rtpcalc_optimizer::problem::ProblemError>(())
//! ```
//!
//! # Current Limitations
//!
//! - **No convergence check**: the generation budget is the only stopping rule
//! - **Local search only**: the result is the best individual found, not a proven optimum
//! - **Single objective**: RTP closeness is the only fitness signal; hit frequency or
//!   volatility are not considered
//! - **Opaque ranges**: the `ranges` of each tier are carried through but never validated
//!   for overlap or coverage

pub mod genetic;
pub mod optimizer;
pub mod probabilities;
pub mod problem;
pub mod solution;
pub mod table;
