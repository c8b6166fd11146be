//! Fixed-budget optimizer loop.
//!
//! The loop is a fold of [`genetic::step`](crate::genetic::step) over the
//! generation budget, followed by a final evaluation and a pure reduction to
//! the best individual. There is no convergence check.

use rand::Rng;
use rtpcalc_stats::descriptive::DescriptiveStats;

use crate::{
    genetic::{self, GeneticParams, Population},
    problem::{Problem, ProblemError},
    solution::Solution,
};

/// Summary of one generation, taken right after its evaluation pass.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Zero-based generation index
    pub generation: usize,
    /// Number of individuals evaluated in this generation
    pub population_size: usize,
    /// Distribution of fitness across the population
    pub fitness: DescriptiveStats,
    /// Expected payout of the fittest individual
    pub best_expected_payout: f64,
}

/// Runs the genetic algorithm and returns the best solution found.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use rtpcalc_optimizer::{
///     genetic::GeneticParams,
///     optimizer,
///     problem::{Problem, TargetRtp},
///     table::WinRangeTable,
/// };
///
/// let table = WinRangeTable::from_payouts([0.0, 10.0]);
/// let problem = Problem::new(table, TargetRtp::from_percent(50.0).unwrap()).unwrap();
/// let params = GeneticParams {
///     population_size: 50,
///     generations: 50,
///     ..GeneticParams::default()
/// };
/// let solution = optimizer::optimize(&problem, &params, &mut Pcg32::seed_from_u64(7)).unwrap();
/// assert_eq!(solution.probabilities().len(), 2);
/// ```
pub fn optimize<R>(
    problem: &Problem,
    params: &GeneticParams,
    rng: &mut R,
) -> Result<Solution, ProblemError>
where
    R: Rng + ?Sized,
{
    run(problem, params, rng, None::<fn(&GenerationReport)>)
}

/// Like [`optimize`], calling `observer` after every generation's evaluation.
pub fn optimize_with_observer<R, F>(
    problem: &Problem,
    params: &GeneticParams,
    rng: &mut R,
    observer: F,
) -> Result<Solution, ProblemError>
where
    R: Rng + ?Sized,
    F: FnMut(&GenerationReport),
{
    run(problem, params, rng, Some(observer))
}

fn run<R, F>(
    problem: &Problem,
    params: &GeneticParams,
    rng: &mut R,
    mut observer: Option<F>,
) -> Result<Solution, ProblemError>
where
    R: Rng + ?Sized,
    F: FnMut(&GenerationReport),
{
    params.validate()?;
    log::debug!(
        "optimizing {} tiers towards RTP {}: {params:?}",
        problem.tier_count(),
        problem.target().value()
    );

    // reports are built only when something reads them
    let wants_report = observer.is_some() || log::log_enabled!(log::Level::Trace);
    let initial = Population::random(problem, params.population_size, rng);
    let mut population = (0..params.generations).fold(initial, |population, generation| {
        if wants_report {
            let population = evaluated(population, problem);
            if let Some(report) = generation_report(generation, &population, problem) {
                log::trace!(
                    "generation {generation}: best fitness {:.6}, mean {:.6}",
                    report.fitness.max,
                    report.fitness.mean
                );
                if let Some(observer) = observer.as_mut() {
                    observer(&report);
                }
            }
            params.evolve(population, rng)
        } else {
            genetic::step(population, problem, params, rng)
        }
    });

    population.evaluate(problem);
    let best = population
        .into_best()
        .ok_or(ProblemError::InvalidParams {
            reason: "population became empty",
        })?;
    let solution = Solution::from_individual(best, problem);
    log::debug!(
        "best fitness {:.6}, expected payout {:.6}",
        solution.fitness(),
        solution.expected_payout()
    );
    Ok(solution)
}

fn evaluated(mut population: Population, problem: &Problem) -> Population {
    population.evaluate(problem);
    population
}

fn generation_report(
    generation: usize,
    population: &Population,
    problem: &Problem,
) -> Option<GenerationReport> {
    let fitness = population.fitness_stats()?;
    let best = population.best()?;
    Some(GenerationReport {
        generation,
        population_size: population.len(),
        fitness,
        best_expected_payout: problem.expected_payout(best.probabilities()),
    })
}
