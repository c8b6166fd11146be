//! Genetic algorithm over probability vectors.
//!
//! Each generation runs the same fixed pipeline:
//!
//! 1. **Evaluate** - score every individual against the target RTP
//! 2. **Select** - sort by fitness and keep the top half unchanged (elitism)
//! 3. **Crossover** - refill the population with one-point crossover children
//! 4. **Mutate** - redraw one tier of an individual with probability `mutation_rate`
//!
//! Every operator that produces or perturbs a vector normalizes it, so all
//! individuals in a population are valid probability distributions.
//!
//! # Key Components
//!
//! - [`Individual`] - A probability vector plus its cached fitness
//! - [`Population`] - Collection of individuals and the genetic operators over them
//! - [`GeneticParams`] - Population size, generation budget, mutation rate, refill size
//! - [`step`] - One full generation as a pure function of its inputs
//!
//! # Randomness
//!
//! No operator owns a random source. Callers pass `&mut R where R: Rng`, so a
//! seeded generator gives reproducible runs and an entropy-seeded one gives
//! independent runs.

use rand::Rng;
use rtpcalc_stats::descriptive::DescriptiveStats;

use crate::{
    probabilities,
    problem::{Problem, ProblemError},
};

/// Default number of individuals in the initial population.
pub const DEFAULT_POPULATION_SIZE: usize = 500;
/// Default number of generations.
pub const DEFAULT_GENERATIONS: usize = 5000;
/// Default per-individual mutation probability.
pub const DEFAULT_MUTATION_RATE: f64 = 0.01;
/// Fixed population size crossover refilled to in the first versions of the
/// calculator, independent of the configured population size.
pub const LEGACY_REFILL_SIZE: usize = 100;
/// Upper bound accepted for the population size and the refill size.
pub const MAX_POPULATION_SIZE: usize = 1_000_000;

/// A single candidate solution: a probability vector and its fitness score.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    probabilities: Vec<f64>,
    fitness: f64,
}

impl Individual {
    /// Creates an unevaluated individual with `tier_count` uniform random
    /// probabilities, normalized to sum to 1.0.
    pub fn random<R>(rng: &mut R, tier_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_probabilities(probabilities::random(rng, tier_count))
    }

    /// Creates an unevaluated individual from raw values, normalizing them.
    #[must_use]
    pub fn from_probabilities(mut probabilities: Vec<f64>) -> Self {
        probabilities::normalize(&mut probabilities);
        Self {
            probabilities,
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    #[must_use]
    pub fn into_probabilities(self) -> Vec<f64> {
        self.probabilities
    }

    /// Returns the cached fitness.
    ///
    /// `0.0` until [`Self::evaluate`] runs, and stale after the vector changes
    /// until it runs again.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn evaluate(&mut self, problem: &Problem) {
        self.fitness = problem.fitness(&self.probabilities);
    }

    /// Sort key that ranks NaN below every real score.
    fn rank(&self) -> f64 {
        if self.fitness.is_nan() {
            f64::NEG_INFINITY
        } else {
            self.fitness
        }
    }
}

/// An ordered collection of individuals.
///
/// Order only matters right after [`Self::select`], which leaves the
/// population sorted by fitness descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` random individuals, one per slot.
    pub fn random<R>(problem: &Problem, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, problem.tier_count()))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Scores every individual against the problem.
    pub fn evaluate(&mut self, problem: &Problem) {
        for ind in &mut self.individuals {
            ind.evaluate(problem);
        }
    }

    /// Sorts by fitness descending and keeps the top half (integer division).
    ///
    /// Survivors are carried forward unchanged. The population must have
    /// been evaluated first.
    #[must_use]
    pub fn select(mut self) -> Self {
        self.individuals.sort_by(|a, b| b.rank().total_cmp(&a.rank()));
        let survivors = self.individuals.len() / 2;
        self.individuals.truncate(survivors);
        self
    }

    /// Refills the population to `target_size` with crossover children.
    ///
    /// Parents are drawn uniformly with replacement from the current
    /// individuals, which are kept as they are. Each crossover yields two
    /// children; the second is dropped if only one slot is left. Children
    /// start unevaluated. A population that is empty or already at
    /// `target_size` is returned as is.
    #[must_use]
    pub fn crossover<R>(self, target_size: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let parents = self.individuals;
        if parents.is_empty() {
            return Self {
                individuals: parents,
            };
        }

        let mut next = parents.clone();
        while next.len() < target_size {
            let p1 = &parents[rng.random_range(0..parents.len())];
            let p2 = &parents[rng.random_range(0..parents.len())];
            let (c1, c2) =
                probabilities::one_point_crossover(&p1.probabilities, &p2.probabilities, rng);
            next.push(Individual {
                probabilities: c1,
                fitness: 0.0,
            });
            if next.len() < target_size {
                next.push(Individual {
                    probabilities: c2,
                    fitness: 0.0,
                });
            }
        }

        Self { individuals: next }
    }

    /// Mutates each individual independently with probability `rate`.
    ///
    /// A mutation redraws exactly one tier and renormalizes. Fitness is left
    /// stale.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not in `[0, 1]`.
    #[must_use]
    pub fn mutate<R>(mut self, rate: f64, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        for ind in &mut self.individuals {
            if rng.random_bool(rate) {
                probabilities::mutate_one(&mut ind.probabilities, rng);
            }
        }
        self
    }

    /// Returns the individual with the highest cached fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .max_by(|a, b| a.rank().total_cmp(&b.rank()))
    }

    /// Consumes the population, returning its highest-fitness individual.
    ///
    /// The population should be freshly evaluated.
    #[must_use]
    pub fn into_best(self) -> Option<Individual> {
        self.individuals
            .into_iter()
            .max_by(|a, b| a.rank().total_cmp(&b.rank()))
    }

    /// Descriptive statistics of the cached fitness values.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(Individual::fitness))
    }
}

/// Population size crossover refills to after selection halves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefillSize {
    /// Refill to the initial population size, keeping it constant.
    #[default]
    Population,
    /// Refill to a fixed size, independent of the initial population size.
    Fixed(usize),
}

/// Controls the genetic algorithm run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticParams {
    /// Number of individuals in the initial population
    pub population_size: usize,
    /// Number of generations to run (no early termination)
    pub generations: usize,
    /// Probability that an individual gets one tier redrawn per generation
    pub mutation_rate: f64,
    /// Population size crossover refills to after selection
    pub refill_size: RefillSize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            generations: DEFAULT_GENERATIONS,
            mutation_rate: DEFAULT_MUTATION_RATE,
            refill_size: RefillSize::Population,
        }
    }
}

impl GeneticParams {
    /// Parameters reproducing the original calculator, where crossover
    /// always refills to [`LEGACY_REFILL_SIZE`] regardless of population size.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            refill_size: RefillSize::Fixed(LEGACY_REFILL_SIZE),
            ..Self::default()
        }
    }

    /// Number of individuals crossover refills the population to.
    #[must_use]
    pub fn refill_target(&self) -> usize {
        match self.refill_size {
            RefillSize::Population => self.population_size,
            RefillSize::Fixed(size) => size,
        }
    }

    /// Checks the parameters before a run.
    ///
    /// Population and refill sizes must lie in `2..=MAX_POPULATION_SIZE` and
    /// the mutation rate in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.population_size < 2 {
            return Err(ProblemError::InvalidParams {
                reason: "population size must be at least 2",
            });
        }
        if self.population_size > MAX_POPULATION_SIZE {
            return Err(ProblemError::InvalidParams {
                reason: "population size exceeds the maximum of 1000000",
            });
        }
        if self.refill_target() < 2 {
            return Err(ProblemError::InvalidParams {
                reason: "refill size must be at least 2",
            });
        }
        if self.refill_target() > MAX_POPULATION_SIZE {
            return Err(ProblemError::InvalidParams {
                reason: "refill size exceeds the maximum of 1000000",
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ProblemError::InvalidParams {
                reason: "mutation rate must be in [0, 1]",
            });
        }
        Ok(())
    }

    /// Evolves an evaluated population into the next generation:
    /// select, then crossover, then mutate.
    #[must_use]
    pub fn evolve<R>(&self, population: Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        population
            .select()
            .crossover(self.refill_target(), rng)
            .mutate(self.mutation_rate, rng)
    }
}

/// Runs one full generation: evaluate, select, crossover, mutate.
#[must_use]
pub fn step<R>(
    mut population: Population,
    problem: &Problem,
    params: &GeneticParams,
    rng: &mut R,
) -> Population
where
    R: Rng + ?Sized,
{
    population.evaluate(problem);
    params.evolve(population, rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{problem::TargetRtp, table::WinRangeTable};

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn problem(payouts: &[f64], percent: f64) -> Problem {
        let table = WinRangeTable::from_payouts(payouts.iter().copied());
        Problem::new(table, TargetRtp::from_percent(percent).unwrap()).unwrap()
    }

    fn assert_all_normalized(population: &Population) {
        for ind in population.individuals() {
            assert!(
                probabilities::is_normalized(ind.probabilities()),
                "{:?}",
                ind.probabilities()
            );
        }
    }

    #[test]
    fn test_random_individual_is_normalized_and_unevaluated() {
        let mut rng = rng();
        for n in 1..10 {
            let ind = Individual::random(&mut rng, n);
            assert_eq!(ind.probabilities().len(), n);
            assert!(probabilities::is_normalized(ind.probabilities()));
            assert_eq!(ind.fitness(), 0.0);
        }
    }

    #[test]
    fn test_random_individuals_are_independent() {
        let mut rng = rng();
        let problem = problem(&[0.0, 1.0, 2.0], 50.0);
        let population = Population::random(&problem, 10, &mut rng);
        assert_eq!(population.len(), 10);
        let first = &population.individuals()[0];
        assert!(population.individuals()[1..].iter().all(|ind| ind != first));
    }

    #[test]
    fn test_evaluate_caches_fitness() {
        let mut rng = rng();
        let problem = problem(&[0.0, 10.0], 50.0);
        let mut population = Population::random(&problem, 20, &mut rng);
        population.evaluate(&problem);
        for ind in population.individuals() {
            assert_eq!(ind.fitness(), problem.fitness(ind.probabilities()));
            assert!(ind.fitness() <= 1.0);
        }
    }

    #[test]
    fn test_select_keeps_top_half_sorted() {
        let mut rng = rng();
        let problem = problem(&[0.0, 2.0, 5.0], 90.0);
        let mut population = Population::random(&problem, 21, &mut rng);
        population.evaluate(&problem);

        let mut all_fitness: Vec<f64> = population
            .individuals()
            .iter()
            .map(Individual::fitness)
            .collect();
        all_fitness.sort_by(|a, b| b.total_cmp(a));

        let selected = population.select();
        assert_eq!(selected.len(), 10);
        assert!(
            selected
                .individuals()
                .is_sorted_by(|a, b| a.fitness() >= b.fitness())
        );

        let min_survivor = selected.individuals().last().unwrap().fitness();
        let max_discarded = all_fitness[10];
        assert!(min_survivor >= max_discarded);
    }

    #[test]
    fn test_select_survivors_are_unchanged() {
        let individuals = vec![
            Individual::from_probabilities(vec![1.0, 0.0]),
            Individual::from_probabilities(vec![0.5, 0.5]),
            Individual::from_probabilities(vec![0.0, 1.0]),
            Individual::from_probabilities(vec![0.25, 0.75]),
        ];
        let problem = problem(&[0.0, 1.0], 50.0);
        let mut population = Population::from_individuals(individuals);
        population.evaluate(&problem);
        let selected = population.select();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.individuals()[0].probabilities(), &[0.5, 0.5]);
        assert_eq!(selected.individuals()[0].fitness(), 1.0);
        assert_eq!(selected.individuals()[1].fitness(), 0.75);
    }

    #[test]
    fn test_select_ranks_nan_last() {
        let mut population = Population::from_individuals(vec![
            Individual {
                probabilities: vec![1.0],
                fitness: f64::NAN,
            },
            Individual {
                probabilities: vec![1.0],
                fitness: 0.5,
            },
        ]);
        population = population.select();
        assert_eq!(population.len(), 1);
        assert_eq!(population.individuals()[0].fitness(), 0.5);
    }

    #[test]
    fn test_crossover_refills_to_target_size() {
        let mut rng = rng();
        let problem = problem(&[0.0, 1.0, 3.0, 7.0], 80.0);
        let population = Population::random(&problem, 7, &mut rng);
        let parents = population.clone();

        let next = population.crossover(20, &mut rng);
        assert_eq!(next.len(), 20);
        assert_eq!(&next.individuals()[..7], parents.individuals());
        assert!(next.individuals()[7..].iter().all(|ind| ind.fitness() == 0.0));
        assert!(
            next.individuals()
                .iter()
                .all(|ind| ind.probabilities().len() == 4)
        );
        assert_all_normalized(&next);
    }

    #[test]
    fn test_crossover_never_shrinks() {
        let mut rng = rng();
        let problem = problem(&[0.0, 1.0], 50.0);
        let population = Population::random(&problem, 250, &mut rng);
        let next = population.crossover(LEGACY_REFILL_SIZE, &mut rng);
        assert_eq!(next.len(), 250);
    }

    #[test]
    fn test_crossover_single_tier() {
        let mut rng = rng();
        let problem = problem(&[3.0], 50.0);
        let population = Population::random(&problem, 2, &mut rng);
        let next = population.crossover(10, &mut rng);
        assert_eq!(next.len(), 10);
        assert!(next.individuals().iter().all(|ind| ind.probabilities() == [1.0]));
    }

    #[test]
    fn test_crossover_empty_population() {
        let mut rng = rng();
        let next = Population::default().crossover(10, &mut rng);
        assert!(next.is_empty());
    }

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let mut rng = rng();
        let problem = problem(&[0.0, 1.0, 2.0], 50.0);
        let population = Population::random(&problem, 30, &mut rng);
        let mutated = population.clone().mutate(0.0, &mut rng);
        assert_eq!(mutated, population);
    }

    #[test]
    fn test_mutate_rate_one_keeps_invariants_and_fitness() {
        let mut rng = rng();
        let problem = problem(&[0.0, 1.0, 2.0, 4.0], 50.0);
        let mut population = Population::random(&problem, 30, &mut rng);
        population.evaluate(&problem);
        let before = population.clone();
        let mutated = population.mutate(1.0, &mut rng);
        assert_eq!(mutated.len(), before.len());
        assert_all_normalized(&mutated);
        for (a, b) in mutated.individuals().iter().zip(before.individuals()) {
            assert_eq!(a.fitness(), b.fitness());
        }
        assert_ne!(mutated, before);
    }

    #[test]
    fn test_best_and_into_best_agree() {
        let mut rng = rng();
        let problem = problem(&[0.0, 5.0, 20.0], 90.0);
        let mut population = Population::random(&problem, 50, &mut rng);
        population.evaluate(&problem);
        let best = population.best().cloned().unwrap();
        let max = population
            .individuals()
            .iter()
            .map(Individual::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(best.fitness(), max);
        assert_eq!(population.into_best(), Some(best));
        assert_eq!(Population::default().into_best(), None);
    }

    #[test]
    fn test_fitness_stats() {
        let mut rng = rng();
        let problem = problem(&[0.0, 1.0], 50.0);
        let mut population = Population::random(&problem, 10, &mut rng);
        population.evaluate(&problem);
        let stats = population.fitness_stats().unwrap();
        assert_eq!(stats.count, 10);
        assert_eq!(stats.max, population.best().unwrap().fitness());
        assert!(Population::default().fitness_stats().is_none());
    }

    #[test]
    fn test_params_validation() {
        assert!(GeneticParams::default().validate().is_ok());
        assert!(GeneticParams::legacy().validate().is_ok());
        assert_eq!(GeneticParams::legacy().refill_target(), LEGACY_REFILL_SIZE);
        assert_eq!(
            GeneticParams::default().refill_target(),
            DEFAULT_POPULATION_SIZE
        );

        let too_small = GeneticParams {
            population_size: 1,
            ..GeneticParams::default()
        };
        assert!(matches!(
            too_small.validate(),
            Err(ProblemError::InvalidParams { .. })
        ));

        let bad_rate = GeneticParams {
            mutation_rate: 1.5,
            ..GeneticParams::default()
        };
        assert!(bad_rate.validate().is_err());

        let nan_rate = GeneticParams {
            mutation_rate: f64::NAN,
            ..GeneticParams::default()
        };
        assert!(nan_rate.validate().is_err());

        let bad_refill = GeneticParams {
            refill_size: RefillSize::Fixed(1),
            ..GeneticParams::default()
        };
        assert!(bad_refill.validate().is_err());

        let huge_refill = GeneticParams {
            population_size: 10,
            generations: 1,
            mutation_rate: 0.0,
            refill_size: RefillSize::Fixed(usize::MAX),
        };
        assert!(matches!(
            huge_refill.validate(),
            Err(ProblemError::InvalidParams { .. })
        ));

        let huge_population = GeneticParams {
            population_size: MAX_POPULATION_SIZE + 1,
            ..GeneticParams::default()
        };
        assert!(huge_population.validate().is_err());

        let largest = GeneticParams {
            population_size: MAX_POPULATION_SIZE,
            refill_size: RefillSize::Fixed(MAX_POPULATION_SIZE),
            ..GeneticParams::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_step_keeps_population_size() {
        let mut rng = rng();
        let problem = problem(&[0.0, 5.0, 20.0], 90.0);
        let params = GeneticParams {
            population_size: 40,
            generations: 1,
            mutation_rate: 0.5,
            refill_size: RefillSize::Population,
        };
        let mut population = Population::random(&problem, params.population_size, &mut rng);
        for _ in 0..10 {
            population = step(population, &problem, &params, &mut rng);
            assert_eq!(population.len(), 40);
            assert_all_normalized(&population);
        }
    }

    #[test]
    fn test_step_legacy_refill_shrinks_then_settles() {
        let mut rng = rng();
        let problem = problem(&[0.0, 5.0, 20.0], 90.0);
        let params = GeneticParams::legacy();
        let mut population = Population::random(&problem, 500, &mut rng);
        let sizes: Vec<usize> = (0..4)
            .map(|_| {
                population = step(population.clone(), &problem, &params, &mut rng);
                population.len()
            })
            .collect();
        assert_eq!(sizes, vec![250, 125, 100, 100]);
    }
}
