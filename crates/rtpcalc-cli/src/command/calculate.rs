use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use rtpcalc_optimizer::{
    genetic::{
        DEFAULT_GENERATIONS, DEFAULT_MUTATION_RATE, DEFAULT_POPULATION_SIZE, GeneticParams,
        LEGACY_REFILL_SIZE, RefillSize,
    },
    optimizer::{self, GenerationReport},
    problem::{Problem, TargetRtp},
    table::WinRangeTable,
};

use crate::util;

const DEFAULT_REPORT_INTERVAL: usize = 500;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CalculateArg {
    /// Target RTP as a percentage (e.g. 96.5)
    rtp: f64,
    /// Win ranges JSON file: an array of {"payout": number, "ranges": [number, ...]}
    win_ranges: PathBuf,
    /// Output file path [default: <STORAGE_DIR>/rtp_probabilities.json]
    #[arg(long)]
    output: Option<PathBuf>,
    /// Directory for the output file [default: `storage` next to the executable]
    #[arg(long)]
    storage_dir: Option<PathBuf>,
    /// Number of individuals in the initial population
    #[arg(long, default_value_t = DEFAULT_POPULATION_SIZE)]
    population: usize,
    /// Number of generations to evolve
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,
    /// Probability that an individual gets one tier redrawn per generation
    #[arg(long, default_value_t = DEFAULT_MUTATION_RATE)]
    mutation_rate: f64,
    /// Population size crossover refills to [default: same as --population]
    #[arg(long, conflicts_with = "legacy_refill")]
    refill_size: Option<usize>,
    /// Refill to a fixed 100 individuals after selection, like the original calculator
    #[arg(long)]
    legacy_refill: bool,
    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Log a progress line every N generations (0 disables)
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL)]
    report_interval: usize,
}

impl CalculateArg {
    fn genetic_params(&self) -> GeneticParams {
        let refill_size = match (self.refill_size, self.legacy_refill) {
            (Some(size), _) => RefillSize::Fixed(size),
            (None, true) => RefillSize::Fixed(LEGACY_REFILL_SIZE),
            (None, false) => RefillSize::Population,
        };
        GeneticParams {
            population_size: self.population,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            refill_size,
        }
    }
}

pub(crate) fn run(arg: &CalculateArg) -> anyhow::Result<()> {
    let start = Instant::now();

    let target = TargetRtp::from_percent(arg.rtp)?;
    let params = arg.genetic_params();
    params.validate()?;
    let output = util::prepare_output_path(arg.output.clone(), arg.storage_dir.clone())?;

    let table = WinRangeTable::open(&arg.win_ranges)?;
    let problem = Problem::new(table, target).with_context(|| {
        format!(
            "Cannot optimize win ranges from {}",
            arg.win_ranges.display()
        )
    })?;

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    log::info!(
        "Optimizing {} tiers towards RTP {} ({} individuals, {} generations, seed {seed})",
        problem.tier_count(),
        target.value(),
        params.population_size,
        params.generations,
    );

    let mut rng = Pcg32::seed_from_u64(seed);
    let solution = optimizer::optimize_with_observer(&problem, &params, &mut rng, |report| {
        if arg.report_interval > 0 && report.generation % arg.report_interval == 0 {
            log_report(report);
        }
    })?;

    solution.save_json(&output)?;

    eprintln!();
    eprintln!("Probabilities computed successfully");
    eprintln!("  Tiers:           {}", solution.probabilities().len());
    eprintln!("  Target RTP:      {:.6}", target.value());
    eprintln!("  Expected payout: {:.6}", solution.expected_payout());
    eprintln!("  Fitness:         {:.6}", solution.fitness());
    eprintln!("  Seed:            {seed}");

    println!("Probabilities saved to {}", output.display());
    println!(
        "Execution time: {:.3} seconds",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn log_report(report: &GenerationReport) {
    log::info!("{}", format_report(report));
}

fn format_report(report: &GenerationReport) -> String {
    let fitness = &report.fitness;
    format!(
        "Generation #{} ({} individuals): fitness max {:.6} mean {:.6} median {:.6} min {:.6} std {:.6}, best payout {:.6}",
        report.generation,
        report.population_size,
        fitness.max,
        fitness.mean,
        fitness.median,
        fitness.min,
        fitness.std_dev,
        report.best_expected_payout,
    )
}
