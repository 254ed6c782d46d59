use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use dinorun_engine::{GenerationIndex, SimulationConfig, TrackSeed};
use dinorun_network::NetworkShape;
use dinorun_training::{Population, PopulationEvolver};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{model::trained_model::TrainedModel, util::Output};

const GENE_RANGE: f32 = 1.0;
const ELITE_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 3;
const BLX_ALPHA: f32 = 0.3;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    fn from_generation(generation: GenerationIndex) -> Self {
        match generation.0 {
            0..20 => Self::Exploration,
            20..60 => Self::Transition,
            _ => Self::Convergence,
        }
    }
}

const fn mutation_sigma_by_phase(phase: EvolutionPhase) -> f32 {
    match phase {
        EvolutionPhase::Exploration => 0.3,
        EvolutionPhase::Transition => 0.1,
        EvolutionPhase::Convergence => 0.03,
    }
}

const fn mutation_rate_by_phase(phase: EvolutionPhase) -> f32 {
    match phase {
        EvolutionPhase::Exploration => 0.3,
        EvolutionPhase::Transition => 0.2,
        EvolutionPhase::Convergence => 0.1,
    }
}

const fn evolver_by_phase(phase: EvolutionPhase) -> PopulationEvolver {
    PopulationEvolver {
        elite_count: ELITE_COUNT,
        gene_range: GENE_RANGE,
        tournament_size: TOURNAMENT_SIZE,
        mutation_sigma: mutation_sigma_by_phase(phase),
        blx_alpha: BLX_ALPHA,
        mutation_rate: mutation_rate_by_phase(phase),
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of individuals per generation
    #[arg(long, default_value_t = 30)]
    population: usize,
    /// Number of generations to evolve
    #[arg(long, default_value_t = 50)]
    generations: u32,
    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_value = "4")]
    hidden: Vec<usize>,
    /// Seed for the optimizer and the generated tracks
    #[arg(long)]
    seed: Option<u64>,
    /// Name stored in the model file
    #[arg(long, default_value = "dinorun")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        population: population_size,
        generations,
        hidden,
        seed,
        name,
        output,
    } = arg;
    anyhow::ensure!(*population_size > 0, "--population must be at least 1");
    anyhow::ensure!(*generations > 0, "--generations must be at least 1");

    let shape = NetworkShape::for_policy(hidden.clone());
    shape.validate().context("Invalid --hidden layer sizes")?;
    let config = SimulationConfig::default();

    let seed = seed.unwrap_or_else(rand::random);
    eprintln!("Training seed: {seed}");
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut population = Population::random(shape, *population_size, &mut rng, GENE_RANGE);
    let mut generation = GenerationIndex::default();
    loop {
        let phase = EvolutionPhase::from_generation(generation);
        let track_seed: TrackSeed = rng.random();
        eprintln!("Generation #{generation} ({phase:?}, track {track_seed}):");

        let report = population
            .evaluate_fitness(generation, track_seed, &config)
            .with_context(|| format!("Failed to evaluate generation #{generation}"))?;
        let fitness_stats = population
            .compute_fitness_stats()
            .context("Population is empty")?;

        eprintln!(
            "  Run:  {} ticks, score {}, {}",
            report.ticks, report.score, report.termination
        );
        eprintln!("  Fitness Stats:");
        eprintln!("    Min:    {:.3}", fitness_stats.min);
        eprintln!("    Max:    {:.3}", fitness_stats.max);
        eprintln!("    Mean:   {:.3}", fitness_stats.mean);
        eprintln!("    Median: {:.3}", fitness_stats.median);
        eprintln!("    StdDev: {:.3}", fitness_stats.std_dev);

        if generation.0 + 1 >= *generations {
            break;
        }
        population = evolver_by_phase(phase).evolve(&population, &mut rng);
        generation = generation.next();
    }

    let best = population.best().context("Population is empty")?;
    eprintln!("Best Individual:");
    eprintln!("  {:.3?} => {:.3}", best.genes(), best.fitness());

    let model = TrainedModel {
        name: name.clone(),
        trained_at: Utc::now(),
        generations: *generations,
        final_fitness: best.fitness(),
        network: population.network(best)?,
        config,
    };
    let output = Output::new(output.clone());
    output.save_json(&model)?;

    eprintln!();
    eprintln!("Model saved successfully");
    eprintln!("  Path: {output}");
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Network: {:?}", model.network.shape());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        let phase = |n| EvolutionPhase::from_generation(GenerationIndex(n));
        assert_eq!(phase(0), EvolutionPhase::Exploration);
        assert_eq!(phase(19), EvolutionPhase::Exploration);
        assert_eq!(phase(20), EvolutionPhase::Transition);
        assert_eq!(phase(60), EvolutionPhase::Convergence);
    }

    #[test]
    fn test_mutation_cools_down() {
        let phases = [
            EvolutionPhase::Exploration,
            EvolutionPhase::Transition,
            EvolutionPhase::Convergence,
        ];
        let sigmas = phases.map(|phase| evolver_by_phase(phase).mutation_sigma);
        assert!(sigmas.is_sorted_by(|a, b| a > b));
    }
}
