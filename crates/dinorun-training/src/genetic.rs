//! Genetic algorithm over network gene vectors.
//!
//! The cycle per generation is:
//!
//! 1. **Evaluate Fitness** - the whole population runs as one cohort
//! 2. **Elite Selection** - the best individuals are copied unchanged
//! 3. **Tournament Selection** - parents are picked from random subsets
//! 4. **Crossover (BLX-α)** - two parents are blended into a child
//! 5. **Mutation** - Gaussian noise is added to some of the child's genes
//!
//! # Key Components
//!
//! - [`Individual`] - one gene vector and its fitness
//! - [`Population`] - the individuals of a generation and their network shape
//! - [`PopulationEvolver`] - selection, crossover and mutation parameters
//!
//! # Example
//!
//! ```
//! use dinorun_engine::{GenerationIndex, SimulationConfig};
//! use dinorun_network::NetworkShape;
//! use dinorun_training::{Population, PopulationEvolver};
//!
//! let mut rng = rand::rng();
//! let config = SimulationConfig::default();
//! let evolver = PopulationEvolver {
//!     elite_count: 2,
//!     gene_range: 1.0,
//!     tournament_size: 3,
//!     mutation_sigma: 0.2,
//!     blx_alpha: 0.3,
//!     mutation_rate: 0.2,
//! };
//!
//! let mut population = Population::random(NetworkShape::for_policy(vec![4]), 8, &mut rng, 1.0);
//! let mut generation = GenerationIndex::default();
//! for _ in 0..3 {
//!     population.evaluate_fitness(generation, rand::random(), &config)?;
//!     population = evolver.evolve(&population, &mut rng);
//!     generation = generation.next();
//! }
//! assert_eq!(population.individuals().len(), 8);
//! # Ok::<(), dinorun_training::TrainingError>(())
//! ```

use std::iter;

use rand::{Rng, seq::IndexedRandom};

use dinorun_engine::{
    Candidate, CandidateId, GenerationIndex, GenerationReport, SimulationConfig, TrackSeed,
    Unobserved, evaluate_generation,
};
use dinorun_network::{FeedForwardNetwork, NetworkShape};

use crate::{FitnessSummary, TrainingError, genes};

/// One candidate solution: the genes of a network and the fitness they earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genes: Vec<f32>,
    fitness: f32,
}

impl Individual {
    /// Creates an individual that has not been evaluated yet.
    #[must_use]
    pub fn new(genes: Vec<f32>) -> Self {
        Self {
            genes,
            fitness: 0.0,
        }
    }

    pub fn random<R>(rng: &mut R, gene_range: f32, gene_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(genes::random(rng, gene_range, gene_count))
    }

    #[must_use]
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    /// Fitness earned in the most recent evaluation.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    shape: NetworkShape,
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with genes drawn from `[-gene_range, gene_range]`.
    #[must_use]
    pub fn random<R>(shape: NetworkShape, count: usize, rng: &mut R, gene_range: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, gene_range, shape.gene_count()))
            .collect();
        Self { shape, individuals }
    }

    /// Builds a population from existing individuals.
    ///
    /// # Panics
    ///
    /// Panics if an individual's gene count does not match `shape`.
    #[must_use]
    pub fn from_individuals(shape: NetworkShape, individuals: Vec<Individual>) -> Self {
        let gene_count = shape.gene_count();
        assert!(
            individuals.iter().all(|ind| ind.genes.len() == gene_count),
            "every individual needs {gene_count} genes"
        );
        Self { shape, individuals }
    }

    #[must_use]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The best individual, once the population has been evaluated.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Builds the network encoded by `individual`.
    pub fn network(&self, individual: &Individual) -> Result<FeedForwardNetwork, TrainingError> {
        Ok(FeedForwardNetwork::from_genes(
            self.shape.clone(),
            individual.genes.clone(),
        )?)
    }

    /// Runs one generation on the track drawn from `seed`.
    ///
    /// Every individual's fitness is replaced with what it earned in this
    /// generation, then individuals are sorted by fitness, best first. If the
    /// evaluation fails, fitness and order are left unchanged.
    pub fn evaluate_fitness(
        &mut self,
        generation: GenerationIndex,
        seed: TrackSeed,
        config: &SimulationConfig,
    ) -> Result<GenerationReport, TrainingError> {
        let networks = self
            .individuals
            .iter()
            .map(|ind| self.network(ind))
            .collect::<Result<Vec<_>, _>>()?;
        let mut scores = vec![0.0; networks.len()];
        let candidates = iter::zip(networks, &mut scores)
            .enumerate()
            .map(|(i, (network, score))| Candidate::new(CandidateId(i), Box::new(network), score))
            .collect();

        let report = evaluate_generation(generation, candidates, config, seed, &mut Unobserved)?;

        for (ind, score) in iter::zip(&mut self.individuals, scores) {
            ind.fitness = score;
        }
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        Ok(report)
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessSummary> {
        FitnessSummary::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Parameters for breeding one generation from the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top individuals copied unchanged
    pub elite_count: usize,
    /// Genes are clamped to `[-gene_range, gene_range]`
    pub gene_range: f32,
    /// Individuals per tournament (larger = stronger selection pressure)
    pub tournament_size: usize,
    /// Standard deviation of the Gaussian mutation
    pub mutation_sigma: f32,
    /// BLX-α range expansion
    pub blx_alpha: f32,
    /// Probability of mutating each gene
    pub mutation_rate: f32,
}

impl PopulationEvolver {
    /// Breeds the next generation, keeping the population size.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not sorted by fitness, best first.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = &population.individuals;
        assert!(individuals.is_sorted_by(|a, b| a.fitness >= b.fitness));

        let elite_count = self.elite_count.min(individuals.len());
        let mut next_individuals = individuals[..elite_count].to_vec();

        while next_individuals.len() < individuals.len() {
            let p1 = tournament_select(individuals, self.tournament_size, rng);
            let p2 = tournament_select(individuals, self.tournament_size, rng);

            let mut child = genes::blx_alpha(
                &p1.genes,
                &p2.genes,
                self.blx_alpha,
                self.gene_range,
                rng,
            );
            genes::mutate(
                &mut child,
                self.mutation_sigma,
                self.gene_range,
                self.mutation_rate,
                rng,
            );
            next_individuals.push(Individual::new(child));
        }

        Population {
            shape: population.shape.clone(),
            individuals: next_individuals,
        }
    }
}

/// Picks `tournament_size` distinct individuals and returns the fittest.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament draws from a non-empty population")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(2024)
    }

    fn shape() -> NetworkShape {
        NetworkShape::for_policy(vec![3])
    }

    fn scored(fitness: &[f32]) -> Population {
        let gene_count = shape().gene_count();
        let individuals = fitness
            .iter()
            .enumerate()
            .map(|(i, &fitness)| Individual {
                genes: vec![i as f32 * 0.01; gene_count],
                fitness,
            })
            .collect();
        Population::from_individuals(shape(), individuals)
    }

    fn evolver() -> PopulationEvolver {
        PopulationEvolver {
            elite_count: 2,
            gene_range: 1.0,
            tournament_size: 2,
            mutation_sigma: 0.1,
            blx_alpha: 0.2,
            mutation_rate: 0.3,
        }
    }

    #[test]
    fn test_random_population_matches_shape() {
        let population = Population::random(shape(), 6, &mut rng(), 0.5);
        assert_eq!(population.individuals().len(), 6);
        for ind in population.individuals() {
            assert_eq!(ind.genes().len(), shape().gene_count());
            assert!(population.network(ind).is_ok());
        }
    }

    #[test]
    fn test_evaluate_sorts_best_first() {
        let config = SimulationConfig::default();
        let mut population = Population::random(shape(), 10, &mut rng(), 1.0);
        let report = population
            .evaluate_fitness(GenerationIndex(0), TrackSeed::from_bytes([9; 16]), &config)
            .unwrap();

        assert_eq!(report.outcomes.len(), 10);
        let fitness: Vec<f32> = population.individuals().iter().map(Individual::fitness).collect();
        assert!(fitness.is_sorted_by(|a, b| a >= b));

        let best = report.best().unwrap().fitness.total();
        assert!((population.best().unwrap().fitness() - best).abs() < 1e-4);
    }

    #[test]
    fn test_evaluation_replaces_previous_fitness() {
        let config = SimulationConfig::default();
        let seed = TrackSeed::from_bytes([1; 16]);
        let mut population = Population::random(shape(), 4, &mut rng(), 1.0);
        population.evaluate_fitness(GenerationIndex(0), seed, &config).unwrap();
        let first: Vec<f32> = population.individuals().iter().map(Individual::fitness).collect();

        population.evaluate_fitness(GenerationIndex(1), seed, &config).unwrap();
        let second: Vec<f32> = population.individuals().iter().map(Individual::fitness).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_population_fails_evaluation() {
        let config = SimulationConfig::default();
        let mut population = Population::random(shape(), 0, &mut rng(), 1.0);
        let result = population.evaluate_fitness(GenerationIndex(4), TrackSeed::from_bytes([0; 16]), &config);
        assert!(matches!(result, Err(TrainingError::Generation(_))));
        assert_eq!(population.compute_fitness_stats(), None);
    }

    #[test]
    fn test_evolve_keeps_elites_and_size() {
        let population = scored(&[9.0, 7.0, 5.0, 3.0, 1.0]);
        let next = evolver().evolve(&population, &mut rng());

        assert_eq!(next.individuals().len(), 5);
        assert_eq!(next.individuals()[..2], population.individuals()[..2]);
        for child in &next.individuals()[2..] {
            assert!((child.fitness()).abs() < f32::EPSILON);
            assert!(child.genes().iter().all(|g| (-1.0..=1.0).contains(g)));
        }
    }

    #[test]
    fn test_elite_count_larger_than_population() {
        let population = scored(&[2.0, 1.0]);
        let evolver = PopulationEvolver {
            elite_count: 5,
            ..evolver()
        };
        let next = evolver.evolve(&population, &mut rng());
        assert_eq!(next.individuals(), population.individuals());
    }

    #[test]
    #[should_panic(expected = "is_sorted_by")]
    fn test_evolve_requires_sorted_population() {
        let population = scored(&[1.0, 2.0]);
        let _ = evolver().evolve(&population, &mut rng());
    }

    #[test]
    fn test_full_tournament_picks_the_best() {
        let population = scored(&[1.0, 8.0, 3.0]);
        let winner = tournament_select(population.individuals(), 3, &mut rng());
        assert!((winner.fitness() - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fitness_stats() {
        let population = scored(&[6.0, 4.0, 2.0]);
        let stats = population.compute_fitness_stats().unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-6);
        assert!((stats.max - 6.0).abs() < f32::EPSILON);
        assert!((stats.min - 2.0).abs() < f32::EPSILON);
    }
}
