//! Neuro-evolution of runner policies with a genetic algorithm.
//!
//! Every individual is a gene vector for one [`FeedForwardNetwork`] of a
//! shared [`NetworkShape`]. A generation is evaluated by letting all of the
//! population's networks run together as one cohort on a fresh track; the
//! fitness each runner earns is the individual's fitness.
//!
//! # Training Loop
//!
//! 1. **Initialize** - [`Population::random`] draws genes uniformly from the gene range
//! 2. **Evaluate** - [`Population::evaluate_fitness`] runs one generation in the engine
//! 3. **Evolve** - [`PopulationEvolver::evolve`] keeps the elites and breeds the rest
//! 4. **Repeat** - with the next [`GenerationIndex`] and a new track seed
//!
//! See [`genetic`] for the operators and [`genes`] for the gene vector helpers.
//!
//! [`FeedForwardNetwork`]: dinorun_network::FeedForwardNetwork
//! [`NetworkShape`]: dinorun_network::NetworkShape
//! [`GenerationIndex`]: dinorun_engine::GenerationIndex

pub use self::{genetic::*, stats::*};

pub mod genes;
pub mod genetic;
mod stats;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("failed to build network for individual")]
    Network(dinorun_network::NetworkError),
    #[display("failed to evaluate generation")]
    Generation(dinorun_engine::GenerationError),
}
