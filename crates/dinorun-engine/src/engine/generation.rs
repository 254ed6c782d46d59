use std::iter;

use serde::{Deserialize, Serialize};

use crate::GenerationError;

use super::{
    cohort::{CandidateId, CandidateOutcome, Cohort, Termination},
    config::SimulationConfig,
    fitness::FitnessAccumulator,
    obstacle_stream::{ObstacleStream, TrackSeed},
    policy::BoxedPolicy,
    snapshot::{TickObserver, TickSnapshot},
};

/// Zero-based index of a generation in a training run.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct GenerationIndex(pub u32);

impl GenerationIndex {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// One candidate handed to [`evaluate_generation`].
///
/// `fitness` is owned by the optimizer; the evaluation adds the fitness
/// earned in this generation to it.
#[derive(Debug)]
pub struct Candidate<'a> {
    pub id: CandidateId,
    pub policy: BoxedPolicy<'a>,
    pub fitness: &'a mut f32,
}

impl<'a> Candidate<'a> {
    pub fn new(id: CandidateId, policy: BoxedPolicy<'a>, fitness: &'a mut f32) -> Self {
        Self {
            id,
            policy,
            fitness,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub generation: GenerationIndex,
    pub ticks: u64,
    /// Obstacle groups passed before termination.
    pub score: u32,
    pub termination: Termination,
    /// One entry per candidate, in the order the candidates were given.
    pub outcomes: Vec<CandidateOutcome>,
}

impl GenerationReport {
    /// The outcome with the highest fitness, first one on ties.
    #[must_use]
    pub fn best(&self) -> Option<&CandidateOutcome> {
        self.outcomes.iter().reduce(|best, outcome| {
            if outcome.fitness.total() > best.fitness.total() {
                outcome
            } else {
                best
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayReport {
    pub ticks: u64,
    pub score: u32,
    pub termination: Termination,
    pub fitness: FitnessAccumulator,
}

/// Evaluates one generation: all candidates run together as a single cohort.
///
/// The cohort is ticked until it goes extinct or reaches the score cap; the
/// observer sees every tick. On normal termination each candidate's fitness
/// for this generation is added to its `fitness` slot. If the observer stops
/// the evaluation, no slot is touched.
///
/// # Errors
///
/// - [`GenerationError::EmptyPopulation`] if `candidates` is empty
/// - [`GenerationError::InvalidConfig`] if `config` fails validation
/// - [`GenerationError::Aborted`] if the observer returned `Break`
///
/// # Example
///
/// ```
/// use dinorun_engine::{
///     Candidate, CandidateId, GenerationIndex, Policy, PolicyError, RemovalCause,
///     SimulationConfig, TrackSeed, Unobserved, evaluate_generation,
/// };
///
/// #[derive(Debug)]
/// struct Idle;
///
/// impl Policy for Idle {
///     fn activate(&mut self, _observation: &[f32]) -> Result<Vec<f32>, PolicyError> {
///         Ok(vec![0.0])
///     }
/// }
///
/// let config = SimulationConfig::default();
/// let mut fitness = [0.0_f32; 2];
/// let candidates: Vec<_> = fitness
///     .iter_mut()
///     .enumerate()
///     .map(|(i, slot)| Candidate::new(CandidateId(i), Box::new(Idle), slot))
///     .collect();
///
/// let report = evaluate_generation(
///     GenerationIndex(0),
///     candidates,
///     &config,
///     TrackSeed::from_bytes([7; 16]),
///     &mut Unobserved,
/// )?;
///
/// assert!(report.termination.is_extinct());
/// assert_eq!(report.outcomes[0].removal, Some(RemovalCause::Collided));
/// assert!((fitness[0] - fitness[1]).abs() < f32::EPSILON);
/// # Ok::<(), dinorun_engine::GenerationError>(())
/// ```
pub fn evaluate_generation(
    generation: GenerationIndex,
    candidates: Vec<Candidate<'_>>,
    config: &SimulationConfig,
    seed: TrackSeed,
    observer: &mut dyn TickObserver,
) -> Result<GenerationReport, GenerationError> {
    if candidates.is_empty() {
        return Err(GenerationError::EmptyPopulation { generation });
    }
    config.validate()?;

    let (policies, sinks): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .map(|candidate| ((candidate.id, candidate.policy), candidate.fitness))
        .unzip();
    let cohort = Cohort::new(policies, config);
    let finished = run_to_termination(generation, cohort, config, seed, observer)?;

    for (sink, outcome) in iter::zip(sinks, &finished.outcomes) {
        *sink += outcome.fitness.total();
    }

    Ok(GenerationReport {
        generation,
        ticks: finished.ticks,
        score: finished.score,
        termination: finished.termination,
        outcomes: finished.outcomes,
    })
}

/// Runs a single policy on its own, for demonstration and inspection.
///
/// # Errors
///
/// - [`GenerationError::InvalidConfig`] if `config` fails validation
/// - [`GenerationError::Aborted`] if the observer returned `Break`
pub fn replay(
    policy: BoxedPolicy<'_>,
    config: &SimulationConfig,
    seed: TrackSeed,
    observer: &mut dyn TickObserver,
) -> Result<ReplayReport, GenerationError> {
    config.validate()?;
    let cohort = Cohort::new([(CandidateId(0), policy)], config);
    let finished = run_to_termination(GenerationIndex::default(), cohort, config, seed, observer)?;
    let fitness = finished
        .outcomes
        .first()
        .map(|outcome| outcome.fitness)
        .unwrap_or_default();
    Ok(ReplayReport {
        ticks: finished.ticks,
        score: finished.score,
        termination: finished.termination,
        fitness,
    })
}

struct Finished {
    ticks: u64,
    score: u32,
    termination: Termination,
    outcomes: Vec<CandidateOutcome>,
}

fn run_to_termination(
    generation: GenerationIndex,
    mut cohort: Cohort<'_>,
    config: &SimulationConfig,
    seed: TrackSeed,
    observer: &mut dyn TickObserver,
) -> Result<Finished, GenerationError> {
    let mut stream = ObstacleStream::new(&config.track, seed);
    loop {
        let outcome = cohort.tick(&mut stream, config);
        let snapshot = TickSnapshot::new(generation, &cohort, &stream);
        if observer.observe(&snapshot).is_break() {
            return Err(GenerationError::Aborted {
                generation,
                tick: cohort.tick_count(),
            });
        }
        if let Some(termination) = outcome.termination {
            return Ok(Finished {
                ticks: cohort.tick_count(),
                score: cohort.score(),
                termination,
                outcomes: cohort.into_outcomes(),
            });
        }
    }
}
