use std::ops::ControlFlow;

use crate::core::{kinematics::Agent, obstacle::ObstacleGroup};

use super::{
    cohort::{CandidateId, Cohort},
    generation::GenerationIndex,
    obstacle_stream::ObstacleStream,
};

/// Read-only view of an evaluation taken right after a tick.
///
/// This is everything a renderer or a progress trace may look at. It borrows
/// the simulation, so observers cannot change the outcome.
#[derive(Debug, Clone, Copy)]
pub struct TickSnapshot<'a> {
    generation: GenerationIndex,
    cohort: &'a Cohort<'a>,
    stream: &'a ObstacleStream,
}

impl<'a> TickSnapshot<'a> {
    pub(crate) fn new(
        generation: GenerationIndex,
        cohort: &'a Cohort<'a>,
        stream: &'a ObstacleStream,
    ) -> Self {
        Self {
            generation,
            cohort,
            stream,
        }
    }

    #[must_use]
    pub fn generation(&self) -> GenerationIndex {
        self.generation
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.cohort.tick_count()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.cohort.score()
    }

    #[must_use]
    pub fn live_agents(&self) -> usize {
        self.cohort.len()
    }

    /// Live runners in cohort order, with the candidate each one belongs to.
    pub fn agents(&self) -> impl Iterator<Item = (CandidateId, &'a Agent)> + 'a {
        self.cohort
            .members()
            .iter()
            .map(|member| (member.id(), member.agent()))
    }

    #[must_use]
    pub fn obstacle_groups(&self) -> &'a [ObstacleGroup] {
        self.stream.groups()
    }
}

/// Receives a [`TickSnapshot`] after every tick.
///
/// Returning [`ControlFlow::Break`] stops the evaluation immediately.
pub trait TickObserver {
    fn observe(&mut self, snapshot: &TickSnapshot<'_>) -> ControlFlow<()>;
}

impl<F> TickObserver for F
where
    F: FnMut(&TickSnapshot<'_>) -> ControlFlow<()>,
{
    fn observe(&mut self, snapshot: &TickSnapshot<'_>) -> ControlFlow<()> {
        self(snapshot)
    }
}

/// Observer that never looks and never stops the evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unobserved;

impl TickObserver for Unobserved {
    fn observe(&mut self, _snapshot: &TickSnapshot<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
