use std::{iter, mem};

use serde::{Deserialize, Serialize};

use crate::core::{kinematics::Agent, overlap};

use super::{
    config::SimulationConfig,
    fitness::FitnessAccumulator,
    obstacle_stream::ObstacleStream,
    policy::{self, BoxedPolicy, Decision, Observation},
};

/// Identifier the optimizer uses for one candidate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("#{_0}")]
pub struct CandidateId(pub usize);

/// Why a runner left the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum RemovalCause {
    #[display("collided")]
    Collided,
    /// The policy failed to produce a usable action; handled like a collision.
    #[display("faulted")]
    Faulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Termination {
    #[display("cohort extinct")]
    Extinct,
    #[display("score cap reached")]
    ScoreCap,
}

/// A runner together with the policy driving it and the fitness it earned.
///
/// Keeping the three in one value means they can only ever be removed together.
#[derive(Debug)]
pub struct CohortMember<'p> {
    slot: usize,
    id: CandidateId,
    agent: Agent,
    policy: BoxedPolicy<'p>,
    fitness: FitnessAccumulator,
}

impl CohortMember<'_> {
    #[must_use]
    pub fn id(&self) -> CandidateId {
        self.id
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    #[must_use]
    pub fn fitness(&self) -> &FitnessAccumulator {
        &self.fitness
    }

    fn into_outcome(self, removal: Option<RemovalCause>) -> CandidateOutcome {
        CandidateOutcome {
            slot: self.slot,
            id: self.id,
            fitness: self.fitness,
            removal,
        }
    }
}

/// Final state of one candidate after its cohort terminated.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOutcome {
    pub(crate) slot: usize,
    pub id: CandidateId,
    pub fitness: FitnessAccumulator,
    /// `None` if the runner was still alive when the cohort terminated.
    pub removal: Option<RemovalCause>,
}

/// What happened during one call of [`Cohort::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub removed: usize,
    pub pass_event: bool,
    pub termination: Option<Termination>,
}

/// The runners evaluated together against one obstacle stream.
///
/// Runners keep the order they were created in; removals never reorder the
/// survivors. The first live runner is the reference runner: its position
/// decides when a group counts as passed and anchors the obstacle distance
/// in every observation.
#[derive(Debug)]
pub struct Cohort<'p> {
    members: Vec<CohortMember<'p>>,
    removed: Vec<CandidateOutcome>,
    score: u32,
    tick: u64,
}

impl<'p> Cohort<'p> {
    /// Creates one grounded runner with zeroed fitness per policy.
    pub fn new<I>(policies: I, config: &SimulationConfig) -> Self
    where
        I: IntoIterator<Item = (CandidateId, BoxedPolicy<'p>)>,
    {
        let members = policies
            .into_iter()
            .enumerate()
            .map(|(slot, (id, policy))| CohortMember {
                slot,
                id,
                agent: Agent::new(config.agent_x, &config.kinematics),
                policy,
                fitness: FitnessAccumulator::new(),
            })
            .collect();
        Self {
            members,
            removed: vec![],
            score: 0,
            tick: 0,
        }
    }

    #[must_use]
    pub fn members(&self) -> &[CohortMember<'p>] {
        &self.members
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.members.iter().map(|member| &member.agent)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of obstacle groups passed so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn termination(&self, config: &SimulationConfig) -> Option<Termination> {
        if self.members.is_empty() {
            Some(Termination::Extinct)
        } else if self.score >= config.score_cap {
            Some(Termination::ScoreCap)
        } else {
            None
        }
    }

    /// Advances every runner and the obstacle stream by one tick.
    ///
    /// 1. Each policy decides on the pre-tick state.
    /// 2. Runners move and earn the survival reward.
    /// 3. The obstacle stream scrolls.
    /// 4. Collisions are detected and penalized; the reference runner checks for passed groups.
    /// 5. Collided and faulted runners leave the cohort in one batch.
    /// 6. A pass event rewards the survivors, bumps the score and spawns a group;
    ///    groups that left the track are dropped.
    ///
    /// Calling this on a terminated cohort does nothing.
    pub fn tick(&mut self, stream: &mut ObstacleStream, config: &SimulationConfig) -> TickOutcome {
        if let Some(termination) = self.termination(config) {
            return TickOutcome {
                termination: Some(termination),
                ..TickOutcome::default()
            };
        }
        self.tick += 1;
        let reference_x = self.members[0].agent.x();
        let mut removals: Vec<Option<RemovalCause>> = vec![None; self.members.len()];

        let upcoming = stream
            .next_unpassed()
            .expect("obstacle stream always has an unpassed group");
        for (member, removal) in iter::zip(&mut self.members, &mut removals) {
            let observation = Observation::new(&member.agent, reference_x, upcoming);
            match policy::decide(member.policy.as_mut(), observation, config.jump_threshold) {
                Ok(Decision::Jump) => {
                    member.agent.jump(&config.kinematics);
                }
                Ok(Decision::Stay) => {}
                Err(_) => *removal = Some(RemovalCause::Faulted),
            }
        }

        for (member, removal) in iter::zip(&mut self.members, &removals) {
            if removal.is_none() {
                member.agent.advance(&config.kinematics);
                member.fitness.reward_survival(&config.fitness);
            }
        }

        stream.scroll();

        for (member, removal) in iter::zip(&self.members, &mut removals) {
            if removal.is_none()
                && stream
                    .groups()
                    .iter()
                    .any(|group| overlap::agent_overlaps_group(&member.agent, group))
            {
                *removal = Some(RemovalCause::Collided);
            }
        }
        for (member, removal) in iter::zip(&mut self.members, &removals) {
            if removal.is_some() {
                member.fitness.penalize_collision(&config.fitness);
            }
        }
        let pass_event = stream.mark_passed(reference_x) > 0;

        let removed = self.remove_marked(removals);

        if pass_event {
            self.score += 1;
            for member in &mut self.members {
                member.fitness.reward_pass(&config.fitness);
            }
        }
        stream.finish_tick(pass_event);

        TickOutcome {
            removed,
            pass_event,
            termination: self.termination(config),
        }
    }

    fn remove_marked(&mut self, removals: Vec<Option<RemovalCause>>) -> usize {
        let mut removed = 0;
        for (member, removal) in iter::zip(mem::take(&mut self.members), removals) {
            match removal {
                Some(cause) => {
                    self.removed.push(member.into_outcome(Some(cause)));
                    removed += 1;
                }
                None => self.members.push(member),
            }
        }
        removed
    }

    /// Outcomes of every candidate, in the order the policies were given.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<CandidateOutcome> {
        let mut outcomes = self.removed;
        outcomes.extend(
            self.members
                .into_iter()
                .map(|member| member.into_outcome(None)),
        );
        outcomes.sort_by_key(|outcome| outcome.slot);
        outcomes
    }
}
