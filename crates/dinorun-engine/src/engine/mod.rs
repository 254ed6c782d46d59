//! Cohort simulation and the generation controller.
//!
//! - [`Cohort`] - the runners evaluated together, each with its own [`Policy`]
//!   and [`FitnessAccumulator`]
//! - [`ObstacleStream`] - the shared, seeded stream of obstacle groups
//! - [`SimulationConfig`] - every tunable of the environment
//! - [`evaluate_generation`] / [`replay`] - run a cohort to termination
//! - [`TickObserver`] - per-tick read-only access for renderers and traces
//!
//! # Tick Order
//!
//! One tick of [`Cohort::tick`] runs these phases in order:
//!
//! 1. Every live runner's policy decides on the pre-tick state.
//! 2. Runners move; each one that moved earns the survival reward.
//! 3. The obstacle stream scrolls.
//! 4. Collided runners are penalized once; the reference runner (the first
//!    live one) marks groups it has left behind.
//! 5. Collided and faulted runners are removed in one batch.
//! 6. If a group was passed, the score goes up, survivors earn the pass
//!    reward and a new group spawns behind the last one.
//! 7. Groups that scrolled off the track are dropped.
//!
//! The evaluation ends when no runner is left or the score cap is reached.

pub use self::{
    cohort::*, config::*, fitness::*, generation::*, obstacle_stream::*, policy::*, snapshot::*,
};

mod cohort;
mod config;
mod fitness;
mod generation;
mod obstacle_stream;
mod policy;
mod snapshot;

#[cfg(test)]
mod test_policies;
