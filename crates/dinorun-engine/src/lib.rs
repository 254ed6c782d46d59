//! Deterministic side-scrolling runner environment for neuro-evolution.
//!
//! A cohort of runners, each driven by its own [`Policy`], races against one
//! shared stream of obstacle groups. Every tick the runners decide whether to
//! jump, move, and are tested for collisions; the fitness they accumulate is
//! handed back to the optimizer once the cohort terminates.
//!
//! - [`core`] - runner kinematics, obstacle groups and collision masks
//! - [`engine`] - cohort simulation, obstacle stream and generation controller

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("track has no initial obstacle groups")]
    EmptyInitialLayout,
    #[display("initial obstacle positions are not sorted left to right")]
    UnsortedInitialLayout,
    #[display("scroll velocity must be positive, got {_0}")]
    NonPositiveScrollVelocity(#[error(not(source))] i32),
    #[display("spawn gap must be positive, got {_0}")]
    NonPositiveSpawnGap(#[error(not(source))] i32),
    #[display("runner position must not be left of the track, got {_0}")]
    NegativeAgentX(#[error(not(source))] i32),
    #[display("score cap must be at least 1")]
    ZeroScoreCap,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GenerationError {
    #[display("generation {generation} has no candidates")]
    #[from(ignore)]
    EmptyPopulation { generation: GenerationIndex },
    #[display("generation {generation} aborted at tick {tick}")]
    #[from(ignore)]
    Aborted { generation: GenerationIndex, tick: u64 },
    #[display("invalid simulation config")]
    InvalidConfig(ConfigError),
}
