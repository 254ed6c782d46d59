use std::fmt;

use crate::core::{kinematics::Agent, obstacle::ObstacleGroup};

/// Number of values in an [`Observation`] vector.
pub const OBSERVATION_LEN: usize = 3;
/// Number of values a policy must return.
pub const ACTION_LEN: usize = 1;

/// Maps an observation vector to an action vector.
///
/// This is the only thing the simulation needs from a controller. Any
/// network, scripted bot, or test double can drive a runner by implementing
/// it.
pub trait Policy: fmt::Debug {
    /// Computes the action for `observation` (always [`OBSERVATION_LEN`] values).
    fn activate(&mut self, observation: &[f32]) -> Result<Vec<f32>, PolicyError>;
}

pub type BoxedPolicy<'a> = Box<dyn Policy + 'a>;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PolicyError {
    #[display("policy returned {actual} values, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[display("policy returned non-finite value {value} at index {index}")]
    NonFinite { index: usize, value: f32 },
    #[display("policy failed: {message}")]
    Failed {
        #[error(not(source))]
        message: String,
    },
}

/// What a runner sees before deciding to jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Vertical position of the runner.
    pub vertical_position: f32,
    /// Horizontal distance from the reference runner to the leading segment of the next group.
    pub obstacle_distance: f32,
    /// Segment count of the next group.
    pub obstacle_segments: f32,
}

impl Observation {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(agent: &Agent, reference_x: i32, upcoming: &ObstacleGroup) -> Self {
        Self {
            vertical_position: agent.y(),
            obstacle_distance: (upcoming.leading_x() - reference_x) as f32,
            obstacle_segments: upcoming.variant().segment_count() as f32,
        }
    }

    #[must_use]
    pub fn to_array(self) -> [f32; OBSERVATION_LEN] {
        [
            self.vertical_position,
            self.obstacle_distance,
            self.obstacle_segments,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Decision {
    Jump,
    Stay,
}

/// Asks `policy` for an action and turns it into a [`Decision`].
///
/// The action must hold exactly [`ACTION_LEN`] finite values; the runner
/// jumps when the first one is above `jump_threshold`.
pub fn decide<P>(
    policy: &mut P,
    observation: Observation,
    jump_threshold: f32,
) -> Result<Decision, PolicyError>
where
    P: Policy + ?Sized,
{
    let action = policy.activate(&observation.to_array())?;
    if action.len() != ACTION_LEN {
        return Err(PolicyError::ShapeMismatch {
            expected: ACTION_LEN,
            actual: action.len(),
        });
    }
    if let Some((index, &value)) = action.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(PolicyError::NonFinite { index, value });
    }
    if action[0] > jump_threshold {
        Ok(Decision::Jump)
    } else {
        Ok(Decision::Stay)
    }
}
