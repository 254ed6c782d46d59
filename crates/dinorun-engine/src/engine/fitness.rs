use serde::{Deserialize, Serialize};

/// Reward and penalty amounts.
///
/// These three rules are the whole fitness function:
///
/// - every tick a runner survives earns `survival_reward`,
/// - a runner that collides loses `collision_penalty` once, then leaves the cohort,
/// - whenever an obstacle group is passed, every live runner earns `pass_reward`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessShaping {
    pub survival_reward: f32,
    pub collision_penalty: f32,
    pub pass_reward: f32,
}

impl FitnessShaping {
    pub const DEFAULT: Self = Self {
        survival_reward: 0.1,
        collision_penalty: 1.0,
        pass_reward: 5.0,
    };
}

impl Default for FitnessShaping {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fitness earned by one runner during one evaluation.
///
/// Besides the running total, the counters behind it are kept so that the
/// total can always be explained:
///
/// ```text
/// total = survival_reward × ticks_survived
///       - collision_penalty × (collided as 0/1)
///       + pass_reward × pass_events
/// ```
///
/// # Example
///
/// ```
/// use dinorun_engine::{FitnessAccumulator, FitnessShaping};
///
/// let shaping = FitnessShaping::DEFAULT;
/// let mut fitness = FitnessAccumulator::new();
/// fitness.reward_survival(&shaping);
/// fitness.reward_pass(&shaping);
/// fitness.penalize_collision(&shaping);
///
/// assert_eq!(fitness.ticks_survived(), 1);
/// assert_eq!(fitness.pass_events(), 1);
/// assert!(fitness.is_collided());
/// assert!((fitness.total() - 4.1).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessAccumulator {
    total: f32,
    ticks_survived: u32,
    pass_events: u32,
    collided: bool,
}

impl FitnessAccumulator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total: 0.0,
            ticks_survived: 0,
            pass_events: 0,
            collided: false,
        }
    }

    #[must_use]
    pub const fn total(&self) -> f32 {
        self.total
    }

    #[must_use]
    pub const fn ticks_survived(&self) -> u32 {
        self.ticks_survived
    }

    #[must_use]
    pub const fn pass_events(&self) -> u32 {
        self.pass_events
    }

    #[must_use]
    pub const fn is_collided(&self) -> bool {
        self.collided
    }

    pub fn reward_survival(&mut self, shaping: &FitnessShaping) {
        self.ticks_survived += 1;
        self.total += shaping.survival_reward;
    }

    /// Applies the collision penalty. Repeated calls have no further effect.
    pub fn penalize_collision(&mut self, shaping: &FitnessShaping) {
        if self.collided {
            return;
        }
        self.collided = true;
        self.total -= shaping.collision_penalty;
    }

    pub fn reward_pass(&mut self, shaping: &FitnessShaping) {
        self.pass_events += 1;
        self.total += shaping.pass_reward;
    }

    /// Recomputes the total from the counters, without accumulated rounding.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected_total(&self, shaping: &FitnessShaping) -> f32 {
        let collided = if self.collided { 1.0 } else { 0.0 };
        shaping.survival_reward * self.ticks_survived as f32 - shaping.collision_penalty * collided
            + shaping.pass_reward * self.pass_events as f32
    }
}
