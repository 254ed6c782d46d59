use serde::{Deserialize, Serialize};

use super::{mask::CollisionMask, shape};

/// Constants of the vertical motion law.
///
/// The vertical axis grows downward: "up" is numerically smaller, and
/// `ground_level` is the largest vertical position a runner may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsParams {
    pub ground_level: f32,
    pub acceleration: f32,
    /// Largest downward displacement applied in a single tick.
    pub max_fall_displacement: f32,
    /// Extra upward displacement added on every ascending tick.
    pub ascent_bias: f32,
    pub jump_velocity: f32,
}

impl KinematicsParams {
    pub const DEFAULT: Self = Self {
        ground_level: 282.5,
        acceleration: 1.5,
        max_fall_displacement: 16.0,
        ascent_bias: 2.0,
        jump_velocity: -9.0,
    };
}

impl Default for KinematicsParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Vertical displacement for one tick.
///
/// `s = v·t + ½·a·t²`, capped at `max_fall_displacement`, with `ascent_bias`
/// subtracted whenever the result is negative (ascending).
///
/// # Example
///
/// ```
/// use dinorun_engine::{KinematicsParams, kinematics};
///
/// let params = KinematicsParams::DEFAULT;
/// assert_eq!(kinematics::displacement(0.0, 1, &params), 0.75);
/// assert_eq!(kinematics::displacement(-9.0, 1, &params), -10.25);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn displacement(velocity: f32, ticks: u32, params: &KinematicsParams) -> f32 {
    let t = ticks as f32;
    let mut displacement = velocity * t + 0.5 * params.acceleration * t * t;
    if displacement >= params.max_fall_displacement {
        displacement = params.max_fall_displacement;
    }
    if displacement < 0.0 {
        displacement -= params.ascent_bias;
    }
    displacement
}

/// One runner of the cohort.
///
/// The horizontal position is fixed at creation; only the vertical state
/// changes, through [`Agent::advance`] and [`Agent::jump`].
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    x: i32,
    y: f32,
    velocity: f32,
    ticks_since_jump: u32,
    airborne: bool,
}

impl Agent {
    /// Creates a runner standing on the ground at horizontal position `x`.
    #[must_use]
    pub fn new(x: i32, params: &KinematicsParams) -> Self {
        Self {
            x,
            y: params.ground_level,
            velocity: 0.0,
            ticks_since_jump: 0,
            airborne: false,
        }
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[must_use]
    pub fn ticks_since_jump(&self) -> u32 {
        self.ticks_since_jump
    }

    #[must_use]
    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    #[must_use]
    pub fn mask(&self) -> &'static CollisionMask {
        shape::agent_mask()
    }

    /// Vertical position rounded to the pixel grid used by collision tests.
    ///
    /// Halves round to even, so a grounded runner at 282.5 sits on row 282.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn pixel_y(&self) -> i32 {
        self.y.round_ties_even() as i32
    }

    /// Starts a jump.
    ///
    /// Does nothing while airborne. Returns whether the jump started.
    pub fn jump(&mut self, params: &KinematicsParams) -> bool {
        if self.airborne {
            return false;
        }
        self.ticks_since_jump = 0;
        self.velocity = params.jump_velocity;
        true
    }

    /// Integrates one tick of vertical motion.
    pub fn advance(&mut self, params: &KinematicsParams) {
        self.ticks_since_jump += 1;
        self.y += displacement(self.velocity, self.ticks_since_jump, params);
        if self.y >= params.ground_level {
            self.y = params.ground_level;
            self.airborne = false;
        } else {
            self.airborne = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: KinematicsParams = KinematicsParams::DEFAULT;

    #[test]
    fn test_displacement_from_rest() {
        assert!((displacement(0.0, 1, &PARAMS) - 0.75).abs() < 1e-6);
        assert!((displacement(0.0, 2, &PARAMS) - 3.0).abs() < 1e-6);
        // Capped at the fall limit.
        assert!((displacement(0.0, 10, &PARAMS) - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_displacement_ascending_gets_bias() {
        // -9 + 0.75 = -8.25, minus the ascent bias of 2.
        assert!((displacement(-9.0, 1, &PARAMS) - -10.25).abs() < 1e-6);
        // -18 + 3 = -15 -> -17
        assert!((displacement(-9.0, 2, &PARAMS) - -17.0).abs() < 1e-6);
        // Exactly zero is not ascending.
        assert!(displacement(-9.0, 12, &PARAMS).abs() < 1e-6);
    }

    #[test]
    fn test_new_agent_stands_on_ground() {
        let agent = Agent::new(200, &PARAMS);
        assert_eq!(agent.x(), 200);
        assert!((agent.y() - PARAMS.ground_level).abs() < f32::EPSILON);
        assert!(agent.velocity().abs() < f32::EPSILON);
        assert!(!agent.is_airborne());
    }

    #[test]
    fn test_pixel_y_rounds_halves_to_even() {
        assert_eq!(Agent::new(200, &PARAMS).pixel_y(), 282);

        let mut agent = Agent::new(200, &PARAMS);
        agent.jump(&PARAMS);
        agent.advance(&PARAMS);
        // 272.25
        assert_eq!(agent.pixel_y(), 272);

        let params = KinematicsParams {
            ground_level: 283.5,
            ..PARAMS
        };
        assert_eq!(Agent::new(200, &params).pixel_y(), 284);
    }

    #[test]
    fn test_grounded_agent_stays_clamped() {
        let mut agent = Agent::new(200, &PARAMS);
        for _ in 0..50 {
            agent.advance(&PARAMS);
            assert!(agent.y() <= PARAMS.ground_level);
            assert!((agent.y() - PARAMS.ground_level).abs() < f32::EPSILON);
            assert!(!agent.is_airborne());
        }
    }

    #[test]
    fn test_jump_first_tick_rises_by_10_25() {
        let mut agent = Agent::new(200, &PARAMS);
        assert!(agent.jump(&PARAMS));
        assert_eq!(agent.ticks_since_jump(), 0);
        assert!((agent.velocity() - -9.0).abs() < f32::EPSILON);

        agent.advance(&PARAMS);
        assert!((agent.y() - (PARAMS.ground_level - 10.25)).abs() < 1e-4);
        assert!(agent.is_airborne());
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let mut agent = Agent::new(200, &PARAMS);
        agent.jump(&PARAMS);
        agent.advance(&PARAMS);
        agent.advance(&PARAMS);
        let before = agent.clone();

        assert!(!agent.jump(&PARAMS));
        assert_eq!(agent, before);
    }

    #[test]
    fn test_full_jump_arc_lands_and_keeps_invariants() {
        let mut agent = Agent::new(200, &PARAMS);
        agent.jump(&PARAMS);
        let mut apex = PARAMS.ground_level;
        let mut landed_after = None;
        for tick in 1..=60 {
            agent.advance(&PARAMS);
            apex = apex.min(agent.y());
            assert!(agent.y() <= PARAMS.ground_level);
            let on_ground = (agent.y() - PARAMS.ground_level).abs() < f32::EPSILON;
            assert_eq!(agent.is_airborne(), !on_ground);
            if on_ground && landed_after.is_none() {
                landed_after = Some(tick);
            }
        }
        // Rises 236.5 over the first 11 ticks.
        assert!((apex - (PARAMS.ground_level - 236.5)).abs() < 1e-3);
        assert!(landed_after.is_some_and(|t| t > 12));
        // Jumping works again once landed.
        assert!(agent.jump(&PARAMS));
    }
}
