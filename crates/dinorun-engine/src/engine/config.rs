use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::kinematics::KinematicsParams};

use super::{fitness::FitnessShaping, obstacle_stream::TrackParams};

/// Everything that defines the environment a cohort is evaluated in.
///
/// The defaults are the tuned values the environment was designed around;
/// changing any of them changes the fitness landscape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Horizontal position shared by every runner.
    pub agent_x: i32,
    pub kinematics: KinematicsParams,
    pub track: TrackParams,
    pub fitness: FitnessShaping,
    /// A runner jumps when its policy output is strictly above this value.
    pub jump_threshold: f32,
    /// Evaluation stops once this many obstacle groups have been passed.
    pub score_cap: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agent_x: 200,
            kinematics: KinematicsParams::DEFAULT,
            track: TrackParams::default(),
            fitness: FitnessShaping::DEFAULT,
            jump_threshold: 0.5,
            score_cap: 30,
        }
    }
}

impl SimulationConfig {
    /// Checks the settings the tick loop relies on to make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.track.initial_layout;
        if layout.is_empty() {
            return Err(ConfigError::EmptyInitialLayout);
        }
        if !layout.is_sorted() {
            return Err(ConfigError::UnsortedInitialLayout);
        }
        if self.track.scroll_velocity <= 0 {
            return Err(ConfigError::NonPositiveScrollVelocity(
                self.track.scroll_velocity,
            ));
        }
        if self.track.spawn_gap <= 0 {
            return Err(ConfigError::NonPositiveSpawnGap(self.track.spawn_gap));
        }
        // Groups are dropped once they leave the track, which must not happen
        // before the reference runner has passed them.
        if self.agent_x < 0 {
            return Err(ConfigError::NegativeAgentX(self.agent_x));
        }
        if self.score_cap == 0 {
            return Err(ConfigError::ZeroScoreCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_broken_tracks() {
        let mut config = SimulationConfig::default();
        config.track.initial_layout.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyInitialLayout));

        let mut config = SimulationConfig::default();
        config.track.initial_layout = vec![1000, 600];
        assert_eq!(config.validate(), Err(ConfigError::UnsortedInitialLayout));

        let mut config = SimulationConfig::default();
        config.track.scroll_velocity = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveScrollVelocity(0))
        );

        let mut config = SimulationConfig::default();
        config.score_cap = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroScoreCap));
    }

    #[test]
    fn test_rejects_spawn_gap_that_breaks_track_order() {
        let mut config = SimulationConfig::default();
        config.track.spawn_gap = 0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveSpawnGap(0)));
        config.track.spawn_gap = -50;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveSpawnGap(-50)));
        config.track.spawn_gap = 1;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_runner_left_of_track() {
        let mut config = SimulationConfig::default();
        config.agent_x = -200;
        assert_eq!(config.validate(), Err(ConfigError::NegativeAgentX(-200)));
        config.agent_x = 0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
