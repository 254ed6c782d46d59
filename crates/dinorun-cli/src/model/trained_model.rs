use std::path::Path;

use chrono::{DateTime, Utc};
use dinorun_engine::{ACTION_LEN, OBSERVATION_LEN, SimulationConfig};
use dinorun_network::FeedForwardNetwork;
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained policy together with the environment it was trained in.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generations: u32,
    pub final_fitness: f32,
    pub network: FeedForwardNetwork,
    pub config: SimulationConfig,
}

impl TrainedModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let model: Self = util::read_json_file("model", path)?;
        model.validate()?;
        Ok(model)
    }

    /// Checks that the network can drive a runner in the stored environment.
    pub fn validate(&self) -> anyhow::Result<()> {
        let shape = self.network.shape();
        anyhow::ensure!(
            shape.inputs == OBSERVATION_LEN && shape.outputs == ACTION_LEN,
            "model network maps {} inputs to {} outputs, expected {OBSERVATION_LEN} to {ACTION_LEN}",
            shape.inputs,
            shape.outputs,
        );
        self.config.validate()?;
        Ok(())
    }
}
