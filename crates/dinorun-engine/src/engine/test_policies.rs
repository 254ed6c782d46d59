//! Scripted policies shared by the engine tests.

use super::policy::{Policy, PolicyError};

#[derive(Debug)]
pub(crate) struct NeverJump;

impl Policy for NeverJump {
    fn activate(&mut self, _observation: &[f32]) -> Result<Vec<f32>, PolicyError> {
        Ok(vec![0.0])
    }
}

#[derive(Debug)]
pub(crate) struct AlwaysJump;

impl Policy for AlwaysJump {
    fn activate(&mut self, _observation: &[f32]) -> Result<Vec<f32>, PolicyError> {
        Ok(vec![1.0])
    }
}

/// Fails on every call.
#[derive(Debug)]
pub(crate) struct Broken;

impl Policy for Broken {
    fn activate(&mut self, _observation: &[f32]) -> Result<Vec<f32>, PolicyError> {
        Err(PolicyError::Failed {
            message: "weights missing".to_owned(),
        })
    }
}

/// Jumps whenever the next obstacle is closer than `distance`.
#[derive(Debug)]
pub(crate) struct JumpWithin {
    pub(crate) distance: f32,
}

impl Policy for JumpWithin {
    fn activate(&mut self, observation: &[f32]) -> Result<Vec<f32>, PolicyError> {
        let jump = observation[1] < self.distance;
        Ok(vec![if jump { 1.0 } else { 0.0 }])
    }
}
