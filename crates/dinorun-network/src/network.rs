use serde::{Deserialize, Serialize};

use dinorun_engine::{Policy, PolicyError};

use crate::{NetworkError, NetworkShape};

/// A feed-forward network with a fixed topology and flat gene storage.
///
/// Deserialization re-validates the gene count against the shape, so a
/// loaded network is always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork", into = "RawNetwork")]
pub struct FeedForwardNetwork {
    shape: NetworkShape,
    genes: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct RawNetwork {
    shape: NetworkShape,
    genes: Vec<f32>,
}

impl TryFrom<RawNetwork> for FeedForwardNetwork {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        Self::from_genes(raw.shape, raw.genes)
    }
}

impl From<FeedForwardNetwork> for RawNetwork {
    fn from(network: FeedForwardNetwork) -> Self {
        Self {
            shape: network.shape,
            genes: network.genes,
        }
    }
}

impl FeedForwardNetwork {
    pub fn from_genes(shape: NetworkShape, genes: Vec<f32>) -> Result<Self, NetworkError> {
        shape.validate()?;
        let expected = shape.gene_count();
        if genes.len() != expected {
            return Err(NetworkError::GeneCountMismatch {
                expected,
                actual: genes.len(),
            });
        }
        Ok(Self { shape, genes })
    }

    #[must_use]
    pub fn shape(&self) -> &NetworkShape {
        &self.shape
    }

    #[must_use]
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    /// Propagates `inputs` through every layer.
    pub fn forward(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.shape.inputs {
            return Err(NetworkError::InputMismatch {
                expected: self.shape.inputs,
                actual: inputs.len(),
            });
        }

        let output_layer = self.shape.layer_count() - 1;
        let mut values = inputs.to_vec();
        let mut genes = self.genes.as_slice();
        for (index, (fan_in, fan_out)) in self.shape.layers().enumerate() {
            let (layer, rest) = genes.split_at((fan_in + 1) * fan_out);
            genes = rest;
            let activation = if index == output_layer { sigmoid } else { f32::tanh };
            values = layer
                .chunks_exact(fan_in + 1)
                .map(|neuron| {
                    let (weights, bias) = neuron.split_at(fan_in);
                    let sum: f32 = weights.iter().zip(&values).map(|(w, v)| w * v).sum();
                    activation(sum + bias[0])
                })
                .collect();
        }
        Ok(values)
    }
}

impl Policy for FeedForwardNetwork {
    fn activate(&mut self, observation: &[f32]) -> Result<Vec<f32>, PolicyError> {
        self.forward(observation)
            .map_err(|err| PolicyError::Failed {
                message: err.to_string(),
            })
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
