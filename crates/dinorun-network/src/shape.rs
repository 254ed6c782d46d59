use std::iter;

use serde::{Deserialize, Serialize};

use dinorun_engine::{ACTION_LEN, OBSERVATION_LEN};

use crate::NetworkError;

/// Layer sizes of a feed-forward network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    pub inputs: usize,
    pub hidden: Vec<usize>,
    pub outputs: usize,
}

impl NetworkShape {
    #[must_use]
    pub fn new(inputs: usize, hidden: Vec<usize>, outputs: usize) -> Self {
        Self {
            inputs,
            hidden,
            outputs,
        }
    }

    /// Shape that maps a runner observation to a runner action.
    #[must_use]
    pub fn for_policy(hidden: Vec<usize>) -> Self {
        Self::new(OBSERVATION_LEN, hidden, ACTION_LEN)
    }

    fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        iter::once(self.inputs)
            .chain(self.hidden.iter().copied())
            .chain(iter::once(self.outputs))
    }

    /// `(fan_in, fan_out)` of every weight layer, input side first.
    pub fn layers(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes().zip(self.sizes().skip(1))
    }

    /// Number of weight layers, including the output layer.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.hidden.len() + 1
    }

    /// Number of genes, biases included.
    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.layers()
            .map(|(fan_in, fan_out)| (fan_in + 1) * fan_out)
            .sum()
    }

    /// Rejects shapes with a zero-sized layer.
    ///
    /// Layer indices count the input layer as 0.
    pub fn validate(&self) -> Result<(), NetworkError> {
        match self.sizes().enumerate().find(|&(_, size)| size == 0) {
            Some((index, _)) => Err(NetworkError::EmptyLayer { index }),
            None => Ok(()),
        }
    }
}
