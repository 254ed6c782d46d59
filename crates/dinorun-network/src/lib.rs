//! Fixed-topology feed-forward networks used as runner policies.
//!
//! A network is fully described by its [`NetworkShape`] and a flat gene
//! vector, which is what the optimizer evolves and what model files store.
//!
//! # Gene Layout
//!
//! Layers are stored input side first. Within a layer, each output neuron
//! owns `fan_in` weights followed by one bias:
//!
//! ```text
//! [w(0,0) .. w(0,fan_in-1) b(0)] [w(1,0) .. b(1)] ... next layer ...
//! ```
//!
//! Hidden layers use `tanh`; the output layer uses the logistic sigmoid, so
//! an output of 0.5 is the natural jump threshold.
//!
//! # Example
//!
//! ```
//! use dinorun_engine::Policy as _;
//! use dinorun_network::{FeedForwardNetwork, NetworkShape};
//!
//! let shape = NetworkShape::for_policy(vec![4]);
//! let genes = vec![0.0; shape.gene_count()];
//! let mut network = FeedForwardNetwork::from_genes(shape, genes)?;
//!
//! let action = network.activate(&[282.5, 400.0, 2.0])?;
//! assert_eq!(action, vec![0.5]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{network::*, shape::*};

mod network;
mod shape;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("network needs {expected} genes, got {actual}")]
    GeneCountMismatch { expected: usize, actual: usize },
    #[display("layer {index} has no neurons")]
    EmptyLayer { index: usize },
    #[display("network takes {expected} inputs, got {actual}")]
    InputMismatch { expected: usize, actual: usize },
}
