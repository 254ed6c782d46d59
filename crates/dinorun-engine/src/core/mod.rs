//! Geometry and motion of a single runner and a single obstacle group.
//!
//! - [`kinematics`] - vertical motion law and the [`Agent`] it drives
//! - [`obstacle`] - [`ObstacleGroup`] and its segment layout
//! - [`overlap`] - runner-versus-group collision test
//! - [`mask`] / [`shape`] - per-pixel collision masks and the shapes built from them

pub use self::{kinematics::*, mask::*, obstacle::*, overlap::*};

pub mod kinematics;
pub mod mask;
pub mod obstacle;
pub mod overlap;
pub mod shape;
