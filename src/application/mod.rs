//! Application layer: parameters, composition policies and the generator
//!
//! This layer orchestrates domain logic; it performs no I/O apart from hashing files.

pub mod composition;
pub mod error;
pub mod generator;
pub mod hash;
pub mod params;

pub use composition::{policy_for, CompositionPolicy, Layout, ParallelPolicy, SequentialPolicy};
pub use error::{ApplicationError, ApplicationResult};
pub use generator::{generate_forest, GoalPlanGenerator};
pub use params::GenerationParams;
