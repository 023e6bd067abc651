//! Domain layer: literals, condition sets, the environment and tree entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod conditions;
pub mod entities;
pub mod environment;
pub mod error;
pub mod ids;
pub mod literal;
pub mod rng;

pub use conditions::{intersect_across_alternatives, union_across_parallel, ConditionSet};
pub use entities::*;
pub use environment::{EnvironmentModel, VariableSelection};
pub use error::{DomainError, DomainResult};
pub use ids::IdAllocator;
pub use literal::Literal;
pub use rng::SeededRng;
