//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the generation rules.
/// These are independent of configuration sources and I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot select {selected} relevant variables out of {total}")]
    SelectionExceedsVariables { selected: usize, total: usize },

    #[error("no eligible {pool} left while building {node}")]
    EmptyPool { pool: &'static str, node: String },

    #[error(
        "{goals} subgoal(s) do not fit into {positions} interior position(s) of plan {plan}"
    )]
    InsufficientInteriorPositions {
        goals: usize,
        positions: usize,
        plan: String,
    },

    #[error("parallel branches both target proposition {id}")]
    ParallelConflict { id: String },

    #[error("condition set holds both polarities of {id}")]
    InconsistentConditions { id: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
