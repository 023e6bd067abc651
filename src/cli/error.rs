//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::CannotCreate { .. } => crate::exitcode::CANTCREAT,
                InfraError::Render(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::InvalidParameter { .. } | ApplicationError::Config { .. } => {
                        crate::exitcode::CONFIG
                    }
                    // parameters that passed validation but cannot be realised
                    ApplicationError::Infeasible { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_invalid_parameter_when_mapping_then_config_exit_code() {
        let err: CliError = ApplicationError::invalid("depth", "must be greater than 0").into();

        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_unwritable_output_when_mapping_then_cantcreat() {
        let err = CliError::Infra(InfraError::CannotCreate {
            path: "/nope/gpt.xml".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });

        assert_eq!(err.exit_code(), crate::exitcode::CANTCREAT);
    }

    #[test]
    fn given_domain_error_when_mapping_then_dataerr() {
        let err: CliError = ApplicationError::from(DomainError::ParallelConflict { id: "EV-1".into() }).into();

        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(CliError::InvalidArgs("x".into()).exit_code(), crate::exitcode::USAGE);
    }
}
