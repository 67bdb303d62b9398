use thiserror::Error;

/// Failures a use case reports to its caller. Each variant is scoped to a
/// single user interaction.
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Role is still loading")]
    RoleLoading,

    #[error("{0}")]
    External(String, #[source] anyhow::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
