use thiserror::Error;

/// Top-level error type for the Polisbot intake runtime.
///
/// None of these variants is fatal to the process: each is scoped to one
/// user interaction and the session machine maps it to a fixed user-facing
/// message while leaving the session in a well-defined state.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("collaborator error ({provider}): {message}")]
    Collaborator { provider: String, message: String },

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
