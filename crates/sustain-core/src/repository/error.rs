//! # Sustain Core Repository Errors
//!
//! Errors raised while resolving components from a
//! [`ComponentRepository`](super::ComponentRepository).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No component with this id is known
    #[error("Component not found: {0}")]
    NotFound(String),

    /// The id is malformed
    #[error("Invalid component name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A component with this id is already registered
    #[error("Component already registered: {0}")]
    AlreadyRegistered(String),
}
