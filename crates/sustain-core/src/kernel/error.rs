//! # Sustain Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] type and the [`Result`] alias used by the
//! loader, the resolver pipeline and every resolver implementation.
//!
//! Subsystems keep their own error enums ([`RepositoryError`],
//! [`ConfigError`]) and convert into [`Error`] through `#[from]` variants.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::ConfigError;
use crate::repository::RepositoryError;
use crate::resolver::ResolverPhase;

/// Errors raised by the component loader and its resolvers
#[derive(Debug, ThisError)]
pub enum Error {
    /// A regular component (neither aggregating nor plain) has no resource to load from.
    #[error("The component '{component}' has no resource to load from")]
    MissingResource { component: String },

    /// A component id handed to a query could not be resolved by the repository.
    #[error("The component '{id}' {reason}")]
    InvalidReference {
        id: String,
        reason: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// The main component cannot be resolved yet.
    #[error("The system is not ready to access the main application: {message}")]
    NotReady {
        message: String,
        #[source]
        source: Option<RepositoryError>,
    },

    /// Failure reported by a resolver while working on a component.
    #[error("Resolver '{resolver}' failed during {phase} of component '{component}': {message}")]
    ResolverFailure {
        resolver: String,
        phase: ResolverPhase,
        component: String,
        message: String,
    },

    /// A resolver with the same name is already registered.
    #[error("A feature resolver named '{resolver}' is already registered")]
    DuplicateResolver { resolver: String },

    /// A resolver was bound to a loader context a second time.
    #[error("Feature resolver '{resolver}' is already bound to a component context")]
    AlreadyBound { resolver: String },

    /// A resolver needed its context but was never bound, or the loader is gone.
    #[error("Feature resolver '{resolver}' has no live component context")]
    ContextUnavailable { resolver: String },

    /// Loader configuration failure.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Helper for resolvers reporting a failed phase.
    pub fn resolver_failure(
        resolver: impl Into<String>,
        phase: ResolverPhase,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::ResolverFailure {
            resolver: resolver.into(),
            phase,
            component: component.into(),
            message: message.into(),
        }
    }
}
