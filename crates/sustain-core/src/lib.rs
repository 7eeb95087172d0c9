//! # Sustain Core
//!
//! Component runtime core: loads components in dependency order and runs each one
//! through a pipeline of pluggable feature resolvers, then tears them down again.
//!
//! - **[`kernel`]**: crate-wide errors and constants.
//! - **[`component`]**: the component contract and opaque host handles.
//! - **[`repository`]**: where components come from and how they are ordered.
//! - **[`feature`]**: per-component feature storage.
//! - **[`resolver`]**: the resolver contract, orderings and the built-ins.
//! - **[`service`]**: services exported by loaded components.
//! - **[`loader`]**: the orchestrator.
//! - **[`config`]**: resolver order overrides.
pub mod component;
pub mod config;
pub mod feature;
pub mod kernel;
pub mod loader;
pub mod repository;
pub mod resolver;
pub mod service;

// Re-export key public types/traits
pub use component::{AppContext, Component, ComponentDescriptor, ComponentRef, ComponentResource, ExecutionRealm};
pub use config::{ConfigFormat, LoaderConfig};
pub use feature::{FeatureEntry, FeatureValue, Features};
pub use kernel::error::Error as KernelError;
pub use kernel::{Error, Result};
pub use loader::{ComponentContext, ComponentContextExt, ComponentLoader, DefaultComponentLoader};
pub use repository::{ComponentRepository, InMemoryRepository, RepositoryError};
pub use resolver::{FeatureResolver, ResolverPhase};
pub use service::{DefaultServiceRegistry, ServiceRegistry};

#[cfg(test)]
mod tests;
