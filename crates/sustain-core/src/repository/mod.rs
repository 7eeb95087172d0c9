//! # Sustain Core Component Repository
//!
//! The repository owns the component graph. The loader consumes it through the
//! [`ComponentRepository`] trait to resolve ids, to order components by their
//! dependencies and to find the designated main component.
//!
//! [`InMemoryRepository`] is a complete in-process implementation.
pub mod error;
pub mod memory;

pub use error::RepositoryError;
pub use memory::InMemoryRepository;

use crate::component::ComponentRef;

/// Source of component descriptors and graph ordering
pub trait ComponentRepository: Send + Sync {
    /// Resolve a component by id
    fn resolve_component(&self, id: &str) -> std::result::Result<ComponentRef, RepositoryError>;

    /// Order components in place so that dependencies (and parents) come before
    /// the components that need them
    fn sort_components(&self, components: &mut Vec<ComponentRef>);

    /// Id of the component hosting the main application, once known
    fn main_component_id(&self) -> Option<String>;
}
