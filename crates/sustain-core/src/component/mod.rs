//! # Sustain Core Component Model
//!
//! The graph nodes the loader works on. Components are owned by a
//! [`ComponentRepository`](crate::repository::ComponentRepository); the loader only
//! follows the references a component exposes.
//!
//! - **[`Component`]**: identity, optional parent, ordered dependencies, the
//!   `aggregating`/`plain` mode flags, the deployable resource and the two
//!   slots (execution realm, application handle) filled in during resolution.
//! - **[`ComponentResource`]**: the artifact backing a regular component.
//! - **[`ExecutionRealm`] / [`AppContext`]**: opaque host handles. The loader stores
//!   and returns them but never looks inside.
//! - **[`descriptor`]** and **[`resource`]**: ready-made implementations of the
//!   contracts above.
pub mod descriptor;
pub mod resource;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use descriptor::ComponentDescriptor;
pub use resource::{DirectoryResource, MemoryResource};

/// Shared reference to a component in the graph
pub type ComponentRef = Arc<dyn Component>;

/// Type-erased payload carried by the opaque handles
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A deployable unit in the dependency/parent graph
pub trait Component: Send + Sync + fmt::Debug {
    /// Unique identifier of the component
    fn id(&self) -> &str;

    /// The component this one is grouped under, if any
    fn parent(&self) -> Option<ComponentRef>;

    /// Components this one depends on, in declaration order
    fn depended_components(&self) -> Vec<ComponentRef>;

    /// Pure grouping node without a runtime artifact of its own
    fn is_aggregating(&self) -> bool;

    /// Component that needs no feature resolution
    fn is_plain(&self) -> bool;

    /// The artifact backing this component. Required for regular components.
    fn resource(&self) -> Option<Arc<dyn ComponentResource>>;

    /// Execution realm assigned during resolution
    fn realm(&self) -> Option<ExecutionRealm>;

    /// Assign or clear the execution realm
    fn set_realm(&self, realm: Option<ExecutionRealm>);

    /// Application handle assigned during resolution
    fn application(&self) -> Option<AppContext>;

    /// Assign or clear the application handle
    fn set_application(&self, application: Option<AppContext>);
}

/// The deployable artifact of a component
pub trait ComponentResource: Send + Sync + fmt::Debug {
    /// Human readable location of the artifact
    fn location(&self) -> &str;

    /// Whether the artifact contains the given entry
    fn contains(&self, entry: &str) -> bool;
}

/// Opaque isolated code-loading handle of one component
#[derive(Clone)]
pub struct ExecutionRealm {
    owner: String,
    payload: Payload,
}

impl ExecutionRealm {
    /// Wrap a host value as the realm of `owner`
    pub fn new<T: Any + Send + Sync>(owner: impl Into<String>, payload: T) -> Self {
        Self::from_shared(owner, Arc::new(payload))
    }

    /// Wrap an already shared host value
    pub fn from_shared(owner: impl Into<String>, payload: Payload) -> Self {
        Self { owner: owner.into(), payload }
    }

    /// Id of the component this realm belongs to
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Downcast the host value
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether both handles wrap the same host value
    pub fn same_as(&self, other: &ExecutionRealm) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for ExecutionRealm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionRealm")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Opaque application (or service) context handle of one component
#[derive(Clone)]
pub struct AppContext {
    owner: String,
    payload: Payload,
}

impl AppContext {
    /// Wrap a host value as an application context of `owner`
    pub fn new<T: Any + Send + Sync>(owner: impl Into<String>, payload: T) -> Self {
        Self::from_shared(owner, Arc::new(payload))
    }

    /// Wrap an already shared host value
    pub fn from_shared(owner: impl Into<String>, payload: Payload) -> Self {
        Self { owner: owner.into(), payload }
    }

    /// Id of the component this context belongs to
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Downcast the host value
    pub fn payload<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether both handles wrap the same host value
    pub fn same_as(&self, other: &AppContext) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
