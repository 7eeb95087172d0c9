use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::component::{AppContext, Component, ComponentRef, ComponentResource, ExecutionRealm};

/// Kind of a component, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Needs a resource and runs through the resolver pipeline
    Regular,
    /// Pure grouping node
    Aggregating,
    /// Static/config-only component
    Plain,
}

/// Standard [`Component`] implementation.
///
/// Graph edges are held as [`Weak`] references: the repository keeps the strong
/// references, so cyclic dependency graphs do not leak.
pub struct ComponentDescriptor {
    id: String,
    kind: ComponentKind,
    parent: RwLock<Option<Weak<dyn Component>>>,
    depended: RwLock<Vec<Weak<dyn Component>>>,
    resource: RwLock<Option<Arc<dyn ComponentResource>>>,
    realm: RwLock<Option<ExecutionRealm>>,
    application: RwLock<Option<AppContext>>,
}

impl ComponentDescriptor {
    fn with_kind(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            parent: RwLock::new(None),
            depended: RwLock::new(Vec::new()),
            resource: RwLock::new(None),
            realm: RwLock::new(None),
            application: RwLock::new(None),
        }
    }

    /// Create a regular component
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_kind(id, ComponentKind::Regular)
    }

    /// Create an aggregating component
    pub fn aggregating(id: impl Into<String>) -> Self {
        Self::with_kind(id, ComponentKind::Aggregating)
    }

    /// Create a plain component
    pub fn plain(id: impl Into<String>) -> Self {
        Self::with_kind(id, ComponentKind::Plain)
    }

    /// Attach the deployable resource
    pub fn with_resource(self, resource: Arc<dyn ComponentResource>) -> Self {
        *self.resource.write() = Some(resource);
        self
    }

    /// Kind of this component
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Replace the deployable resource
    pub fn set_resource(&self, resource: Option<Arc<dyn ComponentResource>>) {
        *self.resource.write() = resource;
    }

    /// Set the parent of this component
    pub fn set_parent(&self, parent: &ComponentRef) {
        *self.parent.write() = Some(Arc::downgrade(parent));
    }

    /// Append a dependency; declaration order is kept
    pub fn add_dependency(&self, depended: &ComponentRef) {
        self.depended.write().push(Arc::downgrade(depended));
    }
}

impl Component for ComponentDescriptor {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent(&self) -> Option<ComponentRef> {
        self.parent.read().as_ref().and_then(Weak::upgrade)
    }

    fn depended_components(&self) -> Vec<ComponentRef> {
        self.depended.read().iter().filter_map(Weak::upgrade).collect()
    }

    fn is_aggregating(&self) -> bool {
        self.kind == ComponentKind::Aggregating
    }

    fn is_plain(&self) -> bool {
        self.kind == ComponentKind::Plain
    }

    fn resource(&self) -> Option<Arc<dyn ComponentResource>> {
        self.resource.read().clone()
    }

    fn realm(&self) -> Option<ExecutionRealm> {
        self.realm.read().clone()
    }

    fn set_realm(&self, realm: Option<ExecutionRealm>) {
        *self.realm.write() = realm;
    }

    fn application(&self) -> Option<AppContext> {
        self.application.read().clone()
    }

    fn set_application(&self, application: Option<AppContext>) {
        *self.application.write() = application;
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depended: Vec<String> = self
            .depended_components()
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        f.debug_struct("ComponentDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("parent", &self.parent().map(|p| p.id().to_string()))
            .field("depended", &depended)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
