//! Host hooks the built-in resolvers call to build opaque handles.
//!
//! The loader never inspects realms or application contexts. A host embedding
//! `sustain-core` plugs its own factories into the built-ins; the default
//! factories here produce descriptive tokens that are enough for wiring and tests.
use std::sync::Arc;

use crate::component::{AppContext, ComponentRef, ComponentResource, ExecutionRealm};
use crate::kernel::error::Result;

/// Builds the execution realm of a component
pub trait RealmFactory: Send + Sync {
    /// `imports` are the realms of the component's parent and dependencies that are
    /// already resolved, parent first.
    fn create_realm(
        &self,
        component: &ComponentRef,
        resource: &Arc<dyn ComponentResource>,
        imports: &[ExecutionRealm],
    ) -> Result<ExecutionRealm>;
}

/// Builds and closes application contexts
pub trait ApplicationFactory: Send + Sync {
    /// `parents` are the application contexts of the component's parent and
    /// dependencies, parent first.
    fn create_application(
        &self,
        component: &ComponentRef,
        resource: &Arc<dyn ComponentResource>,
        parents: &[AppContext],
    ) -> Result<AppContext>;

    /// Close a context created by this factory
    fn close_application(&self, _component: &ComponentRef, _application: &AppContext) -> Result<()> {
        Ok(())
    }
}

/// Builds the service context of a component
pub trait ServiceContextFactory: Send + Sync {
    fn create_service_context(
        &self,
        component: &ComponentRef,
        resource: &Arc<dyn ComponentResource>,
        application: Option<&AppContext>,
    ) -> Result<AppContext>;
}

/// Payload of realms built by [`IsolatedRealmFactory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolatedRealm {
    pub component: String,
    pub location: String,
    pub imports: Vec<String>,
}

/// Default realm factory: one isolated realm per component, importing its
/// parent's and dependencies' realms.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsolatedRealmFactory;

impl RealmFactory for IsolatedRealmFactory {
    fn create_realm(
        &self,
        component: &ComponentRef,
        resource: &Arc<dyn ComponentResource>,
        imports: &[ExecutionRealm],
    ) -> Result<ExecutionRealm> {
        let realm = IsolatedRealm {
            component: component.id().to_string(),
            location: resource.location().to_string(),
            imports: imports.iter().map(|r| r.owner().to_string()).collect(),
        };
        Ok(ExecutionRealm::new(component.id(), realm))
    }
}

/// Payload of contexts built by [`DefaultApplicationFactory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDescriptor {
    pub component: String,
    pub location: String,
    pub parents: Vec<String>,
}

/// Default application factory
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultApplicationFactory;

impl ApplicationFactory for DefaultApplicationFactory {
    fn create_application(
        &self,
        component: &ComponentRef,
        resource: &Arc<dyn ComponentResource>,
        parents: &[AppContext],
    ) -> Result<AppContext> {
        let descriptor = ApplicationDescriptor {
            component: component.id().to_string(),
            location: resource.location().to_string(),
            parents: parents.iter().map(|p| p.owner().to_string()).collect(),
        };
        Ok(AppContext::new(component.id(), descriptor))
    }
}

/// Payload of contexts built by [`DefaultServiceContextFactory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub component: String,
    pub location: String,
    pub application: Option<String>,
}

/// Default service context factory
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultServiceContextFactory;

impl ServiceContextFactory for DefaultServiceContextFactory {
    fn create_service_context(
        &self,
        component: &ComponentRef,
        resource: &Arc<dyn ComponentResource>,
        application: Option<&AppContext>,
    ) -> Result<AppContext> {
        let descriptor = ServiceDescriptor {
            component: component.id().to_string(),
            location: resource.location().to_string(),
            application: application.map(|a| a.owner().to_string()),
        };
        Ok(AppContext::new(component.id(), descriptor))
    }
}
