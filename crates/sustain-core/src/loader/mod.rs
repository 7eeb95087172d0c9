//! # Sustain Core Component Loader
//!
//! The orchestrator that loads and unloads components in dependency order and
//! runs each regular component through the resolver pipeline.
//!
//! - **[`ComponentLoader`]**: graph-level `load`/`unload` and resolver registration.
//! - **[`ComponentContext`]**: what resolvers (and hosts) can see: feature queries,
//!   feature registration, repository and service registry access.
//! - **[`DefaultComponentLoader`]**: the implementation of both.
//! - **[`guard`]**: the in-progress sets that break cycles and re-entrant calls.
pub mod default;
pub mod guard;

use std::any::Any;
use std::sync::Arc;

use crate::component::{AppContext, ComponentRef, ExecutionRealm};
use crate::feature::FeatureValue;
use crate::kernel::error::Result;
use crate::repository::ComponentRepository;
use crate::resolver::FeatureResolver;
use crate::service::ServiceRegistry;

pub use default::DefaultComponentLoader;

/// Loads and unloads components together with everything they need
pub trait ComponentLoader: Send + Sync {
    /// Load the component after its parent and dependencies. No-op if already loaded.
    ///
    /// A component another thread is loading is waited for, so on `Ok` the whole
    /// graph below `component` is loaded. A cycle back into the current call chain
    /// is skipped, and so is a wait that would leave two threads blocked on each other.
    fn load(&self, component: &ComponentRef) -> Result<()>;

    /// Unload the component, then its dependencies, then its parent. No-op if not loaded.
    fn unload(&self, component: &ComponentRef) -> Result<()>;

    /// Bind a resolver to this loader and add it to both orderings
    fn register_resolver(&self, resolver: Arc<dyn FeatureResolver>) -> Result<()>;
}

/// The loader as seen by resolvers
pub trait ComponentContext: Send + Sync {
    /// Whether the component has a feature entry
    fn is_loaded(&self, component: &ComponentRef) -> bool;

    /// A named feature of a loaded component
    fn get_feature(&self, component: &ComponentRef, name: &str) -> Option<FeatureValue>;

    /// The execution realm feature
    fn get_library_feature(&self, component: &ComponentRef) -> Option<ExecutionRealm>;

    /// The application context feature
    fn get_application_feature(&self, component: &ComponentRef) -> Option<AppContext>;

    /// The service context feature
    fn get_service_feature(&self, component: &ComponentRef) -> Option<AppContext>;

    /// Application contexts of all loaded components that have one, dependencies first
    fn get_application_features(&self) -> Vec<AppContext>;

    /// Execution realm of the component with this id
    fn get_class_realm(&self, component_id: &str) -> Result<Option<ExecutionRealm>>;

    /// Application context of the repository's main component
    fn get_main_app(&self) -> Result<Option<AppContext>>;

    /// Create or update a feature, creating the component's bag on first use
    fn register_feature(&self, component: &ComponentRef, name: &str, feature: FeatureValue);

    /// Remove a feature, returning its value
    fn remove_feature(&self, component: &ComponentRef, name: &str) -> Option<FeatureValue>;

    /// Look up a registered resolver by name
    fn get_feature_resolver(&self, name: &str) -> Option<Arc<dyn FeatureResolver>>;

    /// The service registry owned by this loader
    fn registry(&self) -> Arc<dyn ServiceRegistry>;

    /// The repository this loader resolves components from
    fn component_repository(&self) -> Arc<dyn ComponentRepository>;

    /// The loader itself
    fn component_loader(&self) -> &dyn ComponentLoader;
}

/// Typed helpers over [`ComponentContext`]
pub trait ComponentContextExt: ComponentContext {
    /// A named feature downcast to `T`
    fn get_feature_as<T: Any + Send + Sync>(&self, component: &ComponentRef, name: &str) -> Option<Arc<T>> {
        self.get_feature(component, name)
            .and_then(|value| value.downcast::<T>().ok())
    }
}

impl<C: ComponentContext + ?Sized> ComponentContextExt for C {}
