use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::component::{AppContext, ComponentRef, ExecutionRealm};
use crate::config::LoaderConfig;
use crate::feature::{
    APPLICATION_FEATURE, FeatureEntry, FeatureRegistry, FeatureValue, Features,
};
use crate::kernel::error::{Error, Result};
use crate::loader::guard::InProgressSet;
use crate::loader::{ComponentContext, ComponentLoader};
use crate::repository::{ComponentRepository, RepositoryError};
use crate::resolver::{
    ApplicationFeatureResolver, FeatureResolver, ResolverChain, ServiceFeatureResolver,
    StaticFeatureResolver,
};
use crate::service::{DefaultServiceRegistry, ServiceRegistry};

/// Standard component loader.
///
/// Owns the feature registry, the resolver chain, the service registry and the
/// two in-progress sets. Always handled through an `Arc`: resolvers are bound to
/// a weak reference of the loader itself.
pub struct DefaultComponentLoader {
    self_ref: Weak<DefaultComponentLoader>,
    repository: Arc<dyn ComponentRepository>,
    services: Arc<dyn ServiceRegistry>,
    features: FeatureRegistry,
    resolvers: RwLock<ResolverChain>,
    config: LoaderConfig,
    loading: InProgressSet,
    unloading: InProgressSet,
}

impl DefaultComponentLoader {
    /// Create a loader with no resolver registered
    pub fn bare(repository: Arc<dyn ComponentRepository>, config: LoaderConfig) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            self_ref: self_ref.clone(),
            repository,
            services: Arc::new(DefaultServiceRegistry::new()),
            features: FeatureRegistry::new(),
            resolvers: RwLock::new(ResolverChain::new()),
            config,
            loading: InProgressSet::new(),
            unloading: InProgressSet::new(),
        })
    }

    /// Create a loader with the built-in resolvers and default configuration
    pub fn new(repository: Arc<dyn ComponentRepository>) -> Result<Arc<Self>> {
        Self::with_config(repository, LoaderConfig::default())
    }

    /// Create a loader with the built-in resolvers
    pub fn with_config(
        repository: Arc<dyn ComponentRepository>,
        config: LoaderConfig,
    ) -> Result<Arc<Self>> {
        Self::with_resolvers(repository, config, Vec::new())
    }

    /// Create a loader with the built-in resolvers followed by `extras`
    pub fn with_resolvers(
        repository: Arc<dyn ComponentRepository>,
        config: LoaderConfig,
        extras: Vec<Arc<dyn FeatureResolver>>,
    ) -> Result<Arc<Self>> {
        let loader = Self::bare(repository, config);
        loader.register_resolver(Arc::new(StaticFeatureResolver::default()))?;
        loader.register_resolver(Arc::new(ApplicationFeatureResolver::default()))?;
        loader.register_resolver(Arc::new(ServiceFeatureResolver::default()))?;
        for resolver in extras {
            loader.register_resolver(resolver)?;
        }

        let registered = loader.resolvers.read().names();
        for name in loader.config.unknown_resolvers(&registered) {
            log::warn!("Ignoring order override for unknown resolver '{}'", name);
        }
        Ok(loader)
    }

    /// The configuration this loader was created with
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Snapshot of the resolvers in load order
    pub fn load_sequence(&self) -> Vec<Arc<dyn FeatureResolver>> {
        self.resolvers.read().load_sequence()
    }

    /// Snapshot of the resolvers in unload order
    pub fn unload_sequence(&self) -> Vec<Arc<dyn FeatureResolver>> {
        self.resolvers.read().unload_sequence()
    }

    /// Effective `(load, unload)` orders of a resolver after configuration overrides
    pub fn resolver_orders(&self, name: &str) -> Option<(i32, i32)> {
        let chain = self.resolvers.read();
        Some((chain.load_order_of(name)?, chain.unload_order_of(name)?))
    }

    /// Snapshot of every loaded component
    pub fn loaded_components(&self) -> Vec<ComponentRef> {
        self.features.loaded_components()
    }

    /// The feature bag of a loaded component
    pub fn features_of(&self, component: &ComponentRef) -> Option<Arc<Features>> {
        self.features.features(component.id())
    }

    /// Registry entry of a component, if loaded
    pub fn entry_of(&self, component: &ComponentRef) -> Option<FeatureEntry> {
        self.features.entry(component.id())
    }

    /// Load one component without looking at its parent or dependencies
    pub fn load_single(&self, component: &ComponentRef) -> Result<()> {
        if component.is_aggregating() || component.is_plain() {
            return self.resolve_single(component);
        }
        let Some(guard) = self.loading.enter(component.id()) else {
            log::trace!("{} is already being loaded", component.id());
            return Ok(());
        };
        if guard.waited() && self.features.is_loaded(component.id()) {
            return Ok(());
        }
        self.resolve_single(component)
    }

    /// Unload one component without looking at its parent or dependencies
    pub fn unload_single(&self, component: &ComponentRef) -> Result<()> {
        let id = component.id();
        if component.is_aggregating() || component.is_plain() {
            log::trace!("Removing {} without release", id);
            self.features.remove(id);
            return Ok(());
        }
        let Some(guard) = self.unloading.enter(id) else {
            log::trace!("{} is already being unloaded", id);
            return Ok(());
        };
        if guard.waited() && !self.features.is_loaded(id) {
            return Ok(());
        }

        log::trace!("Releasing {}", id);
        let resolvers = self.resolvers.read().unload_sequence();
        for resolver in resolvers {
            if resolver.has_feature(component) {
                log::trace!("{} releasing {}", resolver.name(), id);
                resolver.release(component)?;
            }
        }
        self.features.remove(id);
        Ok(())
    }

    /// Unload every loaded component, dependents first
    pub fn shutdown(&self) -> Result<()> {
        let mut loaded = self.features.loaded_components();
        self.repository.sort_components(&mut loaded);
        log::info!("Shutting down loader with {} loaded component(s)", loaded.len());
        for component in loaded.iter().rev() {
            self.unload_single(component)?;
        }
        Ok(())
    }

    /// Resolution of one component; the caller holds the loading guard for
    /// regular components.
    fn resolve_single(&self, component: &ComponentRef) -> Result<()> {
        let id = component.id();
        if component.is_aggregating() {
            log::trace!("Aggregating component {} needs no resolution", id);
            self.features.insert_sentinel(component, FeatureEntry::Aggregating);
            return Ok(());
        }
        if component.is_plain() {
            log::trace!("Plain component {} needs no resolution", id);
            self.features.insert_sentinel(component, FeatureEntry::Plain);
            return Ok(());
        }
        if component.resource().is_none() {
            return Err(Error::MissingResource {
                component: id.to_string(),
            });
        }

        let resolvers = self.resolvers.read().load_sequence();
        let mut participants = Vec::with_capacity(resolvers.len());
        for resolver in resolvers {
            resolver.apply_defaults(component)?;
            if resolver.has_feature(component) {
                participants.push(resolver);
            }
        }
        log::trace!(
            "Resolving {} with [{}]",
            id,
            participants
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        for resolver in &participants {
            resolver.before_resolve(component)?;
        }
        for resolver in &participants {
            resolver.resolve(component)?;
        }
        for resolver in &participants {
            resolver.after_resolve(component)?;
        }

        self.features.ensure_entry(component);
        Ok(())
    }
}

impl ComponentLoader for DefaultComponentLoader {
    fn load(&self, component: &ComponentRef) -> Result<()> {
        if self.features.is_loaded(component.id()) {
            return Ok(());
        }
        // Blocks while another thread is loading the same component
        let Some(_guard) = self.loading.enter(component.id()) else {
            log::trace!("{} is already being loaded on this call chain", component.id());
            return Ok(());
        };
        if self.features.is_loaded(component.id()) {
            return Ok(());
        }

        log::debug!("Loading {}", component.id());
        if let Some(parent) = component.parent() {
            self.load(&parent)?;
        }
        for depended in component.depended_components() {
            self.load(&depended)?;
        }
        self.resolve_single(component)?;
        log::debug!("Loaded {}", component.id());
        Ok(())
    }

    fn unload(&self, component: &ComponentRef) -> Result<()> {
        if !self.features.is_loaded(component.id()) {
            return Ok(());
        }

        log::debug!("Unloading {}", component.id());
        self.unload_single(component)?;
        for depended in component.depended_components() {
            self.unload(&depended)?;
        }
        if let Some(parent) = component.parent() {
            self.unload(&parent)?;
        }
        log::debug!("Unloaded {}", component.id());
        Ok(())
    }

    fn register_resolver(&self, resolver: Arc<dyn FeatureResolver>) -> Result<()> {
        let name = resolver.name().to_string();
        if self.resolvers.read().contains(&name) {
            return Err(Error::DuplicateResolver { resolver: name });
        }

        let context: Weak<dyn ComponentContext> = self.self_ref.clone();
        resolver.bind(context)?;
        self.resolvers
            .write()
            .register(resolver, self.config.resolver_override(&name))?;

        let (load_order, unload_order) = self.resolver_orders(&name).unwrap_or_default();
        log::info!(
            "Registered feature resolver '{}' (load {}, unload {})",
            name,
            load_order,
            unload_order
        );
        Ok(())
    }
}

impl ComponentContext for DefaultComponentLoader {
    fn is_loaded(&self, component: &ComponentRef) -> bool {
        self.features.is_loaded(component.id())
    }

    fn get_feature(&self, component: &ComponentRef, name: &str) -> Option<FeatureValue> {
        self.features.get_feature(component.id(), name)
    }

    fn get_library_feature(&self, component: &ComponentRef) -> Option<ExecutionRealm> {
        self.features.features(component.id())?.library()
    }

    fn get_application_feature(&self, component: &ComponentRef) -> Option<AppContext> {
        self.features.features(component.id())?.application()
    }

    fn get_service_feature(&self, component: &ComponentRef) -> Option<AppContext> {
        self.features.features(component.id())?.service()
    }

    fn get_application_features(&self) -> Vec<AppContext> {
        let mut components = self.features.components_with(APPLICATION_FEATURE);
        self.repository.sort_components(&mut components);
        components
            .iter()
            .filter_map(|component| self.get_application_feature(component))
            .collect()
    }

    fn get_class_realm(&self, component_id: &str) -> Result<Option<ExecutionRealm>> {
        let component = self
            .repository
            .resolve_component(component_id)
            .map_err(|source| {
                let reason = match source {
                    RepositoryError::InvalidName { .. } => "is invalid",
                    _ => "does not exist",
                };
                Error::InvalidReference {
                    id: component_id.to_string(),
                    reason,
                    source,
                }
            })?;
        Ok(component.realm())
    }

    fn get_main_app(&self) -> Result<Option<AppContext>> {
        let Some(id) = self.repository.main_component_id() else {
            return Err(Error::NotReady {
                message: "no main component is designated".to_string(),
                source: None,
            });
        };
        let component = self
            .repository
            .resolve_component(&id)
            .map_err(|source| Error::NotReady {
                message: format!("main component '{}' cannot be resolved", id),
                source: Some(source),
            })?;
        Ok(component.application())
    }

    fn register_feature(&self, component: &ComponentRef, name: &str, feature: FeatureValue) {
        log::trace!("Registering feature '{}' of {}", name, component.id());
        self.features.register_feature(component, name, feature);
    }

    fn remove_feature(&self, component: &ComponentRef, name: &str) -> Option<FeatureValue> {
        log::trace!("Removing feature '{}' of {}", name, component.id());
        self.features.remove_feature(component.id(), name)
    }

    fn get_feature_resolver(&self, name: &str) -> Option<Arc<dyn FeatureResolver>> {
        self.resolvers.read().get(name)
    }

    fn registry(&self) -> Arc<dyn ServiceRegistry> {
        self.services.clone()
    }

    fn component_repository(&self) -> Arc<dyn ComponentRepository> {
        self.repository.clone()
    }

    fn component_loader(&self) -> &dyn ComponentLoader {
        self
    }
}

impl fmt::Debug for DefaultComponentLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<String> = self
            .features
            .loaded_components()
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        f.debug_struct("DefaultComponentLoader")
            .field("resolvers", &*self.resolvers.read())
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}
