#![cfg(test)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::component::{ComponentDescriptor, ComponentRef, MemoryResource};
use crate::config::LoaderConfig;
use crate::kernel::error::{Error, Result};
use crate::loader::{ComponentContext, DefaultComponentLoader};
use crate::repository::InMemoryRepository;
use crate::resolver::{FeatureResolver, ResolverBinding, ResolverPhase};

// ===== EVENT LOG =====

/// Shared record of resolver calls, formatted as `resolver:phase:component`
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Component ids seen by `resolver` in `phase`, in call order
pub fn ids_for(events: &EventLog, resolver: &str, phase: ResolverPhase) -> Vec<String> {
    let prefix = format!("{}:{}:", resolver, phase);
    events
        .lock()
        .iter()
        .filter_map(|event| event.strip_prefix(&prefix).map(str::to_string))
        .collect()
}

/// Every event recorded for one component, in call order
pub fn events_of(events: &EventLog, component: &str) -> Vec<String> {
    let suffix = format!(":{}", component);
    events
        .lock()
        .iter()
        .filter(|event| event.ends_with(&suffix))
        .cloned()
        .collect()
}

// ===== MOCK RESOLVER =====

/// Resolver that records every phase it runs and registers a feature named after
/// itself holding the component id.
pub struct RecordingResolver {
    name: String,
    load_order: i32,
    unload_order: i32,
    binding: ResolverBinding,
    events: EventLog,
    only: Option<HashSet<String>>,
    fail: Option<(ResolverPhase, String)>,
}

impl RecordingResolver {
    pub fn new(name: &str, load_order: i32, unload_order: i32, events: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            load_order,
            unload_order,
            binding: ResolverBinding::new(),
            events: events.clone(),
            only: None,
            fail: None,
        }
    }

    /// Take part only for the listed components
    pub fn only_for(mut self, ids: &[&str]) -> Self {
        self.only = Some(ids.iter().map(|id| id.to_string()).collect());
        self
    }

    /// Fail `phase` for component `id`
    pub fn failing(mut self, phase: ResolverPhase, id: &str) -> Self {
        self.fail = Some((phase, id.to_string()));
        self
    }

    pub fn shared(self) -> Arc<dyn FeatureResolver> {
        Arc::new(self)
    }

    fn record(&self, phase: ResolverPhase, component: &ComponentRef) -> Result<()> {
        self.events
            .lock()
            .push(format!("{}:{}:{}", self.name, phase, component.id()));
        match &self.fail {
            Some((failing, id)) if *failing == phase && id == component.id() => Err(
                Error::resolver_failure(self.name.clone(), phase, component.id(), "induced failure"),
            ),
            _ => Ok(()),
        }
    }
}

impl FeatureResolver for RecordingResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_order(&self) -> i32 {
        self.load_order
    }

    fn unload_order(&self) -> i32 {
        self.unload_order
    }

    fn bind(&self, context: Weak<dyn ComponentContext>) -> Result<()> {
        self.binding.bind(&self.name, context)
    }

    fn apply_defaults(&self, component: &ComponentRef) -> Result<()> {
        self.record(ResolverPhase::ApplyDefaults, component)
    }

    fn has_feature(&self, component: &ComponentRef) -> bool {
        match &self.only {
            Some(ids) => ids.contains(component.id()),
            None => !component.is_aggregating() && !component.is_plain(),
        }
    }

    fn before_resolve(&self, component: &ComponentRef) -> Result<()> {
        self.record(ResolverPhase::BeforeResolve, component)
    }

    fn resolve(&self, component: &ComponentRef) -> Result<()> {
        self.record(ResolverPhase::Resolve, component)?;
        let context = self.binding.context(&self.name)?;
        context.register_feature(component, &self.name, Arc::new(component.id().to_string()));
        Ok(())
    }

    fn after_resolve(&self, component: &ComponentRef) -> Result<()> {
        self.record(ResolverPhase::AfterResolve, component)
    }

    fn release(&self, component: &ComponentRef) -> Result<()> {
        self.record(ResolverPhase::Release, component)?;
        let context = self.binding.context(&self.name)?;
        context.remove_feature(component, &self.name);
        Ok(())
    }
}

// ===== GRAPH FIXTURE =====

/// Component graph backed by an [`InMemoryRepository`]
pub struct Fixture {
    pub repository: Arc<InMemoryRepository>,
    descriptors: HashMap<String, Arc<ComponentDescriptor>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRepository::new()),
            descriptors: HashMap::new(),
        }
    }

    fn add(&mut self, descriptor: ComponentDescriptor) -> ComponentRef {
        let descriptor = Arc::new(descriptor);
        let component: ComponentRef = descriptor.clone();
        self.repository
            .register(component.clone())
            .expect("Failed to register fixture component");
        self.descriptors
            .insert(component.id().to_string(), descriptor);
        component
    }

    /// Regular component with an in-memory resource
    pub fn regular(&mut self, id: &str) -> ComponentRef {
        self.with_entries(id, &[])
    }

    /// Regular component whose resource contains `entries`
    pub fn with_entries(&mut self, id: &str, entries: &[&str]) -> ComponentRef {
        let resource = entries
            .iter()
            .fold(MemoryResource::new(format!("mem://{}", id)), |resource, entry| {
                resource.with_entry(*entry)
            });
        self.add(ComponentDescriptor::new(id).with_resource(Arc::new(resource)))
    }

    /// Regular component without a resource
    pub fn without_resource(&mut self, id: &str) -> ComponentRef {
        self.add(ComponentDescriptor::new(id))
    }

    pub fn aggregating(&mut self, id: &str) -> ComponentRef {
        self.add(ComponentDescriptor::aggregating(id))
    }

    pub fn plain(&mut self, id: &str) -> ComponentRef {
        self.add(ComponentDescriptor::plain(id))
    }

    /// Make `dependent` depend on `depended`
    pub fn depends(&self, dependent: &str, depended: &str) {
        self.descriptors[dependent].add_dependency(&self.get(depended));
    }

    /// Make `parent` the parent of `child`
    pub fn parent(&self, child: &str, parent: &str) {
        self.descriptors[child].set_parent(&self.get(parent));
    }

    pub fn descriptor(&self, id: &str) -> Arc<ComponentDescriptor> {
        self.descriptors[id].clone()
    }

    pub fn get(&self, id: &str) -> ComponentRef {
        self.descriptors[id].clone()
    }

    /// Loader without built-in resolvers
    pub fn bare_loader(&self) -> Arc<DefaultComponentLoader> {
        DefaultComponentLoader::bare(self.repository.clone(), LoaderConfig::default())
    }

    /// Loader without built-ins, with the given resolvers registered in order
    pub fn loader_with(&self, resolvers: Vec<Arc<dyn FeatureResolver>>) -> Arc<DefaultComponentLoader> {
        use crate::loader::ComponentLoader;

        let loader = self.bare_loader();
        for resolver in resolvers {
            loader
                .register_resolver(resolver)
                .expect("Failed to register test resolver");
        }
        loader
    }

    /// Loader with the built-in resolvers
    pub fn standard_loader(&self) -> Arc<DefaultComponentLoader> {
        DefaultComponentLoader::new(self.repository.clone()).expect("Failed to create loader")
    }
}

/// Ids of a component list
pub fn ids(components: &[ComponentRef]) -> Vec<String> {
    components.iter().map(|c| c.id().to_string()).collect()
}
