use std::sync::{Arc, Weak};

use crate::component::{ComponentRef, ExecutionRealm};
use crate::feature::LIBRARY_FEATURE;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::loader::ComponentContext;
use crate::resolver::binding::ResolverBinding;
use crate::resolver::factory::{IsolatedRealmFactory, RealmFactory};
use crate::resolver::FeatureResolver;

use super::requirements;

/// Gives every regular component its execution realm (the `library` feature)
pub struct StaticFeatureResolver {
    binding: ResolverBinding,
    factory: Arc<dyn RealmFactory>,
}

impl StaticFeatureResolver {
    /// Create the resolver with a host realm factory
    pub fn new(factory: Arc<dyn RealmFactory>) -> Self {
        Self {
            binding: ResolverBinding::new(),
            factory,
        }
    }
}

impl Default for StaticFeatureResolver {
    fn default() -> Self {
        Self::new(Arc::new(IsolatedRealmFactory))
    }
}

impl FeatureResolver for StaticFeatureResolver {
    fn name(&self) -> &str {
        constants::STATIC_RESOLVER
    }

    fn load_order(&self) -> i32 {
        constants::STATIC_LOAD_ORDER
    }

    fn unload_order(&self) -> i32 {
        constants::STATIC_UNLOAD_ORDER
    }

    fn bind(&self, context: Weak<dyn ComponentContext>) -> Result<()> {
        self.binding.bind(self.name(), context)
    }

    fn has_feature(&self, component: &ComponentRef) -> bool {
        !component.is_aggregating() && !component.is_plain()
    }

    fn resolve(&self, component: &ComponentRef) -> Result<()> {
        let context = self.binding.context(self.name())?;
        let resource = component.resource().ok_or_else(|| Error::MissingResource {
            component: component.id().to_string(),
        })?;

        let imports: Vec<ExecutionRealm> = requirements(component)
            .iter()
            .filter_map(|required| context.get_library_feature(required))
            .collect();
        let realm = self.factory.create_realm(component, &resource, &imports)?;
        log::trace!(
            "Created realm for {} importing {} realm(s)",
            component.id(),
            imports.len()
        );

        component.set_realm(Some(realm.clone()));
        context.register_feature(component, LIBRARY_FEATURE, Arc::new(realm));
        Ok(())
    }

    fn release(&self, component: &ComponentRef) -> Result<()> {
        let context = self.binding.context(self.name())?;
        context.remove_feature(component, LIBRARY_FEATURE);
        component.set_realm(None);
        Ok(())
    }
}
