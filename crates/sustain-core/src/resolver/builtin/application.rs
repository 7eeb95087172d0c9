use std::sync::{Arc, Weak};

use crate::component::{AppContext, ComponentRef};
use crate::feature::APPLICATION_FEATURE;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::loader::ComponentContext;
use crate::resolver::binding::ResolverBinding;
use crate::resolver::factory::{ApplicationFactory, DefaultApplicationFactory};
use crate::resolver::FeatureResolver;

use super::requirements;

/// Builds an application context for components whose resource carries
/// [`APPLICATION_DESCRIPTOR`](constants::APPLICATION_DESCRIPTOR)
pub struct ApplicationFeatureResolver {
    binding: ResolverBinding,
    factory: Arc<dyn ApplicationFactory>,
}

impl ApplicationFeatureResolver {
    /// Create the resolver with a host application factory
    pub fn new(factory: Arc<dyn ApplicationFactory>) -> Self {
        Self {
            binding: ResolverBinding::new(),
            factory,
        }
    }
}

impl Default for ApplicationFeatureResolver {
    fn default() -> Self {
        Self::new(Arc::new(DefaultApplicationFactory))
    }
}

impl FeatureResolver for ApplicationFeatureResolver {
    fn name(&self) -> &str {
        constants::APPLICATION_RESOLVER
    }

    fn load_order(&self) -> i32 {
        constants::APPLICATION_LOAD_ORDER
    }

    fn unload_order(&self) -> i32 {
        constants::APPLICATION_UNLOAD_ORDER
    }

    fn bind(&self, context: Weak<dyn ComponentContext>) -> Result<()> {
        self.binding.bind(self.name(), context)
    }

    fn has_feature(&self, component: &ComponentRef) -> bool {
        component
            .resource()
            .is_some_and(|resource| resource.contains(constants::APPLICATION_DESCRIPTOR))
    }

    fn resolve(&self, component: &ComponentRef) -> Result<()> {
        let context = self.binding.context(self.name())?;
        let resource = component.resource().ok_or_else(|| Error::MissingResource {
            component: component.id().to_string(),
        })?;

        let parents: Vec<AppContext> = requirements(component)
            .iter()
            .filter_map(|required| context.get_application_feature(required))
            .collect();
        let application = self.factory.create_application(component, &resource, &parents)?;
        log::trace!(
            "Created application context for {} with {} parent context(s)",
            component.id(),
            parents.len()
        );

        component.set_application(Some(application.clone()));
        context.register_feature(component, APPLICATION_FEATURE, Arc::new(application));
        Ok(())
    }

    fn release(&self, component: &ComponentRef) -> Result<()> {
        let context = self.binding.context(self.name())?;
        let application = context.get_application_feature(component);
        context.remove_feature(component, APPLICATION_FEATURE);
        component.set_application(None);
        match application {
            Some(application) => self.factory.close_application(component, &application),
            None => Ok(()),
        }
    }
}
