use std::sync::{Arc, Weak};

use crate::component::ComponentRef;
use crate::feature::SERVICE_FEATURE;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::loader::ComponentContext;
use crate::resolver::binding::ResolverBinding;
use crate::resolver::factory::{DefaultServiceContextFactory, ServiceContextFactory};
use crate::resolver::FeatureResolver;

/// Builds a service context for components whose resource carries
/// [`SERVICE_DESCRIPTOR`](constants::SERVICE_DESCRIPTOR) and exports it to the
/// loader's service registry under the component id.
pub struct ServiceFeatureResolver {
    binding: ResolverBinding,
    factory: Arc<dyn ServiceContextFactory>,
}

impl ServiceFeatureResolver {
    /// Create the resolver with a host service context factory
    pub fn new(factory: Arc<dyn ServiceContextFactory>) -> Self {
        Self {
            binding: ResolverBinding::new(),
            factory,
        }
    }
}

impl Default for ServiceFeatureResolver {
    fn default() -> Self {
        Self::new(Arc::new(DefaultServiceContextFactory))
    }
}

impl FeatureResolver for ServiceFeatureResolver {
    fn name(&self) -> &str {
        constants::SERVICE_RESOLVER
    }

    fn load_order(&self) -> i32 {
        constants::SERVICE_LOAD_ORDER
    }

    fn unload_order(&self) -> i32 {
        constants::SERVICE_UNLOAD_ORDER
    }

    fn bind(&self, context: Weak<dyn ComponentContext>) -> Result<()> {
        self.binding.bind(self.name(), context)
    }

    fn has_feature(&self, component: &ComponentRef) -> bool {
        component
            .resource()
            .is_some_and(|resource| resource.contains(constants::SERVICE_DESCRIPTOR))
    }

    fn resolve(&self, component: &ComponentRef) -> Result<()> {
        let context = self.binding.context(self.name())?;
        let resource = component.resource().ok_or_else(|| Error::MissingResource {
            component: component.id().to_string(),
        })?;

        let application = context.get_application_feature(component);
        let service = self
            .factory
            .create_service_context(component, &resource, application.as_ref())?;

        context.register_feature(component, SERVICE_FEATURE, Arc::new(service.clone()));
        context
            .registry()
            .register_service(component.id(), component.id(), Arc::new(service));
        Ok(())
    }

    fn release(&self, component: &ComponentRef) -> Result<()> {
        let context = self.binding.context(self.name())?;
        let withdrawn = context.registry().unregister_provider(component.id());
        log::trace!("Withdrew {} service(s) of {}", withdrawn, component.id());
        context.remove_feature(component, SERVICE_FEATURE);
        Ok(())
    }
}
