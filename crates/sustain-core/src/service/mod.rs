//! # Sustain Core Service Registry
//!
//! Lookup table of services exported by loaded components. One registry is
//! created per loader and handed out through
//! [`ComponentContext::registry`](crate::loader::ComponentContext::registry).
use std::fmt;

use dashmap::DashMap;

use crate::component::Payload;

/// Type-erased service instance
pub type ServiceHandle = Payload;

/// Store of exported services, keyed by service name
pub trait ServiceRegistry: Send + Sync {
    /// Export a service on behalf of `provider`, replacing any service with that name
    fn register_service(&self, provider: &str, name: &str, service: ServiceHandle);

    /// Look up a service
    fn get_service(&self, name: &str) -> Option<ServiceHandle>;

    /// Withdraw a single service
    fn unregister_service(&self, name: &str) -> Option<ServiceHandle>;

    /// Withdraw every service exported by `provider`; returns how many were removed
    fn unregister_provider(&self, provider: &str) -> usize;

    /// Names of the services exported by `provider`
    fn services_of(&self, provider: &str) -> Vec<String>;
}

struct ServiceEntry {
    provider: String,
    service: ServiceHandle,
}

/// Concurrent [`ServiceRegistry`] backed by a `DashMap`
#[derive(Default)]
pub struct DefaultServiceRegistry {
    services: DashMap<String, ServiceEntry>,
}

impl DefaultServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of exported services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether nothing is exported
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceRegistry for DefaultServiceRegistry {
    fn register_service(&self, provider: &str, name: &str, service: ServiceHandle) {
        log::debug!("Service '{}' exported by {}", name, provider);
        self.services.insert(
            name.to_string(),
            ServiceEntry {
                provider: provider.to_string(),
                service,
            },
        );
    }

    fn get_service(&self, name: &str) -> Option<ServiceHandle> {
        self.services.get(name).map(|entry| entry.service.clone())
    }

    fn unregister_service(&self, name: &str) -> Option<ServiceHandle> {
        self.services.remove(name).map(|(_, entry)| entry.service)
    }

    fn unregister_provider(&self, provider: &str) -> usize {
        let mut removed = 0;
        self.services.retain(|_, entry| {
            if entry.provider == provider {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    fn services_of(&self, provider: &str) -> Vec<String> {
        self.services
            .iter()
            .filter(|entry| entry.provider == provider)
            .map(|entry| entry.key().clone())
            .collect()
    }
}

impl fmt::Debug for DefaultServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("DefaultServiceRegistry")
            .field("services", &names)
            .finish()
    }
}
