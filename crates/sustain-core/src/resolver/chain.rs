use std::fmt;
use std::sync::Arc;

use crate::config::ResolverOrderOverride;
use crate::kernel::error::{Error, Result};
use crate::resolver::FeatureResolver;

struct ResolverEntry {
    resolver: Arc<dyn FeatureResolver>,
    load_order: i32,
    unload_order: i32,
}

/// Registered resolvers with their two orderings.
///
/// Resolvers are stored once, in registration order; the load and unload
/// sequences are index lists stable-sorted by their own order field, so ties keep
/// registration order and unload order is never derived from load order.
#[derive(Default)]
pub struct ResolverChain {
    entries: Vec<ResolverEntry>,
    load_sequence: Vec<usize>,
    unload_sequence: Vec<usize>,
}

impl ResolverChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver and re-sort both orderings.
    ///
    /// `overrides` replaces the orders the resolver reports for itself.
    pub fn register(
        &mut self,
        resolver: Arc<dyn FeatureResolver>,
        overrides: Option<&ResolverOrderOverride>,
    ) -> Result<()> {
        let name = resolver.name().to_string();
        if self.contains(&name) {
            return Err(Error::DuplicateResolver { resolver: name });
        }

        let load_order = overrides
            .and_then(|o| o.load_order)
            .unwrap_or_else(|| resolver.load_order());
        let unload_order = overrides
            .and_then(|o| o.unload_order)
            .unwrap_or_else(|| resolver.unload_order());

        self.entries.push(ResolverEntry { resolver, load_order, unload_order });
        self.resort();
        Ok(())
    }

    fn resort(&mut self) {
        let entries = &self.entries;
        self.load_sequence = (0..entries.len()).collect();
        self.load_sequence.sort_by_key(|&i| entries[i].load_order);
        self.unload_sequence = (0..entries.len()).collect();
        self.unload_sequence.sort_by_key(|&i| entries[i].unload_order);
    }

    /// Check if a resolver with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.resolver.name() == name)
    }

    /// Look up a resolver by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn FeatureResolver>> {
        self.entries
            .iter()
            .find(|e| e.resolver.name() == name)
            .map(|e| e.resolver.clone())
    }

    /// Snapshot of the resolvers in load order
    pub fn load_sequence(&self) -> Vec<Arc<dyn FeatureResolver>> {
        self.load_sequence
            .iter()
            .map(|&i| self.entries[i].resolver.clone())
            .collect()
    }

    /// Snapshot of the resolvers in unload order
    pub fn unload_sequence(&self) -> Vec<Arc<dyn FeatureResolver>> {
        self.unload_sequence
            .iter()
            .map(|&i| self.entries[i].resolver.clone())
            .collect()
    }

    /// Effective load order of a resolver
    pub fn load_order_of(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.resolver.name() == name)
            .map(|e| e.load_order)
    }

    /// Effective unload order of a resolver
    pub fn unload_order_of(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.resolver.name() == name)
            .map(|e| e.unload_order)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.resolver.name().to_string())
            .collect()
    }

    /// Number of registered resolvers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no resolver is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let load: Vec<&str> = self
            .load_sequence
            .iter()
            .map(|&i| self.entries[i].resolver.name())
            .collect();
        let unload: Vec<&str> = self
            .unload_sequence
            .iter()
            .map(|&i| self.entries[i].resolver.name())
            .collect();
        f.debug_struct("ResolverChain")
            .field("load", &load)
            .field("unload", &unload)
            .finish()
    }
}
