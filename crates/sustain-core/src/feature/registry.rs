use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::component::ComponentRef;
use crate::feature::{FeatureEntry, FeatureValue, Features};

/// A loaded component together with its registry entry
#[derive(Clone, Debug)]
pub struct LoadedComponent {
    pub component: ComponentRef,
    pub entry: FeatureEntry,
}

/// Concurrent map from component id to its features.
///
/// Presence of an entry is what makes a component loaded. Handles are cloned out of
/// the map before use, so no shard lock is held while callers work with them.
#[derive(Default)]
pub struct FeatureRegistry {
    entries: DashMap<String, LoadedComponent>,
}

impl FeatureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a component has an entry
    pub fn is_loaded(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Record a component as loaded through one of the sentinels
    pub fn insert_sentinel(&self, component: &ComponentRef, sentinel: FeatureEntry) {
        debug_assert!(sentinel.is_sentinel());
        self.entries.insert(
            component.id().to_string(),
            LoadedComponent { component: component.clone(), entry: sentinel },
        );
    }

    /// Drop the entry of a component
    pub fn remove(&self, id: &str) -> Option<LoadedComponent> {
        self.entries.remove(id).map(|(_, loaded)| loaded)
    }

    /// The entry of a component
    pub fn entry(&self, id: &str) -> Option<FeatureEntry> {
        self.entries.get(id).map(|loaded| loaded.entry.clone())
    }

    /// The feature bag of a component, if it has one
    pub fn features(&self, id: &str) -> Option<Arc<Features>> {
        self.entries
            .get(id)
            .and_then(|loaded| loaded.entry.features().cloned())
    }

    /// A single feature value
    pub fn get_feature(&self, id: &str, name: &str) -> Option<FeatureValue> {
        self.features(id).and_then(|features| features.get(name))
    }

    /// Create or update a feature, creating the bag on first use.
    ///
    /// A new bag is published with its first slot already set. A sentinel entry is
    /// replaced by a bag; the component stays loaded.
    pub fn register_feature(
        &self,
        component: &ComponentRef,
        name: &str,
        value: FeatureValue,
    ) -> Option<FeatureValue> {
        match self.entries.entry(component.id().to_string()) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get().entry.features().cloned();
                match existing {
                    Some(features) => {
                        drop(occupied);
                        features.set(name, value)
                    }
                    None => {
                        occupied.get_mut().entry =
                            FeatureEntry::Resolved(Arc::new(Features::with_feature(name, value)));
                        None
                    }
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(LoadedComponent {
                    component: component.clone(),
                    entry: FeatureEntry::Resolved(Arc::new(Features::with_feature(name, value))),
                });
                None
            }
        }
    }

    /// Give a component an empty bag unless it already has an entry
    pub fn ensure_entry(&self, component: &ComponentRef) {
        self.entries
            .entry(component.id().to_string())
            .or_insert_with(|| LoadedComponent {
                component: component.clone(),
                entry: FeatureEntry::Resolved(Arc::new(Features::new())),
            });
    }

    /// Remove a single feature; the component stays loaded
    pub fn remove_feature(&self, id: &str, name: &str) -> Option<FeatureValue> {
        self.features(id).and_then(|features| features.remove(name))
    }

    /// Snapshot of every loaded component
    pub fn loaded_components(&self) -> Vec<ComponentRef> {
        self.entries
            .iter()
            .map(|loaded| loaded.component.clone())
            .collect()
    }

    /// Snapshot of the loaded components whose bag has the named feature
    pub fn components_with(&self, name: &str) -> Vec<ComponentRef> {
        let snapshot: Vec<(ComponentRef, Arc<Features>)> = self
            .entries
            .iter()
            .filter_map(|loaded| {
                loaded
                    .entry
                    .features()
                    .map(|features| (loaded.component.clone(), features.clone()))
            })
            .collect();
        snapshot
            .into_iter()
            .filter(|(_, features)| features.contains(name))
            .map(|(component, _)| component)
            .collect()
    }

    /// Number of loaded components
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
