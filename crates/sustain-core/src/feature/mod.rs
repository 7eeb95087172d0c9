//! # Sustain Core Features
//!
//! Per-component capability storage.
//!
//! - **[`Features`]**: the named-value bag of one loaded component, with typed
//!   accessors for the three well-known slots ([`LIBRARY_FEATURE`],
//!   [`APPLICATION_FEATURE`], [`SERVICE_FEATURE`]).
//! - **[`FeatureEntry`]**: what the registry stores per component; either a bag or
//!   one of the two sentinels marking aggregating and plain components as loaded.
//! - **[`registry`]**: the concurrent [`FeatureRegistry`] that backs `is_loaded` and
//!   every feature query.
pub mod registry;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::component::{AppContext, ExecutionRealm};

pub use registry::{FeatureRegistry, LoadedComponent};

/// Type-erased feature value
pub type FeatureValue = Arc<dyn Any + Send + Sync>;

/// Slot holding the component's [`ExecutionRealm`]
pub const LIBRARY_FEATURE: &str = "library";

/// Slot holding the component's application [`AppContext`]
pub const APPLICATION_FEATURE: &str = "application";

/// Slot holding the component's service [`AppContext`]
pub const SERVICE_FEATURE: &str = "service";

/// Named features of one loaded component.
///
/// Every slot is written on its own, so readers may see a partially resolved
/// component while its resolvers are still running.
#[derive(Default)]
pub struct Features {
    slots: RwLock<HashMap<String, FeatureValue>>,
}

impl Features {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bag holding a single feature
    pub fn with_feature(name: &str, value: FeatureValue) -> Self {
        let features = Self::new();
        features.set(name, value);
        features
    }

    /// Get a feature value
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.slots.read().get(name).cloned()
    }

    /// Get a feature value as a concrete type
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.get(name).and_then(|value| value.downcast::<T>().ok())
    }

    /// Set a feature value, returning the previous one
    pub fn set(&self, name: &str, value: FeatureValue) -> Option<FeatureValue> {
        self.slots.write().insert(name.to_string(), value)
    }

    /// Remove a feature value
    pub fn remove(&self, name: &str) -> Option<FeatureValue> {
        self.slots.write().remove(name)
    }

    /// Check if a feature is set
    pub fn contains(&self, name: &str) -> bool {
        self.slots.read().contains_key(name)
    }

    /// Names of all set features
    pub fn names(&self) -> Vec<String> {
        self.slots.read().keys().cloned().collect()
    }

    /// Number of set features
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether no feature is set
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// The execution realm slot
    pub fn library(&self) -> Option<ExecutionRealm> {
        self.get(LIBRARY_FEATURE)
            .and_then(|value| value.downcast_ref::<ExecutionRealm>().cloned())
    }

    /// The application context slot
    pub fn application(&self) -> Option<AppContext> {
        self.get(APPLICATION_FEATURE)
            .and_then(|value| value.downcast_ref::<AppContext>().cloned())
    }

    /// The service context slot
    pub fn service(&self) -> Option<AppContext> {
        self.get(SERVICE_FEATURE)
            .and_then(|value| value.downcast_ref::<AppContext>().cloned())
    }
}

impl fmt::Debug for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Features")
            .field("slots", &self.names())
            .finish()
    }
}

/// Registry entry of a loaded component
#[derive(Clone, Debug)]
pub enum FeatureEntry {
    /// Loaded aggregating component; carries no features
    Aggregating,
    /// Loaded plain component; carries no features
    Plain,
    /// Component with a feature bag
    Resolved(Arc<Features>),
}

impl FeatureEntry {
    /// The feature bag, unless this is a sentinel
    pub fn features(&self) -> Option<&Arc<Features>> {
        match self {
            FeatureEntry::Resolved(features) => Some(features),
            FeatureEntry::Aggregating | FeatureEntry::Plain => None,
        }
    }

    /// Whether this entry is one of the two sentinels
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, FeatureEntry::Resolved(_))
    }
}
