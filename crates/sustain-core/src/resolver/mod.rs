//! # Sustain Core Feature Resolvers
//!
//! Resolvers attach capabilities to regular components while they are loaded and
//! take them away again when they are unloaded.
//!
//! ## Phase protocol
//!
//! For a component being loaded, every registered resolver, in load order, gets
//! [`apply_defaults`](FeatureResolver::apply_defaults) followed by
//! [`has_feature`](FeatureResolver::has_feature). The resolvers answering `true`
//! then run three full passes: `before_resolve`, `resolve`, `after_resolve`. All
//! participants finish one pass before any of them starts the next.
//!
//! On unload every resolver, in unload order, whose `has_feature` still answers
//! `true` gets [`release`](FeatureResolver::release).
//!
//! ## Submodules
//!
//! - **[`chain`]**: [`ResolverChain`], the two independent orderings.
//! - **[`binding`]**: [`ResolverBinding`], the bind-once context cell.
//! - **[`factory`]**: host hooks used by the built-ins to build opaque handles.
//! - **[`builtin`]**: the static, application and service resolvers every loader
//!   starts with.
pub mod binding;
pub mod builtin;
pub mod chain;
pub mod factory;

use std::fmt;
use std::sync::Weak;

use crate::component::ComponentRef;
use crate::kernel::error::Result;
use crate::loader::ComponentContext;

pub use binding::ResolverBinding;
pub use builtin::{ApplicationFeatureResolver, ServiceFeatureResolver, StaticFeatureResolver};
pub use chain::ResolverChain;
pub use factory::{ApplicationFactory, RealmFactory, ServiceContextFactory};

/// A step of the resolver protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverPhase {
    ApplyDefaults,
    BeforeResolve,
    Resolve,
    AfterResolve,
    Release,
}

impl fmt::Display for ResolverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolverPhase::ApplyDefaults => "apply-defaults",
            ResolverPhase::BeforeResolve => "before-resolve",
            ResolverPhase::Resolve => "resolve",
            ResolverPhase::AfterResolve => "after-resolve",
            ResolverPhase::Release => "release",
        };
        f.write_str(name)
    }
}

/// Plugin contributing one kind of feature to eligible components
pub trait FeatureResolver: Send + Sync {
    /// Unique name of the resolver
    fn name(&self) -> &str;

    /// Position in the load ordering; lower runs first
    fn load_order(&self) -> i32;

    /// Position in the unload ordering; lower runs first
    fn unload_order(&self) -> i32;

    /// Called once when the resolver is registered with a loader.
    /// The default implementation keeps no reference to the context.
    fn bind(&self, _context: Weak<dyn ComponentContext>) -> Result<()> {
        Ok(())
    }

    /// Populate default configuration for a component, whether or not this
    /// resolver will take part in resolving it.
    fn apply_defaults(&self, _component: &ComponentRef) -> Result<()> {
        Ok(())
    }

    /// Whether this resolver takes part in resolving (or releasing) the component
    fn has_feature(&self, component: &ComponentRef) -> bool;

    /// First pass over the participants
    fn before_resolve(&self, _component: &ComponentRef) -> Result<()> {
        Ok(())
    }

    /// Second pass over the participants; attaches the feature
    fn resolve(&self, component: &ComponentRef) -> Result<()>;

    /// Third pass over the participants
    fn after_resolve(&self, _component: &ComponentRef) -> Result<()> {
        Ok(())
    }

    /// Tear down what `resolve` attached
    fn release(&self, component: &ComponentRef) -> Result<()>;
}
