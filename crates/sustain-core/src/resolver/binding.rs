use std::sync::{Arc, OnceLock, Weak};

use crate::kernel::error::{Error, Result};
use crate::loader::ComponentContext;

/// Bind-once holder of a resolver's loader context.
///
/// Keeps a [`Weak`] reference: the loader owns its resolvers, not the other way round.
#[derive(Default)]
pub struct ResolverBinding {
    context: OnceLock<Weak<dyn ComponentContext>>,
}

impl ResolverBinding {
    /// Create an unbound cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the context; fails with `AlreadyBound` on a second call
    pub fn bind(&self, resolver: &str, context: Weak<dyn ComponentContext>) -> Result<()> {
        self.context.set(context).map_err(|_| Error::AlreadyBound {
            resolver: resolver.to_string(),
        })
    }

    /// Whether `bind` has been called
    pub fn is_bound(&self) -> bool {
        self.context.get().is_some()
    }

    /// The live context; `ContextUnavailable` if unbound or the loader was dropped
    pub fn context(&self, resolver: &str) -> Result<Arc<dyn ComponentContext>> {
        self.context
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::ContextUnavailable {
                resolver: resolver.to_string(),
            })
    }
}
