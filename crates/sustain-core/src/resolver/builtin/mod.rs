//! The three resolvers every [`DefaultComponentLoader`](crate::loader::DefaultComponentLoader)
//! registers at construction. They are ordinary [`FeatureResolver`](super::FeatureResolver)
//! implementations; only their registration order is special.
//!
//! | resolver | load | unload | participates when |
//! |---|---|---|---|
//! | [`StaticFeatureResolver`] | 10 | 100 | every regular component |
//! | [`ApplicationFeatureResolver`] | 30 | 70 | resource has the application descriptor |
//! | [`ServiceFeatureResolver`] | 50 | 30 | resource has the service descriptor |
pub mod application;
pub mod service;
pub mod static_feature;

pub use application::ApplicationFeatureResolver;
pub use service::ServiceFeatureResolver;
pub use static_feature::StaticFeatureResolver;

use crate::component::ComponentRef;

/// Parent first, then dependencies in declaration order
fn requirements(component: &ComponentRef) -> Vec<ComponentRef> {
    let mut required: Vec<ComponentRef> = component.parent().into_iter().collect();
    required.extend(component.depended_components());
    required
}
