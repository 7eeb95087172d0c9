#![cfg(test)]

use crate::kernel::error::Error;
use crate::loader::{ComponentContext, ComponentLoader};
use crate::resolver::ResolverPhase;

use super::common::{event_log, events_of, ids, ids_for, Fixture, RecordingResolver};

#[test]
fn test_dependencies_load_before_dependents() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");
    fixture.regular("b");
    fixture.regular("c");
    fixture.depends("a", "b");
    fixture.depends("b", "c");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&a).expect("load should succeed");

    assert_eq!(ids_for(&events, "rec", ResolverPhase::Resolve), vec!["c", "b", "a"]);
    for id in ["a", "b", "c"] {
        assert!(loader.is_loaded(&fixture.get(id)), "{} should be loaded", id);
    }
}

#[test]
fn test_parent_loads_before_dependencies() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let child = fixture.regular("child");
    fixture.regular("parent");
    fixture.regular("dep1");
    fixture.regular("dep2");
    fixture.parent("child", "parent");
    fixture.depends("child", "dep1");
    fixture.depends("child", "dep2");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&child).unwrap();

    assert_eq!(
        ids_for(&events, "rec", ResolverPhase::Resolve),
        vec!["parent", "dep1", "dep2", "child"]
    );
}

#[test]
fn test_load_is_idempotent() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");
    fixture.regular("b");
    fixture.depends("a", "b");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&a).unwrap();
    let first = events.lock().len();
    loader.load(&a).unwrap();
    loader.load(&fixture.get("b")).unwrap();

    assert_eq!(events.lock().len(), first, "second load must not run any resolver");
}

#[test]
fn test_shared_dependency_resolved_once() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let top = fixture.regular("top");
    fixture.regular("left");
    fixture.regular("right");
    fixture.regular("base");
    fixture.depends("top", "left");
    fixture.depends("top", "right");
    fixture.depends("left", "base");
    fixture.depends("right", "base");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&top).unwrap();

    assert_eq!(
        ids_for(&events, "rec", ResolverPhase::Resolve),
        vec!["base", "left", "right", "top"]
    );
}

#[test]
fn test_dependency_cycle_terminates() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");
    fixture.regular("b");
    fixture.depends("a", "b");
    fixture.depends("b", "a");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&a).expect("cyclic graph should load");

    let resolved = ids_for(&events, "rec", ResolverPhase::Resolve);
    assert_eq!(resolved, vec!["b", "a"], "each cycle member is resolved exactly once");
    assert!(loader.is_loaded(&a));
    assert!(loader.is_loaded(&fixture.get("b")));
}

#[test]
fn test_phases_run_as_full_passes() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");

    let loader = fixture.loader_with(vec![
        RecordingResolver::new("second", 20, 10, &events).shared(),
        RecordingResolver::new("first", 10, 20, &events).shared(),
    ]);
    loader.load(&a).unwrap();

    assert_eq!(
        events_of(&events, "a"),
        vec![
            "first:apply-defaults:a",
            "second:apply-defaults:a",
            "first:before-resolve:a",
            "second:before-resolve:a",
            "first:resolve:a",
            "second:resolve:a",
            "first:after-resolve:a",
            "second:after-resolve:a",
        ]
    );
}

#[test]
fn test_non_participants_only_get_defaults() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");

    let loader = fixture.loader_with(vec![
        RecordingResolver::new("always", 10, 10, &events).shared(),
        RecordingResolver::new("never", 20, 20, &events).only_for(&[]).shared(),
    ]);
    loader.load(&a).unwrap();

    assert_eq!(ids_for(&events, "never", ResolverPhase::ApplyDefaults), vec!["a"]);
    assert!(ids_for(&events, "never", ResolverPhase::BeforeResolve).is_empty());
    assert!(ids_for(&events, "never", ResolverPhase::Resolve).is_empty());
    assert!(loader.get_feature(&a, "never").is_none());
    assert!(loader.get_feature(&a, "always").is_some());
}

#[test]
fn test_unload_order_is_independent_of_load_order() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");

    let loader = fixture.loader_with(vec![
        RecordingResolver::new("x", 1, 1, &events).shared(),
        RecordingResolver::new("y", 2, 3, &events).shared(),
        RecordingResolver::new("z", 3, 2, &events).shared(),
    ]);
    loader.load(&a).unwrap();
    events.lock().clear();
    loader.unload(&a).unwrap();

    assert_eq!(*events.lock(), vec!["x:release:a", "z:release:a", "y:release:a"]);
    assert!(!loader.is_loaded(&a));
}

#[test]
fn test_equal_orders_keep_registration_order() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");

    let loader = fixture.loader_with(vec![
        RecordingResolver::new("later-name", 5, 5, &events).shared(),
        RecordingResolver::new("earlier-name", 5, 5, &events).shared(),
    ]);
    loader.load(&a).unwrap();

    let resolved: Vec<String> = events
        .lock()
        .iter()
        .filter(|e| e.contains(":resolve:"))
        .cloned()
        .collect();
    assert_eq!(resolved, vec!["later-name:resolve:a", "earlier-name:resolve:a"]);
}

#[test]
fn test_aggregating_and_plain_skip_resolvers() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let group = fixture.aggregating("group");
    let config = fixture.plain("config");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&group).unwrap();
    loader.load(&config).unwrap();

    assert!(events.lock().is_empty());
    assert!(loader.is_loaded(&group));
    assert!(loader.is_loaded(&config));
    assert!(loader.get_feature(&group, "rec").is_none());

    loader.unload(&group).unwrap();
    loader.unload(&config).unwrap();
    assert!(events.lock().is_empty(), "sentinels are removed without release");
    assert!(!loader.is_loaded(&group));
    assert!(!loader.is_loaded(&config));
}

#[test]
fn test_missing_resource_fails_before_resolvers() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let broken = fixture.without_resource("broken");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    let err = loader.load(&broken).unwrap_err();

    assert!(matches!(err, Error::MissingResource { ref component } if component == "broken"));
    assert!(events.lock().is_empty());
    assert!(!loader.is_loaded(&broken));
}

#[test]
fn test_failed_dependency_stops_dependent() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let app = fixture.regular("app");
    fixture.without_resource("lib");
    fixture.depends("app", "lib");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    assert!(loader.load(&app).is_err());
    assert!(ids_for(&events, "rec", ResolverPhase::Resolve).is_empty());
    assert!(!loader.is_loaded(&app));
}

#[test]
fn test_failed_load_can_be_retried() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");

    let loader = fixture.loader_with(vec![
        RecordingResolver::new("flaky", 10, 10, &events)
            .failing(ResolverPhase::Resolve, "a")
            .shared(),
    ]);
    let err = loader.load(&a).unwrap_err();
    assert!(matches!(
        err,
        Error::ResolverFailure { phase: ResolverPhase::Resolve, .. }
    ));
    assert!(ids_for(&events, "flaky", ResolverPhase::AfterResolve).is_empty());

    // The in-progress mark was released, so a second attempt runs the pipeline again
    events.lock().clear();
    let _ = loader.load(&a);
    assert_eq!(ids_for(&events, "flaky", ResolverPhase::Resolve), vec!["a"]);
}

#[test]
fn test_unload_peels_outward() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let child = fixture.regular("child");
    fixture.regular("parent");
    fixture.regular("dep1");
    fixture.regular("dep2");
    fixture.parent("child", "parent");
    fixture.depends("child", "dep1");
    fixture.depends("child", "dep2");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&child).unwrap();
    loader.unload(&child).unwrap();

    assert_eq!(
        ids_for(&events, "rec", ResolverPhase::Release),
        vec!["child", "dep1", "dep2", "parent"]
    );
    assert!(loader.loaded_components().is_empty());
}

#[test]
fn test_unload_is_idempotent() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.unload(&a).unwrap();
    assert!(events.lock().is_empty(), "unloading a component never loaded is a no-op");

    loader.load(&a).unwrap();
    loader.unload(&a).unwrap();
    loader.unload(&a).unwrap();
    assert_eq!(ids_for(&events, "rec", ResolverPhase::Release), vec!["a"]);
}

#[test]
fn test_unload_cycle_terminates() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let a = fixture.regular("a");
    fixture.regular("b");
    fixture.depends("a", "b");
    fixture.depends("b", "a");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&a).unwrap();
    loader.unload(&a).unwrap();

    assert_eq!(ids_for(&events, "rec", ResolverPhase::Release), vec!["a", "b"]);
}

#[test]
fn test_shutdown_unloads_dependents_first() {
    let mut fixture = Fixture::new();
    let events = event_log();
    let app = fixture.regular("app");
    fixture.regular("lib");
    fixture.regular("base");
    fixture.aggregating("group");
    fixture.parent("lib", "group");
    fixture.depends("app", "lib");
    fixture.depends("lib", "base");

    let loader = fixture.loader_with(vec![RecordingResolver::new("rec", 10, 10, &events).shared()]);
    loader.load(&app).unwrap();
    assert_eq!(loader.loaded_components().len(), 4);

    loader.shutdown().expect("shutdown should succeed");

    assert_eq!(
        ids_for(&events, "rec", ResolverPhase::Release),
        vec!["app", "lib", "base"]
    );
    assert!(loader.loaded_components().is_empty());
}

#[test]
fn test_loaded_components_lists_everything_loaded() {
    let mut fixture = Fixture::new();
    let a = fixture.regular("a");
    fixture.plain("p");
    fixture.depends("a", "p");

    let loader = fixture.bare_loader();
    loader.load(&a).unwrap();

    let mut loaded = ids(&loader.loaded_components());
    loaded.sort();
    assert_eq!(loaded, vec!["a", "p"]);
}
