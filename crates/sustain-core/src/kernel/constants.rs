/// Name of the static (execution realm) resolver
pub const STATIC_RESOLVER: &str = "static";

/// Name of the application context resolver
pub const APPLICATION_RESOLVER: &str = "application";

/// Name of the service context resolver
pub const SERVICE_RESOLVER: &str = "service";

/// Load order of the static resolver; realms must exist before anything else runs
pub const STATIC_LOAD_ORDER: i32 = 10;

/// Unload order of the static resolver; realms are torn down last
pub const STATIC_UNLOAD_ORDER: i32 = 100;

/// Load order of the application resolver
pub const APPLICATION_LOAD_ORDER: i32 = 30;

/// Unload order of the application resolver
pub const APPLICATION_UNLOAD_ORDER: i32 = 70;

/// Load order of the service resolver
pub const SERVICE_LOAD_ORDER: i32 = 50;

/// Unload order of the service resolver; exported services go away first
pub const SERVICE_UNLOAD_ORDER: i32 = 30;

/// Resource entry that marks a component as carrying an application context
pub const APPLICATION_DESCRIPTOR: &str = "META-INF/application.toml";

/// Resource entry that marks a component as exporting services
pub const SERVICE_DESCRIPTOR: &str = "META-INF/service.toml";
