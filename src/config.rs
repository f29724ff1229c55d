pub const APP_ID: &str = "com.neuraops.Assistant";
pub const APP_NAME: &str = "NeuraOps AI Assistant";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the settings file used by the host.
pub const SETTINGS_ENV: &str = "NEURAOPS_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "neuraops-assistant.json";
