//! Configuration file management.

mod manager;

pub use manager::{
    ApiConfig, BanterConfig, ConfigFile, ConfigManager, CustomPersona, DEFAULT_API_KEY_ENV,
    DEFAULT_ENDPOINT, DEFAULT_MODEL, ResolveOptions, ResolvedConfig, resolve_config,
};
