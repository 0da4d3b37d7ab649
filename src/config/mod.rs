// Configuration management module
// Loads, validates and persists the TOML settings file

pub mod interactive;
pub mod settings;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    Config, ConfigError, FaqConfig, FaqSourceKind, IndexBackend, IndexConfig, OllamaConfig,
    ServerConfig,
};
