// Settings Randomizer - profile-driven randomization of generation settings
//
// This is the library crate containing the settings schema, profile handling
// and the randomization engine. The binary crate (main.rs) provides the CLI.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod profile;
pub mod schema;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{ProfileError, RandomizerError, SettingsError};
pub use models::{GenerationSettings, GlobalSettings};
pub use profile::{DirectoryProfileStore, GenerationProfile, ProfileRegistry, ProfileStore};
pub use services::{ExchangeData, GenerationHook, RandomizationEngine, RunOutcome, RunReport};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
