//! Data models for the settings randomizer.
//!
//! - [`GenerationSettings`]: the typed settings tree handed to the host generator
//! - [`GlobalSettings`]: process-wide preferences persisted across sessions
//!   (currently just the selected profile)
//!
//! All models derive `Serialize`/`Deserialize` for YAML persistence.

pub mod config;
pub mod settings;

pub use config::GlobalSettings;
pub use settings::{
    CostSettings, CursedSettings, GenerationSettings, MiscSettings, NoveltySettings, PoolSettings,
    ProgressionDepthSettings, SkipSettings, StartCharms, StartItemSettings, StartMisc,
    StartMovement, StartStags, TransitionMode, TransitionSettings,
};
