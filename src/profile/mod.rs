//! Generation profiles.
//!
//! A profile is either one of two built-in sentinels or a named, line-oriented
//! text file listing which settings fields are spared from (or pulled into)
//! randomization:
//!
//! ```text
//! EXCLUDE                 # default mode; listed fields keep their original value
//! costs.min_charm
//! INCLUDE                 // listed fields take their randomized value
//! .split_claw             # bare name, resolved against the schema
//! ```

pub mod parser;
pub mod registry;
pub mod store;

pub use parser::{MergeMode, ProfileDirective, parse};
pub use registry::ProfileRegistry;
pub use store::{DirectoryProfileStore, ProfileStore};

/// Built-in profile that leaves settings untouched.
pub const NO_SETTINGS_RANDOMIZATION: &str = "Disabled";

/// Built-in profile that randomizes everything with no profile applied.
pub const FULL_SETTINGS_RANDOMIZATION: &str = "Full";

/// The profile selected for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationProfile {
    /// No randomization at all.
    Disabled,
    /// Full randomization, no merge step.
    Full,
    /// Randomization filtered through the named profile file.
    File(String),
}

impl GenerationProfile {
    pub fn from_name(name: &str) -> Self {
        match name {
            NO_SETTINGS_RANDOMIZATION => GenerationProfile::Disabled,
            FULL_SETTINGS_RANDOMIZATION => GenerationProfile::Full,
            other => GenerationProfile::File(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GenerationProfile::Disabled => NO_SETTINGS_RANDOMIZATION,
            GenerationProfile::Full => FULL_SETTINGS_RANDOMIZATION,
            GenerationProfile::File(name) => name,
        }
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self, GenerationProfile::File(_))
    }
}

/// Whether a name is reserved for a built-in profile.
pub fn is_sentinel(name: &str) -> bool {
    name == NO_SETTINGS_RANDOMIZATION || name == FULL_SETTINGS_RANDOMIZATION
}
