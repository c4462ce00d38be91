//! Error types for the settings randomizer.
//!
//! Library code returns these typed errors; the binary and the configuration
//! layer wrap them in `anyhow` with context.

use thiserror::Error;

/// Errors raised while addressing settings fields by dotted path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// The qualified path does not name a field of the schema.
    #[error("unknown settings path: {0}")]
    UnknownPath(String),

    /// A bare field name matched zero or several modules.
    #[error("field '{path}' is unknown or ambiguous ({matches} matching modules)")]
    UnknownOrAmbiguousField { path: String, matches: usize },

    /// A write carried a value of the wrong kind for the field.
    #[error("type mismatch writing {path}: expected {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
}

/// Errors raised by profile storage, discovery and selection.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Selection of a name the registry does not know.
    #[error("no profile named '{0}' is registered")]
    MalformedProfileSelection(String),

    /// A discovered file would shadow a built-in profile.
    #[error("profile file '{0}' collides with a built-in profile name")]
    ProfileFileCollision(String),

    /// A profile name that is not a single plain file name.
    #[error("invalid profile name '{0}'")]
    InvalidProfileName(String),

    #[error("profile storage error for '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error of a randomization run.
#[derive(Debug, Error)]
pub enum RandomizerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// A profile directive failed; carries the profile and line for the operator.
    #[error("profile '{profile}' line {line}: {source}")]
    Directive {
        profile: String,
        line: usize,
        #[source]
        source: SettingsError,
    },
}

pub type Result<T> = std::result::Result<T, RandomizerError>;
