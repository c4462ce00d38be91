//! Sharing the selected profile with other players.
//!
//! The host serializes [`ExchangeData`] alongside its own settings. The
//! receiving side registers the profile (writing its text to storage if it
//! was included) and selects it.

use crate::error::ProfileError;
use crate::profile::NO_SETTINGS_RANDOMIZATION;
use crate::state::{StateChange, StateManager};
use serde::{Deserialize, Serialize};

/// Exchange payload: the selected profile and, for file-backed profiles,
/// its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeData {
    pub profile_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_text: Option<Vec<String>>,
}

impl ExchangeData {
    pub fn disabled() -> Self {
        Self {
            profile_name: NO_SETTINGS_RANDOMIZATION.to_string(),
            config_text: None,
        }
    }

    /// Snapshot the current selection, reading its lines from storage when
    /// it is file-backed.
    pub fn export(state: &StateManager) -> Result<Self, ProfileError> {
        let profile = state.current_profile();
        let config_text = if profile.is_file_backed() {
            Some(state.store().read(profile.name())?)
        } else {
            None
        };

        tracing::info!("Exporting settings profile {}", profile.name());
        Ok(Self {
            profile_name: profile.name().to_string(),
            config_text,
        })
    }

    /// Register and select the exchanged profile.
    pub fn apply(self, state: &StateManager) -> Result<Vec<StateChange>, ProfileError> {
        tracing::info!("Importing settings profile {}", self.profile_name);

        let mut changes = state.register_profile(&self.profile_name, self.config_text.as_deref())?;
        changes.extend(state.select_profile(&self.profile_name)?);
        Ok(changes)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Apply a received payload. A missing payload selects "Disabled".
pub fn receive(
    data: Option<ExchangeData>,
    state: &StateManager,
) -> Result<Vec<StateChange>, ProfileError> {
    data.unwrap_or_else(ExchangeData::disabled).apply(state)
}
