use crate::profile::NO_SETTINGS_RANDOMIZATION;
use serde::{Deserialize, Serialize};

/// Global settings from SettingsRandomizer.GlobalSettings.yaml
///
/// Loaded when the process starts and saved when it exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(rename = "CurrentChoice", default = "default_current_profile")]
    pub current_profile: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            current_profile: default_current_profile(),
        }
    }
}

fn default_current_profile() -> String {
    NO_SETTINGS_RANDOMIZATION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_settings_default() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.current_profile, "Disabled");
    }

    #[test]
    fn test_missing_key_uses_default() {
        let settings: GlobalSettings = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(settings.current_profile, "Disabled");
    }

    #[test]
    fn test_yaml_key_name() {
        let yaml = serde_yaml_ng::to_string(&GlobalSettings {
            current_profile: "Chaos".to_string(),
        })
        .unwrap();
        assert!(yaml.contains("CurrentChoice: Chaos"));
    }
}
