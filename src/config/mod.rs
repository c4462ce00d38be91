use crate::models::{GenerationSettings, GlobalSettings};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the persisted profile selection.
pub const GLOBAL_SETTINGS_FILE: &str = "SettingsRandomizer.GlobalSettings.yaml";

/// Prefix of environment variables overriding the persisted selection,
/// e.g. `SETTINGS_RANDO_CURRENT_PROFILE`.
pub const ENV_PREFIX: &str = "SETTINGS_RANDO";

const CURRENT_PROFILE_KEY: &str = "current_profile";

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages:
/// - Global settings (`SettingsRandomizer.GlobalSettings.yaml`): the selected
///   profile, loaded on start and saved on exit
/// - Generation settings files passed in and written out by the CLI
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    global_settings_path: Utf8PathBuf,
    env_source: Option<config::Map<String, String>>,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory holding the global settings file
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            global_settings_path: config_dir.join(GLOBAL_SETTINGS_FILE),
            config_dir,
            env_source: None,
        })
    }

    /// Read overrides from the given map instead of the process environment.
    pub fn with_env_source(mut self, source: config::Map<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    /// Load the global settings.
    ///
    /// # Returns
    /// The persisted selection, or the default if the file doesn't exist,
    /// with `SETTINGS_RANDO_CURRENT_PROFILE` applied on top
    pub fn load_global_settings(&self) -> Result<GlobalSettings> {
        let mut settings = if self.global_settings_path.exists() {
            let file_contents = fs::read_to_string(&self.global_settings_path).with_context(|| {
                format!("Failed to read global settings: {}", self.global_settings_path)
            })?;

            let settings: GlobalSettings =
                serde_yaml_ng::from_str(&file_contents).with_context(|| {
                    format!("Failed to parse global settings: {}", self.global_settings_path)
                })?;

            tracing::info!("Loaded global settings from {}", self.global_settings_path);
            settings
        } else {
            tracing::warn!(
                "Global settings file not found at {}, using defaults",
                self.global_settings_path
            );
            GlobalSettings::default()
        };

        if let Some(profile) = self.env_override()? {
            tracing::info!("Profile selection overridden from environment: {}", profile);
            settings.current_profile = profile;
        }

        Ok(settings)
    }

    /// Save the global settings.
    pub fn save_global_settings(&self, settings: &GlobalSettings) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(settings)
            .context("Failed to serialize global settings to YAML")?;

        fs::write(&self.global_settings_path, yaml_string).with_context(|| {
            format!("Failed to write global settings: {}", self.global_settings_path)
        })?;

        tracing::info!("Saved global settings to {}", self.global_settings_path);
        Ok(())
    }

    /// Save the global settings at the end of a session.
    ///
    /// The session's own error takes precedence over a failed save, which is
    /// then only logged.
    pub fn finish_session<T>(&self, settings: &GlobalSettings, result: Result<T>) -> Result<T> {
        match (self.save_global_settings(settings), result) {
            (Ok(()), result) => result,
            (Err(save_err), Ok(_)) => Err(save_err),
            (Err(save_err), Err(e)) => {
                tracing::error!("Failed to save global settings: {:#}", save_err);
                Err(e)
            }
        }
    }

    /// Load a generation settings file. Missing fields take their defaults.
    pub fn load_generation_settings(&self, path: &Utf8Path) -> Result<GenerationSettings> {
        let file_contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read generation settings: {}", path))?;

        let settings: GenerationSettings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse generation settings: {}", path))?;

        tracing::info!("Loaded generation settings from {}", path);
        Ok(settings)
    }

    /// Save a generation settings file.
    pub fn save_generation_settings(
        &self,
        path: &Utf8Path,
        settings: &GenerationSettings,
    ) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(settings)
            .context("Failed to serialize generation settings to YAML")?;

        fs::write(path, yaml_string)
            .with_context(|| format!("Failed to write generation settings: {}", path))?;

        tracing::info!("Saved generation settings to {}", path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn global_settings_path(&self) -> &Utf8Path {
        &self.global_settings_path
    }

    fn env_override(&self) -> Result<Option<String>> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .source(self.env_source.clone());

        let overrides = config::Config::builder()
            .add_source(environment)
            .build()
            .context("Failed to read environment overrides")?;

        match overrides.get_string(CURRENT_PROFILE_KEY) {
            Ok(profile) if !profile.trim().is_empty() => Ok(Some(profile)),
            Ok(_) | Err(config::ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e).context("Invalid profile override"),
        }
    }
}
