//! Known profiles and the current selection.

use super::store::validate_profile_name;
use super::{
    FULL_SETTINGS_RANDOMIZATION, GenerationProfile, NO_SETTINGS_RANDOMIZATION, ProfileStore,
    is_sentinel,
};
use crate::error::ProfileError;
use crate::models::GlobalSettings;
use indexmap::IndexSet;

/// Ordered set of profile names plus the selected one.
///
/// The two built-in profiles always come first, followed by discovered and
/// imported names in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    names: IndexSet<String>,
    current: String,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistry {
    pub fn new() -> Self {
        let mut names = IndexSet::new();
        names.insert(FULL_SETTINGS_RANDOMIZATION.to_string());
        names.insert(NO_SETTINGS_RANDOMIZATION.to_string());
        Self {
            names,
            current: NO_SETTINGS_RANDOMIZATION.to_string(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the selected profile.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn current_profile(&self) -> GenerationProfile {
        GenerationProfile::from_name(&self.current)
    }

    /// Add a profile name, writing its content to storage when given.
    ///
    /// Adding a known name leaves the list alone but still replaces the
    /// stored content. Returns whether the name was new. Names that are not
    /// a plain file name are rejected before storage or the list is touched.
    pub fn register(
        &mut self,
        name: &str,
        content: Option<&[String]>,
        store: &dyn ProfileStore,
    ) -> Result<bool, ProfileError> {
        validate_profile_name(name)?;
        if let Some(lines) = content {
            if is_sentinel(name) {
                return Err(ProfileError::ProfileFileCollision(name.to_string()));
            }
            store.write(name, lines)?;
        }

        let added = self.names.insert(name.to_string());
        if added {
            tracing::info!("Registered profile {}", name);
        }
        Ok(added)
    }

    /// Select a known profile. Unknown names are rejected and the previous
    /// selection is kept.
    pub fn select(&mut self, name: &str) -> Result<(), ProfileError> {
        if !self.contains(name) {
            return Err(ProfileError::MalformedProfileSelection(name.to_string()));
        }
        self.current = name.to_string();
        Ok(())
    }

    /// Register every profile found in storage.
    ///
    /// Names colliding with a built-in profile are skipped with a warning and
    /// reported back; they never fail discovery.
    pub fn discover(&mut self, store: &dyn ProfileStore) -> Result<Vec<ProfileError>, ProfileError> {
        let mut skipped = Vec::new();

        for name in store.list()? {
            if is_sentinel(&name) {
                tracing::warn!("Ignoring profile file {}: name is reserved", name);
                skipped.push(ProfileError::ProfileFileCollision(name));
                continue;
            }
            self.names.insert(name);
        }

        tracing::info!("Discovered profiles: {}", self.names.len() - 2);
        Ok(skipped)
    }

    /// Apply a persisted selection, falling back to the "Disabled" profile if
    /// the name is no longer known. Returns `false` when the fallback was used.
    pub fn restore(&mut self, settings: &GlobalSettings) -> bool {
        if self.contains(&settings.current_profile) {
            self.current = settings.current_profile.clone();
            true
        } else {
            tracing::warn!(
                "Persisted profile {} is not available, resetting to {}",
                settings.current_profile,
                NO_SETTINGS_RANDOMIZATION
            );
            self.current = NO_SETTINGS_RANDOMIZATION.to_string();
            false
        }
    }

    /// Selection to persist on exit.
    pub fn global_settings(&self) -> GlobalSettings {
        GlobalSettings {
            current_profile: self.current.clone(),
        }
    }
}
