// State management module
//
// This module provides the StateManager which owns the ProfileRegistry behind
// Arc<RwLock<T>>, reports every change synchronously to registered hooks and
// broadcasts it to subscribers.

use crate::error::{ProfileError, Result as RunResult};
use crate::metrics::Metrics;
use crate::models::{GenerationSettings, GlobalSettings};
use crate::profile::{GenerationProfile, ProfileRegistry, ProfileStore};
use crate::services::engine::{GenerationHook, RandomizationEngine, RunReport};
use crate::services::settings_log;
use rand::RngCore;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when the registry is modified
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A profile name was added to the registry
    ProfileRegistered { name: String },

    /// A different profile became the current selection
    ProfileSelected { name: String },

    /// A persisted selection was unknown and the default was used instead
    SelectionReset { requested: String },
}

/// Callback run synchronously, in registration order, after every change.
pub type StateHook = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Owner of the profile registry and current selection
///
/// This is the explicit replacement for process-wide profile state:
/// - Provides thread-safe access to [`ProfileRegistry`] via `Arc<RwLock<T>>`
/// - Detects changes and returns them from every mutation
/// - Runs hooks added with [`on_change()`](Self::on_change) after the write
///   lock is released, so hooks may read the state
/// - Broadcasts changes on a tokio channel to any number of subscribers
pub struct StateManager {
    /// The registry protected by RwLock for thread-safe access
    state: Arc<RwLock<ProfileRegistry>>,

    /// Storage backing file-based profiles
    store: Arc<dyn ProfileStore>,

    /// Synchronous post-change hooks
    hooks: Arc<RwLock<Vec<StateHook>>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,

    metrics: Arc<Metrics>,
}

impl StateManager {
    /// Create a new StateManager with only the built-in profiles known
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(ProfileRegistry::new())),
            store,
            hooks: Arc::new(RwLock::new(Vec::new())),
            state_tx,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Get a copy of the current registry
    pub fn snapshot(&self) -> ProfileRegistry {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Execute a function with read access to the registry
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ProfileRegistry) -> R,
    {
        let state = self.state.read().expect("state lock poisoned");
        f(&state)
    }

    /// Apply an infallible update and emit change events
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ProfileRegistry),
    {
        let changes = {
            let mut state = self.state.write().expect("state lock poisoned");
            let old_state = state.clone();
            update_fn(&mut state);
            detect_changes(&old_state, &state)
        };

        self.emit(&changes);
        changes
    }

    /// Apply a fallible update
    ///
    /// On error the registry is restored to its previous value and nothing is
    /// emitted.
    pub fn try_update<F, T, E>(&self, update_fn: F) -> Result<(T, Vec<StateChange>), E>
    where
        F: FnOnce(&mut ProfileRegistry, &dyn ProfileStore) -> Result<T, E>,
    {
        let (value, changes) = {
            let mut state = self.state.write().expect("state lock poisoned");
            let old_state = state.clone();

            match update_fn(&mut state, self.store.as_ref()) {
                Ok(value) => {
                    let changes = detect_changes(&old_state, &state);
                    (value, changes)
                }
                Err(e) => {
                    *state = old_state;
                    return Err(e);
                }
            }
        };

        self.emit(&changes);
        Ok((value, changes))
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Register a hook run synchronously after every change
    ///
    /// Hooks may read or mutate the state and register further hooks; a hook
    /// added while changes are being emitted first runs on the next change.
    pub fn on_change<F>(&self, hook: F)
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.hooks
            .write()
            .expect("hook lock poisoned")
            .push(Arc::new(hook));
    }

    fn emit(&self, changes: &[StateChange]) {
        if changes.is_empty() {
            return;
        }

        // Snapshot so hooks run without the hook lock held
        let hooks: Vec<StateHook> = self.hooks.read().expect("hook lock poisoned").clone();
        for change in changes {
            for hook in hooks.iter() {
                hook(change);
            }
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }
    }

    // Convenience methods for the registry lifecycle

    /// Register every profile found in storage. Name collisions with the
    /// built-in profiles are skipped and returned alongside the changes.
    pub fn discover_profiles(
        &self,
    ) -> std::result::Result<(Vec<ProfileError>, Vec<StateChange>), ProfileError> {
        self.try_update(|registry, store| registry.discover(store))
    }

    /// Add a profile, storing its content when given
    pub fn register_profile(
        &self,
        name: &str,
        content: Option<&[String]>,
    ) -> std::result::Result<Vec<StateChange>, ProfileError> {
        let (_, changes) =
            self.try_update(|registry, store| registry.register(name, content, store))?;
        Ok(changes)
    }

    /// Select a known profile
    pub fn select_profile(&self, name: &str) -> std::result::Result<Vec<StateChange>, ProfileError> {
        let (_, changes) = self.try_update(|registry, _| registry.select(name))?;
        tracing::info!("Selected settings profile {}", name);
        Ok(changes)
    }

    /// Apply the persisted selection loaded at startup
    pub fn restore_selection(&self, settings: &GlobalSettings) -> Vec<StateChange> {
        let (restored, mut changes) = {
            let mut state = self.state.write().expect("state lock poisoned");
            let old_state = state.clone();
            let restored = state.restore(settings);
            (restored, detect_changes(&old_state, &state))
        };

        if !restored {
            changes.push(StateChange::SelectionReset {
                requested: settings.current_profile.clone(),
            });
        }

        self.emit(&changes);
        changes
    }

    /// Selection to persist on exit
    pub fn global_settings(&self) -> GlobalSettings {
        self.read(ProfileRegistry::global_settings)
    }

    pub fn current_profile(&self) -> GenerationProfile {
        self.read(ProfileRegistry::current_profile)
    }

    pub fn store(&self) -> &dyn ProfileStore {
        self.store.as_ref()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Write the profile line the host adds to its settings log
    pub fn write_settings_log<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let current = self.read(|registry| registry.current().to_string());
        settings_log::write_settings_log(writer, &current)
    }
}

impl GenerationHook for StateManager {
    fn before_generation(
        &self,
        settings: &mut GenerationSettings,
        rng: &mut dyn RngCore,
    ) -> RunResult<RunReport> {
        let profile = self.current_profile();
        RandomizationEngine::new(self.store.as_ref())
            .with_metrics(&self.metrics)
            .run(settings, rng, &profile)
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            hooks: Arc::clone(&self.hooks),
            state_tx: self.state_tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Detect what changed between two registries
fn detect_changes(old: &ProfileRegistry, new: &ProfileRegistry) -> Vec<StateChange> {
    let mut changes: Vec<StateChange> = new
        .names()
        .filter(|name| !old.contains(name))
        .map(|name| StateChange::ProfileRegistered {
            name: name.to_string(),
        })
        .collect();

    if old.current() != new.current() {
        changes.push(StateChange::ProfileSelected {
            name: new.current().to_string(),
        });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::store::MockProfileStore;
    use std::sync::Mutex;

    fn manager_with(store: MockProfileStore) -> StateManager {
        StateManager::new(Arc::new(store))
    }

    #[test]
    fn test_new_state_manager() {
        let manager = manager_with(MockProfileStore::new());
        assert_eq!(manager.current_profile(), GenerationProfile::Disabled);
        assert_eq!(manager.read(ProfileRegistry::len), 2);
    }

    #[test]
    fn test_select_emits_change() {
        let manager = manager_with(MockProfileStore::new());
        let mut rx = manager.subscribe();

        let changes = manager.select_profile("Full").unwrap();

        assert_eq!(
            changes,
            vec![StateChange::ProfileSelected {
                name: "Full".to_string()
            }]
        );
        assert_eq!(rx.try_recv().unwrap(), changes[0]);
    }

    #[test]
    fn test_reselecting_same_profile_emits_nothing() {
        let manager = manager_with(MockProfileStore::new());
        assert!(manager.select_profile("Disabled").unwrap().is_empty());
    }

    #[test]
    fn test_failed_selection_keeps_state_and_emits_nothing() {
        let manager = manager_with(MockProfileStore::new());
        let mut rx = manager.subscribe();

        assert!(manager.select_profile("Nope").is_err());
        assert_eq!(manager.current_profile(), GenerationProfile::Disabled);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_hooks_run_in_order_and_can_read_state() {
        let manager = manager_with(MockProfileStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = manager.clone();
        let log = Arc::clone(&seen);
        manager.on_change(move |_| {
            let current = reader.read(|r| r.current().to_string());
            log.lock().unwrap().push(format!("first:{current}"));
        });
        let log = Arc::clone(&seen);
        manager.on_change(move |_| log.lock().unwrap().push("second".to_string()));

        manager.select_profile("Full").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first:Full".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_hook_can_register_another_hook() {
        let manager = manager_with(MockProfileStore::new());
        let late_calls = Arc::new(Mutex::new(0));

        let registrar = manager.clone();
        let counter = Arc::clone(&late_calls);
        manager.on_change(move |_| {
            let counter = Arc::clone(&counter);
            registrar.on_change(move |_| *counter.lock().unwrap() += 1);
        });

        manager.select_profile("Full").unwrap();
        assert_eq!(*late_calls.lock().unwrap(), 0);

        manager.select_profile("Disabled").unwrap();
        assert_eq!(*late_calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_discover_profiles_emits_registrations() {
        let mut store = MockProfileStore::new();
        store
            .expect_list()
            .returning(|| Ok(vec!["Costs".to_string(), "Disabled".to_string()]));
        let manager = manager_with(store);

        let (skipped, changes) = manager.discover_profiles().unwrap();

        assert_eq!(skipped.len(), 1);
        assert_eq!(
            changes,
            vec![StateChange::ProfileRegistered {
                name: "Costs".to_string()
            }]
        );
    }

    #[test]
    fn test_restore_unknown_selection_resets() {
        let manager = manager_with(MockProfileStore::new());
        manager.select_profile("Full").unwrap();

        let changes = manager.restore_selection(&GlobalSettings {
            current_profile: "Vanished".to_string(),
        });

        assert_eq!(
            changes,
            vec![
                StateChange::ProfileSelected {
                    name: "Disabled".to_string()
                },
                StateChange::SelectionReset {
                    requested: "Vanished".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_settings_log_line() {
        let manager = manager_with(MockProfileStore::new());
        manager.select_profile("Full").unwrap();

        let mut out = Vec::new();
        manager.write_settings_log(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Settings Randomization Profile: Full\n\n"
        );
    }

    #[test]
    fn test_clone_shares_state() {
        let manager1 = manager_with(MockProfileStore::new());
        let manager2 = manager1.clone();

        manager1.select_profile("Full").unwrap();

        assert_eq!(manager2.current_profile(), GenerationProfile::Full);
    }
}
