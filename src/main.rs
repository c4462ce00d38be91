//! Settings Randomizer - command line entry point.
//!
//! # Overview
//!
//! This binary wraps the library for use outside a host generator. It:
//! - Initializes logging (daily log file + console on stderr)
//! - Discovers profile files and restores the persisted selection
//! - Runs one subcommand
//! - Saves the selection and logs run metrics on exit
//!
//! # Files
//!
//! Expected in the config directory (`SettingsRandomizer` by default):
//! - `SettingsRandomizer.GlobalSettings.yaml`: the selected profile
//! - `Profiles/*.txt`: profile files, unless `--profiles-dir` points elsewhere
//! - `logs/`: daily rotating log files

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use settings_rando::logging::{LOG_PREFIX, setup_logging_with_console};
use settings_rando::services::{exchange, write_settings_log};
use settings_rando::{
    APP_NAME, ConfigManager, DirectoryProfileStore, ExchangeData, GenerationHook,
    GenerationProfile, GenerationSettings, ProfileError, RandomizationEngine, StateManager,
    VERSION,
};
use std::fs;
use std::io;
use std::sync::Arc;

const DEFAULT_CONFIG_DIR: &str = "SettingsRandomizer";
const PROFILES_DIR: &str = "Profiles";
const LOG_DIR: &str = "logs";

#[derive(Debug, Parser)]
#[command(name = "settings-rando", version, about = "Profile-driven settings randomizer")]
struct Cli {
    /// Directory holding the persisted selection and logs
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: Utf8PathBuf,

    /// Directory of `<name>.txt` profile files [default: <config-dir>/Profiles]
    #[arg(long, global = true)]
    profiles_dir: Option<Utf8PathBuf>,

    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List known profiles, marking the selected one
    List,

    /// Select the profile used by later runs
    Select { name: String },

    /// Randomize a settings file
    Run {
        /// Generation settings YAML
        #[arg(long)]
        settings: Utf8PathBuf,

        /// Where to write the result [default: stdout]
        #[arg(long)]
        output: Option<Utf8PathBuf>,

        /// Replace the seed from the settings file
        #[arg(long)]
        seed: Option<i32>,

        /// Use this profile for this run only
        #[arg(long)]
        profile: Option<String>,
    },

    /// Write the selected profile as an exchange payload (JSON)
    Export {
        #[arg(long)]
        output: Option<Utf8PathBuf>,
    },

    /// Register and select a profile from an exchange payload (JSON)
    Import { input: Utf8PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging_with_console(
        &cli.config_dir.join(LOG_DIR),
        LOG_PREFIX,
        cli.debug,
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let profiles_dir = cli
        .profiles_dir
        .clone()
        .unwrap_or_else(|| cli.config_dir.join(PROFILES_DIR));

    let state = StateManager::new(Arc::new(DirectoryProfileStore::new(profiles_dir)));
    let (skipped, _) = state
        .discover_profiles()
        .context("Failed to discover profiles")?;
    if !skipped.is_empty() {
        tracing::warn!("Skipped {} profile file(s) with reserved names", skipped.len());
    }

    let global_settings = config_manager.load_global_settings()?;
    state.restore_selection(&global_settings);

    let result = run_command(cli.command, &state, &config_manager);

    // Persist the selection even if the command failed
    let result = config_manager.finish_session(&state.global_settings(), result);
    state.metrics().log_summary();

    if let Err(e) = &result {
        tracing::error!("{} failed: {:#}", APP_NAME, e);
    } else {
        tracing::info!("{} shutdown complete", APP_NAME);
    }
    result
}

fn run_command(command: Command, state: &StateManager, config_manager: &ConfigManager) -> Result<()> {
    match command {
        Command::List => {
            let current = state.current_profile();
            for name in state.read(|registry| {
                registry.names().map(str::to_string).collect::<Vec<_>>()
            }) {
                let marker = if name == current.name() { "*" } else { " " };
                println!("{marker} {name}");
            }
            Ok(())
        }
        Command::Select { name } => {
            state.select_profile(&name)?;
            println!("Selected profile: {name}");
            Ok(())
        }
        Command::Run {
            settings,
            output,
            seed,
            profile,
        } => run_randomization(
            state,
            config_manager,
            &settings,
            output.as_deref(),
            seed,
            profile.as_deref(),
        ),
        Command::Export { output } => {
            let json = ExchangeData::export(state)?.to_json()?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("Failed to write exchange payload: {}", path))?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Command::Import { input } => {
            let json = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read exchange payload: {}", input))?;
            // A literal `null` payload means the sender had randomization disabled
            let data: Option<ExchangeData> = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse exchange payload: {}", input))?;
            exchange::receive(data, state)?;
            println!("Selected profile: {}", state.current_profile().name());
            Ok(())
        }
    }
}

fn run_randomization(
    state: &StateManager,
    config_manager: &ConfigManager,
    settings_path: &Utf8Path,
    output: Option<&Utf8Path>,
    seed: Option<i32>,
    profile: Option<&str>,
) -> Result<()> {
    let mut settings = config_manager.load_generation_settings(settings_path)?;
    if let Some(seed) = seed {
        settings.seed = seed;
    }
    let input = settings.clone();

    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed as u64);

    let profile_name = profile.map_or_else(
        || state.current_profile().name().to_string(),
        str::to_string,
    );
    write_settings_log(&mut io::stderr(), &profile_name)?;

    let result = match profile {
        Some(name) => {
            if !state.read(|registry| registry.contains(name)) {
                bail!(ProfileError::MalformedProfileSelection(name.to_string()));
            }
            RandomizationEngine::new(state.store())
                .with_metrics(state.metrics())
                .run(&mut settings, &mut rng, &GenerationProfile::from_name(name))
        }
        None => state.before_generation(&mut settings, &mut rng),
    };

    if let Err(e) = result {
        log_input_settings(&input);
        return Err(e.into());
    }

    match output {
        Some(path) => config_manager.save_generation_settings(path, &settings)?,
        None => print!(
            "{}",
            serde_yaml_ng::to_string(&settings).context("Failed to serialize settings")?
        ),
    }
    Ok(())
}

/// Dump the settings a failed run started from, for bug reports.
fn log_input_settings(settings: &GenerationSettings) {
    match serde_yaml_ng::to_string(settings) {
        Ok(yaml) => tracing::error!("Settings before the failed run:\n{}", yaml),
        Err(e) => tracing::error!("Could not serialize settings for the error log: {}", e),
    }
}
