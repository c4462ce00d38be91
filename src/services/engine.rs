//! The randomization engine.
//!
//! A run takes the host's settings, randomizes a working copy, reshapes a few
//! fields whose uniform draws make poor seeds, and then (for file-backed
//! profiles) merges the randomized and original trees field by field as the
//! profile directs. The caller's settings are only replaced once the whole run
//! has succeeded.

use crate::error::{RandomizerError, Result, SettingsError};
use crate::metrics::Metrics;
use crate::models::settings::COST_PAIRS;
use crate::models::{GenerationSettings, StartCharms, StartMisc, StartMovement, StartStags};
use crate::profile::{GenerationProfile, MergeMode, ProfileDirective, ProfileStore, parse};
use crate::schema::{FieldKind, Value, resolve, schema};
use crate::services::sampler;
use rand::{Rng, RngCore};

/// Chance that the starting geo is exactly zero.
const START_GEO_ZERO_CHANCE: f64 = 0.5;
const START_GEO_SHAPE: f64 = 2.0;
const START_GEO_LIMIT: f64 = 4096.0;

/// Mimic replacement counts are drawn from `[0, MIMIC_REPLACEMENT_LIMIT)`.
const MIMIC_REPLACEMENT_LIMIT: i32 = 46;

const PROGRESSION_DEPTH_MODULE: &str = "progression_depth";
const PROGRESSION_DEPTH_SHAPE: f64 = 2.0;
const PROGRESSION_DEPTH_LIMIT: f64 = 10.0;

/// What a run did to the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// "Disabled" was selected; settings were returned untouched.
    Unchanged,
    /// "Full" was selected; no profile merge was applied.
    FullyRandomized,
    /// A profile file was merged over the randomized settings.
    ProfileApplied,
}

/// Counts from the profile merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    /// Field references applied in Include mode.
    pub included: usize,
    /// Field references applied in Exclude mode.
    pub excluded: usize,
    /// `INCLUDE`/`EXCLUDE` lines seen.
    pub mode_switches: usize,
    /// Mode in effect after the last directive.
    pub final_mode: MergeMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub profile: String,
    pub outcome: RunOutcome,
    pub merge: Option<MergeSummary>,
}

/// Extension point invoked by the host generator with its mutable settings
/// and random source before generation proceeds.
pub trait GenerationHook {
    fn before_generation(
        &self,
        settings: &mut GenerationSettings,
        rng: &mut dyn RngCore,
    ) -> Result<RunReport>;
}

/// Runs randomization for one generation attempt.
pub struct RandomizationEngine<'a> {
    store: &'a dyn ProfileStore,
    metrics: Option<&'a Metrics>,
}

impl<'a> RandomizationEngine<'a> {
    pub fn new(store: &'a dyn ProfileStore) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: &'a Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Randomize `settings` under `profile`.
    ///
    /// On error the settings are left exactly as they were passed in.
    pub fn run<R: Rng + ?Sized>(
        &self,
        settings: &mut GenerationSettings,
        rng: &mut R,
        profile: &GenerationProfile,
    ) -> Result<RunReport> {
        if let Some(metrics) = self.metrics {
            metrics.record_run_started();
        }

        let result = self.run_profile(settings, rng, profile);

        match &result {
            Ok(report) => {
                tracing::info!(
                    "Settings randomization finished: profile={}, outcome={:?}",
                    report.profile,
                    report.outcome
                );
                if let Some(metrics) = self.metrics {
                    metrics.record_run_completed(report);
                }
            }
            Err(e) => {
                tracing::error!("Settings randomization failed for {}: {}", profile.name(), e);
                if let Some(metrics) = self.metrics {
                    metrics.record_run_failed();
                }
            }
        }

        result
    }

    fn run_profile<R: Rng + ?Sized>(
        &self,
        settings: &mut GenerationSettings,
        rng: &mut R,
        profile: &GenerationProfile,
    ) -> Result<RunReport> {
        let mut report = RunReport {
            profile: profile.name().to_string(),
            outcome: RunOutcome::Unchanged,
            merge: None,
        };

        if *profile == GenerationProfile::Disabled {
            return Ok(report);
        }

        let schema = schema();
        let seed = settings.seed;
        let mut orig = settings.clone();
        let mut working = settings.clone();

        schema.randomize(&mut working, rng)?;
        apply_custom_randomization(&mut working, rng)?;
        schema.clamp(&mut working)?;
        report.outcome = RunOutcome::FullyRandomized;

        if let GenerationProfile::File(name) = profile {
            // Read fresh every run so edits take effect without a restart.
            let lines = self.store.read(name)?;
            let directives = parse(&lines);
            tracing::debug!("Profile {} parsed into {} directives", name, directives.len());

            let summary = merge_profile(name, &directives, &mut working, &mut orig)?;
            schema.clamp(&mut working)?;

            report.outcome = RunOutcome::ProfileApplied;
            report.merge = Some(summary);
        }

        working.seed = seed;
        *settings = working;
        Ok(report)
    }
}

/// Merge `randomized` and `orig` field by field as the directives say.
///
/// Include-mode references pull the randomized value into `orig`;
/// Exclude-mode references push the original value back into `randomized`.
/// If the mode after the last directive is Include, `orig` then replaces
/// every module field of `randomized`.
pub fn merge_profile(
    profile: &str,
    directives: &[ProfileDirective],
    randomized: &mut GenerationSettings,
    orig: &mut GenerationSettings,
) -> Result<MergeSummary> {
    let schema = schema();
    let mut summary = MergeSummary::default();
    let mut mode = MergeMode::default();

    for directive in directives {
        match directive {
            ProfileDirective::ModeSwitch(next) => {
                mode = *next;
                summary.mode_switches += 1;
            }
            ProfileDirective::FieldReference { raw, line } => {
                let directive_error = |source: SettingsError| RandomizerError::Directive {
                    profile: profile.to_string(),
                    line: *line,
                    source,
                };

                let path = resolve(schema, raw).map_err(directive_error)?;
                match mode {
                    MergeMode::Include => {
                        let value = orig
                            .copy_field_from(randomized, path.as_str())
                            .map_err(directive_error)?;
                        tracing::debug!("Include {} = {}", path, value);
                        summary.included += 1;
                    }
                    MergeMode::Exclude => {
                        let value = randomized
                            .copy_field_from(orig, path.as_str())
                            .map_err(directive_error)?;
                        tracing::debug!("Exclude {} = {}", path, value);
                        summary.excluded += 1;
                    }
                }
            }
        }
    }

    summary.final_mode = mode;
    if mode == MergeMode::Include {
        orig.copy_all_to(randomized)?;
    }

    Ok(summary)
}

/// Reshape the fields whose generic draws make poor seeds, then restore
/// cross-field consistency.
pub fn apply_custom_randomization<R: Rng + ?Sized>(
    settings: &mut GenerationSettings,
    rng: &mut R,
) -> std::result::Result<(), SettingsError> {
    let schema = schema();

    let start_geo = if sampler::chance(rng, START_GEO_ZERO_CHANCE) {
        0
    } else {
        sampler::power_law(rng, START_GEO_SHAPE, 0.0, START_GEO_LIMIT).floor() as i32
    };
    settings.start_items.min_geo = start_geo;
    settings.start_items.max_geo = start_geo;

    for (min, max) in COST_PAIRS {
        schema.randomize_field(settings, min, rng)?;
        schema.randomize_field(settings, max, rng)?;
    }
    for (min, max) in COST_PAIRS {
        if schema.order_pair(settings, min, max)? {
            tracing::debug!("Swapped inverted cost pair {} / {}", min, max);
        }
    }

    settings.cursed.mimic_replacements = sampler::uniform_int(rng, 0, MIMIC_REPLACEMENT_LIMIT);

    for field in schema
        .module_fields(PROGRESSION_DEPTH_MODULE)
        .filter(|f| matches!(f.kind, FieldKind::Float { .. }))
    {
        let depth = sampler::power_law(rng, PROGRESSION_DEPTH_SHAPE, 0.0, PROGRESSION_DEPTH_LIMIT);
        field.set(settings, Value::Float(depth as f32))?;
    }

    enforce_consistency(settings);
    Ok(())
}

/// Settings that only make sense together.
pub fn enforce_consistency(settings: &mut GenerationSettings) {
    let novelty = &settings.novelty;
    if novelty.split_claw || novelty.split_cloak || novelty.split_superdash {
        settings.pools.skills = true;
    }

    let start = &settings.start_items;
    if start.horizontal_movement != StartMovement::None
        || start.vertical_movement != StartMovement::None
    {
        settings.pools.skills = true;
    }
    if start.charms != StartCharms::None {
        settings.pools.charms = true;
    }
    if start.stags != StartStags::None {
        settings.pools.stags = true;
    }

    if !settings.pools.skills || !settings.pools.keys {
        settings.start_items.misc_items = StartMisc::None;
    }
}
