//! Services module - settings randomization logic.
//!
//! The services are framework-agnostic: every input (settings tree, random
//! source, profile storage) is an explicit parameter, which keeps them
//! testable without a host generator.
//!
//! # Components
//!
//! - [`sampler`]: Bernoulli, uniform and power-law draws over a caller's RNG.
//! - [`engine`]: [`RandomizationEngine`], which randomizes a settings tree,
//!   reshapes a few fields, and merges the result with the original as the
//!   selected profile directs.
//! - [`exchange`]: [`ExchangeData`] payload used to share the selected profile.
//! - [`settings_log`]: the profile line written to the host's settings log.
//!
//! # Usage Example
//!
//! ```ignore
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use settings_rando::services::RandomizationEngine;
//!
//! let engine = RandomizationEngine::new(&store);
//! let mut rng = ChaCha8Rng::seed_from_u64(settings.seed as u64);
//! let report = engine.run(&mut settings, &mut rng, &profile)?;
//! ```

pub mod engine;
pub mod exchange;
pub mod sampler;
pub mod settings_log;

pub use engine::{
    GenerationHook, MergeSummary, RandomizationEngine, RunOutcome, RunReport,
    apply_custom_randomization, enforce_consistency, merge_profile,
};
pub use exchange::{ExchangeData, receive};
pub use settings_log::write_settings_log;
