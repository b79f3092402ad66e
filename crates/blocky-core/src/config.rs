//! Engine configuration.
//!
//! The attraction distance is process-wide state with a single validating
//! setter. Components never read it implicitly: the drag controller captures
//! the value when a drag starts and hands it to the matcher as an argument.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::BlockyError;

/// Attraction radius used until [`set_attraction_distance`] is called.
pub const DEFAULT_ATTRACTION_DISTANCE: f64 = 30.0;

/// Environment variable read by [`EngineConfig::from_env`].
pub const ATTRACTION_DISTANCE_ENV: &str = "BLOCKY_ATTRACT_DISTANCE";

// f64 bits of DEFAULT_ATTRACTION_DISTANCE.
static ATTRACTION_DISTANCE: AtomicU64 = AtomicU64::new(0x403E_0000_0000_0000);

/// Current process-wide attraction distance.
pub fn attraction_distance() -> f64 {
    f64::from_bits(ATTRACTION_DISTANCE.load(Ordering::Relaxed))
}

/// Replaces the process-wide attraction distance.
///
/// Rejects NaN, infinities and negative values with [`BlockyError::Config`];
/// the previous value stays in effect on error.
pub fn set_attraction_distance(distance: f64) -> Result<f64, BlockyError> {
    let distance = validate_distance(distance)?;
    ATTRACTION_DISTANCE.store(distance.to_bits(), Ordering::Relaxed);
    tracing::debug!(distance, "attraction distance updated");
    Ok(distance)
}

/// Parses and applies a textual attraction distance (e.g. from a settings
/// field or flag).
pub fn set_attraction_distance_str(raw: &str) -> Result<f64, BlockyError> {
    set_attraction_distance(parse_distance(raw)?)
}

fn parse_distance(raw: &str) -> Result<f64, BlockyError> {
    f64::from_str(raw.trim()).map_err(|_| BlockyError::Config {
        reason: format!("attraction distance is not a number: '{raw}'"),
    })
}

fn validate_distance(distance: f64) -> Result<f64, BlockyError> {
    if !distance.is_finite() {
        return Err(BlockyError::Config {
            reason: format!("attraction distance must be finite, got {distance}"),
        });
    }
    if distance < 0.0 {
        return Err(BlockyError::Config {
            reason: format!("attraction distance must be >= 0, got {distance}"),
        });
    }
    Ok(distance)
}

/// Startup configuration for a host process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub attraction_distance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            attraction_distance: DEFAULT_ATTRACTION_DISTANCE,
        }
    }
}

impl EngineConfig {
    /// Reads `BLOCKY_ATTRACT_DISTANCE`, falling back to the default when unset.
    pub fn from_env() -> Result<Self, BlockyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BlockyError> {
        let mut config = EngineConfig::default();
        if let Some(raw) = lookup(ATTRACTION_DISTANCE_ENV) {
            config.attraction_distance = validate_distance(parse_distance(&raw)?)?;
        }
        Ok(config)
    }

    /// Installs this configuration as the process-wide state.
    pub fn apply(&self) -> Result<(), BlockyError> {
        set_attraction_distance(self.attraction_distance)?;
        Ok(())
    }
}
