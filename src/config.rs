//! run-constant simulation tunables with startup validation

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::POOL_HEADROOM;
use crate::error::{Result, SimError};

/// Everything a session needs to know up front. Values are fixed for the
/// lifetime of a run; bad combinations are rejected once at construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// half extents of the active window, in cells
    pub half_width: i32,
    pub half_height: i32,

    /// chance in [0, 1] that a cell rolls a point of interest
    pub poi_probability: f32,
    /// cumulative threshold for decorative background content: any sample
    /// below it qualifies, including samples that already failed the point
    /// of interest roll only because the coordinate was claimed before
    pub background_probability: f32,
    pub poi_variants: u8,
    pub background_variants: u8,

    /// fleet visual range, in cells
    pub base_visibility: f32,
    /// scanner ring reaches this multiple of the visual range
    pub low_visibility_multiplier: f32,
    /// fraction of the remaining radius gap closed per second
    pub visibility_change_speed: f32,

    /// cells per second along a course
    pub fleet_speed: f32,
    /// how close the fleet must get before a waypoint counts as reached
    pub waypoint_reach_threshold: f32,
    /// reveal animation rate, full fade per 1/fade_speed seconds
    pub fade_speed: f32,

    pub seed: u64,
    /// per-run offset mixed into every noise sample
    pub noise_offset: i32,
    /// override for the record pool ceiling; defaults to twice the window area
    pub pool_capacity: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            half_width: 10,
            half_height: 6,
            poi_probability: 0.1,
            background_probability: 0.2,
            poi_variants: 4,
            background_variants: 6,
            base_visibility: 2.0,
            low_visibility_multiplier: 3.0,
            visibility_change_speed: 0.1,
            fleet_speed: 1.0,
            waypoint_reach_threshold: 0.02,
            fade_speed: 1.0,
            seed: 0,
            noise_offset: 57,
            pool_capacity: None,
        }
    }
}

impl SimConfig {
    /// Parse a TOML config file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config: SimConfig = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn window_width(&self) -> usize {
        (2 * self.half_width + 1) as usize
    }

    pub fn window_height(&self) -> usize {
        (2 * self.half_height + 1) as usize
    }

    pub fn window_area(&self) -> usize {
        self.window_width() * self.window_height()
    }

    /// effective record pool ceiling
    pub fn pool_ceiling(&self) -> usize {
        self.pool_capacity
            .unwrap_or(POOL_HEADROOM * self.window_area())
    }

    /// Reject configurations the simulation cannot run on. Called once when
    /// a session is created; everything after that trusts the values.
    pub fn validate(&self) -> Result<()> {
        if self.half_width < 1 || self.half_height < 1 {
            return Err(SimError::InvalidConfig(format!(
                "window half extents must be at least 1, got {}x{}",
                self.half_width, self.half_height
            )));
        }
        for (name, value) in [
            ("poi_probability", self.poi_probability),
            ("background_probability", self.background_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        if self.poi_variants == 0 || self.background_variants == 0 {
            return Err(SimError::InvalidConfig(
                "variant counts must be at least 1".into(),
            ));
        }
        if self.base_visibility <= 0.0 || self.low_visibility_multiplier < 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "visibility range {} with multiplier {} is degenerate",
                self.base_visibility, self.low_visibility_multiplier
            )));
        }
        if self.pool_ceiling() < self.window_area() {
            return Err(SimError::InvalidConfig(format!(
                "pool capacity {} cannot hold one window of {} cells",
                self.pool_ceiling(),
                self.window_area()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_nonpositive_extents() {
        let config = SimConfig {
            half_width: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let config = SimConfig {
            background_probability: 1.3,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_pool_smaller_than_one_window() {
        let config = SimConfig {
            pool_capacity: Some(3),
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn pool_ceiling_defaults_to_double_window() {
        let config = SimConfig::default();
        assert_eq!(config.pool_ceiling(), 2 * config.window_area());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: SimConfig = toml::from_str("seed = 9\nhalf_width = 4").unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.half_width, 4);
        assert_eq!(config.half_height, SimConfig::default().half_height);
    }
}
