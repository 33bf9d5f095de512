use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A half-open `[min, max)` interval used for uniform random draws.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> Range<f32> {
        self.min..self.max
    }

    pub fn is_empty(&self) -> bool {
        !(self.min < self.max)
    }
}

/// Tunables for the sketch.
///
/// Every field has a default matching the reference animation, so a JSON
/// file only needs to mention the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordinary clusters spawned at setup.
    pub cluster_count: usize,
    /// Distance kept from the canvas edges when placing cluster centres.
    pub spawn_margin: f32,
    /// Ring radius of ordinary clusters.
    pub radius: Span,
    /// Ring radius of the growing cluster.
    pub growing_radius: Span,
    /// Per-axis bound of the initial drift velocity (`[-max_speed, max_speed)`).
    pub max_speed: f32,
    /// Upper bound (exclusive) of the random hue.
    pub hue_max: f32,
    /// Hue of the growing cluster.
    pub highlight_hue: f32,
    /// Diameter of each ring node.
    pub node_size: f32,
    /// Centre distance under which the growing cluster absorbs another.
    pub hit_distance: f32,
    /// Scale applied to the growing ring on every merge.
    pub growth_factor: f32,
    /// Stroke weight of the lines between neighbouring clusters.
    pub link_weight: f32,
    /// Alpha of the per-frame background clear (0-255).
    pub background_alpha: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster_count: 30,
            spawn_margin: 150.0,
            radius: Span::new(50.0, 150.0),
            growing_radius: Span::new(10.0, 30.0),
            max_speed: 2.0,
            hue_max: 255.0,
            highlight_hue: 255.0,
            node_size: 10.0,
            hit_distance: 50.0,
            growth_factor: 1.1,
            link_weight: 0.5,
            background_alpha: 30.0,
        }
    }
}

impl Config {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that every random range can be sampled and that the merge
    /// parameters make sense.
    ///
    /// ### Returns
    /// - `Ok(())` if the configuration is usable.
    /// - `Err(ConfigError::Invalid)` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius.is_empty() || self.radius.min <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "radius must be a non-empty positive range, got {:?}",
                self.radius
            )));
        }
        if self.growing_radius.is_empty() || self.growing_radius.min <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "growing_radius must be a non-empty positive range, got {:?}",
                self.growing_radius
            )));
        }
        if !(self.max_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        if !(self.hue_max > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hue_max must be positive, got {}",
                self.hue_max
            )));
        }
        if !(self.hit_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hit_distance must be positive, got {}",
                self.hit_distance
            )));
        }
        if !(self.growth_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "growth_factor must be positive, got {}",
                self.growth_factor
            )));
        }
        if self.spawn_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawn_margin must not be negative, got {}",
                self.spawn_margin
            )));
        }
        if !(0.0..=255.0).contains(&self.background_alpha) {
            return Err(ConfigError::Invalid(format!(
                "background_alpha must be within 0..=255, got {}",
                self.background_alpha
            )));
        }
        Ok(())
    }
}
