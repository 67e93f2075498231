//! Generation parameters and their TOML form.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MAX_FILL_PROBABILITY: u32 = 100;
pub const MAX_SMOOTHING_ITERATIONS: u32 = 3;
pub const MAX_NEIGHBOR_THRESHOLD: u32 = 9;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    pub border_size: usize,
    /// Chance, in percent, that an interior cell starts as wall.
    pub fill_probability: u32,
    pub smoothing_iterations: u32,
    /// A cell with more wall neighbours than this becomes wall.
    pub wall_neighbor_high: u32,
    /// A cell with fewer wall neighbours than this becomes room.
    pub wall_neighbor_low: u32,
    pub wall_region_min_size: usize,
    pub room_region_min_size: usize,
    pub passage_radius: u32,
    pub seed: Option<String>,
    pub use_random_seed: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            border_size: 1,
            fill_probability: 45,
            smoothing_iterations: 3,
            wall_neighbor_high: 4,
            wall_neighbor_low: 4,
            wall_region_min_size: 50,
            room_region_min_size: 50,
            passage_radius: 1,
            seed: None,
            use_random_seed: false,
        }
    }
}

impl GenerationConfig {
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self.use_random_seed = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroDimension { field: "width" });
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroDimension { field: "height" });
        }
        check_range("fill_probability", self.fill_probability, MAX_FILL_PROBABILITY)?;
        check_range("smoothing_iterations", self.smoothing_iterations, MAX_SMOOTHING_ITERATIONS)?;
        check_range("wall_neighbor_high", self.wall_neighbor_high, MAX_NEIGHBOR_THRESHOLD)?;
        check_range("wall_neighbor_low", self.wall_neighbor_low, MAX_NEIGHBOR_THRESHOLD)?;
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_toml(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::OutOfRange { field, value, min: 0, max });
    }
    Ok(())
}
