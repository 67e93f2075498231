//! Procedural cave generation split into one submodule per pipeline stage.

pub mod border;
pub mod fill;
pub mod model;
pub mod passage;
pub mod regions;
pub mod rooms;
pub mod seed;

mod generator;

pub use generator::MapGenerator;
pub use model::GeneratedLevel;
pub use passage::Passage;
pub use rooms::{Room, RoomIndex, RoomSet};
pub use seed::SeedChoice;

use crate::config::GenerationConfig;
use crate::error::ConfigError;

pub fn generate_level(config: GenerationConfig) -> Result<GeneratedLevel, ConfigError> {
    Ok(MapGenerator::new(config)?.generate())
}

#[cfg(test)]
mod tests {
    use super::{GenerationConfig, MapGenerator};

    #[test]
    fn generate_level_matches_map_generator_output() {
        let config = GenerationConfig::default().with_seed("helper");

        let from_helper = super::generate_level(config.clone()).expect("valid config");
        let from_generator = MapGenerator::new(config).expect("valid config").generate();

        assert_eq!(from_helper, from_generator);
    }
}
