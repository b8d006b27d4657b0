//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::physics::obstacle::ObstacleKinds;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Arena collision settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Seconds a new trail wall waits before it can register hits
    pub trail_wall_activation_delay: f32,

    /// Number of scratch vectors in the shared scratch pool
    pub scratch_capacity: usize,

    /// Obstacle kinds vehicles are tested against
    pub collide_with: ObstacleKinds,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            trail_wall_activation_delay: 0.25,
            scratch_capacity: 64,
            collide_with: ObstacleKinds::default(),
        }
    }
}

impl CollisionConfig {
    /// Set trail wall activation delay
    pub fn with_activation_delay(mut self, seconds: f32) -> Self {
        self.trail_wall_activation_delay = seconds;
        self
    }

    /// Set the obstacle filter
    pub fn with_collide_with(mut self, kinds: ObstacleKinds) -> Self {
        self.collide_with = kinds;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let delay = self.trail_wall_activation_delay;
        if !(delay >= 0.0 && delay.is_finite()) {
            return Err(
                "Trail wall activation delay must be a finite, non-negative number of seconds"
                    .to_string(),
            );
        }

        // box_vs_box holds 8 slots at once
        if self.scratch_capacity < 8 {
            return Err("Scratch capacity must be at least 8".to_string());
        }

        Ok(())
    }

    /// Load from a `.toml` or `.ron` file and validate
    pub fn load_validated(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Config for CollisionConfig {}
