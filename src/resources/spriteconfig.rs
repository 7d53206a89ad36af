//! Sprite configuration resource.
//!
//! Holds the default untransformed offset that new sprites are placed at.
//! Factories read it once, so changing it only affects sprites created
//! afterwards.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sprite]
//! default_offset_x = -400
//! default_offset_y = -300
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

use crate::error::{Result, SpriteError};

const DEFAULT_OFFSET_X: f32 = 0.0;
const DEFAULT_OFFSET_Y: f32 = 0.0;
const DEFAULT_CONFIG_PATH: &str = "./sprite.ini";

/// Sprite configuration resource.
///
/// The world origin is the center of the game window. Setting the default
/// offset to the negative half-screen size places sprites in the lower-left
/// corner of the screen.
#[derive(Resource, Debug, Clone)]
pub struct SpriteConfig {
    /// Offset given to sprites that do not specify their own.
    pub default_offset: Vec2,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteConfig {
    pub fn new() -> Self {
        Self {
            default_offset: Vec2::new(DEFAULT_OFFSET_X, DEFAULT_OFFSET_Y),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn with_default_offset(mut self, offset: Vec2) -> Self {
        self.default_offset = offset;
        self
    }

    pub fn default_offset(&self) -> Vec2 {
        self.default_offset
    }

    pub fn set_default_offset(&mut self, offset: Vec2) {
        self.default_offset = offset;
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SpriteError::Config(format!("Failed to load config file: {}", e)))?;

        if let Some(x) = config
            .getfloat("sprite", "default_offset_x")
            .map_err(SpriteError::Config)?
        {
            self.default_offset.x = x as f32;
        }
        if let Some(y) = config
            .getfloat("sprite", "default_offset_y")
            .map_err(SpriteError::Config)?
        {
            self.default_offset.y = y as f32;
        }

        info!(
            "Loaded sprite config: default offset ({}, {})",
            self.default_offset.x, self.default_offset.y
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();

        config.set(
            "sprite",
            "default_offset_x",
            Some(self.default_offset.x.to_string()),
        );
        config.set(
            "sprite",
            "default_offset_y",
            Some(self.default_offset.y.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| SpriteError::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved sprite config to {:?}", self.config_path);

        Ok(())
    }
}
