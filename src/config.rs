//! Scene configuration
//!
//! Settings that are fixed for a rendering session: where texture assets
//! live, how many texture units the shader exposes, and how images are
//! oriented on load.

use std::path::PathBuf;

/// Number of texture units the scene shader samples from
pub const DEFAULT_TEXTURE_UNITS: usize = 16;

/// Environment variable overriding [`SceneConfig::texture_dir`]
pub const TEXTURE_DIR_ENV: &str = "DESKSCENE_TEXTURE_DIR";

/// Environment variable overriding [`SceneConfig::texture_units`]
pub const TEXTURE_UNITS_ENV: &str = "DESKSCENE_TEXTURE_UNITS";

/// Configuration for scene preparation
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Directory that texture asset paths are resolved against
    pub texture_dir: PathBuf,
    /// Hard cap on registered textures, one per texture unit
    pub texture_units: usize,
    /// Flip images so the first row is the bottom of the texture
    pub flip_vertically: bool,
    /// Value written to `bUseLighting` at the start of every frame
    pub lighting: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            texture_units: DEFAULT_TEXTURE_UNITS,
            flip_vertically: true,
            lighting: true,
        }
    }
}

impl SceneConfig {
    /// Default configuration with environment overrides applied
    ///
    /// Unparseable overrides are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().apply_overrides(
            std::env::var(TEXTURE_DIR_ENV).ok(),
            std::env::var(TEXTURE_UNITS_ENV).ok(),
        )
    }

    /// Applies raw override values as read from the environment
    pub fn apply_overrides(mut self, dir: Option<String>, units: Option<String>) -> Self {
        if let Some(dir) = dir {
            self.texture_dir = PathBuf::from(dir);
        }

        if let Some(units) = units {
            match units.trim().parse::<usize>() {
                Ok(units) if units > 0 => self.texture_units = units,
                _ => log::warn!(
                    "Ignoring {}='{}': expected a positive integer",
                    TEXTURE_UNITS_ENV,
                    units
                ),
            }
        }

        self
    }

    /// Builder pattern: Set the texture asset directory
    pub fn with_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = dir.into();
        self
    }

    /// Builder pattern: Set the texture unit capacity
    pub fn with_texture_units(mut self, units: usize) -> Self {
        self.texture_units = units;
        self
    }

    /// Builder pattern: Enable or disable vertical flipping on load
    pub fn with_flip_vertically(mut self, flip: bool) -> Self {
        self.flip_vertically = flip;
        self
    }

    /// Builder pattern: Enable or disable scene lighting
    pub fn with_lighting(mut self, lighting: bool) -> Self {
        self.lighting = lighting;
        self
    }
}
