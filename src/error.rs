//! Error types for scene preparation
//!
//! Expected conditions such as a missing texture tag or an unknown material
//! are not errors here: lookups return `Option` and the caller logs the miss.
//! [`SceneError`] covers asset loading failures and capacity overflow.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing scene resources
#[derive(Error, Debug)]
pub enum SceneError {
    /// The image file is missing or could not be decoded.
    #[error("Could not load image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image decoded, but not as 3-channel RGB or 4-channel RGBA.
    #[error("Not implemented to handle image '{path}' with {channels} channels")]
    UnsupportedChannels { path: PathBuf, channels: u8 },

    /// Every texture unit is already taken.
    #[error("Texture '{tag}' rejected: all {capacity} texture units are in use")]
    TextureCapacityExceeded { tag: String, capacity: usize },

    /// The shader's lighting model has no free slot for this light.
    #[error("No free {kind} light slot (capacity {capacity})")]
    LightCapacityExceeded { kind: &'static str, capacity: usize },

    /// The rendering backend refused to create the texture.
    #[error("Failed to create GPU texture '{tag}': {reason}")]
    TextureCreation { tag: String, reason: String },
}

impl SceneError {
    /// Capacity overflow is a configuration error and aborts preparation;
    /// everything else is reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SceneError::TextureCapacityExceeded { .. } | SceneError::LightCapacityExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
