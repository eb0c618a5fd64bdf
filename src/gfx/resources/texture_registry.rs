//! Texture registry
//!
//! Loads image files, hands the pixels to a [`TextureDevice`] for upload and
//! records the result under a tag. A texture's slot is its registration
//! index; slot `i` is bound to texture unit `i` by [`TextureRegistry::bind_all`].
//! Callers address textures by tag only, so slots can never alias.

use std::path::{Path, PathBuf};

use super::texture_resource::check_image_fits;
use crate::error::{Result, SceneError};

/// Opaque handle to a texture owned by a [`TextureDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Texture unit index a registered texture is bound to
pub type TextureSlot = u32;

/// Decoded 8-bit image with 3 (RGB) or 4 (RGBA) channels
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Decodes an image file
    ///
    /// # Arguments
    /// * `path` - Image file to read (PNG or JPEG)
    /// * `flip_vertically` - Flip rows so the first row is the bottom of the texture
    ///
    /// # Errors
    /// [`SceneError::ImageDecode`] if the file cannot be read or decoded,
    /// [`SceneError::UnsupportedChannels`] for anything but RGB or RGBA.
    pub fn load(path: &Path, flip_vertically: bool) -> Result<Self> {
        let image = image::open(path).map_err(|source| SceneError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = if flip_vertically { image.flipv() } else { image };

        let channels = image.color().channel_count();
        let (width, height, pixels) = match channels {
            3 => {
                let rgb = image.to_rgb8();
                (rgb.width(), rgb.height(), rgb.into_raw())
            }
            4 => {
                let rgba = image.to_rgba8();
                (rgba.width(), rgba.height(), rgba.into_raw())
            }
            _ => {
                return Err(SceneError::UnsupportedChannels {
                    path: path.to_path_buf(),
                    channels,
                })
            }
        };

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Pixel data expanded to RGBA8
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.channels {
            4 => self.pixels.clone(),
            _ => self
                .pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
                .collect(),
        }
    }
}

/// Rendering backend seam for texture resources
///
/// Implementations upload pixels as a 2D texture with repeat wrapping on
/// both axes, linear filtering and a full mip chain.
pub trait TextureDevice {
    /// Uploads `image` and returns a handle to the new texture
    fn create_texture(&mut self, label: &str, image: &DecodedImage) -> Result<TextureHandle>;

    /// Makes `handle` the texture sampled through `unit`
    fn bind(&mut self, unit: TextureSlot, handle: TextureHandle);

    /// Frees the texture's GPU memory
    fn release(&mut self, handle: TextureHandle);
}

/// Texture registered under a tag
#[derive(Debug, Clone, PartialEq)]
pub struct TextureEntry {
    pub tag: String,
    pub handle: TextureHandle,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Tag-ordered texture storage bounded by the number of texture units
pub struct TextureRegistry<D: TextureDevice> {
    device: D,
    entries: Vec<TextureEntry>,
    capacity: usize,
    flip_vertically: bool,
}

impl<D: TextureDevice> TextureRegistry<D> {
    /// Creates an empty registry
    ///
    /// # Arguments
    /// * `device` - Backend that owns the texture memory
    /// * `capacity` - Number of texture units; registrations beyond it are rejected
    /// * `flip_vertically` - Passed through to [`DecodedImage::load`]
    pub fn new(device: D, capacity: usize, flip_vertically: bool) -> Self {
        Self {
            device,
            entries: Vec::with_capacity(capacity),
            capacity,
            flip_vertically,
        }
    }

    /// Loads the image at `path` and registers it under `tag`
    ///
    /// Returns the slot the texture occupies. Failed loads do not consume
    /// a slot. A full registry is a configuration error and is rejected
    /// before the file is touched.
    pub fn register(&mut self, path: impl AsRef<Path>, tag: &str) -> Result<TextureSlot> {
        let path = path.as_ref();

        if self.entries.len() >= self.capacity {
            log::error!(
                "Cannot register texture '{}': all {} texture units are in use",
                tag,
                self.capacity
            );
            return Err(SceneError::TextureCapacityExceeded {
                tag: tag.to_string(),
                capacity: self.capacity,
            });
        }

        let image = DecodedImage::load(path, self.flip_vertically)?;
        let handle = self.device.create_texture(tag, &image)?;

        if self.slot_of(tag).is_some() {
            log::warn!(
                "Texture tag '{}' is already registered; lookups keep returning the first one",
                tag
            );
        }

        let slot = self.entries.len() as TextureSlot;
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            path: path.to_path_buf(),
            width: image.width,
            height: image.height,
        });

        log::info!(
            "Loaded texture '{}' from {} ({}x{}, {} channels) into slot {}",
            tag,
            path.display(),
            image.width,
            image.height,
            image.channels,
            slot
        );

        Ok(slot)
    }

    /// Binds every registered texture to the unit matching its slot
    pub fn bind_all(&mut self) {
        for (slot, entry) in self.entries.iter().enumerate() {
            self.device.bind(slot as TextureSlot, entry.handle);
        }
        log::debug!("Bound {} textures", self.entries.len());
    }

    /// Releases every texture and empties the registry
    ///
    /// No draw that samples these textures may still be pending.
    pub fn release(&mut self) {
        for entry in self.entries.drain(..) {
            self.device.release(entry.handle);
        }
    }

    /// Handle of the first texture registered under `tag`
    pub fn handle_of(&self, tag: &str) -> Option<TextureHandle> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| e.handle)
    }

    /// Slot of the first texture registered under `tag`
    pub fn slot_of(&self, tag: &str) -> Option<TextureSlot> {
        self.entries
            .iter()
            .position(|e| e.tag == tag)
            .map(|slot| slot as TextureSlot)
    }

    /// Registered textures in slot order
    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

/// CPU-only [`TextureDevice`] that hands out sequential handles
///
/// Keeps the unit table and release log so tests and tools can check what
/// a real backend would have been asked to do.
#[derive(Debug, Default)]
pub struct MemoryTextureDevice {
    next_handle: u64,
    live: Vec<(TextureHandle, DecodedImage)>,
    units: Vec<Option<TextureHandle>>,
    released: Vec<TextureHandle>,
    max_dimension: Option<u32>,
}

impl MemoryTextureDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects images larger than `max_dimension` on either side, like a GPU would
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    /// Texture currently bound to `unit`
    pub fn bound(&self, unit: TextureSlot) -> Option<TextureHandle> {
        self.units.get(unit as usize).copied().flatten()
    }

    /// Image uploaded for `handle`, if it has not been released
    pub fn image(&self, handle: TextureHandle) -> Option<&DecodedImage> {
        self.live
            .iter()
            .find(|(live, _)| *live == handle)
            .map(|(_, image)| image)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn released(&self) -> &[TextureHandle] {
        &self.released
    }
}

impl TextureDevice for MemoryTextureDevice {
    fn create_texture(&mut self, label: &str, image: &DecodedImage) -> Result<TextureHandle> {
        if let Some(max_dimension) = self.max_dimension {
            check_image_fits(label, image, max_dimension)?;
        }
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.live.push((handle, image.clone()));
        Ok(handle)
    }

    fn bind(&mut self, unit: TextureSlot, handle: TextureHandle) {
        let unit = unit as usize;
        if self.units.len() <= unit {
            self.units.resize(unit + 1, None);
        }
        self.units[unit] = Some(handle);
    }

    fn release(&mut self, handle: TextureHandle) {
        self.live.retain(|(live, _)| *live != handle);
        for unit in self.units.iter_mut() {
            if *unit == Some(handle) {
                *unit = None;
            }
        }
        self.released.push(handle);
    }
}
