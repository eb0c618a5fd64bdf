//! Texture resource management for wgpu
//!
//! Provides GPU textures for scene images (full mip chain, repeat wrapping,
//! linear filtering) and [`WgpuTextureDevice`], the wgpu implementation of
//! the [`TextureDevice`] seam used by the texture registry.

use std::collections::HashMap;

use image::{imageops, imageops::FilterType, RgbaImage};

use super::texture_registry::{DecodedImage, TextureDevice, TextureHandle, TextureSlot};
use crate::error::{Result, SceneError};
use crate::wgpu_utils::binding_types;

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Builds every mip level down to 1x1, base level first
pub fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base];
    loop {
        let last = &levels[levels.len() - 1];
        if last.width() <= 1 && last.height() <= 1 {
            break;
        }
        let next = imageops::resize(
            last,
            (last.width() / 2).max(1),
            (last.height() / 2).max(1),
            FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}

/// Rejects images the device cannot hold in a 2D texture
pub fn check_texture_size(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 || width > max_dimension || height > max_dimension {
        return Err(SceneError::TextureCreation {
            tag: String::new(),
            reason: format!(
                "{}x{} is outside the device limit of 1..={} texels per side",
                width, height, max_dimension
            ),
        });
    }
    Ok(())
}

/// [`check_texture_size`] for a labelled image
pub(crate) fn check_image_fits(label: &str, image: &DecodedImage, max_dimension: u32) -> Result<()> {
    check_texture_size(image.width, image.height, max_dimension).map_err(|_| {
        SceneError::TextureCreation {
            tag: label.to_string(),
            reason: format!(
                "{}x{} does not fit the device limit of {} texels per side",
                image.width, image.height, max_dimension
            ),
        }
    })
}

/// Texture units the device can actually sample in one shader stage
pub fn clamp_units(requested: usize, limit: u32) -> usize {
    let limit = limit as usize;
    if requested > limit {
        log::warn!(
            "Requested {} texture units but the device samples at most {}; using {}",
            requested,
            limit,
            limit
        );
        return limit;
    }
    requested
}

impl TextureResource {
    /// Scene texture format; RGB images are expanded to RGBA on upload
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Sampler used for every scene texture
    pub fn create_scene_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        })
    }

    /// Creates a mipmapped 2D texture from a decoded scene image
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating resources
    /// * `queue` - WGPU queue for uploading data
    /// * `image` - Decoded RGB or RGBA pixels
    /// * `label` - Debug label for the texture
    ///
    /// # Returns
    /// TextureResource with every mip level uploaded
    pub fn create_from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: &str,
    ) -> Result<Self> {
        check_image_fits(label, image, device.limits().max_texture_dimension_2d)?;
        let base = RgbaImage::from_raw(image.width, image.height, image.to_rgba8()).ok_or_else(
            || SceneError::TextureCreation {
                tag: label.to_string(),
                reason: format!(
                    "pixel buffer does not match {}x{} image",
                    image.width, image.height
                ),
            },
        )?;
        let levels = mip_chain(base);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, pixels) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                pixels.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * pixels.width()),
                    rows_per_image: Some(pixels.height()),
                },
                wgpu::Extent3d {
                    width: pixels.width(),
                    height: pixels.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Self::create_scene_sampler(device, &format!("{} Sampler", label));

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// [`TextureDevice`] backed by a wgpu device
///
/// Texture units are modelled as one bind group with a texture binding per
/// unit (bindings `0..units`) followed by a shared sampler at binding `units`.
/// Units nothing is bound to sample a 1x1 white texture. The unit count is
/// clamped to the device's sampled texture limit; size the registry with
/// [`WgpuTextureDevice::unit_count`].
pub struct WgpuTextureDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    textures: HashMap<TextureHandle, TextureResource>,
    units: Vec<Option<TextureHandle>>,
    next_handle: u64,
    fallback: TextureResource,
    sampler: wgpu::Sampler,
}

impl WgpuTextureDevice {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, units: usize) -> Result<Self> {
        let white = DecodedImage {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![u8::MAX; 4],
        };
        let fallback = TextureResource::create_from_image(device, queue, &white, "Fallback Texture")?;
        let sampler = TextureResource::create_scene_sampler(device, "Scene Texture Sampler");
        let units = clamp_units(units, device.limits().max_sampled_textures_per_shader_stage);

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            textures: HashMap::new(),
            units: vec![None; units],
            next_handle: 0,
            fallback,
            sampler,
        })
    }

    /// Number of texture units exposed to the shader
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// GPU resource behind `handle`
    pub fn resource(&self, handle: TextureHandle) -> Option<&TextureResource> {
        self.textures.get(&handle)
    }

    /// Layout of the texture unit bind group
    pub fn create_bind_group_layout(&self) -> wgpu::BindGroupLayout {
        let mut entries: Vec<wgpu::BindGroupLayoutEntry> = (0..self.units.len())
            .map(|unit| wgpu::BindGroupLayoutEntry {
                binding: unit as u32,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::texture_2d(),
                count: None,
            })
            .collect();
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: self.units.len() as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: binding_types::sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });

        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Units Bind Group Layout"),
                entries: &entries,
            })
    }

    /// Bind group reflecting the current unit table
    ///
    /// Recreate it after [`TextureDevice::bind`] or [`TextureDevice::release`].
    pub fn create_bind_group(&self, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        let mut entries: Vec<wgpu::BindGroupEntry> = self
            .units
            .iter()
            .enumerate()
            .map(|(unit, bound)| {
                let view = bound
                    .and_then(|handle| self.textures.get(&handle))
                    .map(|resource| &resource.view)
                    .unwrap_or(&self.fallback.view);
                wgpu::BindGroupEntry {
                    binding: unit as u32,
                    resource: wgpu::BindingResource::TextureView(view),
                }
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: self.units.len() as u32,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Units Bind Group"),
            layout,
            entries: &entries,
        })
    }
}

impl TextureDevice for WgpuTextureDevice {
    fn create_texture(&mut self, label: &str, image: &DecodedImage) -> Result<TextureHandle> {
        let resource = TextureResource::create_from_image(&self.device, &self.queue, image, label)?;
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.textures.insert(handle, resource);
        Ok(handle)
    }

    fn bind(&mut self, unit: TextureSlot, handle: TextureHandle) {
        if !self.textures.contains_key(&handle) {
            log::warn!("Ignoring bind of unknown texture {:?} to unit {}", handle, unit);
            return;
        }
        match self.units.get_mut(unit as usize) {
            Some(slot) => *slot = Some(handle),
            None => log::error!(
                "Texture unit {} is out of range ({} units)",
                unit,
                self.units.len()
            ),
        }
    }

    fn release(&mut self, handle: TextureHandle) {
        if let Some(resource) = self.textures.remove(&handle) {
            resource.texture.destroy();
        }
        for unit in self.units.iter_mut() {
            if *unit == Some(handle) {
                *unit = None;
            }
        }
    }
}
