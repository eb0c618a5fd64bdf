//! Typed uniform buffers
//!
//! [`UniformBuffer`] wraps a `wgpu::Buffer` holding exactly one `Content`
//! value and keeps a CPU copy of the last upload so identical writes never
//! reach the queue.
//!
//! [`DynamicUniformBuffer`] holds one `Content` per draw, each at an aligned
//! stride, and is bound with a dynamic offset. Every `queue.write_buffer`
//! lands before the next submission, so state that changes between draws of
//! one pass has to live at distinct offsets.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

use super::binding_types;

/// Uniform buffer holding a single `Content` value
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn label() -> String {
        let type_name = std::any::type_name::<Content>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);
        format!("UniformBuffer: {}", short)
    }

    /// Create a buffer holding `initial_content`
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let bytes = bytemuck::bytes_of(initial_content);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&Self::label()),
            contents: bytes,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: bytes.to_vec(),
        }
    }

    /// Writes `content` unless it matches the last upload
    ///
    /// Returns whether a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
        true
    }

    /// Layout entry for binding this buffer at `binding`
    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: binding_types::uniform(),
            count: None,
        }
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Rounds `value` up to the next multiple of `alignment`
pub fn align_to(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}

/// Lays `items` out back to back at `stride` bytes each, zero padded
pub fn pack_strided<Content: bytemuck::Pod>(items: &[Content], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; stride * items.len()];
    for (slot, item) in bytes.chunks_exact_mut(stride).zip(items) {
        let item = bytemuck::bytes_of(item);
        slot[..item.len()].copy_from_slice(item);
    }
    bytes
}

/// Uniform buffer holding one `Content` per draw, bound with a dynamic offset
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    capacity: usize,
    stride: u64,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    fn label() -> String {
        let type_name = std::any::type_name::<Content>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);
        format!("DynamicUniformBuffer: {}", short)
    }

    fn content_size() -> u64 {
        std::mem::size_of::<Content>() as u64
    }

    fn create(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&Self::label()),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Creates a buffer with room for `capacity` values
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let min_alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_to(Self::content_size(), min_alignment);
        let capacity = capacity.max(1);

        DynamicUniformBuffer {
            buffer: Self::create(device, stride, capacity),
            capacity,
            stride,
            content_type: PhantomData,
        }
    }

    /// Bytes between consecutive values
    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Dynamic offset of the value at `index`
    pub fn offset(&self, index: usize) -> u32 {
        (self.stride * index as u64) as u32
    }

    /// Grows the buffer to hold at least `required` values
    ///
    /// Returns true when the buffer was recreated; bind groups built from
    /// the old one must be rebuilt.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, required: usize) -> bool {
        if required <= self.capacity {
            return false;
        }

        let mut capacity = self.capacity.max(1);
        while capacity < required {
            capacity = capacity.saturating_mul(2);
        }

        self.buffer = Self::create(device, self.stride, capacity);
        self.capacity = capacity;
        true
    }

    /// Writes `items` starting at offset 0 in a single queue write
    ///
    /// Returns true when the buffer had to grow.
    pub fn write_all(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, items: &[Content]) -> bool {
        let grown = self.ensure_capacity(device, items.len());
        if !items.is_empty() {
            queue.write_buffer(&self.buffer, 0, &pack_strided(items, self.stride));
        }
        grown
    }

    /// Layout entry for binding one value of this buffer at `binding`
    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: binding_types::dynamic_uniform(Self::content_size()),
            count: None,
        }
    }

    /// A window of one value; the dynamic offset selects which
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(Self::content_size()),
        })
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(576, 256), 768);
        assert_eq!(align_to(512, 256), 512);
        assert_eq!(align_to(1, 256), 256);
        assert_eq!(align_to(0, 256), 0);
        assert_eq!(align_to(12, 0), 12);
    }

    #[test]
    fn test_pack_strided_places_each_item_at_its_offset() {
        let items = [[1u32, 2], [3, 4], [5, 6]];
        let bytes = pack_strided(&items, 16);
        assert_eq!(bytes.len(), 48);

        let words: &[u32] = bytemuck::cast_slice(&bytes);
        assert_eq!(&words[0..4], &[1, 2, 0, 0]);
        assert_eq!(&words[4..8], &[3, 4, 0, 0]);
        assert_eq!(&words[8..12], &[5, 6, 0, 0]);
    }

    #[test]
    fn test_pack_strided_empty() {
        assert!(pack_strided::<[f32; 4]>(&[], 256).is_empty());
    }
}
