//! Prepares the desk scene on a headless wgpu device and renders two frames
//! into an offscreen target.
//!
//! Textures are read from `./textures` (override with `DESKSCENE_TEXTURE_DIR`);
//! missing files are logged and skipped.

use std::collections::HashMap;

use anyhow::Context;
use cgmath::{Deg, Point3};
use wgpu::util::DeviceExt;

use deskscene::gfx::scene::desk::desk_scene;
use deskscene::gfx::scene::Vertex3D;
use deskscene::gfx::shader::wgsl::create_scene_shader;
use deskscene::gfx::shader::{CameraUniforms, ShaderFrameBuffer};
use deskscene::prelude::*;
use deskscene::wgpu_utils::UniformBuffer;

const TARGET_SIZE: (u32, u32) = (1280, 720);
const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

async fn request_device() -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable GPU adapter")?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Desk Scene Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create device")?;
    Ok((device, queue))
}

fn create_target(device: &wgpu::Device, label: &str, format: wgpu::TextureFormat) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: TARGET_SIZE.0,
            height: TARGET_SIZE.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn scene_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    frame_buffer: &ShaderFrameBuffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Uniforms Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: frame_buffer.binding_resource(),
        }],
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (device, queue) = pollster::block_on(request_device())?;
    let requested = SceneConfig::from_env();
    let textures = WgpuTextureDevice::new(&device, &queue, requested.texture_units)?;
    // The registry may not hand out more slots than the device has units
    let config = requested.with_texture_units(textures.unit_count());

    let scene = desk_scene();
    let mut manager = SceneManager::new(config, textures, ShaderState::new(), PrimitiveMeshes::new());
    let report = manager.prepare(&scene)?;
    for (tag, err) in &report.textures_failed {
        log::warn!("{}: {}", tag, err);
    }

    // Geometry buffers for every kind the scene loaded
    let buffers: HashMap<MeshKind, (wgpu::Buffer, wgpu::Buffer)> = report
        .meshes_loaded
        .iter()
        .filter_map(|&kind| {
            let vertices = manager.meshes().vertices(kind)?;
            let indices = manager.meshes().indices(kind)?;
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", kind)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", kind)),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            Some((kind, (vertex_buffer, index_buffer)))
        })
        .collect();
    log::info!("Uploaded {} meshes", buffers.len());

    let units = manager.textures().device().unit_count();
    let texture_layout = manager.textures().device().create_bind_group_layout();
    let texture_bind_group = manager.textures().device().create_bind_group(&texture_layout);

    let mut frame_buffer = ShaderState::create_frame_buffer(&device, scene.objects.len());
    let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Uniforms Bind Group Layout"),
        entries: &[ShaderFrameBuffer::layout_entry(
            0,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        )],
    });
    let mut scene_group = scene_bind_group(&device, &scene_layout, &frame_buffer);

    let aspect = TARGET_SIZE.0 as f32 / TARGET_SIZE.1 as f32;
    let mut camera = UniformBuffer::new_with_data(
        &device,
        &CameraUniforms::look_at(Point3::new(0.0, 8.0, 22.0), Point3::new(0.0, 1.0, 3.0), Deg(45.0), aspect),
    );
    let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Camera Bind Group Layout"),
        entries: &[UniformBuffer::<CameraUniforms>::layout_entry(
            0,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        )],
    });
    let camera_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Camera Bind Group"),
        layout: &camera_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: camera.binding_resource(),
        }],
    });

    let shader = create_scene_shader(&device, units);
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[&scene_layout, &texture_layout, &camera_layout],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: COLOR_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            // Open cylinders are seen from inside
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    let color_view = create_target(&device, "Scene Color Target", COLOR_FORMAT);
    let depth_view = create_target(&device, "Scene Depth Target", DEPTH_FORMAT);

    let eyes = [Point3::new(0.0, 8.0, 22.0), Point3::new(-6.0, 6.0, 18.0)];
    for (frame, eye) in eyes.into_iter().enumerate() {
        let moved = camera.update_content(
            &queue,
            CameraUniforms::look_at(eye, Point3::new(0.0, 1.0, 3.0), Deg(45.0), aspect),
        );

        let stats = manager.render(&scene);
        let calls = manager.meshes_mut().take_draw_calls();
        if manager.sink_mut().upload_frame(&mut frame_buffer, &device, &queue) {
            scene_group = scene_bind_group(&device, &scene_layout, &frame_buffer);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.2,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&pipeline);
            render_pass.set_bind_group(1, &texture_bind_group, &[]);
            render_pass.set_bind_group(2, &camera_group, &[]);
            for call in &calls {
                let Some((vertex_buffer, index_buffer)) = buffers.get(&call.kind) else {
                    continue;
                };
                render_pass.set_bind_group(0, &scene_group, &[frame_buffer.offset(call.draw as usize)]);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(call.indices.clone(), 0, 0..1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));

        log::info!(
            "Frame {}: {} objects, {} draw calls, {} texture misses, {} material misses, lighting {}, camera moved: {}",
            frame,
            stats.draws,
            calls.len(),
            stats.texture_misses,
            stats.material_misses,
            manager.lighting_enabled(),
            moved
        );
    }

    manager.shutdown();
    Ok(())
}
