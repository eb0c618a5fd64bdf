//! # Primitive Shape Generation
//!
//! This module contains functions to generate the scene's primitive shapes.
//! All shapes are generated with outward normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Part names used by the generators
pub mod parts {
    pub const FRONT: &str = "front";
    pub const BACK: &str = "back";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const TOP: &str = "top";
    pub const BOTTOM: &str = "bottom";
    pub const SIDES: &str = "sides";
    pub const UPPER: &str = "upper";
    pub const LOWER: &str = "lower";
}

/// Face name, outward normal, and the U and V axes of its texture
const CUBE_FACES: [(&str, [f32; 3], [f32; 3], [f32; 3]); 6] = [
    (parts::FRONT, [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    (parts::BACK, [0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    (parts::LEFT, [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    (parts::RIGHT, [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    (parts::TOP, [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    (parts::BOTTOM, [0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes. Each face
/// has its own four vertices, UVs from 0 to 1 and a named part.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    for (name, normal, u_axis, v_axis) in CUBE_FACES {
        let start = data.indices.len();
        let corners = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let mut quad = [0u32; 4];
        for (corner, uv) in corners.iter().enumerate() {
            let (du, dv) = (uv[0] - 0.5, uv[1] - 0.5);
            let position = [
                normal[0] * 0.5 + u_axis[0] * du + v_axis[0] * dv,
                normal[1] * 0.5 + u_axis[1] * du + v_axis[1] * dv,
                normal[2] * 0.5 + u_axis[2] * du + v_axis[2] * dv,
            ];
            quad[corner] = data.push_vertex(position, normal, *uv);
        }

        data.indices
            .extend_from_slice(&[quad[0], quad[1], quad[2], quad[2], quad[3], quad[0]]);
        data.mark_part(name, start);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments, rounded up to even
///
/// Returns a sphere of radius 1.0 centered at the origin. The `upper`
/// part is the hemisphere above y = 0.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2).div_ceil(2) * 2;

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 at the top pole
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let point = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            let uv = [long as f32 / long_segs as f32, lat as f32 / lat_segs as f32];
            data.push_vertex(point, point, uv); // Unit sphere: normal == position
        }
    }

    let mut start = 0;
    for lat in 0..lat_segs {
        if lat == lat_segs / 2 {
            data.mark_part(parts::UPPER, start);
            start = data.indices.len();
        }
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }
    data.mark_part(parts::LOWER, start);

    data
}

/// Generate a plane in the XZ plane
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `depth` - Depth of the plane (Z direction)
/// * `width_segments` - Number of subdivisions along width
/// * `depth_segments` - Number of subdivisions along depth
///
/// Returns a plane centered at the origin with normal pointing up (positive Y).
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for z in 0..=d_segs {
        let v = z as f32 / d_segs as f32;
        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            data.push_vertex(
                [(u - 0.5) * width, 0.0, (v - 0.5) * depth],
                [0.0, 1.0, 0.0],
                [u, v],
            );
        }
    }

    // Counter-clockwise when viewed from above
    for z in 0..d_segs {
        for x in 0..w_segs {
            let i = z * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, next_row, i + 1]);
            data.indices.extend_from_slice(&[next_row, next_row + 1, i + 1]);
        }
    }

    data
}

/// Generate a cylinder of radius 1 standing on the origin
///
/// # Arguments
/// * `segments` - Number of circular segments
///
/// Returns a cylinder from y = 0 to y = 1 with `sides`, `bottom` and `top`
/// parts. Caps carry their own rim vertices so their normals stay flat.
pub fn generate_cylinder(segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let ring = |i: u32| {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        angle.sin_cos()
    };

    // Side wall, two vertices per ring step
    let start = data.indices.len();
    for i in 0..=segs {
        let (sin_a, cos_a) = ring(i);
        let u = i as f32 / segs as f32;
        data.push_vertex([cos_a, 0.0, sin_a], [cos_a, 0.0, sin_a], [u, 0.0]);
        data.push_vertex([cos_a, 1.0, sin_a], [cos_a, 0.0, sin_a], [u, 1.0]);
    }
    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;

        data.indices.extend_from_slice(&[bottom, top, bottom_next]);
        data.indices.extend_from_slice(&[top, top_next, bottom_next]);
    }
    data.mark_part(parts::SIDES, start);

    for (name, y, normal_y) in [(parts::BOTTOM, 0.0, -1.0), (parts::TOP, 1.0, 1.0)] {
        let start = data.indices.len();
        let center = data.push_vertex([0.0, y, 0.0], [0.0, normal_y, 0.0], [0.5, 0.5]);
        let rim_start = center + 1;
        for i in 0..=segs {
            let (sin_a, cos_a) = ring(i);
            data.push_vertex(
                [cos_a, y, sin_a],
                [0.0, normal_y, 0.0],
                [0.5 + cos_a * 0.5, 0.5 + sin_a * 0.5],
            );
        }
        for i in 0..segs {
            let current = rim_start + i;
            let next = current + 1;
            if normal_y < 0.0 {
                data.indices.extend_from_slice(&[center, current, next]);
            } else {
                data.indices.extend_from_slice(&[center, next, current]);
            }
        }
        data.mark_part(name, start);
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `main_segments` - Segments around the ring
/// * `tube_segments` - Segments around the tube
/// * `main_radius` - Distance from the origin to the tube center
/// * `tube_radius` - Radius of the tube
pub fn generate_torus(
    main_segments: u32,
    tube_segments: u32,
    main_radius: f32,
    tube_radius: f32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let main_segs = main_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for i in 0..=main_segs {
        let u = i as f32 / main_segs as f32;
        let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();

        for j in 0..=tube_segs {
            let v = j as f32 / tube_segs as f32;
            let (sin_v, cos_v) = (v * 2.0 * PI).sin_cos();

            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
            let position = [
                main_radius * cos_u + tube_radius * normal[0],
                main_radius * sin_u + tube_radius * normal[1],
                tube_radius * normal[2],
            ];
            data.push_vertex(position, normal, [u, v]);
        }
    }

    for i in 0..main_segs {
        for j in 0..tube_segs {
            let a = i * (tube_segs + 1) + j;
            let b = a + tube_segs + 1;

            data.indices.extend_from_slice(&[a, b, a + 1]);
            data.indices.extend_from_slice(&[b, b + 1, a + 1]);
        }
    }

    data
}
