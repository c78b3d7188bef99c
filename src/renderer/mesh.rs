//! Vertex layout and procedural mesh generation
//!
//! Every generator is a pure function from parameters to [`MeshData`]. The
//! [`Geometry`](crate::renderer::Geometry) resource wraps them and owns the
//! uploaded GPU side. Degenerate parameters (zero rings, zero segments)
//! produce empty or degenerate data, never an error.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex with position, normal, and UV coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Byte stride of the interleaved layout
    pub const fn stride() -> usize {
        std::mem::size_of::<Self>()
    }
}

/// CPU-side mesh data produced by the generators
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    /// Empty for non-indexed meshes
    pub indices: Vec<u32>,
}

/// Generate a UV sphere laid out as a triangle strip
///
/// Each ring emits the next-band vertex before the current-band vertex so
/// consecutive pairs form strip-ready quads. `radii` scales the three axes
/// independently; normals stay on the unit sphere.
pub fn sphere(radii: Vec3, offset: Vec3, rings: u32, segments: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(rings as usize * (segments as usize + 1) * 2);

    let delta_ring = PI / rings as f32;
    let delta_segment = TAU / segments as f32;

    for ring in 0..rings {
        let r0 = (ring as f32 * delta_ring).sin();
        let y0 = (ring as f32 * delta_ring).cos();
        let r1 = ((ring + 1) as f32 * delta_ring).sin();
        let y1 = ((ring + 1) as f32 * delta_ring).cos();

        for segment in 0..=segments {
            let (sin_a, cos_a) = (segment as f32 * delta_segment).sin_cos();
            let inner = Vec3::new(r0 * sin_a, y0, r0 * cos_a);
            let outer = Vec3::new(r1 * sin_a, y1, r1 * cos_a);
            let u = segment as f32 / segments as f32;

            vertices.push(Vertex::new(
                (radii * outer + offset).into(),
                outer.into(),
                [u, (ring + 1) as f32 / rings as f32],
            ));
            vertices.push(Vertex::new(
                (radii * inner + offset).into(),
                inner.into(),
                [u, ring as f32 / rings as f32],
            ));
        }
    }

    MeshData {
        vertices,
        indices: Vec::new(),
    }
}

/// Generate an axis-aligned box with four unshared vertices per face
pub fn cube(size: Vec3, offset: Vec3) -> MeshData {
    let half = size * 0.5;

    // corners: top quad then bottom quad, both wound from -X +Z
    let p0 = Vec3::new(-half.x, half.y, half.z) + offset;
    let p1 = Vec3::new(half.x, half.y, half.z) + offset;
    let p2 = Vec3::new(half.x, -half.y, half.z) + offset;
    let p3 = Vec3::new(-half.x, -half.y, half.z) + offset;
    let p4 = Vec3::new(-half.x, -half.y, -half.z) + offset;
    let p5 = Vec3::new(half.x, -half.y, -half.z) + offset;
    let p6 = Vec3::new(half.x, half.y, -half.z) + offset;
    let p7 = Vec3::new(-half.x, half.y, -half.z) + offset;

    let mut vertices = Vec::with_capacity(24);
    let mut face = |a: Vec3, b: Vec3, c: Vec3, d: Vec3, normal: Vec3| {
        vertices.push(Vertex::new(a.into(), normal.into(), [0.0, 0.0]));
        vertices.push(Vertex::new(b.into(), normal.into(), [1.0, 0.0]));
        vertices.push(Vertex::new(c.into(), normal.into(), [1.0, 1.0]));
        vertices.push(Vertex::new(d.into(), normal.into(), [0.0, 1.0]));
    };

    face(p0, p1, p2, p3, Vec3::Z); // front
    face(p1, p6, p5, p2, Vec3::X); // right
    face(p6, p7, p4, p5, Vec3::NEG_Z); // back
    face(p7, p0, p3, p4, Vec3::NEG_X); // left
    face(p7, p6, p1, p0, Vec3::Y); // top
    face(p3, p2, p5, p4, Vec3::NEG_Y); // bottom

    let indices = vec![
        0, 1, 2, 0, 2, 3, // front
        4, 5, 6, 4, 6, 7, // right
        8, 9, 10, 8, 10, 11, // back
        12, 13, 14, 12, 14, 15, // left
        16, 17, 18, 16, 18, 19, // top
        20, 21, 22, 20, 22, 23, // bottom
    ];

    MeshData { vertices, indices }
}

/// Generate a single quad facing +Z as two non-indexed triangles
pub fn quad(size: Vec2, offset: Vec3) -> MeshData {
    let w = size.x * 0.5;
    let h = size.y * 0.5;
    let normal = Vec3::Z;

    let p0 = Vec3::new(w, -h, 0.0) + offset;
    let p1 = Vec3::new(-w, -h, 0.0) + offset;
    let p2 = Vec3::new(-w, h, 0.0) + offset;
    let p3 = Vec3::new(w, h, 0.0) + offset;

    let vertices = vec![
        Vertex::new(p0.into(), normal.into(), [1.0, 1.0]),
        Vertex::new(p1.into(), normal.into(), [0.0, 1.0]),
        Vertex::new(p2.into(), normal.into(), [0.0, 0.0]),
        Vertex::new(p2.into(), normal.into(), [0.0, 0.0]),
        Vertex::new(p3.into(), normal.into(), [1.0, 0.0]),
        Vertex::new(p0.into(), normal.into(), [1.0, 1.0]),
    ];

    MeshData {
        vertices,
        indices: Vec::new(),
    }
}

/// Generate a torus around the Y axis
///
/// The vertex grid is `segments` by `segments` with an open seam: the last
/// ring and the last tube section land back on phase zero instead of
/// sharing the first ones, and the index grid stops one cell short in both
/// directions.
pub fn torus(segments: u32, radius: f32, fatness: f32) -> MeshData {
    let mut vertices = Vec::with_capacity(segments as usize * segments as usize);
    let last = segments.saturating_sub(1) as f32;

    for i in 0..segments {
        let y_phase = i as f32 / last * TAU;
        let (ny, nr) = y_phase.sin_cos();
        let r = radius + nr * fatness;
        let y = ny * fatness;

        for j in 0..segments {
            let x_phase = j as f32 / last * TAU;
            let (sin_x, cos_x) = x_phase.sin_cos();

            let normal = Vec3::new(cos_x * nr, ny, sin_x * nr).normalize();
            vertices.push(Vertex::new(
                [cos_x * r, y, sin_x * r],
                normal.into(),
                [normal.x, normal.z],
            ));
        }
    }

    let cells = segments.saturating_sub(1);
    let mut indices = Vec::with_capacity(cells as usize * cells as usize * 6);
    for i in 0..cells {
        for j in 0..cells {
            indices.push(i * segments + j + 1);
            indices.push((i + 1) * segments + j + 1);
            indices.push((i + 1) * segments + j);

            indices.push(i * segments + j);
            indices.push(i * segments + j + 1);
            indices.push((i + 1) * segments + j);
        }
    }

    MeshData { vertices, indices }
}

/// Generate a closed trefoil-knot tube
///
/// Tangents come from finite differences around [`evaluate_trefoil`]; the
/// index grid wraps modulo in both directions so the tube has no seam.
pub fn knot(slices: u32, stacks: u32, radius: f32) -> MeshData {
    const E: f32 = 0.01;

    let vertex_count = slices * stacks;
    let mut vertices = Vec::with_capacity(vertex_count as usize);

    let ds = 1.0 / slices as f32;
    let dt = 1.0 / stacks as f32;

    for i in 0..slices {
        let s = i as f32 * ds;
        for j in 0..stacks {
            let t = j as f32 * dt;

            let p = evaluate_trefoil(s, t);
            let u = evaluate_trefoil(s + E, t) - p;
            let v = evaluate_trefoil(s, t + E) - p;
            let normal = v.cross(u).normalize();

            vertices.push(Vertex::new(
                (p * radius).into(),
                normal.into(),
                [normal.x, normal.y],
            ));
        }
    }

    let mut indices = Vec::with_capacity(vertex_count as usize * 6);
    let mut n = 0u32;
    for _ in 0..slices {
        for j in 0..stacks {
            indices.push((n + j + stacks) % vertex_count);
            indices.push(n + (j + 1) % stacks);
            indices.push(n + j);

            indices.push((n + (j + 1) % stacks + stacks) % vertex_count);
            indices.push((n + (j + 1) % stacks) % vertex_count);
            indices.push((n + j + stacks) % vertex_count);
        }
        n += stacks;
    }

    MeshData { vertices, indices }
}

/// Evaluate a point on the trefoil tube surface
///
/// `s` walks along the knot and `t` around the tube section; both close
/// with period one. The tube is traced at distance 0.1 from the analytic
/// centerline in the plane perpendicular to its tangent.
pub fn evaluate_trefoil(s: f32, t: f32) -> Vec3 {
    const A: f32 = 0.5;
    const B: f32 = 0.3;
    const C: f32 = 0.5;
    const D: f32 = 0.1;

    let u = (1.0 - s) * 2.0 * TAU;
    let v = t * TAU;
    let r = A + B * (1.5 * u).cos();

    let x = r * u.cos();
    let y = r * u.sin();
    let z = C * (1.5 * u).sin();

    let dv = Vec3::new(
        -1.5 * B * (1.5 * u).sin() * u.cos() - (A + B * (1.5 * u).cos()) * u.sin(),
        -1.5 * B * (1.5 * u).sin() * u.sin() + (A + B * (1.5 * u).cos()) * u.cos(),
        1.5 * C * (1.5 * u).cos(),
    );

    let q = dv.normalize();
    let qvn = Vec3::new(q.y, -q.x, 0.0).normalize();
    let ww = qvn.cross(q);

    Vec3::new(
        x + D * (qvn.x * v.cos() + ww.x * v.sin()),
        y + D * (qvn.y * v.cos() + ww.y * v.sin()),
        z + D * ww.z * v.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec3_approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_sphere_counts() {
        let data = sphere(Vec3::ONE, Vec3::ZERO, 4, 6);
        assert_eq!(data.vertices.len(), 4 * 7 * 2);
        assert!(data.indices.is_empty());
    }

    #[test]
    fn test_sphere_normals_unit_and_positions_scaled() {
        let radii = Vec3::new(2.0, 3.0, 4.0);
        let offset = Vec3::new(1.0, -1.0, 0.5);
        let data = sphere(radii, offset, 6, 8);

        for vertex in &data.vertices {
            let normal = Vec3::from(vertex.normal);
            assert!(approx(normal.length(), 1.0));
            assert!(vec3_approx(
                Vec3::from(vertex.position),
                radii * normal + offset
            ));
        }
    }

    #[test]
    fn test_sphere_strip_interleaves_bands() {
        // even entries sit on the next band, odd entries on the current one
        let rings = 4;
        let data = sphere(Vec3::ONE, Vec3::ZERO, rings, 5);
        for (i, pair) in data.vertices.chunks(2).enumerate() {
            let ring = (i / 6) as f32; // 5 segments -> 6 pairs per ring
            assert!(approx(pair[0].uv[1], (ring + 1.0) / rings as f32));
            assert!(approx(pair[1].uv[1], ring / rings as f32));
        }
    }

    #[test]
    fn test_sphere_degenerate_rings() {
        let data = sphere(Vec3::ONE, Vec3::ZERO, 0, 8);
        assert!(data.vertices.is_empty());
    }

    #[test]
    fn test_cube_counts() {
        let data = cube(Vec3::ONE, Vec3::ZERO);
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
    }

    #[test]
    fn test_cube_face_normals_and_uvs() {
        let data = cube(Vec3::ONE, Vec3::ZERO);
        let axes = [
            Vec3::Z,
            Vec3::X,
            Vec3::NEG_Z,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
        ];

        for (face, corners) in data.vertices.chunks(4).enumerate() {
            for vertex in corners {
                assert!(vec3_approx(Vec3::from(vertex.normal), axes[face]));
            }
            assert_eq!(corners[0].uv, [0.0, 0.0]);
            assert_eq!(corners[1].uv, [1.0, 0.0]);
            assert_eq!(corners[2].uv, [1.0, 1.0]);
            assert_eq!(corners[3].uv, [0.0, 1.0]);
        }
    }

    #[test]
    fn test_cube_index_pattern() {
        let data = cube(Vec3::ONE, Vec3::ZERO);
        for (face, fan) in data.indices.chunks(6).enumerate() {
            let base = face as u32 * 4;
            assert_eq!(fan, [base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    #[test]
    fn test_cube_extents_follow_size_and_offset() {
        let data = cube(Vec3::new(2.0, 4.0, 6.0), Vec3::new(1.0, 0.0, -1.0));
        let max_x = data
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        let min_y = data
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MAX, f32::min);
        let max_z = data
            .vertices
            .iter()
            .map(|v| v.position[2])
            .fold(f32::MIN, f32::max);
        assert!(approx(max_x, 2.0));
        assert!(approx(min_y, -2.0));
        assert!(approx(max_z, 2.0));
    }

    #[test]
    fn test_quad_vertex_table() {
        let data = quad(Vec2::new(2.0, 4.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(data.vertices.len(), 6);
        assert!(data.indices.is_empty());

        assert!(vec3_approx(
            Vec3::from(data.vertices[0].position),
            Vec3::new(1.0, -2.0, 1.0)
        ));
        // the shared diagonal is duplicated, not indexed
        assert!(vec3_approx(
            Vec3::from(data.vertices[2].position),
            Vec3::from(data.vertices[3].position)
        ));
        assert!(vec3_approx(
            Vec3::from(data.vertices[0].position),
            Vec3::from(data.vertices[5].position)
        ));
        for vertex in &data.vertices {
            assert!(vec3_approx(Vec3::from(vertex.normal), Vec3::Z));
        }
        assert_eq!(data.vertices[0].uv, [1.0, 1.0]);
        assert_eq!(data.vertices[1].uv, [0.0, 1.0]);
        assert_eq!(data.vertices[2].uv, [0.0, 0.0]);
        assert_eq!(data.vertices[4].uv, [1.0, 0.0]);
    }

    #[test]
    fn test_torus_counts_and_bounds() {
        let segments = 8;
        let data = torus(segments, 2.0, 0.5);
        assert_eq!(data.vertices.len(), (segments * segments) as usize);
        assert_eq!(data.indices.len(), 7 * 7 * 6);
        for &index in &data.indices {
            assert!(index < segments * segments);
        }
    }

    #[test]
    fn test_torus_seam_duplicates_phase_zero() {
        // the last tube section repeats the first one positionally
        let n = 8usize;
        let data = torus(n as u32, 2.0, 0.5);
        for i in 0..n {
            let first = Vec3::from(data.vertices[i * n].position);
            let seam = Vec3::from(data.vertices[i * n + n - 1].position);
            assert!((first - seam).length() < 1e-3);
        }
    }

    #[test]
    fn test_torus_normals_unit() {
        let data = torus(10, 1.5, 0.25);
        for vertex in &data.vertices {
            assert!(approx(Vec3::from(vertex.normal).length(), 1.0));
        }
    }

    #[test]
    fn test_torus_degenerate_segments() {
        let data = torus(0, 1.0, 0.5);
        assert!(data.vertices.is_empty());
        assert!(data.indices.is_empty());
    }

    #[test]
    fn test_knot_counts_and_bounds() {
        let (slices, stacks) = (6u32, 4u32);
        let data = knot(slices, stacks, 1.0);
        assert_eq!(data.vertices.len(), (slices * stacks) as usize);
        assert_eq!(data.indices.len(), (slices * stacks * 6) as usize);
        for &index in &data.indices {
            assert!(index < slices * stacks);
        }
    }

    #[test]
    fn test_knot_degenerate() {
        let data = knot(0, 4, 1.0);
        assert!(data.vertices.is_empty());
        assert!(data.indices.is_empty());
    }

    #[test]
    fn test_trefoil_closes_in_both_parameters() {
        for step in 0..5 {
            let x = step as f32 * 0.2;
            assert!(vec3_approx(
                evaluate_trefoil(0.0, x),
                evaluate_trefoil(1.0, x)
            ));
            assert!(vec3_approx(
                evaluate_trefoil(x, 0.0),
                evaluate_trefoil(x, 1.0)
            ));
        }
    }

    #[test]
    fn test_trefoil_tube_diameter() {
        // opposite tube sections sit one tube diameter (2 * 0.1) apart
        for step in 0..4 {
            let s = step as f32 * 0.25;
            let a = evaluate_trefoil(s, 0.0);
            let b = evaluate_trefoil(s, 0.5);
            assert!(approx((a - b).length(), 0.2));
        }
    }

    #[test]
    fn test_knot_radius_scales_positions_only() {
        let unit = knot(5, 4, 1.0);
        let scaled = knot(5, 4, 3.0);
        for (a, b) in unit.vertices.iter().zip(&scaled.vertices) {
            assert!(vec3_approx(
                Vec3::from(a.position) * 3.0,
                Vec3::from(b.position)
            ));
            assert!(vec3_approx(Vec3::from(a.normal), Vec3::from(b.normal)));
        }
    }
}
