//! Interleaved vertex buffer: `(x_ndc, y_ndc, r, g, b)` per vertex.
//!
//! Layout: a fill block with each polygon's 4 vertices in their own colors,
//! then a wireframe block of the same vertices in [`WIREFRAME_COLOR`].

use crate::geometry::{GeometryStore, QUAD_VERTICES};
use crate::mapper::CoordinateMapper;

/// Floats per vertex.
pub const VERTEX_STRIDE: u32 = 5;
/// Position floats, at offset 0.
pub const POSITION_COMPONENTS: u32 = 2;
/// Color floats, right after the position.
pub const COLOR_COMPONENTS: u32 = 3;
pub const COLOR_OFFSET: u32 = POSITION_COMPONENTS;

pub const WIREFRAME_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// Total float count for `polygons` quads.
#[inline]
pub const fn buffer_len(polygons: usize) -> usize {
    polygons * QUAD_VERTICES * VERTEX_STRIDE as usize * 2
}

/// First vertex of `polygon` in the fill block.
#[inline]
pub const fn fill_offset(polygon: usize) -> u32 {
    (polygon * QUAD_VERTICES) as u32
}

/// First vertex of `polygon` in the wireframe block.
#[inline]
pub const fn wireframe_offset(polygon: usize, polygons: usize) -> u32 {
    ((polygons + polygon) * QUAD_VERTICES) as u32
}

/// Builds a fresh buffer.
pub fn build(geometry: &GeometryStore, mapper: &CoordinateMapper) -> Vec<f32> {
    let mut out = Vec::with_capacity(buffer_len(geometry.polygon_count()));
    build_into(geometry, mapper, &mut out);
    out
}

/// Like [`build`], reusing `out`'s allocation.
pub fn build_into(geometry: &GeometryStore, mapper: &CoordinateMapper, out: &mut Vec<f32>) {
    out.clear();
    out.reserve(buffer_len(geometry.polygon_count()));

    for poly in geometry.polygons() {
        for &i in poly {
            let p = mapper.to_ndc(geometry.vertex_position(i));
            out.extend_from_slice(&[p.x, p.y]);
            out.extend_from_slice(&geometry.vertex_color(i).to_unit());
        }
    }

    for poly in geometry.polygons() {
        for &i in poly {
            let p = mapper.to_ndc(geometry.vertex_position(i));
            out.extend_from_slice(&[p.x, p.y]);
            out.extend_from_slice(&WIREFRAME_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rgb8;
    use quadedit_engine::coords::{Vec2, Viewport};

    fn two_quads() -> GeometryStore {
        // 3×2 grid of vertices on a 200×100 canvas.
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(200.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 100.0),
        ];
        let colors = vec![
            Rgb8::new(255, 0, 0),
            Rgb8::new(0, 255, 0),
            Rgb8::new(0, 0, 255),
            Rgb8::new(255, 255, 0),
            Rgb8::new(0, 255, 255),
            Rgb8::new(255, 0, 255),
        ];
        GeometryStore::new(positions, colors, vec![[0, 1, 4, 3], [1, 2, 5, 4]])
    }

    fn vertex(buf: &[f32], v: u32) -> &[f32] {
        let at = (v * VERTEX_STRIDE) as usize;
        &buf[at..at + VERTEX_STRIDE as usize]
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn length_covers_fill_and_wireframe_blocks() {
        let g = two_quads();
        let buf = build(&g, &CoordinateMapper::new(Viewport::new(200.0, 100.0)));
        assert_eq!(buf.len(), 2 * 4 * 5 * 2);
        assert_eq!(buf.len(), buffer_len(2));
    }

    #[test]
    fn fill_block_carries_vertex_colors_in_polygon_order() {
        let g = two_quads();
        let buf = build(&g, &CoordinateMapper::new(Viewport::new(200.0, 100.0)));

        // Polygon 1, second vertex = vertex 2 (top-right corner, blue).
        assert_eq!(vertex(&buf, fill_offset(1) + 1), &[1.0, 1.0, 0.0, 0.0, 1.0]);
        // Polygon 0, third vertex = vertex 4 (bottom-middle, cyan).
        assert_eq!(vertex(&buf, fill_offset(0) + 2), &[0.0, -1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn wireframe_block_repeats_positions_in_red() {
        let g = two_quads();
        let buf = build(&g, &CoordinateMapper::new(Viewport::new(200.0, 100.0)));

        for poly in 0..2 {
            for k in 0..4 {
                let fill = vertex(&buf, fill_offset(poly) + k);
                let wire = vertex(&buf, wireframe_offset(poly, 2) + k);
                assert_eq!(fill[..2], wire[..2]);
                assert_eq!(wire[2..], WIREFRAME_COLOR);
            }
        }
    }

    #[test]
    fn empty_polygon_table_builds_empty_buffer() {
        let g = GeometryStore::new(vec![Vec2::zero()], vec![Rgb8::default()], Vec::new());
        assert!(build(&g, &CoordinateMapper::new(Viewport::new(10.0, 10.0))).is_empty());
    }

    #[test]
    fn build_into_reuses_and_replaces_contents() {
        let g = two_quads();
        let m = CoordinateMapper::new(Viewport::new(200.0, 100.0));
        let mut out = vec![9.0; 3];
        build_into(&g, &m, &mut out);
        assert_eq!(out, build(&g, &m));
    }
}
