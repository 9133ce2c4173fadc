use quadedit_engine::coords::{Vec2, Viewport};

use crate::geometry::GeometryStore;

/// Rotation (degrees, counter-clockwise in NDC) followed by a uniform scale
/// about the canvas center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub angle_deg: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { angle_deg: 0.0, scale: 1.0 };

    pub const fn new(angle_deg: f32, scale: f32) -> Self {
        Self { angle_deg, scale }
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotates `p` by `t.angle_deg` and scales it by `t.scale`.
pub fn apply_transform(p: Vec2, t: Transform) -> Vec2 {
    let (sin, cos) = t.angle_deg.to_radians().sin_cos();
    Vec2::new(
        t.scale * (p.x * cos - p.y * sin),
        t.scale * (p.x * sin + p.y * cos),
    )
}

/// Converts between canvas pixels (origin top-left, y down) and NDC
/// (origin at the center, y up, `[-1, 1]` on both axes).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordinateMapper {
    canvas: Viewport,
}

impl CoordinateMapper {
    /// Panics on a canvas without area.
    pub fn new(canvas: Viewport) -> Self {
        assert!(canvas.is_valid(), "canvas {canvas:?} has no area");
        Self { canvas }
    }

    #[inline]
    pub fn canvas(&self) -> Viewport {
        self.canvas
    }

    #[inline]
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let half = self.canvas.half_extent();
        Vec2::new((p.x - half.x) / half.x, -(p.y - half.y) / half.y)
    }

    #[inline]
    pub fn to_pixel(&self, n: Vec2) -> Vec2 {
        let half = self.canvas.half_extent();
        Vec2::new(n.x * half.x + half.x, -n.y * half.y + half.y)
    }

    /// Rewrites every vertex position as if `t` had been applied on the GPU.
    pub fn bake_transform(&self, geometry: &mut GeometryStore, t: Transform) {
        if t.is_identity() {
            return;
        }
        for p in geometry.positions_mut() {
            *p = self.to_pixel(apply_transform(self.to_ndc(*p), t));
        }
    }
}
