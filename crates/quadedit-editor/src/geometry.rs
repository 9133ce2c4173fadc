use quadedit_engine::coords::Vec2;

/// Vertices per polygon. Every polygon is a quad.
pub const QUAD_VERTICES: usize = 4;

/// Four vertex indices, in winding order.
pub type Polygon = [usize; QUAD_VERTICES];

/// 8-bit RGB vertex color.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`.
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Vertex positions (pixel space), vertex colors and the polygon table.
///
/// The vertex and polygon sets are fixed once built; only positions change.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryStore {
    positions: Vec<Vec2>,
    colors: Vec<Rgb8>,
    polygons: Vec<Polygon>,
}

impl GeometryStore {
    /// Panics if the position and color lists differ in length or a polygon
    /// refers to a missing vertex. Scenes are validated before they get here.
    pub fn new(positions: Vec<Vec2>, colors: Vec<Rgb8>, polygons: Vec<Polygon>) -> Self {
        assert_eq!(
            positions.len(),
            colors.len(),
            "vertex positions ({}) and colors ({}) differ in length",
            positions.len(),
            colors.len()
        );
        for (p, poly) in polygons.iter().enumerate() {
            for &i in poly {
                assert!(
                    i < positions.len(),
                    "polygon {p} refers to vertex {i}, but there are {} vertices",
                    positions.len()
                );
            }
        }
        Self { positions, colors, polygons }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn vertex_position(&self, i: usize) -> Vec2 {
        self.check_index(i);
        self.positions[i]
    }

    pub fn set_vertex_position(&mut self, i: usize, p: Vec2) {
        self.check_index(i);
        self.positions[i] = p;
    }

    pub fn vertex_color(&self, i: usize) -> Rgb8 {
        self.check_index(i);
        self.colors[i]
    }

    /// Positions in index order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.positions.iter().copied()
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.positions
    }

    #[inline]
    fn check_index(&self, i: usize) {
        assert!(
            i < self.positions.len(),
            "vertex index {i} out of range ({} vertices)",
            self.positions.len()
        );
    }
}
