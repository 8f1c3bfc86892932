use geom::{Axis, Vec3};

use crate::color::Color;
use crate::palette::{Palette, PaletteKey};

/// A position as it appears in a scene document: the coordinates that the
/// renderer consumes plus optional transform hints kept for editors.
#[derive(Debug, Clone, PartialEq)]
pub struct Pos {
    pub xyz: Vec3,
    pub shift: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub flip: Option<Vec3>,
    pub crop: Option<Vec3>,
}

impl Pos {
    /// A `Pos` with only coordinates and no transform hints.
    pub fn at(xyz: Vec3) -> Self {
        Pos {
            xyz,
            shift: None,
            scale: None,
            rotation: None,
            flip: None,
            crop: None,
        }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Pos::at(Vec3::zero())
    }
}

/// A shape primitive: a kind plus the color and anchor position shared by
/// every kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: Color,
    pub position: Pos,
}

/// The supported shape primitives.
///
/// Only `Point`, `Line`, `Cube`, `Rect` and `Sphere` are rasterized into
/// voxels; the remaining kinds are carried through the model untouched and
/// contribute nothing to the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Point,
    Line { end: Pos },
    Triangle { b: Pos, c: Pos },
    Circle { radius: i32, axis: Axis },
    Cube { size: i32 },
    Rect { corner: Pos },
    Sphere { radius: i32 },
    Cylinder { radius: i32, height: i32, axis: Axis },
    Polygon { vertices: Vec<Pos> },
}

/// One entry of a frame's voxel containers.
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelValue {
    /// A literal color at an externally supplied position.
    Color(Color),

    /// A reference into the scene palette, falling back to the scene's
    /// default color when the key is unknown.
    PaletteRef(PaletteKey),

    /// A reference to another voxel document; not resolved by the renderer.
    Import { path: String, position: Pos },

    /// A shape primitive.
    Shape(Shape),

    /// Anything the document contained that matched no other case.
    Unknown,
}

impl VoxelValue {
    /// Resolve this value to the concrete color a grid cell will store.
    pub fn resolve_color(&self, palette: &Palette, default_color: Color) -> Color {
        match self {
            VoxelValue::Color(c) => *c,
            VoxelValue::PaletteRef(key) => palette.get(key).unwrap_or(default_color),
            VoxelValue::Shape(shape) => shape.color,
            VoxelValue::Import { .. } | VoxelValue::Unknown => default_color,
        }
    }
}
