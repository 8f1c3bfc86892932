use geom::Vec3;

use crate::camera::Camera;
use crate::color::Color;
use crate::environment::Environment;
use crate::palette::Palette;
use crate::voxel::VoxelValue;

/// Per-channel light intensity. Loaded from documents and carried through
/// the model, but never consulted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightValue {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LightValue {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        LightValue { r, g, b }
    }
}

impl Default for LightValue {
    fn default() -> Self {
        LightValue::new(1.0, 1.0, 1.0)
    }
}

/// Descriptive fields of a scene document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub author: Vec<String>,
    pub description: String,
    pub date_created: String,
    pub date_modified: String,
    pub tags: Vec<String>,
    pub license: String,
    pub is_post_processed: bool,
}

/// Scene-wide data every frame shares: the fallback color, the palette and
/// the editor grid appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub default_color: Color,
    pub palette: Palette,
    pub grid_thickness: i64,
    pub grid_color: Color,
}

/// One animation slice of a scene.
///
/// Voxels may be expressed in any mix of three containers: a sparse
/// position map, a flat list of values (typically shapes), and a dense 3-D
/// grid indexed z-outermost. Absent containers are simply empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub id: i64,
    pub duration: f64,
    pub voxels_dict: Vec<(Vec3, VoxelValue)>,
    pub voxels_list: Vec<VoxelValue>,
    pub voxels_grid: Vec<Vec<Vec<VoxelValue>>>,
    pub light_emission: Vec<(Vec3, LightValue)>,
}

/// A fully loaded scene document, immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub meta: Metadata,
    pub defaults: Defaults,
    pub frames: Vec<Frame>,
    pub environment: Environment,
    pub camera: Camera,
}
