use geom::Vec3;

/// A pinhole camera described the way scene documents carry it: a position
/// and Euler rotation, a focal distance, clip range, and the size of the
/// pixel grid both in pixels and in world units per pixel.
///
/// The focal point sits behind the image plane: rays start at
/// `position + R·(0, -focal, 0)` and pass through the rotated pixel grid
/// centered on `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
    pub focal: f64,
    pub clip_start: f64,
    pub clip_end: f64,
    pub locked_movement: bool,
    pub locked_rotation: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_size: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            focal: 70.0,
            clip_start: 0.001,
            clip_end: 100.0,
            locked_movement: false,
            locked_rotation: false,
            width: 32,
            height: 32,
            pixel_size: 0.1,
        }
    }
}
