use rustc_hash::FxHashMap;

use crate::color::Color;
use crate::scene::{Defaults, Frame};
use crate::voxel::{Shape, ShapeKind, VoxelValue};
use crate::Voxel;

/// Sparse voxel storage with a tight axis-aligned bounding box.
///
/// Every voxel container of a frame collapses into this single map from
/// integer cell to color. The bounds are inclusive on the low corner and
/// exclusive on the high one, so a lone cell at the origin produces the
/// box `(0,0,0)..(1,1,1)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelGrid {
    voxels: FxHashMap<Voxel, Color>,
    bounds: Option<(Voxel, Voxel)>,
}

impl VoxelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse one frame into a grid, resolving every voxel value against
    /// the scene palette.
    ///
    /// The containers are always processed in the same order: the position
    /// map first, then the flat list, then the dense grid. Within a cell
    /// the last write wins.
    pub fn build(frame: &Frame, defaults: &Defaults) -> Self {
        let mut grid = VoxelGrid::new();

        for (pos, value) in &frame.voxels_dict {
            let color = value.resolve_color(&defaults.palette, defaults.default_color);
            let p = pos.floor();
            grid.set(p.x as i32, p.y as i32, p.z as i32, color);
        }

        for value in &frame.voxels_list {
            grid.rasterize(value);
        }

        for (z, layer) in frame.voxels_grid.iter().enumerate() {
            for (y, row) in layer.iter().enumerate() {
                for (x, value) in row.iter().enumerate() {
                    let color = value.resolve_color(&defaults.palette, defaults.default_color);
                    grid.set(x as i32, y as i32, z as i32, color);
                }
            }
        }

        grid
    }

    /// The color stored at the given cell, if any.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Color> {
        self.voxels.get(&(x, y, z)).copied()
    }

    /// Store a color at the given cell, growing the bounds to cover it.
    pub fn set(&mut self, x: i32, y: i32, z: i32, color: Color) {
        self.voxels.insert((x, y, z), color);

        self.bounds = Some(match self.bounds {
            None => ((x, y, z), (x + 1, y + 1, z + 1)),
            Some((min, max)) => (
                (min.0.min(x), min.1.min(y), min.2.min(z)),
                (max.0.max(x + 1), max.1.max(y + 1), max.2.max(z + 1)),
            ),
        });
    }

    /// The inclusive-min/exclusive-max bounding box, or `None` for an empty
    /// grid.
    pub fn bounds(&self) -> Option<(Voxel, Voxel)> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Iterator over all the stored cells and their colors.
    pub fn voxels(&self) -> impl Iterator<Item = (Voxel, Color)> + '_ {
        self.voxels.iter().map(|(&v, &c)| (v, c))
    }

    /// Turn a list entry into concrete cells. Only the shapes with a
    /// defined footprint contribute; everything else is carried in the
    /// model but writes nothing.
    fn rasterize(&mut self, value: &VoxelValue) {
        let VoxelValue::Shape(shape) = value else {
            return;
        };

        let Shape { kind, color, position } = shape;
        let p = position.xyz.floor();
        let (px, py, pz) = (p.x as i32, p.y as i32, p.z as i32);

        match kind {
            ShapeKind::Point => {
                self.set(px, py, pz, *color);
            }

            ShapeKind::Cube { size } => {
                for dx in 0..*size {
                    for dy in 0..*size {
                        for dz in 0..*size {
                            self.set(px + dx, py + dy, pz + dz, *color);
                        }
                    }
                }
            }

            ShapeKind::Rect { corner } => {
                let q = corner.xyz.floor();
                let (qx, qy, qz) = (q.x as i32, q.y as i32, q.z as i32);

                for x in px.min(qx)..=px.max(qx) {
                    for y in py.min(qy)..=py.max(qy) {
                        for z in pz.min(qz)..=pz.max(qz) {
                            self.set(x, y, z, *color);
                        }
                    }
                }
            }

            ShapeKind::Sphere { radius } => {
                for dx in -radius..=*radius {
                    for dy in -radius..=*radius {
                        for dz in -radius..=*radius {
                            if dx * dx + dy * dy + dz * dz <= radius * radius {
                                self.set(px + dx, py + dy, pz + dz, *color);
                            }
                        }
                    }
                }
            }

            ShapeKind::Line { end } => {
                let q = end.xyz.floor();
                self.line((px, py, pz), (q.x as i32, q.y as i32, q.z as i32), *color);
            }

            ShapeKind::Triangle { .. }
            | ShapeKind::Circle { .. }
            | ShapeKind::Cylinder { .. }
            | ShapeKind::Polygon { .. } => {}
        }
    }

    /// Walk a 3-D line one major step at a time.
    ///
    /// Each minor axis carries an accumulator that advances by its slope
    /// per major step and wraps past 0.5, so the segment stays within one
    /// cell of the ideal line. Both endpoints are always written.
    fn line(&mut self, (x0, y0, z0): Voxel, (x1, y1, z1): Voxel, color: Color) {
        let (dx, dy, dz) = ((x1 - x0).abs(), (y1 - y0).abs(), (z1 - z0).abs());

        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let sz = if z0 < z1 { 1 } else { -1 };

        let (mut x, mut y, mut z) = (x0, y0, z0);
        self.set(x, y, z, color);

        let dm = dx.max(dy).max(dz);
        if dm == 0 {
            return;
        }

        let x_inc = f64::from(dx) / f64::from(dm);
        let y_inc = f64::from(dy) / f64::from(dm);
        let z_inc = f64::from(dz) / f64::from(dm);

        let (mut x_acc, mut y_acc, mut z_acc) = (0.0, 0.0, 0.0);

        for _ in 0..dm {
            x_acc += x_inc;
            y_acc += y_inc;
            z_acc += z_inc;

            if x_acc >= 0.5 {
                x += sx;
                x_acc -= 1.0;
            }
            if y_acc >= 0.5 {
                y += sy;
                y_acc -= 1.0;
            }
            if z_acc >= 0.5 {
                z += sz;
                z_acc -= 1.0;
            }

            self.set(x, y, z, color);
        }
    }
}
