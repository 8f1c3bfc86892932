use geom::{Axis, Ray, Vec3};

use crate::color::Color;
use crate::grid::VoxelGrid;
use crate::Voxel;

/// Directions smaller than this are treated as parallel to a grid axis.
const PARALLEL_EPS: f64 = 1e-10;

/// Once the entry point into the grid is known, the ray is pushed forward
/// by this much so the starting cell is strictly inside the box.
const ENTRY_NUDGE: f64 = 1e-3;

/// A ray/voxel intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Ray parameter at which the voxel was reached.
    pub t: f64,

    /// The cell that was hit.
    pub voxel: Voxel,

    /// The color stored in the cell.
    pub color: Color,

    /// Inward-facing unit normal of the face the ray entered through, or
    /// `(0, 1, 0)` when the very first visited cell was already filled.
    pub normal: Vec3,
}

/// March `ray` through `grid` with a 3-D DDA and return the first filled
/// cell between `clip_start` and `clip_end`, or `None` when the ray
/// escapes.
///
/// The traversal steps one grid line at a time along the axis whose next
/// crossing is closest, visiting every cell the ray passes through exactly
/// once.
pub fn march(grid: &VoxelGrid, ray: &Ray, clip_start: f64, clip_end: f64) -> Option<Hit> {
    let (bounds_min, bounds_max) = grid.bounds()?;

    let (t_enter, t_exit) = intersect_aabb(ray, bounds_min, bounds_max);

    if t_enter > t_exit || t_exit < clip_start || t_enter > clip_end {
        return None;
    }

    let t_start = t_enter.max(clip_start);
    let entry = ray.point_at(t_start + ENTRY_NUDGE);

    let (mut x, mut y, mut z) = (
        entry.x.floor() as i32,
        entry.y.floor() as i32,
        entry.z.floor() as i32,
    );

    let (dx, dy, dz) = (ray.dir.x, ray.dir.y, ray.dir.z);

    let step_x: i32 = if dx >= 0.0 { 1 } else { -1 };
    let step_y: i32 = if dy >= 0.0 { 1 } else { -1 };
    let step_z: i32 = if dz >= 0.0 { 1 } else { -1 };

    let t_delta = |d: f64| {
        if d.abs() > PARALLEL_EPS {
            (1.0 / d).abs()
        } else {
            f64::INFINITY
        }
    };
    let (t_delta_x, t_delta_y, t_delta_z) = (t_delta(dx), t_delta(dy), t_delta(dz));

    // distances to the next grid line on each axis, measured from the entry
    // point rather than the ray origin
    let mut t_max_x = initial_t_max(entry.x, dx, step_x);
    let mut t_max_y = initial_t_max(entry.y, dy, step_y);
    let mut t_max_z = initial_t_max(entry.z, dz, step_z);

    let mut t_current = t_start;
    let mut last_axis: Option<Axis> = None;

    let max_iterations = ((clip_end - clip_start) * 3.0).ceil() as usize + 1000;

    for _ in 0..max_iterations {
        let in_bounds = x >= bounds_min.0
            && x < bounds_max.0
            && y >= bounds_min.1
            && y < bounds_max.1
            && z >= bounds_min.2
            && z < bounds_max.2;

        if !in_bounds || t_current > clip_end {
            return None;
        }

        if let Some(color) = grid.get(x, y, z) {
            return Some(Hit {
                t: t_current,
                voxel: (x, y, z),
                color,
                normal: entry_normal(last_axis, (step_x, step_y, step_z)),
            });
        }

        // advance along the axis whose boundary is closest; ties prefer X,
        // then Z, then Y
        if t_max_x < t_max_y {
            if t_max_x < t_max_z {
                x += step_x;
                t_current = t_max_x;
                t_max_x += t_delta_x;
                last_axis = Some(Axis::X);
            } else {
                z += step_z;
                t_current = t_max_z;
                t_max_z += t_delta_z;
                last_axis = Some(Axis::Z);
            }
        } else if t_max_y < t_max_z {
            y += step_y;
            t_current = t_max_y;
            t_max_y += t_delta_y;
            last_axis = Some(Axis::Y);
        } else {
            z += step_z;
            t_current = t_max_z;
            t_max_z += t_delta_z;
            last_axis = Some(Axis::Z);
        }
    }

    None
}

/// Parametric distance from `pos` to the first grid line along one axis.
fn initial_t_max(pos: f64, direction: f64, step: i32) -> f64 {
    if direction.abs() < PARALLEL_EPS {
        return f64::INFINITY;
    }

    let boundary = if step > 0 {
        pos.floor() + 1.0
    } else {
        pos.floor()
    };

    (boundary - pos) / direction
}

/// Slab intersection of a ray against the grid box.
///
/// Returns the entering and exiting parameters; the pair is inverted
/// (`enter > exit`) when there is no intersection. An axis the ray is
/// parallel to only checks that the origin lies inside that slab.
fn intersect_aabb(ray: &Ray, bounds_min: Voxel, bounds_max: Voxel) -> (f64, f64) {
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let direction = [ray.dir.x, ray.dir.y, ray.dir.z];
    let min = [
        f64::from(bounds_min.0),
        f64::from(bounds_min.1),
        f64::from(bounds_min.2),
    ];
    let max = [
        f64::from(bounds_max.0),
        f64::from(bounds_max.1),
        f64::from(bounds_max.2),
    ];

    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for i in 0..3 {
        if direction[i].abs() < PARALLEL_EPS {
            if origin[i] < min[i] || origin[i] > max[i] {
                return (f64::INFINITY, f64::NEG_INFINITY);
            }
        } else {
            let mut t1 = (min[i] - origin[i]) / direction[i];
            let mut t2 = (max[i] - origin[i]) / direction[i];

            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
        }
    }

    (t_min, t_max)
}

/// The inward normal of the face crossed by the last DDA step. Before any
/// step has been taken there is no entry face, so a fixed upward normal is
/// reported.
fn entry_normal(axis: Option<Axis>, (step_x, step_y, step_z): (i32, i32, i32)) -> Vec3 {
    match axis {
        Some(Axis::X) => Vec3::new(f64::from(-step_x), 0.0, 0.0),
        Some(Axis::Y) => Vec3::new(0.0, f64::from(-step_y), 0.0),
        Some(Axis::Z) => Vec3::new(0.0, 0.0, f64::from(-step_z)),
        None => Vec3::new(0.0, 1.0, 0.0),
    }
}
