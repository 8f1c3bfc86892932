use std::f64::consts::PI;

use image::RgbaImage;
use log::{info, warn};

use geom::Vec3;

use crate::camera::Camera;
use crate::grid::VoxelGrid;
use crate::renderer::{parallel_render, PixelRenderer};
use crate::scene::Scene;

/// Parameters of an orbital fly-around.
#[derive(Debug, Clone, PartialEq)]
pub struct TurntableConfig {
    /// How many camera positions to render along the orbit.
    pub num_frames: u32,

    /// Multiplier applied to the scene radius when picking the orbit
    /// distance.
    pub distance_factor: f64,

    /// How far above the scene the camera flies, in radians.
    pub elevation_angle: f64,

    /// Display time of each frame in the resulting animation.
    pub frame_duration_ms: u32,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        TurntableConfig {
            num_frames: 36,
            distance_factor: 2.0,
            elevation_angle: 0.3,
            frame_duration_ms: 100,
        }
    }
}

/// Center and bounding radius of a non-empty grid, taken from its bounding
/// box: the box midpoint and half its diagonal.
pub fn scene_center_and_radius(grid: &VoxelGrid) -> Option<(Vec3, f64)> {
    let (min, max) = grid.bounds()?;

    let min = Vec3::new(f64::from(min.0), f64::from(min.1), f64::from(min.2));
    let max = Vec3::new(f64::from(max.0), f64::from(max.1), f64::from(max.2));

    Some(((min + max) / 2.0, (max - min).norm() / 2.0))
}

/// The camera for orbit position `index` out of `num_frames`.
///
/// The camera circles the scene center at a fixed distance and elevation,
/// always pitched and yawed to look back at the center. Pixel grid
/// parameters are inherited from the scene camera; the focal length grows
/// with the orbit distance so the whole scene stays in view.
pub fn orbit_camera(
    base: &Camera,
    center: Vec3,
    radius: f64,
    index: u32,
    config: &TurntableConfig,
) -> Camera {
    // distance that fits the scene for a ~35 degree view cone, with margin
    let fov_factor = 1.0 / 35.0_f64.to_radians().tan();
    let min_distance = radius * fov_factor * 1.5;
    let distance = f64::max(min_distance, radius * config.distance_factor) + 2.0;

    let elevation = radius * config.elevation_angle.sin() + radius * 0.3;

    let angle = 2.0 * PI * f64::from(index) / f64::from(config.num_frames);

    let position = Vec3::new(
        center.x + distance * angle.cos(),
        center.y + distance * angle.sin(),
        center.z + elevation,
    );

    let look = center - position;
    let horizontal = look.x.hypot(look.y);

    // yaw around z to face the center, pitch around x to tilt down onto it
    let rot_z = look.y.atan2(look.x) - PI / 2.0;
    let rot_x = -look.z.atan2(horizontal);

    Camera {
        position,
        rotation: Vec3::new(rot_x, 0.0, rot_z),
        focal: f64::max(base.focal, distance * 0.5),
        clip_start: 0.1,
        clip_end: distance * 3.0,
        width: base.width,
        height: base.height,
        pixel_size: base.pixel_size,
        ..Camera::default()
    }
}

/// Render a full orbit around one frame of the scene.
///
/// Returns the rendered frames in orbit order. An empty grid (or a scene
/// with no frames) aborts the orbit and returns no frames at all.
pub fn render_turntable(
    scene: &Scene,
    frame_index: usize,
    config: &TurntableConfig,
) -> Vec<RgbaImage> {
    if scene.frames.is_empty() {
        warn!("no data frames in scene");
        return vec![];
    }

    let frame = &scene.frames[frame_index.min(scene.frames.len() - 1)];
    let grid = VoxelGrid::build(frame, &scene.defaults);

    let Some((center, radius)) = scene_center_and_radius(&grid) else {
        warn!("no voxels in frame");
        return vec![];
    };

    info!(
        "orbiting scene centered at ({:.2}, {:.2}, {:.2}) with radius {:.2}",
        center.x, center.y, center.z, radius
    );

    let mut frames = Vec::with_capacity(config.num_frames as usize);

    for i in 0..config.num_frames {
        let camera = orbit_camera(&scene.camera, center, radius, i, config);
        let pixel_renderer = PixelRenderer::new(&grid, &scene.environment, &camera);

        frames.push(parallel_render(&pixel_renderer));

        info!("rendered frame {}/{}", i + 1, config.num_frames);
    }

    frames
}

#[cfg(test)]
mod tests {
    use geom::v3;

    use super::*;
    use crate::color::Color;
    use crate::environment::{Environment, EnvironmentKind};
    use crate::scene::{Frame, LightValue};
    use crate::voxel::VoxelValue;

    fn two_cube_grid() -> VoxelGrid {
        let mut grid = VoxelGrid::new();
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    grid.set(x, y, z, Color::rgb(100, 100, 100));
                }
            }
        }
        grid
    }

    #[test]
    fn test_scene_center_and_radius() {
        let (center, radius) = scene_center_and_radius(&two_cube_grid()).unwrap();

        assert_eq!(center, v3(1, 1, 1));
        assert!((radius - 3.0_f64.sqrt()).abs() < 1e-9);

        assert_eq!(scene_center_and_radius(&VoxelGrid::new()), None);
    }

    #[test]
    fn test_orbit_camera_placement() {
        let base = Camera::default();
        let config = TurntableConfig::default();
        let center = v3(1, 1, 1);
        let radius = 3.0_f64.sqrt();

        let fov_factor = 1.0 / 35.0_f64.to_radians().tan();
        let distance = f64::max(radius * fov_factor * 1.5, radius * 2.0) + 2.0;
        let elevation = radius * 0.3_f64.sin() + radius * 0.3;

        let cam = orbit_camera(&base, center, radius, 0, &config);

        // angle 0 puts the camera on the +x side of the center
        assert!((cam.position.x - (1.0 + distance)).abs() < 1e-9);
        assert!((cam.position.y - 1.0).abs() < 1e-9);
        assert!((cam.position.z - (1.0 + elevation)).abs() < 1e-9);

        // looking back along -x means a quarter turn around z
        assert!((cam.rotation.z - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(cam.rotation.y, 0.0);
        // pitched down towards the center
        assert!(cam.rotation.x > 0.0);

        assert_eq!(cam.clip_start, 0.1);
        assert!((cam.clip_end - distance * 3.0).abs() < 1e-9);
        // the base focal of 70 dominates d/2 at this scale
        assert_eq!(cam.focal, 70.0);
        assert_eq!((cam.width, cam.height), (base.width, base.height));
    }

    #[test]
    fn test_orbit_focal_grows_with_distance() {
        let base = Camera {
            focal: 0.5,
            ..Camera::default()
        };

        let cam = orbit_camera(&base, v3(0, 0, 0), 10.0, 0, &TurntableConfig::default());
        assert!(cam.focal > 0.5);
        assert!((cam.focal - (cam.clip_end / 3.0) * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_turntable_frame_count_and_abort() {
        let scene = Scene {
            frames: vec![Frame {
                voxels_dict: vec![(v3(0, 0, 0), VoxelValue::Color(Color::rgb(255, 0, 0)))],
                ..Frame::default()
            }],
            environment: Environment {
                kind: EnvironmentKind::Color {
                    color: Color::rgb(0, 0, 0),
                    light_emission: LightValue::default(),
                },
                ..Environment::default()
            },
            camera: Camera {
                width: 4,
                height: 4,
                ..Camera::default()
            },
            ..Scene::default()
        };

        let config = TurntableConfig {
            num_frames: 3,
            ..TurntableConfig::default()
        };

        let frames = render_turntable(&scene, 0, &config);
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.dimensions() == (4, 4)));

        // an empty frame aborts the whole orbit
        let empty = Scene {
            frames: vec![Frame::default()],
            ..scene
        };
        assert!(render_turntable(&empty, 0, &config).is_empty());
    }
}
