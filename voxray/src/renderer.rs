use image::{Rgba, RgbaImage};
use log::{debug, warn};
use rayon::prelude::*;

use geom::{Mat3, Ray, Vec3};

use crate::camera::Camera;
use crate::color::Color;
use crate::environment::Environment;
use crate::grid::VoxelGrid;
use crate::march::march;
use crate::scene::Scene;

/// Per-pixel ray caster for one camera placement.
///
/// The camera rotation matrix and the world-space focal point are computed
/// once up front; after that every pixel is a pure function of its
/// coordinates, so pixels may be rendered in any order or concurrently.
#[derive(Debug)]
pub struct PixelRenderer<'a> {
    grid: &'a VoxelGrid,
    environment: &'a Environment,
    camera: &'a Camera,

    rotation: Mat3,
    focal_point: Vec3,
}

impl<'a> PixelRenderer<'a> {
    pub fn new(grid: &'a VoxelGrid, environment: &'a Environment, camera: &'a Camera) -> Self {
        let rotation = Mat3::from_euler(camera.rotation);

        // the pinhole sits behind the image plane along the camera's local
        // -y axis
        let focal_point = camera.position + rotation * Vec3::new(0.0, -camera.focal, 0.0);

        PixelRenderer {
            grid,
            environment,
            camera,
            rotation,
            focal_point,
        }
    }

    /// The color seen through pixel `(x, y)`: the first voxel the pixel's
    /// ray hits, or the environment behind it.
    pub fn render_pixel(&self, x: u32, y: u32) -> Color {
        let ray = self.pixel_ray(x, y);

        match march(
            self.grid,
            &ray,
            self.camera.clip_start,
            self.camera.clip_end,
        ) {
            Some(hit) => hit.color,
            None => self.environment.sample(&ray),
        }
    }

    /// The primary ray for pixel `(x, y)`: from the focal point through the
    /// pixel's position on the rotated image plane centered on the camera.
    pub fn pixel_ray(&self, x: u32, y: u32) -> Ray {
        let px = (f64::from(x) - f64::from(self.camera.width) / 2.0) * self.camera.pixel_size;
        let pz = (f64::from(y) - f64::from(self.camera.height) / 2.0) * self.camera.pixel_size;

        let pixel_world = self.camera.position + self.rotation * Vec3::new(px, 0.0, pz);

        Ray::from_points(self.focal_point, pixel_world)
    }
}

/// Render a full frame to a new RGBA image, one pixel at a time in raster
/// order.
pub fn render(pixel_renderer: &PixelRenderer) -> RgbaImage {
    let mut img = RgbaImage::new(pixel_renderer.camera.width, pixel_renderer.camera.height);

    for (x, y, pix) in img.enumerate_pixels_mut() {
        *pix = Rgba(pixel_renderer.render_pixel(x, y).channels());
    }

    img
}

/// Render a full frame concurrently, one image row per work item. The
/// voxel grid is only read during marching so rows never contend.
pub fn parallel_render(pixel_renderer: &PixelRenderer) -> RgbaImage {
    let (width, height) = (pixel_renderer.camera.width, pixel_renderer.camera.height);
    let mut img = RgbaImage::new(width, height);

    img.par_chunks_mut(4 * usize::try_from(width).unwrap())
        .zip((0_u32..height).into_par_iter())
        .for_each(|(row, y)| {
            for (pix, x) in row.chunks_mut(4).zip(0..) {
                pix.copy_from_slice(&pixel_renderer.render_pixel(x, y).channels());
            }
        });

    img
}

/// Render one frame of a scene with the scene's own camera.
///
/// The frame index is clamped to the last available frame; a scene with no
/// frames at all renders nothing. An empty voxel grid still renders, the
/// image simply shows only the environment.
pub fn render_single_frame(scene: &Scene, frame_index: usize) -> Option<RgbaImage> {
    if scene.frames.is_empty() {
        warn!("no data frames in scene");
        return None;
    }

    let frame = &scene.frames[frame_index.min(scene.frames.len() - 1)];
    let grid = VoxelGrid::build(frame, &scene.defaults);

    if grid.is_empty() {
        warn!("no voxels in frame");
    }

    debug!("rendering frame {} with {} voxels", frame.id, grid.len());

    let pixel_renderer = PixelRenderer::new(&grid, &scene.environment, &scene.camera);

    Some(parallel_render(&pixel_renderer))
}

#[cfg(test)]
mod tests {
    use geom::v3;

    use super::*;
    use crate::environment::EnvironmentKind;
    use crate::scene::{Defaults, Frame, LightValue};
    use crate::voxel::VoxelValue;

    fn solid_environment(color: Color) -> Environment {
        Environment {
            kind: EnvironmentKind::Color {
                color,
                light_emission: LightValue::default(),
            },
            ..Environment::default()
        }
    }

    fn head_on_camera() -> Camera {
        Camera {
            position: v3(0, -5, 0),
            rotation: Vec3::zero(),
            focal: 1.0,
            clip_start: 0.001,
            clip_end: 100.0,
            width: 2,
            height: 2,
            pixel_size: 1.0,
            ..Camera::default()
        }
    }

    #[test]
    fn test_direct_hit_pixel() {
        let red = Color::rgb(255, 0, 0);
        let mut grid = VoxelGrid::new();
        grid.set(0, 0, 0, red);

        let env = solid_environment(Color::rgb(10, 20, 30));
        let camera = head_on_camera();
        let pr = PixelRenderer::new(&grid, &env, &camera);

        // pixel (1, 1) of a 2x2 grid sits exactly on the camera axis and
        // shoots straight through the voxel
        assert_eq!(pr.render_pixel(1, 1), red);
    }

    #[test]
    fn test_direct_hit_ray_geometry() {
        let mut grid = VoxelGrid::new();
        grid.set(0, 0, 0, Color::rgb(255, 0, 0));

        let env = Environment::default();
        let camera = head_on_camera();
        let pr = PixelRenderer::new(&grid, &env, &camera);

        let ray = pr.pixel_ray(1, 1);
        assert_eq!(ray.origin, v3(0, -6, 0));
        assert_eq!(ray.dir, v3(0, 1, 0));

        let hit = march(&grid, &ray, camera.clip_start, camera.clip_end).unwrap();
        assert_eq!(hit.voxel, (0, 0, 0));
        // the box is entered on its -y face, six units from the focal point
        assert!((hit.t - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_miss_falls_back_to_environment() {
        let grid = VoxelGrid::new();
        let env = solid_environment(Color::rgb(10, 20, 30));
        let camera = head_on_camera();
        let pr = PixelRenderer::new(&grid, &env, &camera);

        for x in 0..2 {
            for y in 0..2 {
                assert_eq!(pr.render_pixel(x, y), Color::rgb(10, 20, 30));
            }
        }
    }

    #[test]
    fn test_render_pixel_is_pure() {
        let mut grid = VoxelGrid::new();
        grid.set(0, 0, 0, Color::rgb(200, 100, 50));

        let env = solid_environment(Color::rgb(1, 2, 3));
        let camera = head_on_camera();
        let pr = PixelRenderer::new(&grid, &env, &camera);

        for _ in 0..3 {
            assert_eq!(pr.render_pixel(0, 0), pr.render_pixel(0, 0));
        }
    }

    #[test]
    fn test_serial_and_parallel_render_agree() {
        let mut grid = VoxelGrid::new();
        grid.set(0, 0, 0, Color::rgb(255, 0, 0));
        grid.set(1, 1, 1, Color::rgb(0, 255, 0));

        let env = solid_environment(Color::rgb(5, 5, 5));
        let camera = Camera {
            width: 16,
            height: 12,
            ..head_on_camera()
        };
        let pr = PixelRenderer::new(&grid, &env, &camera);

        assert_eq!(render(&pr), parallel_render(&pr));
    }

    #[test]
    fn test_render_single_frame_clamps_index() {
        let scene = Scene {
            frames: vec![Frame {
                voxels_dict: vec![(v3(0, 0, 0), VoxelValue::Color(Color::rgb(255, 0, 0)))],
                ..Frame::default()
            }],
            defaults: Defaults::default(),
            environment: solid_environment(Color::rgb(9, 9, 9)),
            camera: head_on_camera(),
            ..Scene::default()
        };

        let img = render_single_frame(&scene, 999).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);

        let empty = Scene::default();
        assert_eq!(render_single_frame(&empty, 0), None);
    }

    #[test]
    fn test_empty_grid_renders_background() {
        let scene = Scene {
            frames: vec![Frame::default()],
            environment: solid_environment(Color::rgb(10, 20, 30)),
            camera: head_on_camera(),
            ..Scene::default()
        };

        let img = render_single_frame(&scene, 0).unwrap();
        assert!(img.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }
}
