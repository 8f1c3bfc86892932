//! A CPU ray caster for declarative voxel scenes.
//!
//! A scene document enumerates voxels (as a sparse position map, a list
//! of shape primitives, or a dense 3-D grid), a palette, an environment
//! and a pinhole camera. Rendering collapses one frame of the document
//! into a sparse [`grid::VoxelGrid`], then marches a ray per pixel
//! through it with a 3-D DDA, falling back to the environment for rays
//! that escape. A turntable mode orbits the camera around the scene and
//! renders one image per stop.

pub mod camera;
pub mod color;
pub mod encode;
pub mod environment;
pub mod grid;
pub mod loader;
pub mod march;
pub mod palette;
pub mod renderer;
pub mod scene;
pub mod turntable;
pub mod voxel;

pub use camera::Camera;
pub use color::Color;
pub use environment::{Environment, EnvironmentKind};
pub use grid::VoxelGrid;
pub use march::{march, Hit};
pub use palette::{Palette, PaletteKey};
pub use renderer::{parallel_render, render, render_single_frame, PixelRenderer};
pub use scene::{Defaults, Frame, LightValue, Metadata, Scene};
pub use turntable::{render_turntable, TurntableConfig};
pub use voxel::{Pos, Shape, ShapeKind, VoxelValue};

/// A voxel cell identified by its integer x, y, z coordinates.
pub type Voxel = (i32, i32, i32);
