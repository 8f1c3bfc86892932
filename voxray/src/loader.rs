//! Tolerant JSON loading of scene documents.
//!
//! Parsing never fails on malformed values inside the document: every
//! field falls back to a documented default instead. Only I/O and
//! syntactically invalid JSON surface as errors.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use geom::{Axis, Vec3};

use crate::camera::Camera;
use crate::color::Color;
use crate::environment::{Environment, EnvironmentKind};
use crate::palette::{Palette, PaletteKey};
use crate::scene::{Defaults, Frame, LightValue, Metadata, Scene};
use crate::voxel::{Pos, Shape, ShapeKind, VoxelValue};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a scene document from a file on disk.
pub fn load_scene_from_path(path: impl AsRef<Path>) -> Result<Scene, LoadError> {
    let text = fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&text)?;

    Ok(parse_scene(&json))
}

/// Build a [`Scene`] out of an already parsed JSON document. Unknown keys
/// are ignored, malformed values resolve to defaults.
pub fn parse_scene(json: &Value) -> Scene {
    let meta = parse_metadata(json);

    let defaults = Defaults {
        default_color: json
            .get("default_color")
            .map(|v| parse_color(v, None))
            .unwrap_or_default(),
        palette: json.get("color_palette").map(parse_palette).unwrap_or_default(),
        grid_thickness: get_i64(json, "grid_thickness", 0),
        grid_color: json
            .get("grid_color")
            .map(|v| parse_color(v, None))
            .unwrap_or_default(),
    };

    let camera = parse_camera(json);
    let environment = parse_environment(json);
    let frames = parse_frames(json, &defaults.palette);

    Scene {
        meta,
        defaults,
        frames,
        environment,
        camera,
    }
}

fn parse_metadata(json: &Value) -> Metadata {
    let author = match json.get("author") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => vec![],
    };

    Metadata {
        name: get_string(json, "name", ""),
        author,
        description: get_string(json, "description", ""),
        date_created: get_string(json, "date_created", ""),
        date_modified: get_string(json, "date_modified", ""),
        tags: json
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        license: get_string(json, "license", ""),
        is_post_processed: json
            .get("is_post_processed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn parse_camera(json: &Value) -> Camera {
    // camera_fov is a legacy alias for camera_focal
    let focal = json
        .get("camera_focal")
        .or_else(|| json.get("camera_fov"))
        .and_then(Value::as_f64)
        .unwrap_or(70.0);

    Camera {
        position: json
            .get("camera_position")
            .map(parse_vec3)
            .unwrap_or_else(Vec3::zero),
        rotation: json
            .get("camera_rotation")
            .map(parse_vec3)
            .unwrap_or_else(Vec3::zero),
        focal,
        clip_start: get_f64(json, "camera_clip_start", 0.001),
        clip_end: get_f64(json, "camera_clip_end", 100.0),
        locked_movement: json
            .get("locked_camera_movement")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        locked_rotation: json
            .get("locked_camera_rotation")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        width: get_u32(json, "camera_width", 32),
        height: get_u32(json, "camera_height", 32),
        pixel_size: get_f64(json, "camera_pixel_size", 0.1),
    }
}

fn parse_environment(json: &Value) -> Environment {
    let kind = match json.get("environment_type").and_then(Value::as_str) {
        Some("color") => EnvironmentKind::Color {
            color: json
                .get("environment_color")
                .map(|v| parse_color(v, None))
                .unwrap_or(Color::rgb(255, 255, 255)),
            light_emission: json
                .get("environment_color_light_emission")
                .map(parse_light_value)
                .unwrap_or_default(),
        },
        Some("skybox") => EnvironmentKind::SkyBox {
            sky_color: json
                .get("sky_color")
                .map(|v| parse_color(v, None))
                .unwrap_or(Color::rgb(145, 200, 228)),
            sky_light_emission: json
                .get("sky_color_light_emission")
                .map(parse_light_value)
                .unwrap_or_default(),
            ground_color: json
                .get("ground_color")
                .map(|v| parse_color(v, None))
                .unwrap_or(Color::rgb(32, 94, 97)),
            ground_light_emission: json
                .get("ground_color_light_emission")
                .map(parse_light_value)
                .unwrap_or_default(),
            sun_direction: json
                .get("sun_direction")
                .map(parse_vec3)
                .unwrap_or_else(Vec3::zero),
            sun_light_emission: json
                .get("sun_light_emission")
                .map(parse_light_value)
                .unwrap_or(LightValue::new(10.0, 10.0, 10.0)),
        },
        _ => EnvironmentKind::None,
    };

    Environment {
        light_diffusion_strength: get_f64(json, "light_diffusion_strength", 0.99),
        light_algorithm: get_string(json, "light_algorithm", "none"),
        kind,
    }
}

/// Load the animation frames. Documents either carry a `frames` array or a
/// single set of voxel containers at the root; in the latter case a frame
/// is only created when at least one container key is present.
fn parse_frames(json: &Value, palette: &Palette) -> Vec<Frame> {
    if let Some(frames) = json.get("frames").and_then(Value::as_array) {
        return frames
            .iter()
            .enumerate()
            .map(|(idx, frame)| parse_frame(frame, idx as i64, palette))
            .collect();
    }

    let has_voxels = ["voxels_dict", "voxels_list", "voxels_grid"]
        .iter()
        .any(|k| json.get(k).is_some());

    if has_voxels {
        vec![parse_frame(json, 0, palette)]
    } else {
        vec![]
    }
}

fn parse_frame(json: &Value, default_id: i64, palette: &Palette) -> Frame {
    let voxels_dict = json
        .get("voxels_dict")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| {
                    (
                        Vec3::from_key(key).unwrap_or_else(Vec3::zero),
                        parse_voxel_value(value, palette),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let voxels_list = json
        .get("voxels_list")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|v| parse_voxel_value(v, palette)).collect())
        .unwrap_or_default();

    let voxels_grid = json
        .get("voxels_grid")
        .and_then(Value::as_array)
        .map(|layers| {
            layers
                .iter()
                .map(|layer| {
                    layer
                        .as_array()
                        .map(|rows| {
                            rows.iter()
                                .map(|row| {
                                    row.as_array()
                                        .map(|cells| {
                                            cells
                                                .iter()
                                                .map(|v| parse_voxel_value(v, palette))
                                                .collect()
                                        })
                                        .unwrap_or_default()
                                })
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default();

    let light_emission = json
        .get("light_emission_dict")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| {
                    (
                        Vec3::from_key(key).unwrap_or_else(Vec3::zero),
                        parse_light_value(value),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    Frame {
        id: get_i64(json, "frame_id", default_id),
        duration: get_f64(json, "frame_duration", 1.0),
        voxels_dict,
        voxels_list,
        voxels_grid,
        light_emission,
    }
}

/// Parse a `Vec3` from any of its accepted encodings: `[x, y, z]`,
/// `{"x": .., "y": .., "z": ..}` or `"x,y,z"` / `"x_y_z"`. Anything else
/// is the origin.
pub fn parse_vec3(json: &Value) -> Vec3 {
    match json {
        Value::Array(items) if items.len() >= 3 => Vec3::new(
            items[0].as_f64().unwrap_or(0.0),
            items[1].as_f64().unwrap_or(0.0),
            items[2].as_f64().unwrap_or(0.0),
        ),
        Value::Object(fields) => Vec3::new(
            fields.get("x").and_then(Value::as_f64).unwrap_or(0.0),
            fields.get("y").and_then(Value::as_f64).unwrap_or(0.0),
            fields.get("z").and_then(Value::as_f64).unwrap_or(0.0),
        ),
        Value::String(s) => Vec3::from_key(s).unwrap_or_else(Vec3::zero),
        _ => Vec3::zero(),
    }
}

/// Parse a `Color` from any of its accepted encodings: `[r, g, b]` /
/// `[r, g, b, a]`, `"#RRGGBB"` / `"#RRGGBBAA"`, a well-known color name,
/// or a palette key when a palette is in scope. Anything else is opaque
/// black.
pub fn parse_color(json: &Value, palette: Option<&Palette>) -> Color {
    match json {
        Value::Array(items) if items.len() >= 3 => {
            let channel = |i: usize| items[i].as_f64().unwrap_or(0.0) as i32;

            if items.len() >= 4 {
                Color::new(channel(0), channel(1), channel(2), channel(3))
            } else {
                Color::rgb(channel(0), channel(1), channel(2))
            }
        }

        Value::String(s) => Color::from_hex(s)
            .or_else(|| Color::named(s))
            .or_else(|| palette.and_then(|p| p.get_name(s)))
            .unwrap_or_default(),

        Value::Number(n) => n
            .as_i64()
            .and_then(|i| palette.and_then(|p| p.get(&PaletteKey::Index(i))))
            .unwrap_or_default(),

        _ => Color::default(),
    }
}

/// Parse a `Palette` from a JSON object of key → color entries.
pub fn parse_palette(json: &Value) -> Palette {
    let mut palette = Palette::new();

    if let Some(entries) = json.as_object() {
        for (key, value) in entries {
            palette.insert(key.as_str(), parse_color(value, None));
        }
    }

    palette
}

/// Parse a `LightValue` from `[r, g, b]` or `{"r": .., "g": .., "b": ..}`.
pub fn parse_light_value(json: &Value) -> LightValue {
    match json {
        Value::Array(items) if items.len() >= 3 => LightValue::new(
            items[0].as_f64().unwrap_or(1.0),
            items[1].as_f64().unwrap_or(1.0),
            items[2].as_f64().unwrap_or(1.0),
        ),
        Value::Object(fields) => LightValue::new(
            fields.get("r").and_then(Value::as_f64).unwrap_or(1.0),
            fields.get("g").and_then(Value::as_f64).unwrap_or(1.0),
            fields.get("b").and_then(Value::as_f64).unwrap_or(1.0),
        ),
        _ => LightValue::default(),
    }
}

/// Parse a `Pos`: either a bare `Vec3` encoding or an object with an
/// `xyz` key plus optional transform hints.
pub fn parse_pos(json: &Value) -> Pos {
    match json {
        Value::Object(fields) if fields.contains_key("xyz") => {
            let hint = |k: &str| fields.get(k).map(parse_vec3);

            Pos {
                xyz: parse_vec3(&fields["xyz"]),
                shift: hint("shift"),
                scale: hint("scale"),
                rotation: hint("rotation"),
                flip: hint("flip"),
                crop: hint("crop"),
            }
        }
        other => Pos::at(parse_vec3(other)),
    }
}

/// Parse one entry of a voxel container.
///
/// Objects with a `"type"` key describe shapes; everything else is either
/// a literal color, an integer palette reference, or a string that may
/// name a palette entry before it is tried as a color.
pub fn parse_voxel_value(json: &Value, palette: &Palette) -> VoxelValue {
    if let Some(fields) = json.as_object() {
        if fields.contains_key("type") {
            return parse_shape_value(fields, palette);
        }
    }

    match json {
        Value::Array(_) => VoxelValue::Color(parse_color(json, Some(palette))),

        Value::String(s) => match palette.get_name(s) {
            Some(color) => VoxelValue::Color(color),
            None => VoxelValue::Color(parse_color(json, Some(palette))),
        },

        Value::Number(n) => match n.as_i64() {
            Some(i) => VoxelValue::PaletteRef(PaletteKey::Index(i)),
            None => VoxelValue::Unknown,
        },

        _ => VoxelValue::Unknown,
    }
}

fn parse_shape_value(
    fields: &serde_json::Map<String, Value>,
    palette: &Palette,
) -> VoxelValue {
    let color = match fields.get("color") {
        Some(Value::String(s)) => palette
            .get_name(s)
            .unwrap_or_else(|| parse_color(&Value::String(s.clone()), Some(palette))),
        Some(value) => parse_color(value, Some(palette)),
        None => Color::rgb(255, 255, 255),
    };

    let position = fields.get("position").map(parse_pos).unwrap_or_default();
    let pos_field = |k: &str| fields.get(k).map(parse_pos).unwrap_or_default();
    let int_field = |k: &str, d: i64| {
        fields
            .get(k)
            .and_then(Value::as_f64)
            .map(|f| f as i64)
            .unwrap_or(d) as i32
    };
    let axis_field = |k: &str, d: Axis| match fields.get(k).and_then(Value::as_str) {
        Some("x") | Some("X") => Axis::X,
        Some("y") | Some("Y") => Axis::Y,
        Some("z") | Some("Z") => Axis::Z,
        _ => d,
    };

    let kind = match fields.get("type").and_then(Value::as_str) {
        Some("import_voxel") => {
            return VoxelValue::Import {
                path: fields
                    .get("path")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                position,
            };
        }

        Some("shape_point") => ShapeKind::Point,
        Some("shape_line") => ShapeKind::Line {
            end: pos_field("position2"),
        },
        Some("shape_triangle") => ShapeKind::Triangle {
            b: pos_field("position2"),
            c: pos_field("position3"),
        },
        Some("shape_circle") => ShapeKind::Circle {
            radius: int_field("radius", 1),
            axis: axis_field("axis", Axis::Z),
        },
        Some("shape_cube") => ShapeKind::Cube {
            size: int_field("size", 1),
        },
        Some("shape_rect") => ShapeKind::Rect {
            corner: pos_field("position2"),
        },
        Some("shape_sphere") => ShapeKind::Sphere {
            radius: int_field("radius", 1),
        },
        Some("shape_cylinder") => ShapeKind::Cylinder {
            radius: int_field("radius", 1),
            height: int_field("height", 1),
            axis: axis_field("axis", Axis::Y),
        },
        Some("shape_polygon") => ShapeKind::Polygon {
            vertices: fields
                .get("polygon")
                .and_then(Value::as_array)
                .map(|pts| pts.iter().map(parse_pos).collect())
                .unwrap_or_default(),
        },

        _ => return VoxelValue::Unknown,
    };

    VoxelValue::Shape(Shape {
        kind,
        color,
        position,
    })
}

fn get_string(json: &Value, key: &str, default: &str) -> String {
    json.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn get_f64(json: &Value, key: &str, default: f64) -> f64 {
    json.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn get_i64(json: &Value, key: &str, default: i64) -> i64 {
    json.get(key).and_then(Value::as_i64).unwrap_or(default)
}

fn get_u32(json: &Value, key: &str, default: u32) -> u32 {
    json.get(key)
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(default)
}
