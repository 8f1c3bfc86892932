use geom::{Ray, Vec3};

use crate::color::Color;
use crate::scene::LightValue;

/// What surrounds the voxels of a scene. Every ray that escapes the grid
/// samples the environment instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub light_diffusion_strength: f64,
    pub light_algorithm: String,
    pub kind: EnvironmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentKind {
    /// No environment at all; misses are transparent black.
    None,

    /// A single solid background color.
    Color {
        color: Color,
        light_emission: LightValue,
    },

    /// A sky color above the horizon and a ground color below it.
    SkyBox {
        sky_color: Color,
        sky_light_emission: LightValue,
        ground_color: Color,
        ground_light_emission: LightValue,
        sun_direction: Vec3,
        sun_light_emission: LightValue,
    },
}

impl Environment {
    /// Background color for a ray that missed every voxel.
    ///
    /// The sky/ground split is a strict test on the direction's vertical
    /// component: a perfectly horizontal ray samples the ground.
    pub fn sample(&self, ray: &Ray) -> Color {
        match &self.kind {
            EnvironmentKind::None => Color::transparent(),
            EnvironmentKind::Color { color, .. } => *color,
            EnvironmentKind::SkyBox {
                sky_color,
                ground_color,
                ..
            } => {
                if ray.dir.y > 0.0 {
                    *sky_color
                } else {
                    *ground_color
                }
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            light_diffusion_strength: 0.99,
            light_algorithm: "none".to_string(),
            kind: EnvironmentKind::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::v3;

    use super::*;

    fn skybox() -> Environment {
        Environment {
            kind: EnvironmentKind::SkyBox {
                sky_color: Color::rgb(145, 200, 228),
                sky_light_emission: LightValue::default(),
                ground_color: Color::rgb(32, 94, 97),
                ground_light_emission: LightValue::default(),
                sun_direction: Vec3::zero(),
                sun_light_emission: LightValue::default(),
            },
            ..Environment::default()
        }
    }

    #[test]
    fn test_none_is_transparent() {
        let ray = Ray::new(Vec3::zero(), v3(0, 1, 0));
        assert_eq!(Environment::default().sample(&ray), Color::transparent());
    }

    #[test]
    fn test_solid_color() {
        let env = Environment {
            kind: EnvironmentKind::Color {
                color: Color::rgb(10, 20, 30),
                light_emission: LightValue::default(),
            },
            ..Environment::default()
        };

        assert_eq!(
            env.sample(&Ray::new(Vec3::zero(), v3(0, -1, 0))),
            Color::rgb(10, 20, 30)
        );
    }

    #[test]
    fn test_skybox_split() {
        let env = skybox();

        let up = Ray::new(Vec3::zero(), v3(0.0, 0.1, 1.0));
        let down = Ray::new(Vec3::zero(), v3(0.0, -0.1, 1.0));
        let level = Ray::new(Vec3::zero(), v3(1, 0, 0));

        assert_eq!(env.sample(&up), Color::rgb(145, 200, 228));
        assert_eq!(env.sample(&down), Color::rgb(32, 94, 97));
        // a horizontal ray is ground, the test on y is strictly positive
        assert_eq!(env.sample(&level), Color::rgb(32, 94, 97));
    }
}
