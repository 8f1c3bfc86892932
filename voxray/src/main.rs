use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use voxray::turntable::TurntableConfig;
use voxray::{encode, loader, render_single_frame, render_turntable};

/// Render a voxel scene document to an image or a turntable animation.
#[derive(Parser, Debug)]
#[command(name = "voxray", version)]
struct Args {
    /// Path to the scene JSON file
    #[arg(long)]
    file: PathBuf,

    /// Output image path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Frame index to render (for animations)
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Orbit the camera around the scene and write a GIF
    #[arg(long = "rotate_around_object")]
    rotate_around_object: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if !args.file.exists() {
        eprintln!("Error: file not found: {}", args.file.display());
        process::exit(1);
    }

    let scene = loader::load_scene_from_path(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;

    if args.rotate_around_object {
        let config = TurntableConfig::default();
        let frames = render_turntable(&scene, args.frame, &config);

        if frames.is_empty() {
            return Ok(());
        }

        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}_rotation.gif", scene.meta.name)));

        encode::save_gif(frames, config.frame_duration_ms, &path)
            .with_context(|| format!("writing {}", path.display()))?;

        println!("Rotation GIF saved to: {}", path.display());
    } else if let Some(img) = render_single_frame(&scene, args.frame) {
        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}_{}.png", scene.meta.name, args.frame)));

        encode::save_image(&img, &path).with_context(|| format!("writing {}", path.display()))?;

        println!("Rendered frame saved to: {}", path.display());
    }

    Ok(())
}
