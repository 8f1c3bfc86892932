use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageError, ImageResult, RgbaImage};

/// Write a single rendered frame as a PNG (or whatever format the path's
/// extension selects).
pub fn save_image(img: &RgbaImage, path: impl AsRef<Path>) -> ImageResult<()> {
    img.save(path)
}

/// Write a sequence of rendered frames as a looping animated GIF, each
/// frame shown for `frame_duration_ms`.
pub fn save_gif(
    frames: Vec<RgbaImage>,
    frame_duration_ms: u32,
    path: impl AsRef<Path>,
) -> ImageResult<()> {
    let file = File::create(path).map_err(ImageError::IoError)?;

    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(frame_duration_ms, 1);

    encoder.encode_frames(
        frames
            .into_iter()
            .map(|img| Frame::from_parts(img, 0, 0, delay)),
    )
}
