use image::{GrayImage, ImageReader};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GrayError {
    #[error("cannot open image: {0}")]
    Open(#[from] io::Error),

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,
}

/// Percentage of luminance samples strictly between black (0) and white (255).
///
/// The container format is detected from the file contents, so a mislabelled
/// extension still decodes. Anything that cannot be decoded is an error, never
/// a zero score.
pub fn compute_gray_percentage(path: &Path) -> Result<f64, GrayError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let pct = gray_percentage_of(&image.to_luma8())?;
    debug!("Image '{}' has {:.2}% gray pixels.", path.display(), pct);
    Ok(pct)
}

pub fn gray_percentage_of(luma: &GrayImage) -> Result<f64, GrayError> {
    let mut histogram = [0u64; 256];
    for pixel in luma.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return Err(GrayError::Empty);
    }
    let gray = total - histogram[0] - histogram[255];

    Ok((gray as f64 / total as f64) * 100.0)
}
