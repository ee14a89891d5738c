use std::fs::File;
use std::io::BufWriter;

use image::RgbaImage;

use crate::contour::Contour;

/// Save the accumulated map image as a PNG.
pub fn save_png(canvas: &RgbaImage, path: &str) -> Result<(), image::ImageError> {
    canvas.save(path)
}

/// Write the traced contours as JSON for downstream tooling.
pub fn export_contours_json(contours: &[Contour], path: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), contours)?;
    Ok(())
}
