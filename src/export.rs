use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use egui::Color32;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};

use crate::error::{WhiteboardError, WhiteboardResult};
use crate::util::time;

pub const JPEG_QUALITY: u8 = 95;

/// Background that contrasts with the pen: black unless the pen is black
pub fn contrasting_background(foreground: Color32) -> Color32 {
    if foreground != Color32::BLACK {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Flatten the top-left `width` x `height` of the raster onto a solid colour
pub fn composite(raster: &RgbaImage, width: u32, height: u32, background: Color32) -> RgbImage {
    let [br, bg, bb, _] = background.to_srgba_unmultiplied();
    RgbImage::from_fn(width, height, |x, y| {
        if x >= raster.width() || y >= raster.height() {
            return Rgb([br, bg, bb]);
        }
        let src = raster.get_pixel(x, y);
        let alpha = src[3] as f32 / 255.0;
        let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        Rgb([mix(src[0], br), mix(src[1], bg), mix(src[2], bb)])
    })
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> WhiteboardResult<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(image)?;
    Ok(bytes)
}

pub fn file_name(time: &NaiveDateTime) -> String {
    format!("Whiteboard{}.jpg", time::file_timestamp(time))
}

/// Write encoded bytes into `dir` under a timestamped name
pub fn write_to_dir(dir: &Path, time: &NaiveDateTime, bytes: &[u8]) -> WhiteboardResult<PathBuf> {
    if !dir.is_dir() {
        return Err(WhiteboardError::NoDestination(dir.to_path_buf()));
    }
    let path = dir.join(file_name(time));
    fs::write(&path, bytes)?;
    log::info!("Saved whiteboard to {}", path.display());
    Ok(path)
}
