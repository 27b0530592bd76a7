use std::path::Path;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{LindenwarpError, LindenwarpResult};

/// Read and decode an image file into a straight-alpha RGBA8 frame.
pub fn load_rgba8(path: impl AsRef<Path>) -> LindenwarpResult<FrameRGBA> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        LindenwarpError::image_load(format!("read '{}': {e}", path.display()))
    })?;
    let dyn_img = image::load_from_memory(&bytes).map_err(|e| {
        LindenwarpError::image_load(format!("decode '{}': {e}", path.display()))
    })?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(FrameRGBA {
        width,
        height,
        data: rgba.into_raw(),
        premultiplied: false,
    })
}

/// Encode `frame` to `path`, choosing the codec from the file extension.
///
/// Parent directories are created as needed. Failures leave `frame`
/// untouched; callers can retry with another path.
pub fn save_rgba8(path: impl AsRef<Path>, frame: &FrameRGBA) -> LindenwarpResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            LindenwarpError::image_save(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    image::save_buffer(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
    )
    .map_err(|e| LindenwarpError::image_save(format!("write '{}': {e}", path.display())))
}
