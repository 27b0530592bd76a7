use crate::{LindenwarpError, LindenwarpResult};

/// Backward-warp `src` by the displacement field encoded in `overlay`.
///
/// For every output pixel, channel 0 of the overlay pixel at the same
/// coordinate is normalized to `[0, 1]` and mapped to a displacement
/// `d = (level - 0.5) * amplitude`. The same `d` shifts both axes, so
/// displacement is always along the diagonal; that lockstep x/y law is
/// deliberate. The source coordinate is rounded to the nearest pixel and
/// clamped to the image, so border pixels repeat instead of wrapping.
///
/// An overlay level of exactly 0.5 and an amplitude of 0 both leave pixels
/// in place; amplitude 0 short-circuits to a copy.
pub fn warp_rgba8(
    src: &[u8],
    overlay: &[u8],
    width: u32,
    height: u32,
    amplitude: f64,
) -> LindenwarpResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LindenwarpError::invalid_config("warp buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(LindenwarpError::invalid_config(
            "warp_rgba8 expects src matching width*height*4",
        ));
    }
    if overlay.len() != expected_len {
        return Err(LindenwarpError::invalid_config(
            "warp_rgba8 expects overlay matching width*height*4",
        ));
    }
    if !amplitude.is_finite() {
        return Err(LindenwarpError::invalid_config("amplitude must be finite"));
    }
    if amplitude == 0.0 {
        return Ok(src.to_vec());
    }

    let w = width as usize;
    let max_x = f64::from(width.saturating_sub(1));
    let max_y = f64::from(height.saturating_sub(1));

    let mut out = vec![0u8; expected_len];
    for y in 0..height as usize {
        for x in 0..w {
            let idx = (y * w + x) * 4;
            let level = f64::from(overlay[idx]) / 255.0;
            let d = (level - 0.5) * amplitude;
            let sx = (x as f64 + d).round().clamp(0.0, max_x) as usize;
            let sy = (y as f64 + d).round().clamp(0.0, max_y) as usize;
            let src_idx = (sy * w + sx) * 4;
            out[idx..idx + 4].copy_from_slice(&src[src_idx..src_idx + 4]);
        }
    }
    Ok(out)
}
