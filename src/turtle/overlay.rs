use crate::foundation::core::{BezPath, Canvas, FrameRGBA, Rgba8};
use crate::foundation::error::{LindenwarpError, LindenwarpResult};

/// Stroke `path` into a fresh transparent overlay sized to `canvas`.
///
/// The rasterizer emits premultiplied RGBA8. The warper reads a single
/// channel as a scalar, so nothing downstream needs an unpremultiply pass.
pub fn rasterize_path(
    canvas: Canvas,
    path: &BezPath,
    color: Rgba8,
    stroke_width: f64,
) -> LindenwarpResult<FrameRGBA> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(LindenwarpError::invalid_config(
            "overlay canvas must have non-zero dimensions",
        ));
    }
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| LindenwarpError::invalid_config("overlay canvas width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| LindenwarpError::invalid_config("overlay canvas height exceeds u16"))?;

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke_width));
    ctx.stroke_path(&bezpath_to_cpu(path));
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

/// Composite a premultiplied overlay over a straight-alpha base, in place.
///
/// The overlay must carry its premultiplied flag, as rasterized overlays
/// do; straight-alpha overlays are rejected rather than blended wrong.
/// Exact for opaque bases (the usual case for photographs); a base pixel
/// with partial alpha is treated as premultiplied by the blend.
pub fn composite_over(base: &mut FrameRGBA, overlay: &FrameRGBA) -> LindenwarpResult<()> {
    if !overlay.premultiplied {
        return Err(LindenwarpError::invalid_config(
            "composite_over expects a premultiplied overlay",
        ));
    }
    if base.width != overlay.width || base.height != overlay.height {
        return Err(LindenwarpError::invalid_config(format!(
            "composite size mismatch: base {}x{}, overlay {}x{}",
            base.width, base.height, overlay.width, overlay.height
        )));
    }
    if base.data.len() != overlay.data.len() {
        return Err(LindenwarpError::invalid_config(
            "composite buffer length mismatch",
        ));
    }

    for (dst, src) in base
        .data
        .chunks_exact_mut(4)
        .zip(overlay.data.chunks_exact(4))
    {
        let inv_a = 255 - src[3];
        for c in 0..4 {
            dst[c] = src[c].saturating_add(mul_div255(dst[c], inv_a));
        }
    }
    Ok(())
}

fn mul_div255(x: u8, y: u8) -> u8 {
    (((u16::from(x) * u16::from(y)) + 127) / 255) as u8
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
