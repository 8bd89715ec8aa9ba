use crate::compositor::renderer::TransitionState;
use crate::effects::transition::TransitionEffect;
use crate::foundation::error::{TransmixError, TransmixResult};
use crate::image::device::Image;
use crate::image::frame::FrameBuffer;
use crate::render::backend::EffectBackend;

/// Fragment name of the built-in crossfade program.
pub const CROSSFADE_FRAGMENT: &str = "CrossfadeFragment";
/// Fragment name of the built-in directional wipe program.
pub const WIPE_FRAGMENT: &str = "WipeFragment";

/// CPU reference implementation of [`EffectBackend`].
///
/// Resolves the built-in fragments ([`CROSSFADE_FRAGMENT`],
/// [`WIPE_FRAGMENT`]) with plain BGRA8 pixel math; any other fragment name
/// yields no output image. Used by the test suite and usable for host-side
/// previews without a GPU.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuEffectBackend;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WipeDir {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

fn parse_wipe_dir(s: &str) -> Option<WipeDir> {
    match s.trim().to_ascii_lowercase().as_str() {
        "left_to_right" | "lefttoright" | "ltr" => Some(WipeDir::LeftToRight),
        "right_to_left" | "righttoleft" | "rtl" => Some(WipeDir::RightToLeft),
        "top_to_bottom" | "toptobottom" | "ttb" => Some(WipeDir::TopToBottom),
        "bottom_to_top" | "bottomtotop" | "btt" => Some(WipeDir::BottomToTop),
        _ => None,
    }
}

impl EffectBackend for CpuEffectBackend {
    fn render_transition(
        &self,
        effect: &TransitionEffect,
        state: &TransitionState,
    ) -> Option<Image> {
        let input = state.input()?;
        let dest = state.dest()?;
        if input.size() != dest.size() {
            tracing::debug!(
                input = ?input.size(),
                dest = ?dest.size(),
                "transition inputs disagree on size"
            );
            return None;
        }

        match effect.fragment_name() {
            CROSSFADE_FRAGMENT => Some(crossfade_images(input, dest, state.progress())),
            WIPE_FRAGMENT => {
                let dir = effect
                    .parameters()
                    .get("direction")
                    .and_then(|v| v.as_str())
                    .map_or(Some(WipeDir::LeftToRight), parse_wipe_dir)?;
                let soft_edge = effect
                    .parameters()
                    .get("soft_edge")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0) as f32;
                Some(wipe_images(input, dest, state.progress(), dir, soft_edge))
            }
            _ => None,
        }
    }

    fn write_image(&self, image: &Image, dst: &FrameBuffer) -> TransmixResult<()> {
        if image.width() != dst.width() || image.height() != dst.height() {
            return Err(TransmixError::validation(format!(
                "output image {}x{} does not fit destination {}x{}",
                image.width(),
                image.height(),
                dst.width(),
                dst.height()
            )));
        }
        dst.write_pixels(image.pixels())
    }

    fn overlay(&self, base: &Image, layers: &[Image]) -> TransmixResult<Image> {
        let mut out = base.pixels().to_vec();
        for layer in layers {
            if layer.size() != base.size() {
                return Err(TransmixError::validation(format!(
                    "overlay layer {}x{} does not match base {}x{}",
                    layer.width(),
                    layer.height(),
                    base.width(),
                    base.height()
                )));
            }
            for (d, s) in out.chunks_exact_mut(4).zip(layer.pixels().chunks_exact(4)) {
                let blended = over(
                    [d[0], d[1], d[2], d[3]],
                    [s[0], s[1], s[2], s[3]],
                );
                d.copy_from_slice(&blended);
            }
        }
        Image::from_bgra8(base.width(), base.height(), out)
    }
}

fn crossfade_images(a: &Image, b: &Image, t: f32) -> Image {
    let tt = quantize_mix(t);
    let it = 255u16 - tt;

    let mut out = Vec::with_capacity(a.pixels().len());
    for (pa, pb) in a.pixels().chunks_exact(4).zip(b.pixels().chunks_exact(4)) {
        for i in 0..4 {
            out.push(
                mul_div255(u16::from(pa[i]), it).saturating_add(mul_div255(u16::from(pb[i]), tt)),
            );
        }
    }
    image_from_parts(a, out)
}

fn wipe_images(a: &Image, b: &Image, t: f32, dir: WipeDir, soft_edge: f32) -> Image {
    let (width, height) = a.size();
    let t = t.clamp(0.0, 1.0);
    let soft_edge = soft_edge.max(0.0);

    let axis_len = match dir {
        WipeDir::LeftToRight | WipeDir::RightToLeft => width as f32,
        WipeDir::TopToBottom | WipeDir::BottomToTop => height as f32,
    };
    let soft_px = soft_edge * axis_len;

    // The sweep travels an extra soft_px on each end so t=0 and t=1 are
    // fully one-sided even with a soft edge.
    let edge = t * (axis_len + 2.0 * soft_px) - soft_px;
    let a_edge = edge - soft_px;
    let b_edge = edge + soft_px;

    let ap = a.pixels();
    let bp = b.pixels();
    let mut out = vec![0u8; ap.len()];
    for y in 0..height {
        for x in 0..width {
            let pos = match dir {
                WipeDir::LeftToRight => x as f32,
                WipeDir::RightToLeft => (width - 1 - x) as f32,
                WipeDir::TopToBottom => y as f32,
                WipeDir::BottomToTop => (height - 1 - y) as f32,
            };

            let m = if soft_px <= 0.0 {
                if pos < edge { 1.0 } else { 0.0 }
            } else {
                1.0 - smoothstep(a_edge, b_edge, pos)
            };

            let mt = quantize_mix(m);
            let im = 255u16 - mt;
            let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
            for i in 0..4 {
                out[idx + i] = mul_div255(u16::from(ap[idx + i]), im)
                    .saturating_add(mul_div255(u16::from(bp[idx + i]), mt));
            }
        }
    }
    image_from_parts(a, out)
}

/// Straight-alpha source-over of `src` on `dst`.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = mul_div255(u16::from(src[i]), sa)
            .saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out[3] = (sa as u8).saturating_add(mul_div255(u16::from(dst[3]), inv));
    out
}

fn image_from_parts(like: &Image, data: Vec<u8>) -> Image {
    Image::from_parts(like.width(), like.height(), data)
}

fn quantize_mix(t: f32) -> u16 {
    ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

fn mul_div255(x: u16, y: u16) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}

fn smoothstep(a: f32, b: f32, x: f32) -> f32 {
    if x <= a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    (t * t * (3.0 - 2.0 * t)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
