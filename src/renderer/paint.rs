//! Drawing primitives shared by every reveal strategy

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::frame::{Frame, Rect};
use super::image::Bitmap;
use super::pixel::{Rgba, colors};
use crate::consts::{DIVIDER_HALF_HEIGHT, SPARKLE_COUNT};

/// Centered square crop of the source that "cover" fit maps onto the frame
///
/// Returns (crop origin, crop side) in source pixels.
pub fn cover_crop(image: &Bitmap) -> (Vec2, f32) {
    let w = image.width() as f32;
    let h = image.height() as f32;
    let side = w.min(h);
    (Vec2::new((w - side) / 2.0, (h - side) / 2.0), side)
}

/// Source pixel shown at frame pixel (x, y) under cover fit
#[inline]
fn cover_sample(image: &Bitmap, origin: Vec2, scale: f32, x: u32, y: u32) -> Rgba {
    let src = origin + (Vec2::new(x as f32, y as f32) + 0.5) * scale;
    image.get(src.x as u32, src.y as u32)
}

/// Draw the source image, cover-fitted to the whole frame, inside `clip`
pub fn draw_cover(frame: &mut Frame, image: &Bitmap, clip: Rect) {
    let size = frame.size();
    if size == 0 {
        return;
    }
    let (origin, side) = cover_crop(image);
    let scale = side / size as f32;
    let (x0, y0, x1, y1) = clip.pixel_span(size);

    for y in y0..y1 {
        for x in x0..x1 {
            frame.set(x, y, cover_sample(image, origin, scale, x, y));
        }
    }
}

/// Dark silhouette of the source inside `clip`
///
/// The gradient runs top-to-bottom across `clip` and takes its alpha from
/// the cover-fitted source, so transparent images keep their outline.
pub fn draw_placeholder(frame: &mut Frame, image: &Bitmap, clip: Rect) {
    let size = frame.size();
    if size == 0 || clip.is_empty() {
        return;
    }
    let (origin, side) = cover_crop(image);
    let scale = side / size as f32;
    let (x0, y0, x1, y1) = clip.pixel_span(size);
    let span = (y1 - y0).max(1) as f32;

    for y in y0..y1 {
        let t = (y - y0) as f32 / span;
        let shade = colors::PLACEHOLDER_TOP.lerp(colors::PLACEHOLDER_BOTTOM, t);
        for x in x0..x1 {
            let alpha = cover_sample(image, origin, scale, x, y).a;
            frame.set(x, y, shade.with_alpha(alpha));
        }
    }
}

/// Faint sparkle dots scattered over `clip`
///
/// Positions come from `seed`, so redraws of the same puzzle do not flicker.
pub fn draw_sparkles(frame: &mut Frame, clip: Rect, seed: u64) {
    if clip.is_empty() {
        return;
    }
    let mut rng = Pcg32::seed_from_u64(seed);
    let size = frame.size() as f32;
    let dim = clip.size();

    for _ in 0..SPARKLE_COUNT {
        // Always draw from the rng so the pattern does not depend on clip size
        let pos = Vec2::new(rng.random::<f32>() * size, rng.random::<f32>() * size);
        let radius = rng.random::<f32>() * 3.0 + 1.0;
        let opacity = rng.random::<f32>() * 0.3 + 0.1;

        // Map into the clip so shrinking areas keep all their dots
        let center = clip.min + pos / size * dim;
        draw_dot(frame, center, radius, colors::SPARKLE, opacity, clip);
    }
}

fn draw_dot(frame: &mut Frame, center: Vec2, radius: f32, color: Rgba, opacity: f32, clip: Rect) {
    let (cx0, cy0, cx1, cy1) = clip.pixel_span(frame.size());
    let x0 = ((center.x - radius).floor() as i32).max(cx0 as i32);
    let x1 = ((center.x + radius).ceil() as i32).min(cx1 as i32);
    let y0 = ((center.y - radius).floor() as i32).max(cy0 as i32);
    let y1 = ((center.y + radius).ceil() as i32).min(cy1 as i32);

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if p.distance(center) <= radius {
                frame.blend(x, y, color, opacity);
            }
        }
    }
}

/// Glowing horizontal line at `y`, fading out above and below
pub fn draw_divider(frame: &mut Frame, y: f32) {
    let size = frame.size() as i32;
    let top = (y - DIVIDER_HALF_HEIGHT).floor() as i32;
    let bottom = (y + DIVIDER_HALF_HEIGHT).ceil() as i32;

    for row in top..bottom {
        let dist = ((row as f32 + 0.5) - y).abs();
        let opacity = (1.0 - dist / DIVIDER_HALF_HEIGHT).max(0.0);
        if opacity <= 0.0 {
            continue;
        }
        for x in 0..size {
            frame.blend(x, row, colors::DIVIDER, opacity);
        }
    }
}

/// One-pixel outline just inside `rect`
pub fn draw_tile_edge(frame: &mut Frame, rect: Rect) {
    let (x0, y0, x1, y1) = rect.pixel_span(frame.size());
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    for x in x0..x1 {
        frame.blend(x as i32, y0 as i32, colors::TILE_EDGE, 1.0);
        frame.blend(x as i32, (y1 - 1) as i32, colors::TILE_EDGE, 1.0);
    }
    for y in (y0 + 1)..(y1 - 1) {
        frame.blend(x0 as i32, y as i32, colors::TILE_EDGE, 1.0);
        frame.blend((x1 - 1) as i32, y as i32, colors::TILE_EDGE, 1.0);
    }
}

/// Flat fill used when the source image could not be loaded
pub fn draw_error_frame(frame: &mut Frame) {
    frame.fill(colors::ERROR_FILL);
}

/// Approximate gaussian blur: three box-blur passes in each direction
///
/// Works on premultiplied alpha so transparent edges do not darken.
pub fn box_blur(frame: &mut Frame, radius: u32) {
    let size = frame.size() as usize;
    if radius == 0 || size == 0 {
        return;
    }

    let mut buf: Vec<[f32; 4]> = frame
        .pixels()
        .iter()
        .map(|p| {
            let a = p.a as f32 / 255.0;
            [p.r as f32 * a, p.g as f32 * a, p.b as f32 * a, p.a as f32]
        })
        .collect();
    let mut scratch = vec![[0.0f32; 4]; buf.len()];
    let r = radius as usize;

    for _ in 0..3 {
        blur_pass(&buf, &mut scratch, size, r, true);
        blur_pass(&scratch, &mut buf, size, r, false);
    }

    for (px, v) in frame.pixels_mut().iter_mut().zip(&buf) {
        let a = v[3] / 255.0;
        let un = |c: f32| if a > 0.0 { (c / a).round().clamp(0.0, 255.0) as u8 } else { 0 };
        *px = Rgba::new(un(v[0]), un(v[1]), un(v[2]), v[3].round().clamp(0.0, 255.0) as u8);
    }
}

/// One sliding-window pass along rows (`horizontal`) or columns
fn blur_pass(src: &[[f32; 4]], dst: &mut [[f32; 4]], size: usize, r: usize, horizontal: bool) {
    let at = |line: usize, i: usize| {
        if horizontal {
            line * size + i
        } else {
            i * size + line
        }
    };
    let window = (2 * r + 1) as f32;
    let last = size - 1;

    for line in 0..size {
        let mut sum = [0.0f32; 4];
        // Prime the window for i = 0 with edge clamping
        for k in 0..=(2 * r) {
            let i = k.saturating_sub(r).min(last);
            let px = src[at(line, i)];
            for c in 0..4 {
                sum[c] += px[c];
            }
        }
        for i in 0..size {
            let out = &mut dst[at(line, i)];
            for c in 0..4 {
                out[c] = sum[c] / window;
            }
            let add = src[at(line, (i + r + 1).min(last))];
            let sub = src[at(line, i.saturating_sub(r))];
            for c in 0..4 {
                sum[c] += add[c] - sub[c];
            }
        }
    }
}

/// Blur radius (pixels) for a revealed fraction, shrinking linearly to 0
pub fn blur_radius(percent: f32, frame_size: u32, max_fraction: f32) -> f32 {
    (1.0 - percent.clamp(0.0, 1.0)) * max_fraction * frame_size as f32
}
