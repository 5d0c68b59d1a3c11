//! Pixel type for the CPU frame buffer

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA pixel, laid out exactly like canvas `ImageData`
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Linear interpolation between two colors (t clamped to 0..1)
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Source-over composite of `src` (at extra opacity `opacity`) onto self
    pub fn blend(self, src: Rgba, opacity: f32) -> Rgba {
        let sa = (src.a as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return self;
        }
        let da = self.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let channel = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round() as u8
        };
        Rgba::new(
            channel(src.r, self.r),
            channel(src.g, self.g),
            channel(src.b, self.b),
            (out_a * 255.0).round() as u8,
        )
    }
}

/// Palette for the hidden-image treatment
pub mod colors {
    use super::Rgba;

    /// Placeholder gradient, top
    pub const PLACEHOLDER_TOP: Rgba = Rgba::hex(0x1a1a2e);
    /// Placeholder gradient, bottom
    pub const PLACEHOLDER_BOTTOM: Rgba = Rgba::hex(0x2d2d5e);
    /// Curtain divider glow
    pub const DIVIDER: Rgba = Rgba::new(255, 200, 0, 204);
    /// Hidden jigsaw tile edge
    pub const TILE_EDGE: Rgba = Rgba::new(255, 255, 255, 38);
    /// Sparkle dots over the placeholder
    pub const SPARKLE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Frame shown when the image failed to load
    pub const ERROR_FILL: Rgba = Rgba::hex(0x333333);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(Rgba::hex(0x1a1a2e), Rgba::new(0x1a, 0x1a, 0x2e, 255));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgba::new(0, 0, 0, 255);
        let b = Rgba::new(200, 100, 50, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::new(100, 50, 25, 255));
    }

    #[test]
    fn test_blend_opaque_src_replaces() {
        let dst = Rgba::new(10, 20, 30, 255);
        let src = Rgba::new(200, 100, 0, 255);
        assert_eq!(dst.blend(src, 1.0), src);
        assert_eq!(dst.blend(src, 0.0), dst);
    }

    #[test]
    fn test_blend_onto_transparent_keeps_src_color() {
        let out = Rgba::TRANSPARENT.blend(Rgba::new(255, 200, 0, 255), 0.5);
        assert_eq!((out.r, out.g, out.b), (255, 200, 0));
        assert_eq!(out.a, 128);
    }

    #[test]
    fn test_pixel_is_four_bytes() {
        let px = [Rgba::new(1, 2, 3, 4)];
        assert_eq!(bytemuck::cast_slice::<Rgba, u8>(&px), &[1, 2, 3, 4]);
    }
}
