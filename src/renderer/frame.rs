//! Square RGBA frame buffer and pixel-aligned rectangles

use glam::Vec2;

use super::pixel::Rgba;

/// Axis-aligned rectangle in frame pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    pub fn size(&self) -> Vec2 {
        (self.max - self.min).max(Vec2::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        let s = self.size();
        s.x <= 0.0 || s.y <= 0.0
    }

    /// Integer pixel span `(x0, y0, x1, y1)`, clamped to a `size` x `size` frame
    ///
    /// Edges are rounded, so two rects sharing an edge never overlap or leave
    /// a gap between them.
    pub fn pixel_span(&self, size: u32) -> (u32, u32, u32, u32) {
        let clamp = |v: f32| v.round().clamp(0.0, size as f32) as u32;
        (
            clamp(self.min.x),
            clamp(self.min.y),
            clamp(self.max.x),
            clamp(self.max.y),
        )
    }
}

/// The render target: a square canvas of RGBA pixels
#[derive(Debug, Clone)]
pub struct Frame {
    size: u32,
    pixels: Vec<Rgba>,
}

impl Frame {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![Rgba::TRANSPARENT; (size as usize) * (size as usize)],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size as f32, self.size as f32)
    }

    /// Resize (clears contents)
    pub fn resize(&mut self, size: u32) {
        self.size = size;
        self.pixels.clear();
        self.pixels
            .resize((size as usize) * (size as usize), Rgba::TRANSPARENT);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.size as usize) + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Composite `color` over the pixel at (x, y); out-of-bounds is ignored
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba, opacity: f32) {
        if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        self.pixels[i] = self.pixels[i].blend(color, opacity);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let (x0, y0, x1, y1) = rect.pixel_span(self.size);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, color);
            }
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Raw RGBA bytes, ready for `ImageData`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
