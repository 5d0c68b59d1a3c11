//! Source bitmaps and the image-load slot
//!
//! Image loading is asynchronous on the web. Each request gets a
//! [`LoadToken`]; a result is only bound if its token is still the latest
//! one, so a late callback from a superseded puzzle can never overwrite
//! the current picture.

use crate::error::ImageError;

use super::pixel::Rgba;

/// A decoded source image
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// Build from tightly packed RGBA8 bytes (as produced by `getImageData`)
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }
        let expected = (width as usize) * (height as usize) * 4;
        if bytes.len() != expected {
            return Err(ImageError::BadBuffer {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: bytemuck::cast_slice::<u8, Rgba>(bytes).to_vec(),
        })
    }

    /// Single-color bitmap
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    /// Build by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// No pixels (zero width or height)
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at (x, y), clamped to the edges; transparent for an empty bitmap
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        if self.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}

/// Identifies one image-load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(pub u64);

/// The currently bound source image
#[derive(Debug, Clone, Default)]
pub enum ImageSlot {
    /// Nothing requested yet
    #[default]
    Empty,
    /// Waiting for the loader
    Pending { token: LoadToken },
    /// Ready to draw
    Loaded { token: LoadToken, bitmap: Bitmap },
    /// Loader reported failure
    Failed { token: LoadToken, error: ImageError },
}

impl ImageSlot {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageSlot::Loaded { .. })
    }

    /// Bind a loader result; returns false (and changes nothing) if `token`
    /// is not the pending request
    ///
    /// A zero-size bitmap binds as [`ImageError::Empty`].
    pub fn resolve(&mut self, token: LoadToken, result: Result<Bitmap, ImageError>) -> bool {
        if !matches!(self, ImageSlot::Pending { token: t } if *t == token) {
            return false;
        }
        *self = match result {
            Ok(bitmap) if bitmap.is_empty() => ImageSlot::Failed {
                token,
                error: ImageError::Empty,
            },
            Ok(bitmap) => ImageSlot::Loaded { token, bitmap },
            Err(error) => ImageSlot::Failed { token, error },
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_validates() {
        assert_eq!(Bitmap::from_rgba(0, 4, &[]), Err(ImageError::Empty));
        assert_eq!(
            Bitmap::from_rgba(2, 2, &[0; 12]),
            Err(ImageError::BadBuffer {
                expected: 16,
                actual: 12
            })
        );
        let bmp = Bitmap::from_rgba(1, 2, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(bmp.get(0, 1), Rgba::new(5, 6, 7, 8));
    }

    #[test]
    fn test_get_clamps() {
        let bmp = Bitmap::from_fn(2, 2, |x, y| Rgba::new(x as u8, y as u8, 0, 255));
        assert_eq!(bmp.get(10, 10), Rgba::new(1, 1, 0, 255));
    }

    #[test]
    fn test_empty_bitmap_reads_transparent() {
        for bmp in [
            Bitmap::solid(0, 3, Rgba::new(9, 9, 9, 255)),
            Bitmap::from_fn(3, 0, |_, _| Rgba::new(9, 9, 9, 255)),
        ] {
            assert!(bmp.is_empty());
            assert_eq!(bmp.get(0, 0), Rgba::TRANSPARENT);
            assert_eq!(bmp.get(5, 5), Rgba::TRANSPARENT);
        }
    }

    #[test]
    fn test_resolve_empty_bitmap_fails() {
        let mut slot = ImageSlot::Pending {
            token: LoadToken(1),
        };
        assert!(slot.resolve(LoadToken(1), Ok(Bitmap::solid(0, 0, Rgba::TRANSPARENT))));
        assert!(matches!(
            slot,
            ImageSlot::Failed {
                error: ImageError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_only_current_token() {
        let mut slot = ImageSlot::Pending {
            token: LoadToken(2),
        };
        let stale = slot.resolve(LoadToken(1), Ok(Bitmap::solid(1, 1, Rgba::TRANSPARENT)));
        assert!(!stale);
        assert!(!slot.is_loaded());

        assert!(slot.resolve(LoadToken(2), Ok(Bitmap::solid(1, 1, Rgba::TRANSPARENT))));
        assert!(slot.is_loaded());

        // A second result for the same request is ignored
        assert!(!slot.resolve(LoadToken(2), Err(ImageError::Empty)));
        assert!(slot.is_loaded());
    }
}
