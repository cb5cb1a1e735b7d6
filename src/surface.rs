//! Offscreen RGBA surface the favicon is composed on.
//!
//! A tightly packed row-major pixel buffer. Icons are tiny, so there is no
//! stride padding: the buffer can be handed to the PNG encoder as-is.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order, 4 bytes each.
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a new transparent surface with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero, or the buffer size overflows
    /// `usize`.
    ///
    /// # Example
    ///
    /// ```
    /// use blink_favicon::surface::Surface;
    ///
    /// let surface = Surface::new(32, 32).unwrap();
    /// assert_eq!(surface.pixel_count(), 1024);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n > 0)
            .ok_or(Error::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            pixels: vec![0; size],
        })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get the raw pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Clear the surface to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Get the color at a pixel coordinate, or `None` if out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a pixel coordinate. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Blend a color onto a pixel with the "source over" operator.
    ///
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height || color.a == 0 {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a > 0.0 {
            let blend = |src: u8, dst: u8| -> u8 {
                let src_f = f32::from(src) / 255.0;
                let dst_f = f32::from(dst) / 255.0;
                let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
                (out * 255.0).round().clamp(0.0, 255.0) as u8
            };

            self.pixels[idx] = blend(color.r, self.pixels[idx]);
            self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
            self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
            self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
        }
    }

    /// Count pixels that exactly match `color`.
    #[must_use]
    pub fn count_color(&self, color: Rgba) -> usize {
        let rgba = color.to_array();
        self.pixels
            .chunks_exact(4)
            .filter(|chunk| *chunk == rgba)
            .count()
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface() {
        let s = Surface::new(32, 16).unwrap();
        assert_eq!(s.width(), 32);
        assert_eq!(s.height(), 16);
        assert_eq!(s.pixels().len(), 32 * 16 * 4);
        assert_eq!(s.get_pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Surface::new(0, 32).is_err());
        assert!(Surface::new(32, 0).is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        // Width × height × 4 bytes overflows usize
        assert!(matches!(
            Surface::new(u32::MAX, u32::MAX),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_set_get_pixel_bounds() {
        let mut s = Surface::new(4, 4).unwrap();
        s.set_pixel(3, 3, Rgba::ACCENT);
        s.set_pixel(4, 4, Rgba::ACCENT);
        assert_eq!(s.get_pixel(3, 3), Some(Rgba::ACCENT));
        assert_eq!(s.get_pixel(4, 0), None);
    }

    #[test]
    fn test_blend_opaque_replaces() {
        let mut s = Surface::new(2, 2).unwrap();
        s.clear(Rgba::BACKGROUND);
        s.blend_pixel(1, 1, Rgba::ACCENT);
        assert_eq!(s.get_pixel(1, 1), Some(Rgba::ACCENT));
    }

    #[test]
    fn test_blend_half_alpha_mixes() {
        let mut s = Surface::new(1, 1).unwrap();
        s.clear(Rgba::BLACK);
        s.blend_pixel(0, 0, Rgba::WHITE.with_alpha(128));

        let p = s.get_pixel(0, 0).unwrap();
        assert!(p.r > 120 && p.r < 135, "got {p:?}");
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_blend_transparent_is_noop() {
        let mut s = Surface::new(1, 1).unwrap();
        s.clear(Rgba::BACKGROUND);
        s.blend_pixel(0, 0, Rgba::ACCENT.with_alpha(0));
        assert_eq!(s.get_pixel(0, 0), Some(Rgba::BACKGROUND));
    }
}
