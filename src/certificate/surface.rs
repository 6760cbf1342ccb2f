//! Raster surface abstraction for certificate rendering.
//!
//! The layout code in [`compositor`](super::compositor) only talks to the
//! [`Surface`] trait, so it can be exercised against a recording fake in
//! tests while production uses [`RasterSurface`] (an RGBA buffer plus a
//! rusttype font).

use std::sync::Arc;

use image::{DynamicImage, ImageBuffer, ImageEncoder, Rgba};
use rusttype::{point, Font, Scale};

use super::CertError;

/// Drawing capabilities the compositor needs from its output target.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Replace the backing store with a blank buffer of the given size.
    fn resize(&mut self, width: u32, height: u32);

    /// Blit an image at the origin, 1:1, covering the surface.
    fn draw_image(&mut self, image: &DynamicImage);

    /// Advance width of `text` at `px` pixels.
    fn measure_text(&self, text: &str, px: f32) -> f32;

    /// Fill `text` with its left edge at `x` and its baseline at `baseline`.
    fn fill_text(&mut self, text: &str, x: f32, baseline: f32, px: f32, color: Rgba<u8>);
}

/// CPU raster target backed by an `image` RGBA buffer.
pub struct RasterSurface {
    img: ImageBuffer<Rgba<u8>, Vec<u8>>,
    font: Arc<Font<'static>>,
}

impl RasterSurface {
    pub fn new(font: Arc<Font<'static>>) -> Self {
        Self {
            img: ImageBuffer::new(1, 1),
            font,
        }
    }

    /// Encode the current contents as PNG bytes.
    pub fn into_png(self) -> Result<Vec<u8>, CertError> {
        let mut buf = Vec::new();
        let enc = image::codecs::png::PngEncoder::new(&mut buf);
        enc.write_image(
            &self.img,
            self.img.width(),
            self.img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CertError::Image(e.to_string()))?;
        Ok(buf)
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.img.width()
    }

    fn height(&self) -> u32 {
        self.img.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.img = ImageBuffer::new(width.max(1), height.max(1));
    }

    fn draw_image(&mut self, image: &DynamicImage) {
        let src = image.to_rgba8();
        for (x, y, p) in src.enumerate_pixels() {
            if x < self.img.width() && y < self.img.height() {
                self.img.put_pixel(x, y, *p);
            }
        }
    }

    fn measure_text(&self, text: &str, px: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let scale = Scale::uniform(px);
        text.chars()
            .map(|ch| self.font.glyph(ch).scaled(scale).h_metrics().advance_width)
            .sum()
    }

    fn fill_text(&mut self, text: &str, x: f32, baseline: f32, px: f32, color: Rgba<u8>) {
        let scale = Scale::uniform(px);
        let mut caret_x = x;

        for ch in text.chars() {
            let glyph = self
                .font
                .glyph(ch)
                .scaled(scale)
                .positioned(point(caret_x, baseline));
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    if px < 0 || py < 0 {
                        return;
                    }
                    let (px, py) = (px as u32, py as u32);
                    if px >= self.img.width() || py >= self.img.height() {
                        return;
                    }
                    let a = (v * 255.0) as u8;
                    if a == 0 {
                        return;
                    }
                    let dst = self.img.get_pixel_mut(px, py);
                    // alpha blend: src over dst
                    let sa = a as f32 / 255.0;
                    let inv = 1.0 - sa;
                    dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
                    dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
                    dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
                    dst.0[3] = 255;
                });
            }
            caret_x += glyph.unpositioned().h_metrics().advance_width;
        }
    }
}

pub fn hex_color(s: &str) -> Result<Rgba<u8>, CertError> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 {
        return Err(CertError::BadRequest(format!("invalid color: {s}")));
    }
    let b = hex::decode(s).map_err(|_| CertError::BadRequest(format!("invalid color: {s}")))?;
    Ok(Rgba([b[0], b[1], b[2], 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(hex_color("#000000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(hex_color("#5D5D5D").unwrap(), Rgba([93, 93, 93, 255]));
        assert_eq!(hex_color("FFFFFF").unwrap(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(hex_color("#FFF").is_err());
        assert!(hex_color("#GGGGGG").is_err());
        assert!(hex_color("").is_err());
    }
}
