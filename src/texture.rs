//! 2D textures with nearest-neighbor sampling.

use std::path::Path;

use image::RgbaImage;

use crate::color::Color;

/// A decoded 2D texture sampled by normalized UV coordinates.
pub struct Texture {
    data: Vec<u8>, // RGBA8, row-major from the top-left
    width: u32,
    height: u32,
}

impl Texture {
    /// Loads a texture from an image file (PNG, JPG, etc.).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        Ok(Self::from_image(image::open(path)?.to_rgba8()))
    }

    /// Wraps an already-decoded image.
    pub fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }

    /// Samples the texture at `(u, v)` with nearest-neighbor lookup.
    ///
    /// `v` is flipped (`1 − v`) before the lookup: UV coordinates use a
    /// bottom-left origin while the pixel rows are stored from the top.
    /// Coordinates that scale past the last texel clamp to the edge.
    #[inline]
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let v = 1.0 - v;
        let x = ((u * self.width as f64) as i64).clamp(0, self.width as i64 - 1) as u32;
        let y = ((v * self.height as f64) as i64).clamp(0, self.height as i64 - 1) as u32;

        let idx = ((y * self.width + x) * 4) as usize;
        let px = &self.data[idx..idx + 4];
        Color::new(
            px[0] as f64 / 255.0,
            px[1] as f64 / 255.0,
            px[2] as f64 / 255.0,
            px[3] as f64 / 255.0,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
