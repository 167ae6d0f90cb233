//! RGBA rasters sampled by the image target.
//!
//! The engine never works on full-resolution photos. A photo is decoded once
//! and downsampled to a small raster (120x120 by default), and every raster
//! cell becomes at most one particle.
//!
//! # Supported Formats
//!
//! - PNG (recommended, keeps transparency)
//! - JPEG

use std::path::Path;

use glam::Vec4;
use image::imageops::FilterType;
use image::{Rgba, Rgba32FImage, RgbaImage};

use crate::error::ImageError;

/// Row-major RGBA8 pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    img: RgbaImage,
}

impl Raster {
    /// Create a raster from raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * 4` bytes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // 2x2 raster with a transparent bottom-right pixel
    /// let data = vec![
    ///     255, 0, 0, 255,    0, 255, 0, 255,
    ///     0, 0, 255, 255,    0, 0, 0, 0,
    /// ];
    /// let raster = Raster::from_rgba(data, 2, 2);
    /// ```
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let i = ((y * width + x) * 4) as usize;
            Rgba([data[i], data[i + 1], data[i + 2], data[i + 3]])
        });
        Self { img }
    }

    /// Decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        Ok(Self { img })
    }

    /// Decode an in-memory encoded image (PNG or JPEG bytes).
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, ImageError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        Ok(Self { img })
    }

    /// Decode `path` and downsample it to `width` x `height` cells.
    pub fn load_downsampled<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self, ImageError> {
        Ok(Self::from_file(path)?.downsample(width, height))
    }

    /// Resample to `width` x `height`, stretching to fill like a canvas `drawImage`.
    ///
    /// Filtering runs on premultiplied alpha, so transparent pixels do not
    /// darken the colors along the edges of visible regions. A raster already
    /// at the requested size is returned unchanged.
    pub fn downsample(self, width: u32, height: u32) -> Self {
        if self.img.dimensions() == (width, height) {
            return self;
        }
        let premultiplied = Rgba32FImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b, a] = self.normalized(x, y).to_array();
            Rgba([r * a, g * a, b * a, a])
        });
        let resized = image::imageops::resize(&premultiplied, width.max(1), height.max(1), FilterType::Triangle);
        let img = RgbaImage::from_fn(resized.width(), resized.height(), |x, y| {
            let [r, g, b, a] = resized.get_pixel(x, y).0;
            let a = a.clamp(0.0, 1.0);
            let unmultiply = |c: f32| if a > 0.0 { c / a } else { 0.0 };
            Rgba([
                to_byte(unmultiply(r)),
                to_byte(unmultiply(g)),
                to_byte(unmultiply(b)),
                to_byte(a),
            ])
        });
        Self { img }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Number of cells (`width * height`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width() * self.height()) as usize
    }

    /// Raw RGBA bytes of the cell at `(col, row)`.
    #[inline]
    pub fn rgba(&self, col: u32, row: u32) -> [u8; 4] {
        self.img.get_pixel(col, row).0
    }

    /// Cell color normalized to `0.0..=1.0` per channel.
    #[inline]
    pub fn normalized(&self, col: u32, row: u32) -> Vec4 {
        let [r, g, b, a] = self.rgba(col, row);
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }

    /// Iterate cells in raster order as `(col, row, rgba)`.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, [u8; 4])> + '_ {
        self.img.enumerate_pixels().map(|(col, row, px)| (col, row, px.0))
    }

    /// Number of cells whose alpha is at least `threshold`.
    pub fn count_opaque(&self, threshold: u8) -> usize {
        self.cells().filter(|(_, _, px)| px[3] >= threshold).count()
    }
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl From<RgbaImage> for Raster {
    fn from(img: RgbaImage) -> Self {
        Self { img }
    }
}
