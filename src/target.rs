//! Target point builders.
//!
//! A [`TargetBuilder`] produces the destination configuration of the morph:
//! one position and one color per particle. Two strategies exist:
//!
//! - [`GridTarget`] - a flat, evenly spaced lattice of a single color
//! - [`ImageTarget`] - one point per visible pixel of a downsampled photo
//!
//! The builder decides the particle count. The heart sampler is sized from
//! whatever the builder returns, never the other way around.

use glam::Vec3;

use crate::raster::Raster;

/// Which strategy produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Grid,
    Image,
}

/// Destination positions with their colors, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetPoints {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl TargetPoints {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, position: Vec3, color: Vec3) {
        self.positions.push(position);
        self.colors.push(color);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Largest distance of any point from the origin along x or y.
    pub fn half_extent(&self) -> f32 {
        self.positions
            .iter()
            .fold(0.0_f32, |acc, p| acc.max(p.x.abs()).max(p.y.abs()))
    }
}

/// A strategy for building the destination configuration.
pub trait TargetBuilder {
    fn kind(&self) -> TargetKind;

    fn build(&self) -> TargetPoints;
}

/// Evenly spaced lattice in the `z = 0` plane, centered at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTarget {
    pub cols: u32,
    pub rows: u32,
    /// Number of lattice cells actually filled, in row-major order.
    pub count: u32,
    pub spacing: f32,
    pub color: Vec3,
}

impl GridTarget {
    /// Smallest near-square lattice holding `count` points.
    pub fn for_count(count: u32, spacing: f32, color: Vec3) -> Self {
        let cols = (count as f32).sqrt().ceil().max(1.0) as u32;
        let rows = count.div_ceil(cols).max(1);
        Self {
            cols,
            rows,
            count,
            spacing,
            color,
        }
    }

    /// A fully filled `cols` x `rows` lattice.
    pub fn new(cols: u32, rows: u32, spacing: f32, color: Vec3) -> Self {
        Self {
            cols,
            rows,
            count: cols.saturating_mul(rows),
            spacing,
            color,
        }
    }
}

impl TargetBuilder for GridTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Grid
    }

    fn build(&self) -> TargetPoints {
        let count = self.count.min(self.cols.saturating_mul(self.rows));
        let mut points = TargetPoints::with_capacity(count as usize);

        // Center of the lattice lands on the origin
        let half_w = (self.cols.saturating_sub(1)) as f32 * 0.5;
        let half_h = (self.rows.saturating_sub(1)) as f32 * 0.5;

        for i in 0..count {
            let col = i % self.cols;
            let row = i / self.cols;
            let x = (col as f32 - half_w) * self.spacing;
            let y = -(row as f32 - half_h) * self.spacing;
            points.push(Vec3::new(x, y, 0.0), self.color);
        }
        points
    }
}

/// One point per visible raster cell, colored from the cell.
#[derive(Debug, Clone)]
pub struct ImageTarget {
    raster: Raster,
    /// Cells with alpha below this value (0-255) are skipped.
    pub alpha_threshold: u8,
    pub spacing: f32,
}

impl ImageTarget {
    pub fn new(raster: Raster, spacing: f32) -> Self {
        Self {
            raster,
            alpha_threshold: 20,
            spacing,
        }
    }

    pub fn with_alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Particle count this target will produce.
    pub fn qualifying_count(&self) -> usize {
        self.raster.count_opaque(self.alpha_threshold)
    }
}

impl TargetBuilder for ImageTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Image
    }

    fn build(&self) -> TargetPoints {
        let half_w = self.raster.width() as f32 / 2.0;
        let half_h = self.raster.height() as f32 / 2.0;
        let mut points = TargetPoints::with_capacity(self.qualifying_count());

        for (col, row, px) in self.raster.cells() {
            if px[3] < self.alpha_threshold {
                continue;
            }
            let c = self.raster.normalized(col, row);
            // Raster rows grow downward, scene y grows upward
            let position = Vec3::new(
                (col as f32 - half_w) * self.spacing,
                -(row as f32 - half_h) * self.spacing,
                0.0,
            );
            points.push(position, c.truncate());
        }
        points
    }
}
