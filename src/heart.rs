//! Heart point sampler.
//!
//! Scatters points along the classic parametric heart
//!
//! ```text
//! x(t) = 16 sin³(t)
//! y(t) = 13 cos(t) - 5 cos(2t) - 2 cos(3t) - cos(4t)
//! ```
//!
//! with `t` drawn uniformly from `[0, 2π)`, then adds random depth so the
//! outline reads as a volume. Points hug the silhouette rather than filling
//! it; that is the intended look.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Half-width of the unscaled curve (`max |x(t)|`).
pub const HEART_HALF_WIDTH: f32 = 16.0;

/// Share of the target's half extent the heart spans when auto-fitted.
const FIT_RATIO: f32 = 0.8;

/// Heart shape evaluated at curve parameter `t`, unscaled, in the `z = 0` plane.
#[inline]
pub fn heart_curve(t: f32) -> Vec3 {
    let s = t.sin();
    let x = 16.0 * s * s * s;
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Vec3::new(x, y, 0.0)
}

/// Heart scale that makes the heart comparable in size to a target whose
/// points extend `half_extent` from the origin.
pub fn fit_scale(half_extent: f32) -> f32 {
    FIT_RATIO * half_extent / HEART_HALF_WIDTH
}

/// Samples source positions on the heart.
#[derive(Debug, Clone)]
pub struct HeartSampler {
    /// Uniform scale applied to every coordinate.
    pub scale: f32,
    /// Full depth of the cloud before scaling (`z ∈ [-thickness/2, thickness/2)`).
    pub thickness: f32,
    /// Half-width of the in-plane scatter before scaling.
    pub jitter: f32,
    rng: SmallRng,
}

impl HeartSampler {
    /// Create a sampler seeded from the clock.
    pub fn new(scale: f32) -> Self {
        // Different every program execution
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(scale, seed)
    }

    /// Create a reproducible sampler.
    pub fn with_seed(scale: f32, seed: u64) -> Self {
        Self {
            scale,
            thickness: 4.0,
            jitter: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness.max(0.0);
        self
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    /// Draw a single point.
    pub fn sample(&mut self) -> Vec3 {
        let t = self.rng.gen_range(0.0..TAU);
        let mut p = heart_curve(t);
        p.z = (self.rng.gen::<f32>() - 0.5) * self.thickness;
        if self.jitter > 0.0 {
            p.x += self.rng.gen_range(-self.jitter..self.jitter);
            p.y += self.rng.gen_range(-self.jitter..self.jitter);
        }
        p * self.scale
    }

    /// Draw exactly `count` points.
    pub fn sample_n(&mut self, count: usize) -> Vec<Vec3> {
        (0..count).map(|_| self.sample()).collect()
    }
}
