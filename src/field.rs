//! The particle field: source, target and color arrays of equal length.
//!
//! A field is built once and never changes afterwards. Index `i` of every
//! array describes the same logical particle, so `colors[i]` always belongs to
//! `target[i]`.
//!
//! # Building
//!
//! ```ignore
//! let target = ImageTarget::new(raster, 0.5);
//! let mut sampler = HeartSampler::new(1.5);
//! let field = ParticleField::build(&target, |n, _| sampler.sample_n(n))?;
//! ```

use glam::Vec3;

use crate::error::FieldError;
use crate::target::{TargetBuilder, TargetKind, TargetPoints};

/// Immutable, index-aligned particle arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    source: Vec<Vec3>,
    target: Vec<Vec3>,
    colors: Vec<Vec3>,
    kind: TargetKind,
}

impl ParticleField {
    /// Assemble a field from externally produced arrays.
    ///
    /// Fails with [`FieldError::CountMismatch`] unless all three arrays have
    /// the same length, and with [`FieldError::Empty`] if that length is zero.
    pub fn from_parts(
        source: Vec<Vec3>,
        target: Vec<Vec3>,
        colors: Vec<Vec3>,
        kind: TargetKind,
    ) -> Result<Self, FieldError> {
        if source.len() != target.len() || target.len() != colors.len() {
            return Err(FieldError::CountMismatch {
                source: source.len(),
                target: target.len(),
                colors: colors.len(),
            });
        }
        if source.is_empty() {
            return Err(FieldError::Empty);
        }
        Ok(Self {
            source,
            target,
            colors,
            kind,
        })
    }

    /// Run `builder`, then ask `sample_source` for exactly as many source
    /// positions as the builder produced.
    ///
    /// `sample_source` receives the particle count and the target's half
    /// extent (for fitting the heart to the target size).
    pub fn build<B, F>(builder: &B, sample_source: F) -> Result<Self, FieldError>
    where
        B: TargetBuilder + ?Sized,
        F: FnOnce(usize, f32) -> Vec<Vec3>,
    {
        let points = builder.build();
        let half_extent = points.half_extent();
        let TargetPoints { positions, colors } = points;
        let source = sample_source(positions.len(), half_extent);
        Self::from_parts(source, positions, colors, builder.kind())
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Always `false` for a constructed field.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    #[inline]
    pub fn source(&self) -> &[Vec3] {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    #[inline]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Iterate particles as `(source, target, color)`.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Vec3, Vec3)> + '_ {
        self.source
            .iter()
            .zip(&self.target)
            .zip(&self.colors)
            .map(|((s, t), c)| (*s, *t, *c))
    }
}
