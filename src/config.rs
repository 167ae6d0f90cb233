//! Engine configuration.
//!
//! [`MorphConfig`] collects every tunable constant of the engine. Defaults
//! reproduce the classic look: a deep red heart of ~14k dots that morphs into
//! a 120x120 photo over 1.5 seconds. Configurations serialize to JSON so they
//! can be kept next to the photo they were tuned for.
//!
//! ```ignore
//! let config = MorphConfig::default()
//!     .with_image("photo.jpg")
//!     .with_transition_duration(2.0);
//! config.save("heart.json")?;
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::easing::Easing;
use crate::error::ConfigError;

/// Idle animation parameters applied on top of the morph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleMotion {
    /// Angular frequency of the heart's rocking rotation (rad/s).
    pub rotation_speed: f32,
    /// Peak rotation angle about the vertical axis (radians).
    pub rotation_amplitude: f32,
    /// Fraction of the remaining angle removed per 60 Hz frame while showing the photo.
    pub rotation_relax: f32,
    /// Angular frequency of the heartbeat (rad/s).
    pub pulse_speed: f32,
    /// Peak relative scale change of the heartbeat.
    pub pulse_amplitude: f32,
}

impl Default for IdleMotion {
    fn default() -> Self {
        Self {
            rotation_speed: 0.5,
            rotation_amplitude: 0.2,
            rotation_relax: 0.05,
            pulse_speed: 4.0,
            pulse_amplitude: 0.03,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Particle count used by the grid target. The image target derives its own count.
    pub particle_count: u32,
    /// Base point-sprite size handed to the renderer.
    pub point_size: f32,
    /// Color of every point while in heart shape (linear RGB, 0-1).
    pub heart_color: [f32; 3],
    /// Color of grid target points.
    pub grid_color: [f32; 3],
    /// Photograph to morph into. `None` uses the grid target.
    pub image: Option<PathBuf>,
    /// Width of the raster the photo is downsampled to.
    pub raster_width: u32,
    /// Height of the raster the photo is downsampled to.
    pub raster_height: u32,
    /// Distance between neighbouring target points (photo and grid).
    pub spacing: f32,
    /// Pixels with alpha below this value (0-255) are skipped.
    pub alpha_threshold: u8,
    /// Fixed heart scale. `None` fits the heart to the target extent.
    pub heart_scale: Option<f32>,
    /// Depth of the heart cloud before scaling.
    pub heart_thickness: f32,
    /// Extra in-plane scatter of heart points before scaling.
    pub heart_jitter: f32,
    /// Seconds for a full heart-to-photo sweep.
    pub transition_duration: f32,
    /// Easing curve of the sweep.
    pub easing: Easing,
    /// Idle rotation and heartbeat.
    pub idle: IdleMotion,
    /// Seconds to wait for the photo before falling back to the grid.
    pub load_timeout: f32,
    /// Seed for the heart sampler. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: 14_400,
            point_size: 2.0,
            heart_color: [1.0, 0.0, 0.2],
            grid_color: [0.92, 0.92, 0.96],
            image: None,
            raster_width: 120,
            raster_height: 120,
            spacing: 0.5,
            alpha_threshold: 20,
            heart_scale: None,
            heart_thickness: 4.0,
            heart_jitter: 0.0,
            transition_duration: 1.5,
            easing: Easing::QuadInOut,
            idle: IdleMotion::default(),
            load_timeout: 10.0,
            seed: None,
        }
    }
}

impl MorphConfig {
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn with_heart_color(mut self, color: Vec3) -> Self {
        self.heart_color = color.to_array();
        self
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn without_image(mut self) -> Self {
        self.image = None;
        self
    }

    /// Set the raster the photo is downsampled to.
    pub fn with_raster(mut self, width: u32, height: u32) -> Self {
        self.raster_width = width;
        self.raster_height = height;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_heart_scale(mut self, scale: f32) -> Self {
        self.heart_scale = Some(scale);
        self
    }

    pub fn with_transition_duration(mut self, seconds: f32) -> Self {
        self.transition_duration = seconds;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_idle(mut self, idle: IdleMotion) -> Self {
        self.idle = idle;
        self
    }

    pub fn with_load_timeout(mut self, seconds: f32) -> Self {
        self.load_timeout = seconds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn heart_color(&self) -> Vec3 {
        Vec3::from_array(self.heart_color)
    }

    #[inline]
    pub fn grid_color(&self) -> Vec3 {
        Vec3::from_array(self.grid_color)
    }

    /// Load timeout as a duration.
    ///
    /// Negative and NaN values mean "give up immediately". Values too large
    /// for a `Duration` (including infinity) mean "wait forever".
    pub fn load_timeout(&self) -> Duration {
        if self.load_timeout.is_nan() || self.load_timeout <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f32(self.load_timeout).unwrap_or(Duration::MAX)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
