//! Per-frame update and the render-boundary contract.
//!
//! [`FrameUpdater::update`] is called once per displayed frame. It advances
//! the morph animator, derives the idle motion and returns a [`FrameInputs`]
//! tuple - the only thing the renderer needs besides the immutable field.
//!
//! The renderer is expected to place and color each particle as
//!
//! ```text
//! position = rotate_y(lerp(source, target, morph) * pulse, rotation)
//! color    = lerp(heart_color, point_color, morph)
//! ```
//!
//! [`final_position`] and [`final_color`] are the reference implementation of
//! that contract; the GPU shader mirrors them.

use glam::{Quat, Vec3};

use crate::config::IdleMotion;
use crate::field::ParticleField;
use crate::morph::MorphAnimator;

/// Idle motion applies while the morph value is below this.
const HEART_DOMINANT: f32 = 0.5;

/// Reference frame rate of the rotation relax factor.
const RELAX_REFERENCE_HZ: f32 = 60.0;

/// Everything the renderer receives for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Seconds since the engine started.
    pub elapsed: f32,
    /// Morph parameter in `[0, 1]`.
    pub morph: f32,
    /// Rotation about the vertical axis, in radians.
    pub rotation: f32,
    /// Uniform scale from the heartbeat.
    pub pulse: f32,
}

/// Computes idle rotation and pulsation each frame.
#[derive(Debug, Clone)]
pub struct FrameUpdater {
    idle: IdleMotion,
    rotation: f32,
    last_elapsed: Option<f32>,
}

impl FrameUpdater {
    pub fn new(idle: IdleMotion) -> Self {
        Self {
            idle,
            rotation: 0.0,
            last_elapsed: None,
        }
    }

    /// Advance one frame at `elapsed` seconds.
    pub fn update(&mut self, elapsed: f32, animator: &mut MorphAnimator) -> FrameInputs {
        let morph = animator.advance(elapsed);
        let dt = self
            .last_elapsed
            .map_or(0.0, |last| (elapsed - last).max(0.0));
        self.last_elapsed = Some(elapsed);

        let heart_dominant = morph < HEART_DOMINANT;
        self.rotation = if heart_dominant {
            (elapsed * self.idle.rotation_speed).sin() * self.idle.rotation_amplitude
        } else {
            relax(self.rotation, self.idle.rotation_relax, dt)
        };

        let pulse = if heart_dominant {
            1.0 + (elapsed * self.idle.pulse_speed).sin() * self.idle.pulse_amplitude
        } else {
            1.0
        };

        FrameInputs {
            elapsed,
            morph,
            rotation: self.rotation,
            pulse,
        }
    }

    /// Rotation as of the last update.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl Default for FrameUpdater {
    fn default() -> Self {
        Self::new(IdleMotion::default())
    }
}

/// Exponentially decay `angle` toward zero, removing `rate` of it per
/// reference frame regardless of the actual frame rate.
fn relax(angle: f32, rate: f32, dt: f32) -> f32 {
    let keep = (1.0 - rate.clamp(0.0, 1.0)).powf(dt * RELAX_REFERENCE_HZ);
    angle * keep
}

/// Linear interpolation with exact endpoints: `t = 0` gives `a`, `t = 1` gives `b`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

/// Where a particle is drawn this frame.
#[inline]
pub fn final_position(source: Vec3, target: Vec3, inputs: &FrameInputs) -> Vec3 {
    let morphed = lerp(source, target, inputs.morph) * inputs.pulse;
    Quat::from_rotation_y(inputs.rotation) * morphed
}

/// What color a particle is drawn with this frame.
#[inline]
pub fn final_color(heart_color: Vec3, point_color: Vec3, morph: f32) -> Vec3 {
    lerp(heart_color, point_color, morph)
}

/// CPU evaluation of every particle's position for one frame.
pub fn compose_positions(field: &ParticleField, inputs: &FrameInputs) -> Vec<Vec3> {
    field
        .source()
        .iter()
        .zip(field.target())
        .map(|(s, t)| final_position(*s, *t, inputs))
        .collect()
}

/// CPU evaluation of every particle's color for one frame.
pub fn compose_colors(field: &ParticleField, heart_color: Vec3, morph: f32) -> Vec<Vec3> {
    field
        .colors()
        .iter()
        .map(|c| final_color(heart_color, *c, morph))
        .collect()
}
