//! # Heart Morph
//!
//! A particle field that morphs between a 3D heart and a photo.
//!
//! Every particle has a point on a volumetric heart (its *source*) and a point
//! on a target shape, usually one per visible pixel of a downsampled photo.
//! A single morph value in `[0, 1]` blends all particles between the two, and
//! each toggle eases that value toward the other extreme.
//!
//! ## Quick Start
//!
//! ```ignore
//! use heart_morph::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     let config = MorphConfig::default().with_image("photo.jpg");
//!     heart_morph::viewer::run(config)
//! }
//! ```
//!
//! ## Headless use
//!
//! The [`Engine`] does not need a window. Drive it from any [`FrameClock`]
//! and read back the per-frame [`FrameInputs`]:
//!
//! ```ignore
//! use heart_morph::prelude::*;
//!
//! let mut engine = Engine::new(MorphConfig::default().with_particle_count(400));
//! engine.start();
//!
//! let mut clock = ManualClock::at_hz(60.0);
//! engine.toggle(0.0);
//! while let Some(frame) = engine.frame(&mut clock) {
//!     let positions = compose_positions(frame.field, &frame.inputs);
//!     if frame.inputs.morph >= 1.0 {
//!         break;
//!     }
//! }
//! ```
//!
//! ## Building blocks
//!
//! - [`heart`] samples points inside the heart volume.
//! - [`target`] builds target points from a [`raster::Raster`] or a grid.
//! - [`field`] pairs them into an index-aligned [`ParticleField`].
//! - [`morph`] owns the eased morph value and its toggles.
//! - [`frame`] turns time and the morph value into [`FrameInputs`].
//! - [`engine`] wires it all together around an asynchronous photo load.

pub mod config;
pub mod easing;
pub mod engine;
pub mod error;
pub mod field;
pub mod frame;
pub mod gpu;
pub mod heart;
pub mod morph;
pub mod raster;
pub mod target;
pub mod time;
pub mod uniforms;
pub mod viewer;

pub use config::{IdleMotion, MorphConfig};
pub use easing::{ease, Easing};
pub use engine::{Engine, FieldState, ImageRequest, RenderFrame};
pub use error::{ConfigError, FieldError, GpuError, ImageError, ViewerError};
pub use field::ParticleField;
pub use frame::{compose_colors, compose_positions, FrameInputs, FrameUpdater};
pub use glam::{Vec3, Vec4};
pub use heart::HeartSampler;
pub use morph::{MorphAnimator, MorphPhase, MorphState, Shape};
pub use target::{GridTarget, ImageTarget, TargetBuilder, TargetKind, TargetPoints};
pub use time::{FrameClock, ManualClock, Time};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use heart_morph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{IdleMotion, MorphConfig};
    pub use crate::easing::Easing;
    pub use crate::engine::{Engine, FieldState};
    pub use crate::error::{FieldError, ImageError, ViewerError};
    pub use crate::field::ParticleField;
    pub use crate::frame::{compose_colors, compose_positions, FrameInputs};
    pub use crate::morph::{MorphPhase, Shape};
    pub use crate::raster::Raster;
    pub use crate::target::{GridTarget, ImageTarget, TargetBuilder};
    pub use crate::time::{FrameClock, ManualClock, Time};
    pub use crate::{Vec3, Vec4};
}
