//! The morph engine: field lifecycle, animator and frame updater in one owner.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──start()──▶ Loading ──photo ok──────▶ Ready(field)
//!       │                       └──error / timeout──▶ Failed(grid fallback)
//!       └──start() without photo──────────────────▶ Ready(grid)
//! ```
//!
//! Until a field exists, toggles and ticks are no-ops and nothing is drawn.
//! A field whose arrays disagree on length puts the engine in
//! [`FieldState::Faulted`]; it never animates a truncated field.
//!
//! The photo is decoded on a worker thread. The engine polls the worker once
//! per tick and never blocks the frame.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::MorphConfig;
use crate::error::{FieldError, ImageError};
use crate::field::ParticleField;
use crate::frame::{FrameInputs, FrameUpdater};
use crate::heart::{fit_scale, HeartSampler};
use crate::morph::{MorphAnimator, MorphPhase, MorphState, Shape};
use crate::raster::Raster;
use crate::target::{GridTarget, ImageTarget, TargetBuilder};
use crate::time::FrameClock;

/// A photo being decoded in the background.
#[derive(Debug)]
pub struct ImageRequest {
    rx: Receiver<Result<Raster, ImageError>>,
    /// `None` when the timeout is too long to represent.
    deadline: Option<Instant>,
    timeout: Duration,
}

impl ImageRequest {
    /// Decode and downsample `path` on a worker thread.
    pub fn spawn(path: impl AsRef<Path>, width: u32, height: u32, timeout: Duration) -> Result<Self, ImageError> {
        let (tx, rx) = mpsc::channel();
        let path: PathBuf = path.as_ref().to_path_buf();
        thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || {
                let result = Raster::load_downsampled(&path, width, height);
                // The engine may have given up already
                let _ = tx.send(result);
            })?;
        Ok(Self::from_receiver(rx, timeout))
    }

    /// Wait on an arbitrary producer of rasters.
    pub fn from_receiver(rx: Receiver<Result<Raster, ImageError>>, timeout: Duration) -> Self {
        Self {
            rx,
            deadline: Instant::now().checked_add(timeout),
            timeout,
        }
    }

    /// Non-blocking check. `None` means still loading.
    pub fn poll(&self) -> Option<Result<Raster, ImageError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Disconnected) => Some(Err(ImageError::Disconnected)),
            Err(TryRecvError::Empty) if self.deadline.is_some_and(|d| Instant::now() >= d) => {
                Some(Err(ImageError::Timeout(self.timeout)))
            }
            Err(TryRecvError::Empty) => None,
        }
    }
}

/// Where the engine is in building its particle field.
#[derive(Debug)]
pub enum FieldState {
    /// Nothing started yet.
    Uninitialized,
    /// Waiting for the photo.
    Loading(ImageRequest),
    /// Field built from the configured target.
    Ready(Arc<ParticleField>),
    /// The photo could not be used; running on the grid instead.
    Failed {
        fallback: Arc<ParticleField>,
        error: ImageError,
    },
    /// Field construction failed. The engine stays idle.
    Faulted(FieldError),
}

impl FieldState {
    /// The field to draw, if any.
    pub fn field(&self) -> Option<&Arc<ParticleField>> {
        match self {
            FieldState::Ready(field) => Some(field),
            FieldState::Failed { fallback, .. } => Some(fallback),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FieldState::Loading(_))
    }
}

/// One frame's worth of render input.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub field: &'a ParticleField,
    pub inputs: FrameInputs,
}

/// Owns the particle field, the morph animator and the frame updater.
#[derive(Debug)]
pub struct Engine {
    config: MorphConfig,
    state: FieldState,
    animator: MorphAnimator,
    updater: FrameUpdater,
}

impl Engine {
    pub fn new(config: MorphConfig) -> Self {
        let animator = MorphAnimator::new(config.transition_duration, config.easing);
        let updater = FrameUpdater::new(config.idle);
        Self {
            config,
            state: FieldState::Uninitialized,
            animator,
            updater,
        }
    }

    /// Begin building the field: load the configured photo in the background,
    /// or build the grid right away when there is none.
    pub fn start(&mut self) {
        if !matches!(self.state, FieldState::Uninitialized) {
            return;
        }
        let Some(path) = self.config.image.clone() else {
            tracing::info!("no image configured, using grid target");
            self.state = settle(build_grid_field(&self.config));
            return;
        };

        tracing::info!(path = %path.display(), "loading image");
        match ImageRequest::spawn(
            &path,
            self.config.raster_width,
            self.config.raster_height,
            self.config.load_timeout(),
        ) {
            Ok(request) => self.state = FieldState::Loading(request),
            Err(error) => self.fall_back(error),
        }
    }

    /// Wait on an externally started image request instead of spawning one.
    pub fn start_with_request(&mut self, request: ImageRequest) {
        if matches!(self.state, FieldState::Uninitialized) {
            self.state = FieldState::Loading(request);
        }
    }

    /// Build the field from an already decoded raster.
    pub fn start_with_raster(&mut self, raster: Raster) {
        if matches!(self.state, FieldState::Uninitialized) {
            self.finish_loading(Ok(raster));
        }
    }

    /// Check on the photo. Called from [`Engine::tick`]; harmless to call more often.
    pub fn poll(&mut self) {
        let result = match &self.state {
            FieldState::Loading(request) => request.poll(),
            _ => None,
        };
        if let Some(result) = result {
            self.finish_loading(result);
        }
    }

    fn finish_loading(&mut self, result: Result<Raster, ImageError>) {
        let raster = match result {
            Ok(raster) => raster,
            Err(error) => return self.fall_back(error),
        };
        let target = ImageTarget::new(raster, self.config.spacing)
            .with_alpha_threshold(self.config.alpha_threshold);
        if target.qualifying_count() == 0 {
            return self.fall_back(ImageError::Empty);
        }
        self.state = settle(build_field(&target, &self.config));
    }

    fn fall_back(&mut self, error: ImageError) {
        tracing::warn!(%error, "image unavailable, falling back to grid");
        self.state = match build_grid_field(&self.config) {
            Ok(field) => FieldState::Failed {
                fallback: Arc::new(field),
                error,
            },
            Err(fault) => settle(Err(fault)),
        };
    }

    /// Flip between heart and photo at `now` seconds.
    ///
    /// Returns the new target shape, or `None` while there is no field.
    pub fn toggle(&mut self, now: f32) -> Option<Shape> {
        if self.field().is_none() {
            tracing::debug!("toggle ignored, particle field not ready");
            return None;
        }
        Some(self.animator.toggle(now))
    }

    /// Advance to `elapsed` seconds and return this frame's render inputs.
    pub fn tick(&mut self, elapsed: f32) -> Option<FrameInputs> {
        self.poll();
        self.state.field()?;
        Some(self.updater.update(elapsed, &mut self.animator))
    }

    /// Tick the clock, advance, and pair the inputs with the field to draw.
    pub fn frame<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> Option<RenderFrame<'_>> {
        let (elapsed, _) = clock.tick();
        let inputs = self.tick(elapsed)?;
        let field = self.state.field()?;
        Some(RenderFrame { field, inputs })
    }

    #[inline]
    pub fn field(&self) -> Option<&Arc<ParticleField>> {
        self.state.field()
    }

    #[inline]
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    #[inline]
    pub fn morph(&self) -> MorphState {
        self.animator.state()
    }

    #[inline]
    pub fn phase(&self) -> MorphPhase {
        self.animator.phase()
    }

    #[inline]
    pub fn config(&self) -> &MorphConfig {
        &self.config
    }
}

fn settle(result: Result<ParticleField, FieldError>) -> FieldState {
    match result {
        Ok(field) => {
            tracing::info!(particles = field.len(), kind = ?field.kind(), "particle field ready");
            FieldState::Ready(Arc::new(field))
        }
        Err(error) => {
            tracing::error!(%error, "particle field construction failed");
            FieldState::Faulted(error)
        }
    }
}

/// Build a field for `target`, sizing and fitting the heart to it.
pub fn build_field<B: TargetBuilder + ?Sized>(target: &B, config: &MorphConfig) -> Result<ParticleField, FieldError> {
    ParticleField::build(target, |count, half_extent| {
        let scale = config.heart_scale.unwrap_or_else(|| {
            if half_extent > 0.0 {
                fit_scale(half_extent)
            } else {
                1.0
            }
        });
        let sampler = match config.seed {
            Some(seed) => HeartSampler::with_seed(scale, seed),
            None => HeartSampler::new(scale),
        };
        sampler
            .with_thickness(config.heart_thickness)
            .with_jitter(config.heart_jitter)
            .sample_n(count)
    })
}

/// Build the grid-target field described by `config`.
pub fn build_grid_field(config: &MorphConfig) -> Result<ParticleField, FieldError> {
    let grid = GridTarget::for_count(config.particle_count, config.spacing, config.grid_color());
    build_field(&grid, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetKind;
    use crate::time::ManualClock;

    fn config() -> MorphConfig {
        MorphConfig::default().with_particle_count(64).with_seed(1)
    }

    fn raster_with_hole() -> Raster {
        Raster::from_rgba(
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, //
                0, 0, 255, 255, 0, 0, 0, 0,
            ],
            2,
            2,
        )
    }

    #[test]
    fn idle_before_start() {
        let mut engine = Engine::new(config());
        assert!(matches!(engine.state(), FieldState::Uninitialized));
        assert_eq!(engine.toggle(0.0), None);
        assert_eq!(engine.tick(0.5), None);
        assert_eq!(engine.morph().value, 0.0);
    }

    #[test]
    fn grid_field_without_image() {
        let mut engine = Engine::new(config());
        engine.start();
        let field = engine.field().unwrap();
        assert_eq!(field.len(), 64);
        assert_eq!(field.kind(), TargetKind::Grid);
        assert!(matches!(engine.state(), FieldState::Ready(_)));
    }

    #[test]
    fn image_with_transparent_pixel_yields_three_particles() {
        let mut engine = Engine::new(config());
        engine.start_with_raster(raster_with_hole());
        let field = engine.field().unwrap();
        assert_eq!(field.len(), 3);
        assert_eq!(field.source().len(), 3);
        assert_eq!(field.kind(), TargetKind::Image);
    }

    #[test]
    fn missing_image_falls_back_to_grid() {
        let mut engine = Engine::new(config().with_image("/no/such/photo.jpg").with_load_timeout(5.0));
        engine.start();
        for _ in 0..500 {
            engine.poll();
            if !engine.state().is_loading() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        match engine.state() {
            FieldState::Failed { fallback, error } => {
                assert_eq!(fallback.kind(), TargetKind::Grid);
                assert!(matches!(error, ImageError::Io(_) | ImageError::Decode(_)));
            }
            other => panic!("expected grid fallback, got {other:?}"),
        }
    }

    #[test]
    fn silent_loader_times_out() {
        let (_tx, rx) = mpsc::channel();
        let mut engine = Engine::new(config());
        engine.start_with_request(ImageRequest::from_receiver(rx, Duration::ZERO));
        assert!(engine.tick(0.0).is_some());
        assert!(matches!(
            engine.state(),
            FieldState::Failed { error: ImageError::Timeout(_), .. }
        ));
    }

    #[test]
    fn unbounded_timeout_keeps_waiting() {
        let (tx, rx) = mpsc::channel();
        let request = ImageRequest::from_receiver(rx, Duration::MAX);
        assert!(request.poll().is_none());
        tx.send(Ok(raster_with_hole())).unwrap();
        assert!(matches!(request.poll(), Some(Ok(_))));
    }

    #[test]
    fn huge_configured_timeout_starts_loading() {
        let config: MorphConfig =
            serde_json::from_str(r#"{ "image": "/no/such/photo.png", "load_timeout": 1e20, "particle_count": 16 }"#)
                .unwrap();
        let mut engine = Engine::new(config);
        engine.start();
        for _ in 0..500 {
            engine.poll();
            if !engine.state().is_loading() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(matches!(engine.state(), FieldState::Failed { .. }));
    }

    #[test]
    fn loading_ignores_toggles_until_ready() {
        let (tx, rx) = mpsc::channel();
        let mut engine = Engine::new(config());
        engine.start_with_request(ImageRequest::from_receiver(rx, Duration::from_secs(60)));

        assert_eq!(engine.tick(0.0), None);
        assert_eq!(engine.toggle(0.1), None);

        tx.send(Ok(raster_with_hole())).unwrap();
        let inputs = engine.tick(0.2).unwrap();
        assert_eq!(inputs.morph, 0.0);
        assert_eq!(engine.toggle(0.2), Some(Shape::Photo));
    }

    #[test]
    fn fully_transparent_image_falls_back() {
        let mut engine = Engine::new(config());
        engine.start_with_raster(Raster::from_rgba(vec![0; 16], 2, 2));
        assert!(matches!(
            engine.state(),
            FieldState::Failed { error: ImageError::Empty, .. }
        ));
    }

    #[test]
    fn empty_grid_faults() {
        let mut engine = Engine::new(config().with_particle_count(0));
        engine.start();
        assert!(matches!(engine.state(), FieldState::Faulted(FieldError::Empty)));
        assert_eq!(engine.toggle(0.0), None);
        assert_eq!(engine.tick(1.0), None);
    }

    #[test]
    fn infinite_duration_still_reaches_the_photo() {
        let mut engine = Engine::new(config().with_transition_duration(f32::INFINITY));
        engine.start();
        engine.toggle(0.0);
        assert_eq!(engine.tick(1e6).unwrap().morph, 1.0);
        assert_eq!(engine.phase(), MorphPhase::Photo);
    }

    #[test]
    fn frame_runs_a_full_toggle() {
        let mut engine = Engine::new(config().with_transition_duration(1.0));
        engine.start();
        let mut clock = ManualClock::at_hz(60.0);

        engine.toggle(0.0);
        let mut last = 0.0;
        for _ in 0..90 {
            let frame = engine.frame(&mut clock).unwrap();
            assert_eq!(frame.field.len(), 64);
            assert!(frame.inputs.morph >= last);
            last = frame.inputs.morph;
        }
        assert_eq!(last, 1.0);
        assert_eq!(engine.phase(), MorphPhase::Photo);
    }
}
