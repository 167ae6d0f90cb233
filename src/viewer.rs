//! Interactive window for the morph engine.
//!
//! Opens a winit window, drives an [`Engine`] from the wall clock and draws
//! each frame through the GPU [`Renderer`].
//!
//! | Input | Action |
//! |-------|--------|
//! | Left click, Space | Toggle heart / photo |
//! | Scroll | Zoom |
//! | P | Pause / resume |
//! | Escape | Quit |

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::MorphConfig;
use crate::engine::Engine;
use crate::error::ViewerError;
use crate::field::ParticleField;
use crate::gpu::Renderer;
use crate::time::{FrameClock, Time};

const TITLE: &str = "Heart Morph";

/// Frames between window title refreshes.
const TITLE_INTERVAL: u64 = 30;

/// Open the viewer and block until the window closes.
pub fn run(config: MorphConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    engine: Engine,
    time: Time,
    /// Field currently on the GPU.
    uploaded: Option<Arc<ParticleField>>,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: MorphConfig) -> Self {
        Self {
            window: None,
            renderer: None,
            engine: Engine::new(config),
            time: Time::new(),
            uploaded: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.renderer = Some(pollster::block_on(Renderer::new(window.clone()))?);
        self.window = Some(window);

        self.engine.start();
        Ok(())
    }

    fn toggle(&mut self) {
        if let Some(shape) = self.engine.toggle(self.time.elapsed()) {
            tracing::info!(?shape, "morphing");
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        let inputs = self.engine.frame(&mut self.time).map(|frame| frame.inputs);

        if let Some(field) = self.engine.field() {
            let stale = self
                .uploaded
                .as_ref()
                .map_or(true, |uploaded| !Arc::ptr_eq(uploaded, field));
            if stale {
                renderer.upload_field(field);
                self.uploaded = Some(field.clone());
            }
        }

        let config = self.engine.config();
        match renderer.render(inputs.as_ref(), config.heart_color(), config.point_size) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => renderer.resize(winit::dpi::PhysicalSize {
                width: renderer.config.width,
                height: renderer.config.height,
            }),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => tracing::error!(error = ?e, "render error"),
        }

        if let Some(window) = &self.window {
            if self.time.frame() % TITLE_INTERVAL == 0 {
                window.set_title(&format!(
                    "{TITLE} | {:?} | {:.0} fps",
                    self.engine.phase(),
                    self.time.fps()
                ));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.init(event_loop) {
            tracing::error!(%error, "viewer startup failed");
            self.error = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.toggle(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Space => self.toggle(),
                KeyCode::KeyP => {
                    self.time.toggle_pause();
                    tracing::info!(paused = self.time.is_paused(), "clock");
                }
                KeyCode::Escape => event_loop.exit(),
                _ => {}
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(renderer) = &mut self.renderer {
                    renderer.camera.zoom(scroll * 2.0);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
