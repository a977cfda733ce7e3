//! Platform layer: window, event loop, and the per-frame drive of [`Game`].
//!
//! winit delivers events through [`ApplicationHandler`]; the ones the game
//! subscribes to are translated and buffered in its bounded queue, then
//! drained on the next redraw.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, anyhow};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use renderer::GpuState;

pub mod events;
pub mod game;

pub use game::Game;

/// Startup options, filled in by the binary.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub shader_path: PathBuf,
    pub spin: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            width: 800,
            height: 600,
            shader_path: asset::shader::default_card_shader_path(),
            spin: false,
        }
    }
}

struct App {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    game: Option<Game>,
    /// First fatal error; the loop exits and `run` returns it.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            game: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Render to texture")
            .with_inner_size(PhysicalSize::new(
                self.config.width.max(1),
                self.config.height.max(1),
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| anyhow!("Failed to create window: {e}"))?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends))?;
        let game = Game::init(&gpu, &self.config)?;
        log::info!("Press 'm' to toggle mipmapping");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.game = Some(game);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(game)) = (self.gpu.as_mut(), self.game.as_mut()) else {
            return;
        };
        match game.update(gpu) {
            Ok(()) => {}
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface lost/outdated: {e:?}. Reconfiguring.");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout; skipping frame");
            }
            Err(e) => self.fail(event_loop, anyhow!("Surface error: {e:?}")),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                return;
            }
            _ => {}
        }

        if let (Some(game), Some(ev)) = (self.game.as_mut(), events::translate(&event)) {
            game.events_mut().push(ev);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until it is closed or a fatal error occurs.
pub fn run(config: DemoConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| anyhow!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("Event loop error: {e:?}"))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
