use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use motefield::input::{Input, KeyCode};
use motefield::{Engine, FrameHandle, HostError, PixelSurface, Settings, Surface};

use crate::present::Presenter;

const MIN_DENSITY: f32 = 1.0;
const MAX_DENSITY: f32 = 10.0;

/// Desktop window that hosts the backdrop.
pub struct App {
    settings: Settings,
    settings_path: PathBuf,
    engine: Engine<PixelSurface>,
    input: Input,
    frame: Option<FrameHandle>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    error: Option<HostError>,
}

impl App {
    pub fn new(settings: Settings, settings_path: PathBuf, engine: Engine<PixelSurface>) -> Self {
        Self {
            settings,
            settings_path,
            engine,
            input: Input::new(),
            frame: None,
            window: None,
            presenter: None,
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<HostError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: HostError) {
        tracing::error!(error = %error, "host failed");
        self.error = Some(error);
        event_loop.exit();
    }

    fn set_running(&mut self, running: bool) {
        if running {
            self.frame = self.engine.start();
        } else {
            self.engine.stop();
            self.frame = None;
        }
        self.settings.animated_bg = running;
    }

    fn set_density(&mut self, density: f32) {
        let density = density.clamp(MIN_DENSITY, MAX_DENSITY);
        self.engine.set_density(density);
        self.settings.particle_density = density;
        tracing::info!(density, motes = self.engine.field().len(), "density changed");
    }

    fn apply_bindings(&mut self, event_loop: &ActiveEventLoop) {
        let pressed: Vec<KeyCode> = self.input.pressed().collect();
        for key in pressed {
            match key {
                KeyCode::Up => self.set_density(self.engine.density() + 1.0),
                KeyCode::Down => self.set_density(self.engine.density() - 1.0),
                KeyCode::Digit(0) => self.set_density(10.0),
                KeyCode::Digit(d) => self.set_density(d as f32),
                KeyCode::M => {
                    let mode = self.engine.mode().toggled();
                    self.engine.set_mode(mode);
                    self.settings.theme = mode;
                    tracing::info!(?mode, "backdrop mode");
                }
                KeyCode::Space => self.set_running(!self.engine.is_running()),
                KeyCode::S => match self.settings.save(&self.settings_path) {
                    Ok(()) => tracing::info!(path = %self.settings_path.display(), "settings saved"),
                    Err(e) => tracing::error!(error = %e, "could not save settings"),
                },
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Other => {}
            }
        }
        self.input.begin_frame();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_bindings(event_loop);

        if let Some(handle) = self.frame {
            self.engine.frame(handle);
        }

        let (Some(presenter), Some(surface)) = (self.presenter.as_mut(), self.engine.surface()) else {
            return;
        };
        let (width, height) = surface.size();
        match presenter.render(surface.pixels(), width, height) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = presenter.size();
                presenter.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = ?e, "dropped frame"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.engine.size();
        let window_attrs = Window::default_attributes()
            .with_title("motefield")
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let presenter = match pollster::block_on(Presenter::new(window.clone())) {
            Ok(presenter) => presenter,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let size = window.inner_size();
        self.engine.resize(size.width, size.height);
        self.presenter = Some(presenter);
        self.window = Some(window.clone());

        if self.settings.animated_bg {
            self.set_running(true);
        }
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);
        if self.input.pointer_changed() {
            self.engine.set_pointer(self.input.pointer());
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.engine.resize(size.width, size.height);
                    if let Some(presenter) = &mut self.presenter {
                        presenter.resize(size.width, size.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine.stop();
        let clock = self.engine.clock();
        tracing::info!(
            frames = clock.frame(),
            fps = clock.fps(),
            running_secs = clock.elapsed().as_secs_f32(),
            "backdrop closed"
        );
    }
}
