//! Orrery - animated solar system with shooting stars

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use orrery::config::AppConfig;
use orrery::input::{InputAction, InputMapper, VirtualPointer};
use orrery::scene::Scene;
use orrery::systems::{FrameInput, RenderError, RenderSystem, SimulationSystem, WindowSystem};

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    simulation: SimulationSystem,
    texture_paths: Vec<std::path::PathBuf>,
    pointer: VirtualPointer,
    quit_requested: bool,
    /// Startup failure, reported after the loop exits
    error: Option<Box<dyn std::error::Error>>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let scene = Scene::from_config(&config.scene)?;
        let texture_paths = scene.texture_paths.clone();
        let simulation = SimulationSystem::from_config(&config, scene);

        Ok(Self {
            config,
            window: None,
            render: None,
            simulation,
            texture_paths,
            pointer: VirtualPointer::default(),
            quit_requested: false,
            error: None,
        })
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn std::error::Error>) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => {
                self.quit_requested = true;
            }
            InputAction::ReleaseCursor => {
                if let Some(window) = &mut self.window {
                    window.release_cursor();
                }
            }
            InputAction::CaptureCursor => {
                if let Some(window) = &mut self.window {
                    window.capture_cursor();
                }
            }
            InputAction::ResetCamera => {
                self.simulation.reset_camera();
                log::info!("Camera reset to starting position");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render)) = (&self.window, &mut self.render) else {
            return;
        };

        let input = FrameInput {
            pointer: self.pointer.position(),
            aspect: render.aspect_ratio(),
            look_enabled: window.is_cursor_captured(),
            quit_requested: self.quit_requested,
        };
        let frame = self.simulation.update(input);

        if let Some(resync) = frame.resync {
            self.pointer.apply(resync);
            window.apply_resync(resync);
        }

        match render.render_frame(&frame.draws) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => log::warn!("Surface lost, frame skipped"),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        if frame.quit {
            log::info!("Quit requested");
            event_loop.exit();
            return;
        }

        let camera = self.simulation.camera();
        window.update_title(camera.eye, camera.yaw(), camera.pitch());
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => return self.abort(event_loop, Box::new(e)),
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            &self.config.rendering,
            &self.texture_paths,
            self.config.window.vsync,
        ) {
            Ok(render) => render,
            Err(e) => return self.abort(event_loop, Box::new(e)),
        };

        if self.config.window.capture_cursor {
            window.capture_cursor();
        }
        self.simulation.reset_pointer(self.pointer.position());
        window.request_redraw();

        self.window = Some(window);
        self.render = Some(render);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
            }

            WindowEvent::Focused(false) => {
                self.simulation.controller_mut().clear_intents();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let captured = self.window.as_ref().is_some_and(|w| w.is_cursor_captured());
                    if let Some(action) = InputMapper::map_keyboard(key, event.state, captured) {
                        self.handle_action(action);
                    }
                    // Pass to controller for movement keys
                    self.simulation.controller_mut().process_keyboard(key, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let captured = self.window.as_ref().is_some_and(|w| w.is_cursor_captured());
                if let Some(action) = InputMapper::map_mouse_button(button, state, captured) {
                    self.handle_action(action);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.pointer.accumulate(delta.0, delta.1);
        }
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::load() {
        Ok(config) => {
            init_logging(&config.debug.log_level);
            config
        }
        Err(e) => {
            let config = AppConfig::default();
            init_logging(&config.debug.log_level);
            log::warn!("{}. Using defaults.", e);
            config
        }
    };
    log::info!("Starting Orrery");

    let mut app = App::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("orrery: {}", e);
        std::process::exit(1);
    }
}
