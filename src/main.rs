//! spinviz - Spin Field Viewer
//!
//! Renders a field of oriented arrow glyphs with an orbit/pan/zoom camera.

mod config;
mod input;
mod options;
mod scene;
mod systems;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use spinviz_input::CameraController;
use spinviz_render::Colormap;

use config::AppConfig;
use input::{InputAction, InputMapper};
use options::OptionsPatch;
use scene::SpinLattice;
use systems::{RenderSystem, WindowSystem};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    /// None when rendering is disabled (init failed or not yet resumed)
    render_system: Option<RenderSystem>,
    /// A context failure is reported once; no re-init attempts afterwards
    render_disabled: bool,
    controller: CameraController,
    /// Spin count shown in the title
    spin_count: usize,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let controller = CameraController::new(config.camera.allow_movement);
        Self {
            config,
            window: None,
            render_system: None,
            render_disabled: false,
            controller,
            spin_count: 0,
        }
    }

    fn update_title(&self) {
        if let (Some(window), Some(rs)) = (&self.window, &self.render_system) {
            window.update_title(self.spin_count, &rs.options().colormap);
        }
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => {
                if let Some(rs) = &mut self.render_system {
                    rs.reset_camera();
                    log::info!("Camera reset");
                }
                self.request_redraw();
            }
            InputAction::CycleColormap => {
                if let Some(rs) = &mut self.render_system {
                    let current = Colormap::from_name(&rs.options().colormap);
                    let index = current
                        .and_then(|c| Colormap::ALL.iter().position(|&v| v == c))
                        .unwrap_or(Colormap::ALL.len() - 1);
                    let next = Colormap::ALL[(index + 1) % Colormap::ALL.len()];
                    rs.update_options(&OptionsPatch {
                        colormap: Some(next.name().to_string()),
                        ..OptionsPatch::default()
                    });
                    log::info!("Colormap: {}", rs.options().colormap);
                }
                self.update_title();
                self.request_redraw();
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.render_disabled {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        match RenderSystem::new(
            window.window().clone(),
            self.config.view_options(),
            self.config.window.vsync,
        ) {
            Ok(mut rs) => {
                let lattice = SpinLattice::vortex(&self.config.lattice);
                rs.update_instances(&lattice.positions, &lattice.directions);
                self.spin_count = lattice.len();
                log::info!("Spin field: {} sites", lattice.len());
                self.render_system = Some(rs);
            }
            Err(e) => {
                // Rendering stays disabled; the window remains open.
                log::error!("Rendering disabled: {}", e);
                self.render_disabled = true;
            }
        }

        self.controller
            .set_allow_movement(self.config.camera.allow_movement);
        self.window = Some(window);
        self.update_title();
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(rs) = &mut self.render_system {
                    rs.resize(physical_size.width, physical_size.height);
                }
                self.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.controller.process_modifiers(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(rs) = &mut self.render_system {
                    if self
                        .controller
                        .process_cursor_moved(position.x, position.y, rs.camera_mut())
                    {
                        self.request_redraw();
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(rs) = &mut self.render_system {
                    if self.controller.process_scroll(delta, rs.camera_mut()) {
                        self.request_redraw();
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(rs) = &mut self.render_system else {
                    return;
                };
                match rs.render_frame() {
                    Ok(()) => {}
                    Err(systems::RenderError::SurfaceLost) => {
                        let (width, height) = rs.size();
                        rs.resize(width, height);
                        self.request_redraw();
                    }
                    Err(systems::RenderError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                    }
                }
            }

            _ => {}
        }
    }
}

fn main() {
    // Initialize logging
    env_logger::init();
    log::info!("Starting spinviz");

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    // Redraws are driven by input and option changes, not a frame clock.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod integration_tests {
    use super::config::AppConfig;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("SPINVIZ_WINDOW__TITLE", "Test From Env");
        let config = AppConfig::load().unwrap();
        std::env::remove_var("SPINVIZ_WINDOW__TITLE");
        assert_eq!(config.window.title, "Test From Env");
    }

    #[test]
    #[serial]
    fn test_load_without_env_uses_files_or_defaults() {
        std::env::remove_var("SPINVIZ_WINDOW__TITLE");
        let config = AppConfig::load().unwrap();
        assert!(!config.window.title.is_empty());
        assert!(config.glyph.level_of_detail >= 3);
    }

    #[test]
    #[serial]
    fn test_env_overrides_numeric_section_key() {
        std::env::set_var("SPINVIZ_GLYPH__LEVEL_OF_DETAIL", "32");
        let config = AppConfig::load().unwrap();
        std::env::remove_var("SPINVIZ_GLYPH__LEVEL_OF_DETAIL");
        assert_eq!(config.glyph.level_of_detail, 32);
    }
}
