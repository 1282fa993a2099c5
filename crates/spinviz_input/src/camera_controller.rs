//! Camera controller for drag-based orbit/pan/zoom input
//!
//! Controls:
//! - Drag: orbit around the view center
//! - Shift + drag: zoom (vertical motion)
//! - Alt + drag: pan the view center
//! - Mouse wheel: zoom, one step per notch

use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::ModifiersState;

/// Camera operations driven by translated input.
///
/// Implemented by the renderer's camera; the controller only knows this
/// interface. Deltas are in pixels of pointer motion, zoom steps in [-1, 1].
pub trait CameraControl {
    fn orbit(&mut self, delta_x: f32, delta_y: f32);
    fn pan(&mut self, delta_x: f32, delta_y: f32);
    fn zoom(&mut self, delta: f32);
}

/// Translates pointer/wheel events into camera commands
///
/// Holds the drag state and the current modifier set. All camera movement is
/// gated on `allow_movement`; when disabled, every handler is a no-op.
pub struct CameraController {
    allow_movement: bool,
    dragging: bool,
    last_position: Option<(f64, f64)>,
    modifiers: ModifiersState,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CameraController {
    pub fn new(allow_movement: bool) -> Self {
        Self {
            allow_movement,
            dragging: false,
            last_position: None,
            modifiers: ModifiersState::empty(),
        }
    }

    /// Enable or disable all camera movement as a unit
    pub fn set_allow_movement(&mut self, allow: bool) {
        self.allow_movement = allow;
        if !allow {
            self.dragging = false;
        }
    }

    pub fn allow_movement(&self) -> bool {
        self.allow_movement
    }

    /// Track the current keyboard modifier set
    pub fn process_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Process a mouse button press/release
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        if state == ElementState::Pressed {
            if self.allow_movement {
                self.dragging = true;
            }
        } else {
            self.dragging = false;
        }
    }

    /// Process a pointer move, issuing the camera command the modifier set
    /// selects: shift zooms, alt pans, unmodified drags orbit.
    ///
    /// Returns true if a camera command was issued (the host should redraw).
    pub fn process_cursor_moved(
        &mut self,
        x: f64,
        y: f64,
        camera: &mut impl CameraControl,
    ) -> bool {
        let last = self.last_position.replace((x, y));
        if !self.allow_movement || !self.dragging {
            return false;
        }
        let Some((last_x, last_y)) = last else {
            return false;
        };

        let delta_x = (x - last_x) as f32;
        let delta_y = (y - last_y) as f32;
        if delta_x == 0.0 && delta_y == 0.0 {
            return false;
        }

        if self.modifiers.shift_key() {
            camera.zoom(if delta_y > 0.0 { 1.0 } else { -1.0 });
        } else if self.modifiers.alt_key() {
            camera.pan(delta_x, delta_y);
        } else {
            camera.orbit(delta_x, delta_y);
        }
        true
    }

    /// Process a wheel event as a zoom step.
    ///
    /// The raw delta is clamped to one step per event regardless of how the
    /// platform scales wheel motion.
    ///
    /// Returns true if a camera command was issued.
    pub fn process_scroll(
        &mut self,
        delta: MouseScrollDelta,
        camera: &mut impl CameraControl,
    ) -> bool {
        if !self.allow_movement {
            return false;
        }
        let raw = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
        };
        if raw == 0.0 {
            return false;
        }
        camera.zoom(raw.clamp(-1.0, 1.0));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the last command for assertions
    #[derive(Default)]
    struct RecordingCamera {
        orbits: Vec<(f32, f32)>,
        pans: Vec<(f32, f32)>,
        zooms: Vec<f32>,
    }

    impl CameraControl for RecordingCamera {
        fn orbit(&mut self, dx: f32, dy: f32) {
            self.orbits.push((dx, dy));
        }
        fn pan(&mut self, dx: f32, dy: f32) {
            self.pans.push((dx, dy));
        }
        fn zoom(&mut self, delta: f32) {
            self.zooms.push(delta);
        }
    }

    fn press(controller: &mut CameraController) {
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
    }

    #[test]
    fn test_drag_orbits() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        press(&mut controller);
        controller.process_cursor_moved(10.0, 10.0, &mut camera);
        let issued = controller.process_cursor_moved(15.0, 7.0, &mut camera);

        assert!(issued);
        assert_eq!(camera.orbits, vec![(5.0, -3.0)]);
        assert!(camera.pans.is_empty());
    }

    #[test]
    fn test_shift_drag_zooms() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        controller.process_modifiers(ModifiersState::SHIFT);
        press(&mut controller);
        controller.process_cursor_moved(0.0, 0.0, &mut camera);
        controller.process_cursor_moved(0.0, 12.0, &mut camera);
        controller.process_cursor_moved(0.0, 4.0, &mut camera);

        // Downward motion zooms out (+1), upward zooms in (-1).
        assert_eq!(camera.zooms, vec![1.0, -1.0]);
        assert!(camera.orbits.is_empty());
    }

    #[test]
    fn test_alt_drag_pans() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        controller.process_modifiers(ModifiersState::ALT);
        press(&mut controller);
        controller.process_cursor_moved(0.0, 0.0, &mut camera);
        controller.process_cursor_moved(-3.0, 2.0, &mut camera);

        assert_eq!(camera.pans, vec![(-3.0, 2.0)]);
    }

    #[test]
    fn test_no_drag_without_press() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        controller.process_cursor_moved(0.0, 0.0, &mut camera);
        let issued = controller.process_cursor_moved(50.0, 50.0, &mut camera);

        assert!(!issued);
        assert!(camera.orbits.is_empty());
    }

    #[test]
    fn test_release_stops_drag() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        press(&mut controller);
        controller.process_cursor_moved(0.0, 0.0, &mut camera);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        controller.process_cursor_moved(9.0, 9.0, &mut camera);

        assert!(camera.orbits.is_empty());
    }

    #[test]
    fn test_movement_disabled_gates_everything() {
        let mut controller = CameraController::new(false);
        let mut camera = RecordingCamera::default();

        press(&mut controller);
        controller.process_cursor_moved(0.0, 0.0, &mut camera);
        controller.process_cursor_moved(5.0, 5.0, &mut camera);
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0), &mut camera);

        assert!(camera.orbits.is_empty());
        assert!(camera.zooms.is_empty());
    }

    #[test]
    fn test_scroll_clamps_to_one_step() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 3.0), &mut camera);
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, -7.5), &mut camera);

        assert_eq!(camera.zooms, vec![1.0, -1.0]);
    }

    #[test]
    fn test_pixel_scroll_scaled() {
        let mut controller = CameraController::new(true);
        let mut camera = RecordingCamera::default();

        let delta = MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 50.0));
        controller.process_scroll(delta, &mut camera);

        assert_eq!(camera.zooms, vec![0.5]);
    }
}
