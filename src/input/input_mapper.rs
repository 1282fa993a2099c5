//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions like Exit or CycleColormap.
//! Pointer and wheel events are NOT mapped here - they go directly to the
//! CameraController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by special keys (not camera movement)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Reset camera to its configured state (R key)
    ResetCamera,
    /// Switch to the next built-in colormap (C key)
    CycleColormap,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
}

/// Maps raw keyboard events to semantic actions
///
/// Camera movement (drag, wheel) is NOT mapped here - it goes directly to
/// the CameraController. This mapper handles "special" keys only.
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for special keys, `None` otherwise
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyC => Some(InputAction::CycleColormap),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            _ => None,
        }
    }
}
