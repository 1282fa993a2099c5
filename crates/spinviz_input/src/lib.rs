//! Input translation for the spin-field viewer
//!
//! This crate turns raw pointer and wheel input into orbit/pan/zoom commands
//! on any camera implementing [`CameraControl`]. It owns no window or event
//! registration; the host forwards winit events to [`CameraController`].

mod camera_controller;

pub use camera_controller::{CameraController, CameraControl};
