pub mod camera;
pub mod config;
pub mod frame;
pub mod image;
pub mod mesh;

pub use camera::{CameraController, CameraState, Movement};
