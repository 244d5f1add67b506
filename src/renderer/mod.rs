//! Rendering module
//!
//! Frames are rasterized on the CPU (`canvas`, `scene`) and handed to WebGPU
//! only for presentation (`present`).

pub mod canvas;
pub mod present;
pub mod scene;
pub mod vertex;

pub use canvas::FrameBuffer;
pub use present::PresentState;
pub use scene::{CeoSprites, render};
