//! Rendering module
//!
//! `draw` builds backend-independent 2D draw commands from the simulation;
//! `canvas` replays them on a browser canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use draw::{AssetStatus, Color, DrawCommand, Sprite, render};
