//! Canvas 2D rendering module
//!
//! Draws the board from the simulation state once per animation frame.

pub mod canvas;

pub use canvas::CanvasRenderer;
