//! Canvas rendering module
//!
//! Rendering is a pure function from `GameState` to a `DrawList` of 2D
//! primitives; the web platform replays the list on a canvas context.

pub mod draw;
pub mod scene;
pub mod sprites;

pub use draw::{Align, Color, DrawCmd, DrawList};
pub use scene::render;
