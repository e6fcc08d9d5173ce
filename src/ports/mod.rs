//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the generator and whatever
//! actually touches pixels or probes the host. Implementations live in
//! `src/adapters/`.

pub mod image_backend;

pub use image_backend::{ImageBackend, RenderRequest, ToolProbe};
