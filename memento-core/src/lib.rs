//! # Memento Core
//!
//! State model for a story-style overlay editor: an ordered list of freely
//! transformable text and image overlays atop a base image, owned and mutated
//! by a single [`Controller`]. Everything visual (drawing, gesture detection,
//! rasterization) lives outside this crate; it consumes snapshots and calls
//! back into controller operations.

pub mod color;
pub mod controller;
pub mod element;
pub mod id;
pub mod save;
pub mod transform;

pub use controller::{Controller, SessionFlags, Snapshot};
pub use element::{Element, ElementKind, ImageContent, Payload};
pub use id::ElementId;
pub use transform::Placement;
