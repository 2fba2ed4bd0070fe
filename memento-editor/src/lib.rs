//! # Memento Editor
//!
//! The interaction layer around [`memento_core`]: maps raw multi-touch
//! gestures onto controller operations, runs the exclusive text-focus flow,
//! smooths offsets across focus transitions, flattens the composed canvas
//! into a pixel buffer, and emits the render tree a host view layer draws.
//!
//! Hosts supply the collaborators this crate only consumes: a rasterizer for
//! off-screen subtree recording, an image store resolving cache keys, and a
//! stream of pointer events.

pub mod animate;
pub mod capture;
pub mod focus;
pub mod gesture;
pub mod scene;
pub mod store;

pub use capture::{CaptureDriver, CaptureError, CropRect, PixelBuffer};
pub use focus::{FocusFlow, FocusPhase};
pub use gesture::{GestureFrame, GestureMapper};
pub use scene::{scene, RenderNode, RenderPayload};
