//! Rendering adapter: renderer-agnostic interface over rockfall effects.
//!
//! # Invariants
//! - Renderers read effect state; they never mutate it.
//! - GPU uploads are driven by the effect's dirty flags, not by polling.

mod renderer;
mod upload;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use upload::{AttributeUpload, attribute_uploads};
