//! Trellis Render — renderer shell around the reconciliation engine and router
//!
//! Wires an async layout collaborator and a drawing collaborator to the core:
//! every pass lays out the model, rebuilds the parent index, reconciles against
//! the previous scene and forwards the partitions. Dragging a node re-routes the
//! edges touching it.

pub mod config;
pub mod draw;
pub mod error;
pub mod layout;
pub mod renderer;


pub use config::{LayoutConfig, RenderConfig};
pub use draw::{DrawSink, LogSink, RecordingSink};
pub use error::ConfigError;
pub use layout::{LayoutEngine, PassthroughLayout, StackLayout};
pub use renderer::Renderer;
