//! Build dependency graph rendering and interaction.
//!
//! Decorates the layout engine's generated SVG with interactive semantics:
//! - Status and focus classes on nodes and edges
//! - Hover cross-highlighting between a node and its incident edges
//! - Step status glyphs chained inside stage and service nodes
//! - Link interception re-emitted as interaction events over the port
//!   bridge instead of native navigation
//! - Pan, zoom, and recenter handling that stays put on polling refreshes
//!
//! The decoration, viewport, and redraw-coordination policies are pure
//! modules; `dom.rs` is the only file that touches the live SVG.

mod bridge;
mod component;
mod decorate;
mod descriptor;
mod dom;
mod icons;
mod layout;
mod renderer;
mod state;
mod types;
mod viewport;

pub use bridge::GraphPorts;
pub use component::BuildGraphViewer;
pub use renderer::{GraphRenderer, InteractionSink};
pub use types::{GraphRenderRequest, InteractionEvent, NodeStatus};
