//! UI components.

pub mod build_graph;
