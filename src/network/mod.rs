//! Keyword co-occurrence network and the state its view paints.

pub mod encoding;
pub mod graph;
pub mod labels;
pub mod physics;
pub mod view_state;
pub mod visual;

pub use encoding::{DashPattern, LinkStyle, label_offset, link_arc, link_style, node_radius};
pub use graph::{
    GraphThresholds, IndexedGraph, KeywordGraph, KeywordLink, KeywordNode, compute_graph,
};
pub use labels::LabelDensity;
pub use physics::{ForceLayout, ForceSimulation, SimulationParams, link_strength};
pub use view_state::{ViewState, ZoomTransform};
pub use visual::{
    InteractionState, LinkInstruction, NodeFill, NodeInstruction, RenderInstructions,
    compute_visual_state,
};
