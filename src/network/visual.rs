use eframe::egui::Color32;

use super::encoding::{
    DEFAULT_NODE_COLOR, HIGHLIGHTED_NODE_COLOR, LinkStyle, NEIGHBOR_NODE_COLOR, link_style,
    node_radius,
};
use super::graph::IndexedGraph;
use super::labels::LabelDensity;

/// Pointer state of the network view, by node/link index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub hovered_node: Option<usize>,
    pub hovered_link: Option<usize>,
    pub dragged_node: Option<usize>,
}

impl InteractionState {
    /// Node whose neighborhood is isolated; a drag keeps focus while the
    /// pointer lags behind the node.
    pub fn focus(&self) -> Option<usize> {
        self.hovered_node.or(self.dragged_node)
    }

    fn is_highlighted(&self, index: usize) -> bool {
        self.hovered_node == Some(index) || self.dragged_node == Some(index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeFill {
    Default,
    Focused,
    /// Linked from the focused node, which is the link's source.
    Neighbor,
}

impl NodeFill {
    pub fn color(self) -> Color32 {
        match self {
            Self::Default => DEFAULT_NODE_COLOR,
            Self::Focused => HIGHLIGHTED_NODE_COLOR,
            Self::Neighbor => NEIGHBOR_NODE_COLOR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeInstruction {
    pub visible: bool,
    pub fill: NodeFill,
    pub radius: f32,
    pub label_visible: bool,
    pub label_bold: bool,
    pub highlighted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkInstruction {
    pub visible: bool,
    pub style: LinkStyle,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderInstructions {
    pub nodes: Vec<NodeInstruction>,
    pub links: Vec<LinkInstruction>,
    /// Node indices back to front.
    pub draw_order: Vec<usize>,
    pub label_threshold: f64,
}

impl RenderInstructions {
    pub fn visible_node_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.visible).count()
    }

    pub fn visible_link_count(&self) -> usize {
        self.links.iter().filter(|link| link.visible).count()
    }

    pub fn labeled_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.visible && node.label_visible)
            .map(|(index, _)| index)
    }
}

/// Maps graph scores and pointer state to what should be drawn.
pub fn compute_visual_state(
    graph: &IndexedGraph,
    interaction: &InteractionState,
    density: &LabelDensity,
) -> RenderInstructions {
    let node_count = graph.node_count();
    let focus = interaction.focus().filter(|&index| index < node_count);

    let mut visible = vec![focus.is_none(); node_count];
    let mut fills = vec![NodeFill::Default; node_count];
    let mut link_visible = vec![focus.is_none(); graph.endpoints.len()];

    if let Some(focus) = focus {
        visible[focus] = true;
        fills[focus] = NodeFill::Focused;
        for &link_index in &graph.adjacent_links[focus] {
            let (source, target) = graph.endpoints[link_index];
            link_visible[link_index] = true;
            if source == focus {
                visible[target] = true;
                fills[target] = NodeFill::Neighbor;
            } else {
                visible[source] = true;
            }
        }
    }

    let visible_importance = graph
        .graph
        .nodes
        .iter()
        .zip(&visible)
        .filter(|(_, shown)| **shown)
        .map(|(node, _)| node.relative_importance);
    let label_threshold = density.threshold(visible_importance, node_count);

    let nodes = graph
        .graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let highlighted = interaction.is_highlighted(index);
            NodeInstruction {
                visible: visible[index],
                fill: fills[index],
                radius: node_radius(node.frequency),
                label_visible: highlighted || node.relative_importance > label_threshold,
                label_bold: highlighted,
                highlighted,
            }
        })
        .collect::<Vec<_>>();

    let links = graph
        .endpoints
        .iter()
        .zip(&graph.graph.links)
        .enumerate()
        .map(|(index, (&(source, target), link))| {
            let shown = link_visible[index];
            let hovered = shown && interaction.hovered_link == Some(index);
            LinkInstruction {
                visible: shown,
                style: link_style(link, nodes[source].radius, nodes[target].radius, hovered),
            }
        })
        .collect::<Vec<_>>();

    let mut draw_order = Vec::with_capacity(node_count);
    draw_order.extend((0..node_count).filter(|&index| !nodes[index].label_visible));
    draw_order.extend(
        (0..node_count).filter(|&index| nodes[index].label_visible && !nodes[index].highlighted),
    );
    draw_order.extend((0..node_count).filter(|&index| nodes[index].highlighted));

    RenderInstructions {
        nodes,
        links,
        draw_order,
        label_threshold,
    }
}
