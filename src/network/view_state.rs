use eframe::egui::{Vec2, vec2};

use super::encoding::{link_arc, node_radius};
use super::graph::{GraphThresholds, IndexedGraph, compute_graph};
use super::labels::LabelDensity;
use super::physics::{ForceLayout, ForceSimulation, SimulationParams};
use super::visual::{InteractionState, RenderInstructions, compute_visual_state};
use crate::bib::{EntryStore, KeywordFrequencies, TagField};
use crate::selectors::SelectorService;

const DRAG_ALPHA_TARGET: f32 = 0.3;
const MIN_SCALE: f32 = 0.05;
const MAX_SCALE: f32 = 8.0;
const HIT_SLOP: f32 = 2.0;
const ARC_SEGMENTS: usize = 12;

/// Screen-space transform of the whole drawing; the simulation never sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ZoomTransform {
    pub fn apply(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.translate
    }

    pub fn invert(&self, view: Vec2) -> Vec2 {
        (view - self.translate) / self.scale
    }

    /// Scales around `anchor` (view coordinates), keeping it in place.
    pub fn zoom_at(&mut self, anchor: Vec2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = self.invert(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.translate = anchor - world * self.scale;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }
}

/// One network drawing surface with its graph and simulation.
pub struct ViewState<S: ForceSimulation = ForceLayout> {
    params: SimulationParams,
    density: LabelDensity,
    size: Vec2,
    hidden: bool,
    graph: Option<IndexedGraph>,
    simulation: Option<S>,
    interaction: InteractionState,
    transform: ZoomTransform,
    revision: u64,
}

impl<S: ForceSimulation> ViewState<S> {
    pub fn new(params: SimulationParams, density: LabelDensity, size: Vec2) -> Self {
        Self {
            params,
            density,
            size,
            hidden: false,
            graph: None,
            simulation: None,
            interaction: InteractionState::default(),
            transform: ZoomTransform::default(),
            revision: 0,
        }
    }

    /// Replaces graph and simulation with ones derived from the filtered
    /// entries. Nothing of the previous simulation survives.
    pub fn rebuild(
        &mut self,
        store: &EntryStore,
        frequencies: &KeywordFrequencies,
        thresholds: GraphThresholds,
        hidden: bool,
    ) {
        self.revision = self.revision.wrapping_add(1);
        self.simulation = None;
        self.graph = None;
        self.interaction = InteractionState::default();
        self.hidden = hidden;

        if hidden {
            tracing::debug!(revision = self.revision, "network hidden");
            return;
        }

        let graph = IndexedGraph::new(compute_graph(
            store.filtered_keywords(),
            frequencies,
            thresholds,
        ));
        let params = SimulationParams {
            center: self.size * 0.5,
            ..self.params
        };
        self.simulation = Some(S::from_graph(&graph, params));
        self.graph = Some(graph);
    }

    pub fn set_params(&mut self, params: SimulationParams, density: LabelDensity) {
        self.params = params;
        self.density = density;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        if size == self.size {
            return;
        }
        self.size = size;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_center(size * 0.5);
            simulation.restart();
        }
    }

    pub fn graph(&self) -> Option<&IndexedGraph> {
        self.graph.as_ref()
    }

    pub fn positions(&self) -> &[Vec2] {
        self.simulation
            .as_ref()
            .map(|simulation| simulation.positions())
            .unwrap_or(&[])
    }

    /// Advances the layout; `true` while it still moves.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(simulation) = self.simulation.as_mut() else {
            return false;
        };
        simulation.step(dt);
        !simulation.is_settled()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn transform(&self) -> &ZoomTransform {
        &self.transform
    }

    pub fn zoom_at(&mut self, anchor: Vec2, factor: f32) {
        self.transform.zoom_at(anchor, factor);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.transform.pan_by(delta);
    }

    fn node_count(&self) -> usize {
        self.graph.as_ref().map_or(0, IndexedGraph::node_count)
    }

    pub fn hover_node(&mut self, index: Option<usize>) {
        self.interaction.hovered_node = index.filter(|&index| index < self.node_count());
    }

    pub fn hover_link(&mut self, index: Option<usize>) {
        let link_count = self.graph.as_ref().map_or(0, IndexedGraph::link_count);
        self.interaction.hovered_link = index.filter(|&index| index < link_count);
    }

    pub fn drag_start(&mut self, index: usize) {
        if index >= self.node_count() {
            return;
        }
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };
        let position = simulation.positions()[index];
        simulation.set_alpha_target(DRAG_ALPHA_TARGET);
        simulation.restart();
        simulation.pin(index, position);
        self.interaction.dragged_node = Some(index);
    }

    /// Moves a dragged node to `world`.
    pub fn drag_to(&mut self, index: usize, world: Vec2) {
        let finite = world.x.is_finite() && world.y.is_finite();
        if self.interaction.dragged_node != Some(index) || !finite {
            return;
        }
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.pin(index, world);
        }
    }

    pub fn drag_end(&mut self, index: usize) {
        if self.interaction.dragged_node != Some(index) {
            return;
        }
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_alpha_target(0.0);
            simulation.unpin(index);
        }
        self.interaction.dragged_node = None;
    }

    /// Toggles the keyword selector of the clicked node.
    pub fn click_node(&self, index: usize, selectors: &mut impl SelectorService) {
        if let Some(node) = self.graph.as_ref().and_then(|graph| graph.node(index)) {
            selectors.toggle_selector(TagField::Keywords.key(), &node.id);
        }
    }

    pub fn render_instructions(&self) -> RenderInstructions {
        match &self.graph {
            Some(graph) => compute_visual_state(graph, &self.interaction, &self.density),
            None => RenderInstructions::default(),
        }
    }

    /// Nearest visible node whose disc contains `world`.
    pub fn node_at(&self, world: Vec2, instructions: &RenderInstructions) -> Option<usize> {
        let graph = self.graph.as_ref()?;
        self.positions()
            .iter()
            .enumerate()
            .filter(|(index, _)| instructions.nodes.get(*index).is_some_and(|node| node.visible))
            .filter_map(|(index, position)| {
                let radius = graph.node(index).map_or(0.0, |node| node_radius(node.frequency));
                let distance = (*position - world).length();
                (distance <= radius + HIT_SLOP).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Nearest visible link whose arc passes within `tolerance` of `world`.
    pub fn link_at(
        &self,
        world: Vec2,
        tolerance: f32,
        instructions: &RenderInstructions,
    ) -> Option<usize> {
        let graph = self.graph.as_ref()?;
        let positions = self.positions();
        graph
            .endpoints
            .iter()
            .enumerate()
            .filter(|(index, _)| instructions.links.get(*index).is_some_and(|link| link.visible))
            .filter_map(|(index, &(source, target))| {
                let arc = link_arc(*positions.get(source)?, *positions.get(target)?, ARC_SEGMENTS);
                let distance = arc
                    .windows(2)
                    .map(|segment| distance_to_segment(world, segment[0], segment[1]))
                    .fold(f32::INFINITY, f32::min);
                let reach = tolerance + instructions.links[index].style.width * 0.5;
                (distance <= reach).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let span = end - start;
    let length_sq = span.length_sq();
    if length_sq <= f32::EPSILON {
        return (point - start).length();
    }
    let t = ((point - start).dot(span) / length_sq).clamp(0.0, 1.0);
    (point - (start + span * t)).length()
}

impl Default for ViewState<ForceLayout> {
    fn default() -> Self {
        Self::new(
            SimulationParams::default(),
            LabelDensity::default(),
            vec2(800.0, 600.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::bib::Entry;
    use crate::selectors::Selectors;
    use crate::tags::keyword_frequencies;

    fn store() -> EntryStore {
        let entry = |id: &str, keywords: &[&str]| Entry {
            id: id.to_owned(),
            keywords: keywords.iter().map(|value| (*value).to_owned()).collect(),
            authors: Vec::new(),
            fields: BTreeMap::new(),
        };
        EntryStore::new([entry("doc1", &["A", "B"]), entry("doc2", &["A", "C"])])
    }

    fn thresholds(min_edge_weight: f64) -> GraphThresholds {
        GraphThresholds {
            min_keyword_frequency: 1,
            min_edge_weight,
        }
    }

    fn built(min_edge_weight: f64) -> ViewState {
        let store = store();
        let mut view = ViewState::default();
        view.rebuild(&store, &keyword_frequencies(&store), thresholds(min_edge_weight), false);
        view
    }

    #[test]
    fn rebuild_binds_graph_and_simulation() {
        let view = built(0.1);
        let graph = view.graph().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.link_count(), 2);
        assert_eq!(view.positions().len(), 3);
        assert_eq!(view.revision(), 1);
    }

    #[test]
    fn hidden_rebuild_drops_everything() {
        let store = store();
        let mut view = built(0.1);
        view.hover_node(Some(0));
        view.rebuild(&store, &keyword_frequencies(&store), thresholds(0.1), true);
        assert!(view.is_hidden());
        assert!(view.graph().is_none());
        assert!(view.positions().is_empty());
        assert!(!view.tick(1.0));
        assert_eq!(view.interaction(), &InteractionState::default());
        assert!(view.render_instructions().nodes.is_empty());
    }

    #[test]
    fn hovering_a_keeps_its_neighbors() {
        let mut view = built(0.1);
        view.hover_node(Some(0));
        let instructions = view.render_instructions();
        assert_eq!(instructions.visible_node_count(), 3);
        assert_eq!(instructions.visible_link_count(), 2);

        view.hover_node(None);
        assert_eq!(view.interaction().hovered_node, None);
    }

    #[test]
    fn drag_pins_and_releases() {
        let mut view = built(0.1);
        view.drag_start(1);
        view.drag_to(1, vec2(42.0, 24.0));
        for _ in 0..30 {
            view.tick(1.0 / 60.0);
        }
        assert_eq!(view.positions()[1], vec2(42.0, 24.0));
        assert!(view.render_instructions().nodes[1].highlighted);

        view.drag_end(1);
        assert_eq!(view.interaction().dragged_node, None);
        for _ in 0..600 {
            if !view.tick(1.0 / 60.0) {
                break;
            }
        }
        assert!(!view.tick(1.0 / 60.0));
    }

    #[test]
    fn drag_of_other_node_is_ignored() {
        let mut view = built(0.1);
        view.drag_start(0);
        view.drag_to(2, vec2(1.0, 1.0));
        view.drag_end(2);
        assert_eq!(view.interaction().dragged_node, Some(0));
    }

    #[test]
    fn drag_to_non_finite_point_keeps_pin() {
        let mut view = built(0.1);
        view.drag_start(1);
        view.drag_to(1, vec2(42.0, 24.0));
        view.drag_to(1, vec2(f32::NAN, 0.0));
        view.drag_to(1, vec2(0.0, f32::INFINITY));
        view.tick(1.0 / 60.0);
        assert_eq!(view.positions()[1], vec2(42.0, 24.0));
    }

    #[test]
    fn click_toggles_keyword_selector() {
        let view = built(0.1);
        let mut selectors = Selectors::default();
        view.click_node(2, &mut selectors);
        assert!(selectors.is_active(TagField::Keywords, "C"));
        view.click_node(99, &mut selectors);
        assert_eq!(selectors.active().len(), 1);
    }

    #[test]
    fn hit_testing_finds_nodes_and_links() {
        let mut view = built(0.1);
        for _ in 0..400 {
            view.tick(1.0 / 60.0);
        }
        let instructions = view.render_instructions();
        let positions = view.positions().to_vec();
        assert_eq!(view.node_at(positions[2], &instructions), Some(2));
        assert_eq!(view.node_at(vec2(-1e4, -1e4), &instructions), None);

        let arc = link_arc(positions[0], positions[1], ARC_SEGMENTS);
        assert_eq!(view.link_at(arc[ARC_SEGMENTS / 2], 1.0, &instructions), Some(0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut transform = ZoomTransform::default();
        transform.pan_by(vec2(10.0, 5.0));
        let anchor = vec2(100.0, 80.0);
        let before = transform.invert(anchor);
        transform.zoom_at(anchor, 2.0);
        assert_eq!(transform.scale, 2.0);
        assert!((transform.invert(anchor) - before).length() < 1e-4);
        assert!((transform.apply(before) - anchor).length() < 1e-3);
    }

    #[test]
    fn resize_recenters_layout() {
        let mut view = built(0.1);
        view.set_size(vec2(2000.0, 1000.0));
        for _ in 0..2_000 {
            if !view.tick(1.0 / 60.0) {
                break;
            }
        }
        let centroid = view.positions().iter().fold(Vec2::ZERO, |sum, p| sum + *p) / 3.0;
        assert!((centroid - vec2(1000.0, 500.0)).length() < 50.0);
    }
}
