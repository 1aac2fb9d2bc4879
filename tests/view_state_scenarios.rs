//! End-to-end scenarios: entry data through selectors, tag clouds and the
//! network view.

use bibnet::bib::{EntryStore, TagField, store_from_json};
use bibnet::network::{GraphThresholds, NodeFill, ViewState};
use bibnet::selectors::{SelectorService, Selectors};
use bibnet::tags::{build_tag_cloud, keyword_frequencies};

const ENTRIES: &str = r#"const generatedBibEntries = {
    "doc1": {"title": "First", "year": 2020, "keywords": "A, B", "author": "Doe, J. and Roe, R."},
    "doc2": {"title": "Second", "year": 2021, "keywords": "A, C", "author": "Doe, J."}
};"#;

fn store() -> EntryStore {
    store_from_json(ENTRIES).unwrap()
}

fn view(store: &EntryStore, min_edge_weight: f64) -> ViewState {
    let mut view = ViewState::default();
    view.rebuild(
        store,
        &keyword_frequencies(store),
        GraphThresholds {
            min_keyword_frequency: 1,
            min_edge_weight,
        },
        false,
    );
    view
}

#[test]
fn two_documents_link_a_to_b_and_c() {
    let store = store();
    let view = view(&store, 0.1);
    let graph = &view.graph().unwrap().graph;

    let ids = graph.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["A", "B", "C"]);

    let links = graph
        .links
        .iter()
        .map(|link| (link.source.as_str(), link.target.as_str(), link.weight, link.importance))
        .collect::<Vec<_>>();
    assert_eq!(links, vec![("A", "B", 0.5, 0.5), ("A", "C", 0.5, 0.5)]);
}

#[test]
fn high_threshold_drops_every_link() {
    let store = store();
    let view = view(&store, 0.9);
    let graph = view.graph().unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.link_count(), 0);
}

#[test]
fn hovering_a_keeps_b_and_c() {
    let store = store();
    let mut view = view(&store, 0.1);
    view.hover_node(Some(0));

    let instructions = view.render_instructions();
    assert!(instructions.nodes.iter().all(|node| node.visible));
    assert!(instructions.links.iter().all(|link| link.visible));
    assert_eq!(instructions.nodes[0].fill, NodeFill::Focused);
    assert_eq!(instructions.nodes[1].fill, NodeFill::Neighbor);
    assert_eq!(instructions.nodes[2].fill, NodeFill::Neighbor);
    assert!(instructions.nodes[0].label_bold);
    assert_eq!(instructions.draw_order.last(), Some(&0));
}

#[test]
fn hovering_b_hides_c() {
    let store = store();
    let mut view = view(&store, 0.1);
    view.hover_node(Some(1));

    let instructions = view.render_instructions();
    let visible = instructions
        .nodes
        .iter()
        .map(|node| node.visible)
        .collect::<Vec<_>>();
    assert_eq!(visible, vec![true, true, false]);
    assert_eq!(instructions.visible_link_count(), 1);
    // B is the link's target, so A keeps the default fill.
    assert_eq!(instructions.nodes[0].fill, NodeFill::Default);

    view.hover_node(None);
    assert_eq!(view.render_instructions().visible_node_count(), 3);
}

#[test]
fn layout_is_deterministic() {
    let store = store();
    let mut first = view(&store, 0.1);
    let mut second = view(&store, 0.1);
    for _ in 0..120 {
        first.tick(1.0 / 60.0);
        second.tick(1.0 / 60.0);
    }
    assert_eq!(first.positions(), second.positions());
    assert!(
        first
            .positions()
            .iter()
            .all(|position| position.x.is_finite() && position.y.is_finite())
    );
}

#[test]
fn clicking_a_node_narrows_every_view() {
    let mut store = store();
    let mut selectors = Selectors::default();

    let view = view(&store, 0.1);
    view.click_node(1, &mut selectors);
    selectors.apply(&mut store);
    assert_eq!(store.filtered_count(), 1);
    assert!(store.is_filtered("doc1"));

    let cloud = build_tag_cloud(&store, TagField::Keywords, &selectors, 1);
    let labels = cloud.categories[0]
        .tags
        .iter()
        .map(|tag| (tag.label(), tag.active))
        .collect::<Vec<_>>();
    assert_eq!(labels, vec![("A", false), ("B", true)]);

    let narrowed = self::view(&store, 0.1);
    let graph = narrowed.graph().unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.link_count(), 1);

    selectors.toggle_selector("keywords", "B");
    selectors.apply(&mut store);
    assert_eq!(store.filtered_count(), 2);
}

#[test]
fn authors_are_split_per_entry() {
    let store = store();
    let cloud = build_tag_cloud(&store, TagField::Authors, &Selectors::default(), 1);
    let authors = cloud.categories[0]
        .tags
        .iter()
        .map(|tag| (tag.id.as_str(), tag.frequency))
        .collect::<Vec<_>>();
    assert_eq!(authors, vec![("Doe, J.", 2), ("Roe, R.", 1)]);
}
