//! Property tests for the keyword graph and its label selection.
//!
//! Verifies:
//! 1. links are canonical (`source < target`) and unique
//! 2. kept links follow the asymmetric weight formula and the strict threshold
//! 3. link importance is `min/max` of the endpoint frequencies, in (0, 1]
//! 4. nodes are exactly the keywords meeting the minimum frequency
//! 5. relative importance is finite and non-negative
//! 6. identical inputs give identical graphs
//! 7. labels never exceed the adapted count (plus the focused node)

use std::collections::{BTreeSet, HashMap};

use bibnet::bib::KeywordFrequencies;
use bibnet::network::{
    GraphThresholds, IndexedGraph, InteractionState, KeywordGraph, LabelDensity,
    compute_graph, compute_visual_state,
};
use proptest::prelude::*;

fn documents_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::btree_set(0usize..8, 0..6), 0..24).prop_map(
        |documents| {
            documents
                .into_iter()
                .map(|keywords| keywords.into_iter().map(|k| format!("k{k}")).collect())
                .collect()
        },
    )
}

fn frequencies(documents: &[Vec<String>]) -> KeywordFrequencies {
    let mut frequencies = KeywordFrequencies::new();
    for keywords in documents {
        for keyword in keywords {
            *frequencies.entry(keyword.clone()).or_insert(0) += 1;
        }
    }
    frequencies
}

fn co_occurrence(documents: &[Vec<String>], a: &str, b: &str) -> usize {
    documents
        .iter()
        .filter(|keywords| keywords.iter().any(|k| k == a) && keywords.iter().any(|k| k == b))
        .count()
}

fn build(
    documents: &[Vec<String>],
    min_keyword_frequency: usize,
    min_edge_weight: f64,
) -> KeywordGraph {
    compute_graph(
        documents.iter().map(Vec::as_slice),
        &frequencies(documents),
        GraphThresholds {
            min_keyword_frequency,
            min_edge_weight,
        },
    )
}

proptest! {
    #[test]
    fn links_are_canonical_and_unique(
        documents in documents_strategy(),
        min_edge_weight in 0.0f64..1.0,
    ) {
        let graph = build(&documents, 1, min_edge_weight);
        let mut seen = BTreeSet::new();
        for link in &graph.links {
            prop_assert!(link.source < link.target, "{} !< {}", link.source, link.target);
            prop_assert!(seen.insert((link.source.clone(), link.target.clone())));
        }
    }

    #[test]
    fn weights_follow_source_frequency(
        documents in documents_strategy(),
        min_keyword_frequency in 1usize..4,
        min_edge_weight in 0.0f64..1.0,
    ) {
        let table = frequencies(&documents);
        let graph = build(&documents, min_keyword_frequency, min_edge_weight);
        let kept = graph
            .links
            .iter()
            .map(|link| ((link.source.as_str(), link.target.as_str()), link.weight))
            .collect::<HashMap<_, _>>();

        for (a_index, a) in graph.nodes.iter().enumerate() {
            for b in &graph.nodes[a_index + 1..] {
                let expected = co_occurrence(&documents, &a.id, &b.id) as f64 / table[&a.id] as f64;
                match kept.get(&(a.id.as_str(), b.id.as_str())) {
                    Some(weight) => {
                        prop_assert!(*weight > min_edge_weight);
                        prop_assert!((weight - expected).abs() < 1e-12);
                        prop_assert!(*weight <= 1.0);
                    }
                    None => prop_assert!(expected <= min_edge_weight),
                }
            }
        }
    }

    #[test]
    fn importance_is_frequency_ratio(
        documents in documents_strategy(),
        min_edge_weight in 0.0f64..1.0,
    ) {
        let table = frequencies(&documents);
        let graph = build(&documents, 1, min_edge_weight);
        for link in &graph.links {
            let (fa, fb) = (table[&link.source] as f64, table[&link.target] as f64);
            prop_assert!(link.importance > 0.0 && link.importance <= 1.0);
            prop_assert!((link.importance - fa.min(fb) / fa.max(fb)).abs() < 1e-12);
        }
    }

    #[test]
    fn nodes_meet_minimum_frequency(
        documents in documents_strategy(),
        min_keyword_frequency in 0usize..6,
    ) {
        let table = frequencies(&documents);
        let graph = build(&documents, min_keyword_frequency, 0.7);
        let expected = table
            .iter()
            .filter(|&(_, &frequency)| frequency >= min_keyword_frequency.max(1))
            .map(|(keyword, _)| keyword.as_str())
            .collect::<Vec<_>>();
        let ids = graph.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        prop_assert_eq!(ids, expected);
        for link in &graph.links {
            prop_assert!(table[&link.source] >= min_keyword_frequency);
            prop_assert!(table[&link.target] >= min_keyword_frequency);
        }
    }

    #[test]
    fn relative_importance_is_finite(
        documents in documents_strategy(),
        min_edge_weight in 0.0f64..1.0,
    ) {
        let graph = build(&documents, 1, min_edge_weight);
        for node in &graph.nodes {
            prop_assert!(node.relative_importance.is_finite());
            prop_assert!(node.relative_importance >= 0.0);
            prop_assert!(node.relative_importance <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn identical_inputs_give_identical_graphs(
        documents in documents_strategy(),
        min_edge_weight in 0.0f64..1.0,
    ) {
        prop_assert_eq!(
            build(&documents, 1, min_edge_weight),
            build(&documents, 1, min_edge_weight)
        );
    }

    #[test]
    fn labels_stay_within_adapted_count(
        documents in documents_strategy(),
        min_edge_weight in 0.0f64..1.0,
        base_labels in 0usize..8,
        focus in prop::option::of(0usize..8),
    ) {
        let graph = IndexedGraph::new(build(&documents, 1, min_edge_weight));
        let density = LabelDensity { base_labels, min_ratio: 0.2 };
        let interaction = InteractionState {
            hovered_node: focus,
            ..InteractionState::default()
        };

        let instructions = compute_visual_state(&graph, &interaction, &density);
        let visible = instructions.visible_node_count();
        let bound = density.adapted_count(visible, graph.node_count())
            + usize::from(focus.is_some_and(|index| index < graph.node_count()));
        prop_assert!(instructions.labeled_nodes().count() <= bound);
        prop_assert_eq!(instructions.draw_order.len(), graph.node_count());
    }
}

#[test]
fn zero_documents_give_empty_graph() {
    let graph = build(&[], 1, 0.7);
    assert!(graph.is_empty());
    assert!(graph.links.is_empty());
}
