use std::collections::HashMap;

use crate::bib::KeywordFrequencies;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphThresholds {
    pub min_keyword_frequency: usize,
    pub min_edge_weight: f64,
}

impl Default for GraphThresholds {
    fn default() -> Self {
        Self {
            min_keyword_frequency: 1,
            min_edge_weight: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeywordNode {
    pub id: String,
    pub frequency: usize,
    pub relative_importance: f64,
}

/// Undirected link; `source` always sorts before `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct KeywordLink {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub importance: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeywordGraph {
    pub nodes: Vec<KeywordNode>,
    pub links: Vec<KeywordLink>,
}

impl KeywordGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

type CoOccurrence<'a> = HashMap<&'a str, HashMap<&'a str, usize>>;

fn count_co_occurrence<'a, I>(documents: I) -> (CoOccurrence<'a>, usize)
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut co_occurrence: CoOccurrence<'a> = HashMap::new();
    let mut document_count = 0usize;

    for keywords in documents {
        document_count += 1;
        for keyword_a in keywords {
            let row = co_occurrence.entry(keyword_a.as_str()).or_default();
            for keyword_b in keywords {
                *row.entry(keyword_b.as_str()).or_insert(0) += 1;
            }
        }
    }

    (co_occurrence, document_count)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Derives the keyword co-occurrence graph of the given documents.
///
/// `documents` yields the keyword list of every filtered entry; `frequencies`
/// is the keyword frequency table over the same collection. The weight of a
/// link is normalized by the frequency of its lexicographically smaller
/// keyword only, so `weight(A, B)` is not `weight(B, A)` in general.
pub fn compute_graph<'a, I>(
    documents: I,
    frequencies: &KeywordFrequencies,
    thresholds: GraphThresholds,
) -> KeywordGraph
where
    I: IntoIterator<Item = &'a [String]>,
{
    let (co_occurrence, document_count) = count_co_occurrence(documents);

    let survivors = frequencies
        .iter()
        .filter(|&(_, &frequency)| frequency >= thresholds.min_keyword_frequency.max(1))
        .map(|(keyword, &frequency)| (keyword.as_str(), frequency))
        .collect::<Vec<_>>();

    let mut links = Vec::new();
    for (index, &(source, source_frequency)) in survivors.iter().enumerate() {
        let row = co_occurrence.get(source);
        // Survivors come out of a BTreeMap, so every later entry sorts after `source`.
        for &(target, target_frequency) in &survivors[index + 1..] {
            let shared = row.and_then(|row| row.get(target)).copied().unwrap_or(0);
            let weight = ratio(shared as f64, source_frequency as f64);
            if weight > thresholds.min_edge_weight {
                let low = source_frequency.min(target_frequency) as f64;
                let high = source_frequency.max(target_frequency) as f64;
                links.push(KeywordLink {
                    source: source.to_owned(),
                    target: target.to_owned(),
                    weight,
                    importance: ratio(low, high),
                });
            }
        }
    }

    let mut neighbor_frequency = HashMap::<&str, usize>::new();
    for link in &links {
        let target_frequency = frequencies.get(&link.target).copied().unwrap_or(0);
        *neighbor_frequency.entry(link.source.as_str()).or_insert(0) += target_frequency;
    }

    let nodes = survivors
        .iter()
        .map(|&(keyword, frequency)| {
            let frequency_value = frequency as f64;
            let neighborhood = neighbor_frequency.get(keyword).copied().unwrap_or(0) as f64;
            let prevalence = ratio(frequency_value, document_count as f64).sqrt();
            let dominance = ratio(frequency_value, frequency_value.max(neighborhood)).sqrt();
            KeywordNode {
                id: keyword.to_owned(),
                frequency,
                relative_importance: prevalence * dominance,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        documents = document_count,
        nodes = nodes.len(),
        links = links.len(),
        min_keyword_frequency = thresholds.min_keyword_frequency,
        min_edge_weight = thresholds.min_edge_weight,
        "computed keyword graph"
    );

    KeywordGraph { nodes, links }
}

/// A [`KeywordGraph`] bound to node indices.
#[derive(Clone, Debug, Default)]
pub struct IndexedGraph {
    pub graph: KeywordGraph,
    pub index_by_id: HashMap<String, usize>,
    pub endpoints: Vec<(usize, usize)>,
    pub adjacent_links: Vec<Vec<usize>>,
}

impl IndexedGraph {
    /// Links naming a keyword that is not a node are dropped, so `endpoints`
    /// lines up with `graph.links`.
    pub fn new(mut graph: KeywordGraph) -> Self {
        let index_by_id = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let mut links = Vec::with_capacity(graph.links.len());
        let mut endpoints = Vec::with_capacity(graph.links.len());
        let mut adjacent_links = vec![Vec::new(); graph.nodes.len()];
        for link in std::mem::take(&mut graph.links) {
            let (Some(&source), Some(&target)) =
                (index_by_id.get(&link.source), index_by_id.get(&link.target))
            else {
                tracing::warn!(
                    source = %link.source,
                    target = %link.target,
                    "dropping link to unknown keyword"
                );
                continue;
            };
            adjacent_links[source].push(links.len());
            adjacent_links[target].push(links.len());
            endpoints.push((source, target));
            links.push(link);
        }
        graph.links = links;
        debug_assert_eq!(endpoints.len(), graph.links.len());

        Self {
            graph,
            index_by_id,
            endpoints,
            adjacent_links,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.graph.links.len()
    }

    pub fn node(&self, index: usize) -> Option<&KeywordNode> {
        self.graph.nodes.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|keywords| keywords.iter().map(|keyword| (*keyword).to_owned()).collect())
            .collect()
    }

    fn frequencies(pairs: &[(&str, usize)]) -> KeywordFrequencies {
        pairs
            .iter()
            .map(|(keyword, count)| ((*keyword).to_owned(), *count))
            .collect()
    }

    fn build(
        documents: &[Vec<String>],
        table: &KeywordFrequencies,
        min_edge_weight: f64,
    ) -> KeywordGraph {
        compute_graph(
            documents.iter().map(Vec::as_slice),
            table,
            GraphThresholds {
                min_keyword_frequency: 1,
                min_edge_weight,
            },
        )
    }

    #[test]
    fn two_document_scenario() {
        let documents = docs(&[&["A", "B"], &["A", "C"]]);
        let table = frequencies(&[("A", 2), ("B", 1), ("C", 1)]);
        let graph = build(&documents, &table, 0.1);

        let ids = graph.nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(graph.links.len(), 2);
        for (link, target) in graph.links.iter().zip(["B", "C"]) {
            assert_eq!(link.source, "A");
            assert_eq!(link.target, target);
            assert_eq!(link.weight, 0.5);
            assert_eq!(link.importance, 0.5);
        }
    }

    #[test]
    fn high_threshold_drops_every_link() {
        let documents = docs(&[&["A", "B"], &["A", "C"]]);
        let table = frequencies(&[("A", 2), ("B", 1), ("C", 1)]);
        let graph = build(&documents, &table, 0.9);
        assert_eq!(graph.nodes.len(), 3);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        let documents = docs(&[&["A", "B"], &["A"]]);
        let table = frequencies(&[("A", 2), ("B", 1)]);
        assert!(build(&documents, &table, 0.5).links.is_empty());
        assert_eq!(build(&documents, &table, 0.49).links.len(), 1);
    }

    #[test]
    fn weight_is_normalized_by_smaller_id() {
        // "B" sorts after "A", so the weight uses frequency(A) = 1.
        let documents = docs(&[&["A", "B"], &["B"], &["B"]]);
        let table = frequencies(&[("A", 1), ("B", 3)]);
        let graph = build(&documents, &table, 0.7);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].weight, 1.0);
        assert!((graph.links[0].importance - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn relative_importance_counts_source_side_only() {
        let documents = docs(&[&["A", "B"], &["A", "C"]]);
        let table = frequencies(&[("A", 2), ("B", 1), ("C", 1)]);
        let graph = build(&documents, &table, 0.1);

        // A: neighbors B and C sum to 2, so dominance is sqrt(2 / 2).
        let a = &graph.nodes[0];
        assert!((a.relative_importance - (2.0_f64 / 2.0).sqrt()).abs() < 1e-12);
        // B is only ever a target: sqrt(1 / 2) * 1.
        let b = &graph.nodes[1];
        assert!((b.relative_importance - 0.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_documents_give_zero_importance() {
        let table = frequencies(&[("A", 2), ("B", 1)]);
        let graph = build(&[], &table, 0.0);
        assert_eq!(graph.nodes.len(), 2);
        for node in &graph.nodes {
            assert_eq!(node.relative_importance, 0.0);
        }
        assert!(graph.links.is_empty());
    }

    #[test]
    fn minimum_frequency_filters_nodes() {
        let documents = docs(&[&["A", "B"], &["A"]]);
        let table = frequencies(&[("A", 2), ("B", 1), ("Z", 0)]);
        let graph = compute_graph(
            documents.iter().map(Vec::as_slice),
            &table,
            GraphThresholds {
                min_keyword_frequency: 2,
                min_edge_weight: 0.0,
            },
        );
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].id, "A");

        let unfiltered = build(&documents, &table, 0.0);
        assert!(unfiltered.nodes.iter().all(|node| node.frequency >= 1));
    }

    #[test]
    fn document_without_keywords_contributes_nothing() {
        let documents = docs(&[&[], &["A"]]);
        let table = frequencies(&[("A", 1)]);
        let graph = build(&documents, &table, 0.0);
        assert_eq!(graph.nodes.len(), 1);
        // Two documents counted, so prevalence is sqrt(1 / 2).
        assert!((graph.nodes[0].relative_importance - 0.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn indexed_graph_binds_endpoints() {
        let documents = docs(&[&["A", "B"], &["A", "C"]]);
        let table = frequencies(&[("A", 2), ("B", 1), ("C", 1)]);
        let indexed = IndexedGraph::new(build(&documents, &table, 0.1));
        assert_eq!(indexed.endpoints, vec![(0, 1), (0, 2)]);
        assert_eq!(indexed.adjacent_links[0], vec![0, 1]);
        assert_eq!(indexed.adjacent_links[1], vec![0]);
        assert_eq!(indexed.index_by_id["C"], 2);
    }

    #[test]
    fn indexed_graph_drops_dangling_links() {
        let documents = docs(&[&["A", "B"], &["A", "C"]]);
        let table = frequencies(&[("A", 2), ("B", 1), ("C", 1)]);
        let mut graph = build(&documents, &table, 0.1);
        graph.links.insert(
            0,
            KeywordLink {
                source: "A".to_owned(),
                target: "missing".to_owned(),
                weight: 1.0,
                importance: 1.0,
            },
        );

        let indexed = IndexedGraph::new(graph);
        assert_eq!(indexed.link_count(), 2);
        assert_eq!(indexed.endpoints.len(), indexed.link_count());
        assert_eq!(indexed.endpoints, vec![(0, 1), (0, 2)]);
        assert_eq!(indexed.graph.links[0].target, "B");
        assert_eq!(indexed.adjacent_links[0], vec![0, 1]);
    }
}
