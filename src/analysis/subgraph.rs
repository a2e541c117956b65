use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::error::Result;
use crate::io::tsv;
use crate::model::{BelGraph, GraphSummary, NodeId};

/// Edge annotation holding the subgraph labels of a statement.
pub const SUBGRAPH_ANNOTATION: &str = "Subgraph";

/// Subgraph labels accumulated per node from a prior graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSubgraphs {
    labels: HashMap<NodeId, BTreeSet<String>>,
}

impl NodeSubgraphs {
    /// Labels recorded for `node`; unknown nodes have none.
    pub fn get(&self, node: &str) -> BTreeSet<String> {
        self.labels.get(node).cloned().unwrap_or_default()
    }

    /// Every label seen anywhere in the prior graph.
    pub fn labels(&self) -> BTreeSet<String> {
        self.labels.values().flatten().cloned().collect()
    }
}

/// First pass: each node collects the `Subgraph` labels of every prior edge
/// touching it.
pub fn node_subgraphs(prior: &BelGraph) -> NodeSubgraphs {
    let mut node_subgraphs = NodeSubgraphs::default();
    for edge in prior.edges() {
        let labels = edge.data.annotation(SUBGRAPH_ANNOTATION);
        for endpoint in [&edge.source, &edge.target] {
            let entry = node_subgraphs.labels.entry(endpoint.clone()).or_default();
            entry.extend(labels.into_iter().flatten().cloned());
        }
    }
    node_subgraphs
}

/// Second pass: every curated edge with an annotation mapping gets the union
/// of its endpoints' labels as its `Subgraph` annotation, even when that
/// union is empty. Edges without a mapping are left alone.
pub fn assign_subgraphs(curated: &mut BelGraph, node_subgraphs: &NodeSubgraphs) {
    for edge in curated.edges_mut() {
        let Some(annotations) = edge.data.annotations.as_mut() else {
            continue;
        };
        let mut labels = node_subgraphs.get(&edge.source);
        labels.extend(node_subgraphs.get(&edge.target));
        annotations.insert(SUBGRAPH_ANNOTATION.to_string(), labels);
    }
}

/// Statistics of each named subgraph of a combined graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SubgraphSummary {
    rows: BTreeMap<String, GraphSummary>,
}

impl SubgraphSummary {
    /// Merges `prior` and `curated`, splits the result by `Subgraph`, and
    /// summarises every subgraph whose name is in `labels`.
    pub fn build(prior: &BelGraph, curated: &BelGraph, labels: &BTreeSet<String>) -> Self {
        let combined = BelGraph::merge(prior, curated);
        Self::from_combined(&combined, labels)
    }

    pub fn from_combined(combined: &BelGraph, labels: &BTreeSet<String>) -> Self {
        let rows = combined
            .subgraphs_by_annotation(SUBGRAPH_ANNOTATION)
            .into_iter()
            .filter(|(name, _)| labels.contains(name))
            .map(|(name, subgraph)| (name, subgraph.summary()))
            .collect();
        Self { rows }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&GraphSummary> {
        self.rows.get(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let mut header = vec!["subgraph"];
        header.extend_from_slice(GraphSummary::columns());
        tsv::write_table(
            path,
            &header,
            self.rows.iter().map(|(name, summary)| {
                std::iter::once(name.clone()).chain(summary.values())
            }),
        )
    }
}
