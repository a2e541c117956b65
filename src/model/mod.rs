use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{CurationError, Result};

mod relation;
mod summary;

pub use relation::{Relation, UnknownRelation};
pub use summary::GraphSummary;

/// Identifier assigned to a node: the normalised BEL term.
pub type NodeId = String;

/// Annotation key → set of values attached to an edge.
pub type Annotations = BTreeMap<String, BTreeSet<String>>;

/// Descriptive metadata carried by every graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub name: String,
    pub version: String,
    pub authors: String,
    pub contact: String,
}

/// Payload of a single edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub relation: Relation,
    pub citation: Option<String>,
    pub evidence: Option<String>,
    /// `None` when the edge has no annotation mapping at all, which is not the
    /// same thing as an empty mapping.
    pub annotations: Option<Annotations>,
}

impl EdgeData {
    pub fn new(relation: Relation) -> Self {
        Self {
            relation,
            citation: None,
            evidence: None,
            annotations: None,
        }
    }

    /// Returns the values stored under `key`, if the annotation is present.
    pub fn annotation(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.annotations.as_ref()?.get(key)
    }
}

/// A keyed, directed edge of a [`BelGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub key: Uuid,
    pub data: EdgeData,
}

impl Edge {
    /// Builds an edge whose key is derived from its content.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, data: EdgeData) -> Self {
        let source = source.into();
        let target = target.into();
        let key = edge_key(&source, &target, &data);
        Self {
            source,
            target,
            key,
            data,
        }
    }
}

/// A problem found while reading a curation file: the file it came from, the
/// 1-based row, and a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub path: String,
    pub line: usize,
    pub message: String,
}

/// Directed multigraph of BEL statements backed by a petgraph [`DiGraph`].
/// Nodes are interned by term and edges are deduplicated on
/// `(source, target, key)`.
#[derive(Debug, Clone)]
pub struct BelGraph {
    pub metadata: GraphMetadata,
    graph: DiGraph<NodeId, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<(NodeIndex, NodeIndex, Uuid), EdgeIndex>,
    warnings: Vec<Warning>,
}

impl BelGraph {
    pub fn new(metadata: GraphMetadata) -> Self {
        Self {
            metadata,
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: impl Into<NodeId>) -> NodeIndex {
        let node = node.into();
        if let Some(&index) = self.node_index.get(&node) {
            return index;
        }
        let index = self.graph.add_node(node.clone());
        self.node_index.insert(node, index);
        index
    }

    /// Adds an edge and both of its endpoints. An edge with the same source,
    /// target and key as an existing one is ignored.
    pub fn add_edge(&mut self, edge: Edge) -> Uuid {
        let key = edge.key;
        let source = self.add_node(edge.source.as_str());
        let target = self.add_node(edge.target.as_str());
        if let Entry::Vacant(slot) = self.edge_index.entry((source, target, key)) {
            slot.insert(self.graph.add_edge(source, target, edge));
        }
        key
    }

    pub fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.node_index.contains_key(node)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.graph.raw_nodes().iter().map(|node| &node.weight)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.raw_edges().iter().map(|edge| &edge.weight)
    }

    /// Mutable access to the edges. Endpoints and keys index the graph and
    /// must be left as they are; only the payload is meant to change.
    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.graph.edge_weights_mut()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn number_of_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn number_of_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn number_of_warnings(&self) -> usize {
        self.warnings.len()
    }

    /// Number of weakly connected components.
    pub fn number_of_components(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Union of two graphs. Nodes and warnings are combined; edges are keyed
    /// by `(source, target, key)` and the right operand's data replaces the
    /// left's on collision. Metadata comes from the left operand.
    pub fn merge(left: &BelGraph, right: &BelGraph) -> BelGraph {
        let mut combined = left.clone();
        for node in right.nodes() {
            combined.add_node(node.as_str());
        }
        for edge in right.edges() {
            let source = combined.add_node(edge.source.as_str());
            let target = combined.add_node(edge.target.as_str());
            let existing = combined.edge_index.get(&(source, target, edge.key)).copied();
            match existing {
                Some(index) => combined.graph[index].data = edge.data.clone(),
                None => {
                    combined.add_edge(edge.clone());
                }
            }
        }
        combined.warnings.extend(right.warnings.iter().cloned());
        combined
    }

    /// Splits the graph into one subgraph per value of the annotation `key`.
    /// Edges carrying several values land in several subgraphs; edges without
    /// the annotation are dropped.
    pub fn subgraphs_by_annotation(&self, key: &str) -> BTreeMap<String, BelGraph> {
        let mut subgraphs: BTreeMap<String, BelGraph> = BTreeMap::new();
        for edge in self.edges() {
            let Some(values) = edge.data.annotation(key) else {
                continue;
            };
            for value in values {
                subgraphs
                    .entry(value.clone())
                    .or_insert_with(|| BelGraph::new(self.metadata.clone()))
                    .add_edge(edge.clone());
            }
        }
        subgraphs
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary::of(self)
    }
}

impl PartialEq for BelGraph {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata
            && self.warnings == other.warnings
            && self.nodes().eq(other.nodes())
            && self.edges().eq(other.edges())
    }
}

/// Flat serialised form of a [`BelGraph`], used for the graph cache and for
/// prior graphs stored as JSON.
#[derive(Serialize)]
struct GraphDocumentRef<'a> {
    metadata: &'a GraphMetadata,
    nodes: Vec<&'a NodeId>,
    edges: Vec<&'a Edge>,
    warnings: &'a [Warning],
}

#[derive(Deserialize)]
struct GraphDocument {
    metadata: GraphMetadata,
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
    #[serde(default)]
    warnings: Vec<Warning>,
}

impl TryFrom<GraphDocument> for BelGraph {
    type Error = CurationError;

    /// Rebuilds the graph; every edge endpoint must be listed as a node.
    fn try_from(document: GraphDocument) -> Result<Self> {
        let mut graph = BelGraph::new(document.metadata);
        for node in document.nodes {
            graph.add_node(node);
        }
        for edge in document.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !graph.contains_node(endpoint) {
                    return Err(CurationError::InvalidGraph(format!(
                        "edge {} references unknown node '{endpoint}'",
                        edge.key
                    )));
                }
            }
            graph.add_edge(edge);
        }
        graph.warnings = document.warnings;
        Ok(graph)
    }
}

impl Serialize for BelGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GraphDocumentRef {
            metadata: &self.metadata,
            nodes: self.nodes().collect(),
            edges: self.edges().collect(),
            warnings: &self.warnings,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BelGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = GraphDocument::deserialize(deserializer)?;
        BelGraph::try_from(document).map_err(de::Error::custom)
    }
}

fn edge_key(source: &str, target: &str, data: &EdgeData) -> Uuid {
    const SEPARATOR: char = '\u{1f}';

    let mut material = String::new();
    for part in [
        source,
        data.relation.keyword(),
        target,
        data.citation.as_deref().unwrap_or_default(),
        data.evidence.as_deref().unwrap_or_default(),
    ] {
        material.push_str(part);
        material.push(SEPARATOR);
    }
    if let Some(annotations) = &data.annotations {
        for (key, values) in annotations {
            material.push_str(key);
            for value in values {
                material.push('=');
                material.push_str(value);
            }
            material.push(SEPARATOR);
        }
    }
    Uuid::new_v5(&Uuid::NAMESPACE_OID, material.as_bytes())
}
