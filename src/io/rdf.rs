use std::fs::File;
use std::path::Path;

pub use oxigraph::io::{JsonLdProfileSet, RdfFormat};
use oxigraph::io::RdfSerializer;
use oxigraph::model::{GraphName, Literal, NamedNode, Quad, Term};
use uuid::Uuid;

use crate::error::{CurationError, Result};
use crate::model::BelGraph;

const BEL_VOCAB: &str = "http://www.openbel.org/vocabulary/";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Serialises the graph as RDF. Every statement yields a direct
/// `source relation target` triple plus a reified edge resource carrying its
/// citation, evidence, and annotations.
pub fn write_rdf(path: &Path, graph: &BelGraph, format: RdfFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut serializer = RdfSerializer::from_format(format).for_writer(file);
    let mut emit = |subject: &NamedNode, predicate: NamedNode, object: Term| {
        let quad = Quad::new(subject.clone(), predicate, object, GraphName::DefaultGraph);
        serializer
            .serialize_quad(&quad)
            .map_err(|err| CurationError::Rdf(err.to_string()))
    };

    let label = NamedNode::new(RDFS_LABEL)?;
    for node in graph.nodes() {
        emit(&node_iri(node)?, label.clone(), Literal::new_simple_literal(node).into())?;
    }

    let rdf_type = NamedNode::new(RDF_TYPE)?;
    let edge_class = vocab("Edge")?;
    let source_predicate = vocab("source")?;
    let target_predicate = vocab("target")?;
    let relation_predicate = vocab("relation")?;
    let citation_predicate = vocab("citation")?;
    let evidence_predicate = vocab("evidence")?;

    for edge in graph.edges() {
        let source = node_iri(&edge.source)?;
        let target = node_iri(&edge.target)?;
        let relation = edge.data.relation.keyword();
        emit(&source, vocab(relation)?, target.clone().into())?;

        let resource = NamedNode::new(format!("urn:uuid:{}", edge.key))?;
        emit(&resource, rdf_type.clone(), edge_class.clone().into())?;
        emit(&resource, source_predicate.clone(), source.into())?;
        emit(&resource, target_predicate.clone(), target.into())?;
        emit(
            &resource,
            relation_predicate.clone(),
            Literal::new_simple_literal(relation).into(),
        )?;
        if let Some(citation) = &edge.data.citation {
            emit(
                &resource,
                citation_predicate.clone(),
                Literal::new_simple_literal(citation).into(),
            )?;
        }
        if let Some(evidence) = &edge.data.evidence {
            emit(
                &resource,
                evidence_predicate.clone(),
                Literal::new_simple_literal(evidence).into(),
            )?;
        }
        for (key, values) in edge.data.annotations.iter().flatten() {
            let predicate = vocab(&format!("annotation/{}", sanitize(key)))?;
            for value in values {
                emit(
                    &resource,
                    predicate.clone(),
                    Literal::new_simple_literal(value).into(),
                )?;
            }
        }
    }

    serializer
        .finish()
        .map_err(|err| CurationError::Rdf(err.to_string()))?;
    Ok(())
}

pub fn detect_format(path: &Path) -> Option<RdfFormat> {
    let extension = path.extension()?.to_ascii_lowercase();
    match extension.to_str()? {
        "ttl" | "turtle" => Some(RdfFormat::Turtle),
        "nt" => Some(RdfFormat::NTriples),
        "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "jsonld" => Some(RdfFormat::JsonLd {
            profile: JsonLdProfileSet::empty(),
        }),
        _ => None,
    }
}

fn node_iri(term: &str) -> Result<NamedNode> {
    let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, term.as_bytes());
    Ok(NamedNode::new(format!("urn:uuid:{id}"))?)
}

fn vocab(local: &str) -> Result<NamedNode> {
    Ok(NamedNode::new(format!("{BEL_VOCAB}{local}"))?)
}

fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_documented_extensions() {
        assert_eq!(detect_format(Path::new("graph.ttl")), Some(RdfFormat::Turtle));
        assert_eq!(detect_format(Path::new("graph.NT")), Some(RdfFormat::NTriples));
        assert_eq!(detect_format(Path::new("graph.nq")), Some(RdfFormat::NQuads));
        assert_eq!(detect_format(Path::new("graph.trig")), Some(RdfFormat::TriG));
        assert!(matches!(
            detect_format(Path::new("graph.jsonld")),
            Some(RdfFormat::JsonLd { .. })
        ));
        assert_eq!(detect_format(Path::new("graph.rdf")), None);
    }
}
