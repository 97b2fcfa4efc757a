//! Outline reporting for `wrangle explore`.

use std::collections::BTreeSet;
use std::fmt;

use crate::rdf::{vocab, Graph, Term};

/// Summary of one RDF type in an analysis: the other types its subjects
/// also carry, and the distinct properties they use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOutline {
    pub type_uri: String,
    pub additional_types: Vec<String>,
    pub properties: Vec<String>,
}

pub fn outline(graph: &Graph) -> Vec<TypeOutline> {
    let rdf_type = Term::iri(vocab::RDF_TYPE);
    let mut outlines = Vec::new();
    for t in graph.objects(None, Some(&rdf_type)) {
        let subjects = graph.subjects(Some(&rdf_type), Some(t));
        let mut additional: BTreeSet<String> = BTreeSet::new();
        let mut properties: BTreeSet<String> = BTreeSet::new();
        for s in &subjects {
            for other in graph.objects(Some(s), Some(&rdf_type)) {
                if other != t {
                    additional.insert(other.lexical().to_string());
                }
            }
            for p in graph.predicates(Some(s)) {
                if p != &rdf_type {
                    properties.insert(p.lexical().to_string());
                }
            }
        }
        outlines.push(TypeOutline {
            type_uri: t.lexical().to_string(),
            additional_types: additional.into_iter().collect(),
            properties: properties.into_iter().collect(),
        });
    }
    outlines
}

impl fmt::Display for TypeOutline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RDF type: {}", self.type_uri)?;
        if !self.additional_types.is_empty() {
            writeln!(f, "    Additional types {:?}", self.additional_types)?;
        }
        for p in &self.properties {
            writeln!(f, "    property: {}", p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::turtle;

    #[test]
    fn test_outline_reports_types_properties_and_additional_types() {
        let g = turtle::parse(
            "@prefix mo: <http://purl.org/ontology/mo/> .\n\
             @prefix tl: <http://purl.org/NET/c4dm/timeline.owl#> .\n\
             @prefix ex: <http://example.org/> .\n\
             ex:sig a mo:Signal, tl:TimelineThing ;\n\
                 mo:sample_rate 44100 .\n\
             ex:other a mo:Signal .",
            None,
        )
        .unwrap();

        let report = outline(&g);
        assert_eq!(report.len(), 2);

        let signal = report
            .iter()
            .find(|o| o.type_uri == "http://purl.org/ontology/mo/Signal")
            .unwrap();
        assert_eq!(
            signal.additional_types,
            vec!["http://purl.org/NET/c4dm/timeline.owl#TimelineThing"]
        );
        assert_eq!(
            signal.properties,
            vec!["http://purl.org/ontology/mo/sample_rate"]
        );

        let rendered = format!("{}", signal);
        assert!(rendered.starts_with("RDF type: http://purl.org/ontology/mo/Signal\n"));
        assert!(rendered.contains("    property: http://purl.org/ontology/mo/sample_rate"));
    }

    #[test]
    fn test_outline_of_empty_graph_is_empty() {
        let g = Graph::new();
        assert!(outline(&g).is_empty());
    }
}
