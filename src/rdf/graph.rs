use std::collections::{BTreeMap, BTreeSet};

use crate::rdf::term::Term;

/// A single RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }
}

/// Result of splitting an IRI into a namespace and local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub prefix: Option<String>,
    pub namespace: String,
    pub local: String,
}

impl QName {
    /// Compact form: `prefix:local` when a prefix is registered for the
    /// namespace, otherwise the full IRI.
    pub fn curie(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => format!("{}{}", self.namespace, self.local),
        }
    }
}

/// An in-memory RDF graph with the query surface the exporter needs.
///
/// Triples are held in a `BTreeSet`, so iteration is deduplicated and
/// deterministic without extra sorting at query time. CALMA analysis
/// documents are small (thousands of triples), so linear pattern scans
/// are fine.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: BTreeSet<Triple>,
    prefixes: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn insert(&mut self, triple: Triple) {
        self.triples.insert(triple);
    }

    pub fn add(&mut self, subject: Term, predicate: Term, object: Term) {
        self.insert(Triple::new(subject, predicate, object));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Register a namespace prefix. A repeated prefix rebinds, as a
    /// repeated `@prefix` directive does in Turtle.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    fn matches(pattern: Option<&Term>, term: &Term) -> bool {
        pattern.map_or(true, |p| p == term)
    }

    /// Distinct objects of triples matching the given subject/predicate
    /// pattern, in term order.
    pub fn objects(&self, subject: Option<&Term>, predicate: Option<&Term>) -> Vec<&Term> {
        let set: BTreeSet<&Term> = self
            .triples
            .iter()
            .filter(|t| Self::matches(subject, &t.subject) && Self::matches(predicate, &t.predicate))
            .map(|t| &t.object)
            .collect();
        set.into_iter().collect()
    }

    /// Distinct subjects of triples matching the given predicate/object
    /// pattern, in term order.
    pub fn subjects(&self, predicate: Option<&Term>, object: Option<&Term>) -> Vec<&Term> {
        let set: BTreeSet<&Term> = self
            .triples
            .iter()
            .filter(|t| Self::matches(predicate, &t.predicate) && Self::matches(object, &t.object))
            .map(|t| &t.subject)
            .collect();
        set.into_iter().collect()
    }

    /// Distinct predicates used by the given subject (or anywhere, when
    /// `None`), in term order.
    pub fn predicates(&self, subject: Option<&Term>) -> Vec<&Term> {
        let set: BTreeSet<&Term> = self
            .triples
            .iter()
            .filter(|t| Self::matches(subject, &t.subject))
            .map(|t| &t.predicate)
            .collect();
        set.into_iter().collect()
    }

    /// Predicate/object pairs for a subject, deduplicated and ordered.
    pub fn predicate_objects(&self, subject: &Term) -> Vec<(&Term, &Term)> {
        let set: BTreeSet<(&Term, &Term)> = self
            .triples
            .iter()
            .filter(|t| &t.subject == subject)
            .map(|t| (&t.predicate, &t.object))
            .collect();
        set.into_iter().collect()
    }

    /// First object for subject/predicate, if any.
    pub fn value(&self, subject: &Term, predicate: &Term) -> Option<&Term> {
        self.objects(Some(subject), Some(predicate))
            .into_iter()
            .next()
    }

    /// Split an IRI into namespace and local name. The longest registered
    /// namespace that is a proper prefix of the IRI wins; failing that, the
    /// IRI is split after its last `#` or `/`.
    pub fn qname(&self, iri: &str) -> QName {
        let mut best: Option<(&String, &String)> = None;
        for (prefix, namespace) in &self.prefixes {
            if !namespace.is_empty() && iri.starts_with(namespace.as_str()) && iri != namespace {
                match best {
                    Some((_, ns)) if ns.len() >= namespace.len() => {}
                    _ => best = Some((prefix, namespace)),
                }
            }
        }
        if let Some((prefix, namespace)) = best {
            return QName {
                prefix: Some(prefix.clone()),
                namespace: namespace.clone(),
                local: iri[namespace.len()..].to_string(),
            };
        }
        let split = iri.rfind('#').or_else(|| iri.rfind('/'));
        match split {
            Some(at) if at + 1 < iri.len() => QName {
                prefix: None,
                namespace: iri[..=at].to_string(),
                local: iri[at + 1..].to_string(),
            },
            _ => QName {
                prefix: None,
                namespace: String::new(),
                local: iri.to_string(),
            },
        }
    }
}
