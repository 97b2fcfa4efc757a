use std::fmt;

/// A literal value: lexical form plus optional language tag or datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: String,
    pub lang: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn plain(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    pub fn lang_tagged(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            lang: Some(lang.into()),
            datatype: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            lang: None,
            datatype: Some(datatype.into()),
        }
    }
}

/// An RDF term. The derived ordering (IRIs, then blank nodes, then literals,
/// each ordered by text) keeps listings and exports deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    BNode(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn bnode(label: impl Into<String>) -> Self {
        Term::BNode(label.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(value))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_bnode(&self) -> bool {
        matches!(self, Term::BNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// IRI text, if this term is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Plain-text rendering: the IRI, the blank node label, or the
    /// literal's lexical form. This is what entity fields are filled with.
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::BNode(label) => label,
            Term::Literal(lit) => &lit.value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::BNode(label) => write!(f, "_:{}", label),
            Term::Literal(lit) => write!(f, "{}", lit.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_ordering_is_kind_then_text() {
        let mut terms = vec![
            Term::literal("a"),
            Term::bnode("b0"),
            Term::iri("http://example.org/z"),
            Term::iri("http://example.org/a"),
        ];
        terms.sort();
        assert_eq!(
            terms,
            vec![
                Term::iri("http://example.org/a"),
                Term::iri("http://example.org/z"),
                Term::bnode("b0"),
                Term::literal("a"),
            ]
        );
    }

    #[test]
    fn test_lexical_forms() {
        assert_eq!(Term::iri("http://x/y").lexical(), "http://x/y");
        assert_eq!(Term::bnode("n1").lexical(), "n1");
        assert_eq!(
            Term::Literal(Literal::lang_tagged("chord", "en")).lexical(),
            "chord"
        );
    }
}
