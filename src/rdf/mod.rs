// RDF layer: terms, an in-memory graph, and a Turtle reader.
// Only the subset of RDF the CALMA exports need lives here.

pub mod graph;
pub mod term;
pub mod turtle;

pub use graph::{Graph, QName, Triple};
pub use term::{Literal, Term};

/// Well-known vocabulary IRIs used by the wrangler.
pub mod vocab {
    pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}
