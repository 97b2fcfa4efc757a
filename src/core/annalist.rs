//! Derivation of Annalist collection records from an RDF graph.
//!
//! For every non-RDF-vocabulary type in a CALMA analysis this produces a
//! type description, a list and view over it, field descriptions for the
//! properties its subjects carry, and one entity data record per IRI
//! subject.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::domain::model::{ExportEntity, ExportMode, ExportSet};
use crate::rdf::{vocab, Graph, Term};

/// Basic information about a type: id, qname, label, companion list/view ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub uri: String,
    pub id: String,
    pub label: String,
    pub comment: String,
    pub list_id: String,
    pub view_id: String,
}

/// Field naming derived from an RDF predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    /// Local name of the predicate.
    pub name: String,
    /// Annalist field id (`<name>_field`).
    pub field_id: String,
    /// JSON property key (`prefix:name`, or the full IRI).
    pub property_key: String,
    /// The predicate IRI itself.
    pub property_iri: String,
}

/// Information about an IRI subject: id, label, and its property values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectInfo {
    pub uri: String,
    pub id: String,
    pub label: String,
    pub comment: String,
    pub properties: BTreeMap<String, String>,
}

/// Make a local name safe to use as an Annalist id and directory name.
pub fn sanitize_id(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '~' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

pub fn type_info(graph: &Graph, t: &Term) -> Option<TypeInfo> {
    let iri = t.as_iri()?;
    let qname = graph.qname(iri);
    let curie = qname.curie();
    let id = sanitize_id(&qname.local);
    let label = graph
        .value(t, &Term::iri(vocab::RDFS_LABEL))
        .map(|o| o.lexical().to_string())
        .unwrap_or_else(|| format!("Type {}", curie));
    let comment = graph
        .value(t, &Term::iri(vocab::RDFS_COMMENT))
        .map(|o| o.lexical().to_string())
        .unwrap_or_else(|| format!("Type {} ({})", curie, iri));
    Some(TypeInfo {
        uri: curie,
        list_id: format!("{}_list", id),
        view_id: format!("{}_view", id),
        id,
        label,
        comment,
    })
}

pub fn field_key(graph: &Graph, p: &Term) -> Option<FieldKey> {
    let iri = p.as_iri()?;
    let qname = graph.qname(iri);
    let name = qname.local.clone();
    Some(FieldKey {
        field_id: format!("{}_field", sanitize_id(&name)),
        property_key: qname.curie(),
        property_iri: iri.to_string(),
        name,
    })
}

/// Extract information about a subject resource. Blank node subjects are
/// not exported and yield `None`.
pub fn subject_info(graph: &Graph, s: &Term) -> Option<SubjectInfo> {
    let iri = s.as_iri()?;
    let qname = graph.qname(iri);
    let curie = qname.curie();
    let id = sanitize_id(&qname.local);
    let label = graph
        .value(s, &Term::iri(vocab::RDFS_LABEL))
        .map(|o| o.lexical().to_string())
        .unwrap_or_else(|| format!("Resource {}", curie));
    let comment = graph
        .value(s, &Term::iri(vocab::RDFS_COMMENT))
        .map(|o| o.lexical().to_string())
        .unwrap_or_else(|| format!("Resource {} ({})", curie, iri));
    let mut properties = BTreeMap::new();
    for (p, o) in graph.predicate_objects(s) {
        if p.as_iri() == Some(vocab::RDF_TYPE) {
            continue;
        }
        if let Some(key) = field_key(graph, p) {
            properties.insert(key.property_key, o.lexical().to_string());
        }
    }
    Some(SubjectInfo {
        uri: curie,
        id,
        label,
        comment,
        properties,
    })
}

pub fn type_record(td: &TypeInfo) -> ExportEntity {
    ExportEntity::new(
        format!("_annalist_collection/types/{}/type_meta.jsonld", td.id),
        json!({
            "@id": "./",
            "@type": ["annal:Type"],
            "annal:type": "annal:Type",
            "annal:type_id": "_type",
            "annal:uri": td.uri,
            "annal:id": td.id,
            "rdfs:label": td.label,
            "rdfs:comment": td.comment,
            "annal:type_list": td.list_id,
            "annal:type_view": td.view_id,
        }),
    )
}

pub fn list_record(td: &TypeInfo) -> ExportEntity {
    ExportEntity::new(
        format!("_annalist_collection/lists/{}/list_meta.jsonld", td.list_id),
        json!({
            "@id": "./",
            "@type": ["annal:List"],
            "annal:type": "annal:List",
            "annal:type_id": "_list",
            "annal:id": td.list_id,
            "rdfs:label": format!("List {}", td.id),
            "rdfs:comment": format!("List of {} entities", td.id),
            "annal:display_type": "List",
            "annal:default_view": td.view_id,
            "annal:default_type": td.id,
            "annal:list_entity_selector": format!("'{}' in [@type]", td.uri),
            "annal:list_fields": [
                {
                    "annal:field_id": "Entity_id",
                    "annal:field_placement": "small:0,3",
                },
                {
                    "annal:field_id": "Entity_label",
                    "annal:field_placement": "small:3,9",
                },
            ],
        }),
    )
}

/// Build the view description for a type, together with the distinct
/// field keys used by its subjects (each of which gets a field record).
pub fn view_record(graph: &Graph, t: &Term, td: &TypeInfo) -> (ExportEntity, Vec<FieldKey>) {
    let rdf_type = Term::iri(vocab::RDF_TYPE);
    let mut fields: BTreeMap<String, FieldKey> = BTreeMap::new();
    for s in graph.subjects(Some(&rdf_type), Some(t)) {
        for p in graph.predicates(Some(s)) {
            if p.as_iri() == Some(vocab::RDF_TYPE) {
                continue;
            }
            if let Some(key) = field_key(graph, p) {
                fields.entry(key.field_id.clone()).or_insert(key);
            }
        }
    }

    let mut view_fields = vec![json!({
        "annal:field_id": "Entity_id",
        "annal:field_placement": "small:0,12;medium:0,6",
    })];
    for key in fields.values() {
        view_fields.push(json!({
            "annal:field_id": key.field_id,
            "annal:field_placement": "small:0,12",
        }));
    }

    let entity = ExportEntity::new(
        format!("_annalist_collection/views/{}/view_meta.jsonld", td.view_id),
        json!({
            "@id": "./",
            "@type": ["annal:View"],
            "annal:type": "annal:View",
            "annal:type_id": "_view",
            "annal:id": td.view_id,
            "rdfs:label": format!("View {}", td.id),
            "rdfs:comment": format!("View of {} entity", td.id),
            "annal:open_view": true,
            "annal:view_fields": view_fields,
        }),
    );
    (entity, fields.into_values().collect())
}

pub fn field_record(key: &FieldKey) -> ExportEntity {
    ExportEntity::new(
        format!("_annalist_collection/fields/{}/field_meta.jsonld", key.field_id),
        json!({
            "@id": "./",
            "@type": ["annal:Field"],
            "annal:type": "annal:Field",
            "annal:type_id": "_field",
            "annal:id": key.field_id,
            "rdfs:label": key.name,
            "rdfs:comment": format!(
                "Field {} ({}, {})",
                key.field_id, key.property_key, key.property_iri
            ),
            "annal:field_render_type": "Text",
            "annal:field_value_type": "annal:Text",
            "annal:placeholder": format!("({})", key.field_id),
            "annal:property_uri": key.property_key,
            "annal:field_placement": "small:0,12",
            "annal:default_value": "",
        }),
    )
}

pub fn subject_record(td: &TypeInfo, sd: &SubjectInfo) -> ExportEntity {
    let mut body = Map::new();
    for (key, value) in &sd.properties {
        body.insert(key.clone(), Value::String(value.clone()));
    }
    body.insert("annal:uri".to_string(), json!(sd.uri));
    body.insert("annal:id".to_string(), json!(sd.id));
    body.insert("rdfs:label".to_string(), json!(sd.label));
    body.insert("rdfs:comment".to_string(), json!(sd.comment));
    body.insert("@id".to_string(), json!("./"));
    body.insert("@type".to_string(), json!([td.uri]));
    body.insert("annal:type".to_string(), json!(td.uri));
    body.insert("annal:type_id".to_string(), json!(td.id));
    ExportEntity::new(
        format!("d/{}/{}/entity-data.jsonld", td.id, sd.id),
        Value::Object(body),
    )
}

/// Distinct types in the graph that should be exported: everything except
/// terms in the RDF vocabulary namespace.
pub fn export_types(graph: &Graph) -> Vec<Term> {
    let rdf_type = Term::iri(vocab::RDF_TYPE);
    graph
        .objects(None, Some(&rdf_type))
        .into_iter()
        .filter(|t| {
            t.as_iri()
                .map_or(false, |iri| !iri.starts_with(vocab::RDF_NS))
        })
        .cloned()
        .collect()
}

/// Derive the full set of Annalist records for the graph.
pub fn build_export_set(graph: &Graph, mode: ExportMode) -> ExportSet {
    let rdf_type = Term::iri(vocab::RDF_TYPE);
    let mut set = ExportSet::default();
    for t in export_types(graph) {
        let Some(td) = type_info(graph, &t) else {
            continue;
        };
        tracing::debug!("Type: {}", t);
        set.type_count += 1;

        if mode.includes_metadata() {
            set.entities.push(type_record(&td));
            set.entities.push(list_record(&td));
            let (view, fields) = view_record(graph, &t, &td);
            set.entities.push(view);
            for key in &fields {
                set.entities.push(field_record(key));
            }
        }

        if mode.includes_subjects() {
            for s in graph.subjects(Some(&rdf_type), Some(&t)) {
                if let Some(sd) = subject_info(graph, s) {
                    tracing::debug!("Subject: {}/{}", td.id, sd.id);
                    set.entities.push(subject_record(&td, &sd));
                    set.subject_count += 1;
                }
            }
        }
    }
    set
}
