use httpmock::prelude::*;
use tempfile::TempDir;

use calma_wrangle::domain::ports::ConfigProvider;
use calma_wrangle::{
    AnalysisPipeline, ExportMode, LocalStorage, RdfClient, WrangleConfig, WrangleEngine,
    WrangleError,
};

const ANALYSIS_TTL: &str = "\
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
@prefix mo: <http://purl.org/ontology/mo/> .\n\
@prefix af: <http://purl.org/ontology/af/> .\n\
\n\
<#signal> a mo:Signal ;\n\
    rdfs:label \"Recorded signal\" ;\n\
    rdfs:comment \"Signal for track 1\" ;\n\
    mo:sample_rate 44100 .\n\
\n\
<#chord_1> a af:ChordSegment ;\n\
    af:chord_label \"Am\" ;\n\
    af:confidence 0.87 .\n\
\n\
<#chord_2> a af:ChordSegment ;\n\
    af:chord_label \"E\" .\n";

fn test_config(dir: &TempDir) -> WrangleConfig {
    WrangleConfig {
        collection_dir: dir.path().to_str().unwrap().to_string(),
        timeout_seconds: 5,
        user_agent: "calma-wrangle-test".to_string(),
    }
}

fn engine_for(
    server: &MockServer,
    config: &WrangleConfig,
    mode: ExportMode,
) -> WrangleEngine<AnalysisPipeline<LocalStorage, WrangleConfig>> {
    let client = RdfClient::new(config.timeout(), config.user_agent()).unwrap();
    let storage = LocalStorage::new(config.collection_dir.clone());
    let pipeline = AnalysisPipeline::new(
        storage,
        config.clone(),
        client,
        server.url("/data/track_1/analysis_1.ttl"),
        mode,
    );
    WrangleEngine::new(pipeline)
}

fn read_json(dir: &TempDir, path: &str) -> serde_json::Value {
    let data = std::fs::read(dir.path().join(path))
        .unwrap_or_else(|_| panic!("expected exported file {}", path));
    serde_json::from_slice(&data).unwrap()
}

#[tokio::test]
async fn test_export_analysis_writes_full_collection() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/data/track_1/analysis_1.ttl")
            .header("Accept", "text/turtle");
        then.status(200)
            .header("Content-Type", "text/turtle")
            .body(ANALYSIS_TTL);
    });

    let config = test_config(&dir);
    let output = engine_for(&server, &config, ExportMode::All)
        .run()
        .await
        .unwrap();

    mock.assert();
    assert_eq!(output, config.collection_dir);

    // type description
    let type_meta = read_json(&dir, "_annalist_collection/types/Signal/type_meta.jsonld");
    assert_eq!(type_meta["annal:id"], "Signal");
    assert_eq!(type_meta["annal:uri"], "mo:Signal");
    assert_eq!(type_meta["annal:type_id"], "_type");
    assert_eq!(type_meta["annal:type_list"], "Signal_list");
    assert_eq!(type_meta["annal:type_view"], "Signal_view");
    // no rdfs:label triple on the type itself, so the fallback applies
    assert_eq!(type_meta["rdfs:label"], "Type mo:Signal");

    // list description
    let list_meta = read_json(
        &dir,
        "_annalist_collection/lists/ChordSegment_list/list_meta.jsonld",
    );
    assert_eq!(
        list_meta["annal:list_entity_selector"],
        "'af:ChordSegment' in [@type]"
    );
    assert_eq!(list_meta["annal:list_fields"].as_array().unwrap().len(), 2);

    // view description covers the union of segment properties
    let view_meta = read_json(
        &dir,
        "_annalist_collection/views/ChordSegment_view/view_meta.jsonld",
    );
    let view_fields = view_meta["annal:view_fields"].as_array().unwrap();
    let field_ids: Vec<&str> = view_fields
        .iter()
        .map(|f| f["annal:field_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        field_ids,
        vec!["Entity_id", "chord_label_field", "confidence_field"]
    );

    // field description
    let field_meta = read_json(
        &dir,
        "_annalist_collection/fields/chord_label_field/field_meta.jsonld",
    );
    assert_eq!(field_meta["annal:property_uri"], "af:chord_label");
    assert_eq!(field_meta["rdfs:label"], "chord_label");

    // entity data: explicit label wins over the fallback
    let signal = read_json(&dir, "d/Signal/signal/entity-data.jsonld");
    assert_eq!(signal["rdfs:label"], "Recorded signal");
    assert_eq!(signal["rdfs:comment"], "Signal for track 1");
    assert_eq!(signal["mo:sample_rate"], "44100");
    assert_eq!(signal["@type"], serde_json::json!(["mo:Signal"]));

    let chord = read_json(&dir, "d/ChordSegment/chord_1/entity-data.jsonld");
    assert_eq!(chord["af:chord_label"], "Am");
    assert_eq!(chord["af:confidence"], "0.87");
    // no explicit label: the fallback names the resource
    let label = chord["rdfs:label"].as_str().unwrap();
    assert!(label.starts_with("Resource ") && label.ends_with("chord_1"));
}

#[tokio::test]
async fn test_export_metadata_writes_no_entity_data() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data/track_1/analysis_1.ttl");
        then.status(200).body(ANALYSIS_TTL);
    });

    let config = test_config(&dir);
    engine_for(&server, &config, ExportMode::Metadata)
        .run()
        .await
        .unwrap();

    assert!(dir.path().join("_annalist_collection/types").exists());
    assert!(!dir.path().join("d").exists());
}

#[tokio::test]
async fn test_export_subjects_writes_only_entity_data() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data/track_1/analysis_1.ttl");
        then.status(200).body(ANALYSIS_TTL);
    });

    let config = test_config(&dir);
    engine_for(&server, &config, ExportMode::Subjects)
        .run()
        .await
        .unwrap();

    assert!(!dir.path().join("_annalist_collection").exists());
    assert!(dir.path().join("d/ChordSegment/chord_2/entity-data.jsonld").exists());
}

#[tokio::test]
async fn test_http_failure_maps_to_exit_code_9() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data/track_1/analysis_1.ttl");
        then.status(503);
    });

    let config = test_config(&dir);
    let err = engine_for(&server, &config, ExportMode::All)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, WrangleError::HttpStatus { status: 503, .. }));
    assert_eq!(err.exit_code(), 9);
    // nothing was written
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
