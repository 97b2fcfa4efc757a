//! Export of every analysis referenced by a CALMA track document.

use regex::Regex;
use std::collections::BTreeSet;
use url::Url;

use crate::core::annalist;
use crate::core::fetch::RdfClient;
use crate::core::pipeline::write_entities;
use crate::domain::model::{ExportMode, ExportSet};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::rdf::Graph;
use crate::utils::error::{Result, WrangleError};

/// IRIs in the track graph that point at analysis documents. CALMA uses
/// URLs of the form `/data/track_<uuid>/analysis_<uuid>.ttl`; any IRI with
/// an `analysis_` segment qualifies. Fragments are stripped so that
/// in-document references collapse onto their document URL.
pub fn discover_analyses(graph: &Graph, track_url: &str) -> Vec<String> {
    let pattern = Regex::new(r"analysis_[0-9A-Za-z-]+").expect("valid analysis pattern");
    let mut found = BTreeSet::new();
    for triple in graph.iter() {
        for term in [&triple.subject, &triple.object] {
            let Some(iri) = term.as_iri() else { continue };
            if !pattern.is_match(iri) {
                continue;
            }
            let document = match Url::parse(iri) {
                Ok(mut u) => {
                    u.set_fragment(None);
                    u.to_string()
                }
                Err(_) => iri.to_string(),
            };
            if document != track_url {
                found.insert(document);
            }
        }
    }
    found.into_iter().collect()
}

/// Pipeline for `export-multiple`: reads a track document, then fetches
/// and exports each analysis it references.
pub struct TrackPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: RdfClient,
    url: String,
}

impl<S: Storage, C: ConfigProvider> TrackPipeline<S, C> {
    pub fn new(storage: S, config: C, client: RdfClient, url: String) -> Self {
        Self {
            storage,
            config,
            client,
            url,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TrackPipeline<S, C> {
    async fn extract(&self) -> Result<Graph> {
        self.client.fetch_graph(&self.url).await
    }

    async fn transform(&self, graph: Graph) -> Result<ExportSet> {
        let analyses = discover_analyses(&graph, &self.url);
        if analyses.is_empty() {
            return Err(WrangleError::ProcessingError {
                message: format!("no analyses referenced by track document {}", self.url),
            });
        }
        tracing::info!("Track references {} analyses", analyses.len());

        let mut set = ExportSet::default();
        for analysis_url in &analyses {
            tracing::info!("Analysis {}", analysis_url);
            let analysis = self.client.fetch_graph(analysis_url).await?;
            set.merge(annalist::build_export_set(&analysis, ExportMode::All));
        }
        Ok(set)
    }

    async fn load(&self, set: ExportSet) -> Result<String> {
        write_entities(&self.storage, &set).await?;
        Ok(self.config.collection_dir().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::turtle;

    #[test]
    fn test_discover_analyses_resolves_and_deduplicates() {
        let track_url = "http://calma.linkedmusic.org/data/track_1/";
        let g = turtle::parse(
            "@prefix calma: <http://calma.linkedmusic.org/vocab/> .\n\
             <> calma:analysis <analysis_aa.ttl>, <analysis_bb.ttl> ;\n\
                calma:feature <analysis_aa.ttl#chords> .",
            Some(track_url),
        )
        .unwrap();

        let analyses = discover_analyses(&g, track_url);
        assert_eq!(
            analyses,
            vec![
                "http://calma.linkedmusic.org/data/track_1/analysis_aa.ttl",
                "http://calma.linkedmusic.org/data/track_1/analysis_bb.ttl",
            ]
        );
    }

    #[test]
    fn test_discover_analyses_ignores_unrelated_iris() {
        let track_url = "http://calma.linkedmusic.org/data/track_1/";
        let g = turtle::parse(
            "@prefix mo: <http://purl.org/ontology/mo/> .\n\
             <> a mo:Track ; mo:publisher <http://example.org/label> .",
            Some(track_url),
        )
        .unwrap();
        assert!(discover_analyses(&g, track_url).is_empty());
    }
}
