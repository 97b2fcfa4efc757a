use crate::core::annalist;
use crate::core::fetch::RdfClient;
use crate::domain::model::{ExportMode, ExportSet};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::rdf::Graph;
use crate::utils::error::Result;

/// Export pipeline for a single CALMA analysis document.
pub struct AnalysisPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: RdfClient,
    url: String,
    mode: ExportMode,
}

impl<S: Storage, C: ConfigProvider> AnalysisPipeline<S, C> {
    pub fn new(storage: S, config: C, client: RdfClient, url: String, mode: ExportMode) -> Self {
        Self {
            storage,
            config,
            client,
            url,
            mode,
        }
    }
}

/// Write every record of an export set through the storage port.
pub(crate) async fn write_entities<S: Storage>(storage: &S, set: &ExportSet) -> Result<()> {
    for entity in &set.entities {
        let body = serde_json::to_string_pretty(&entity.body)?;
        tracing::debug!("Writing {}", entity.path);
        storage.write_file(&entity.path, body.as_bytes()).await?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AnalysisPipeline<S, C> {
    async fn extract(&self) -> Result<Graph> {
        self.client.fetch_graph(&self.url).await
    }

    async fn transform(&self, graph: Graph) -> Result<ExportSet> {
        Ok(annalist::build_export_set(&graph, self.mode))
    }

    async fn load(&self, set: ExportSet) -> Result<String> {
        write_entities(&self.storage, &set).await?;
        Ok(self.config.collection_dir().to_string())
    }
}
