use std::time::Duration;

use async_trait::async_trait;

use crate::domain::model::ExportSet;
use crate::rdf::Graph;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn collection_dir(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Graph>;
    async fn transform(&self, graph: Graph) -> Result<ExportSet>;
    async fn load(&self, set: ExportSet) -> Result<String>;
}
