use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a pipeline through extract / transform / load.
pub struct WrangleEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> WrangleEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Reading analysis data...");
        let graph = self.pipeline.extract().await?;
        tracing::info!("Read {} triples", graph.len());
        self.monitor.log_stats("extract");

        tracing::info!("Deriving Annalist records...");
        let set = self.pipeline.transform(graph).await?;
        if set.is_empty() {
            tracing::warn!("No records derived; nothing will be written");
        }
        tracing::info!(
            "Derived {} records ({} types, {} subjects)",
            set.len(),
            set.type_count,
            set.subject_count
        );
        self.monitor.log_stats("transform");

        tracing::info!("Writing collection data...");
        let output = self.pipeline.load(set).await?;
        self.monitor.log_stats("load");

        Ok(output)
    }
}
