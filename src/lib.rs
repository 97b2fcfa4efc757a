pub mod config;
pub mod core;
pub mod domain;
pub mod rdf;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command};
pub use config::{storage::LocalStorage, WrangleConfig};

pub use crate::core::{
    engine::WrangleEngine, fetch::RdfClient, pipeline::AnalysisPipeline, track::TrackPipeline,
};
pub use crate::domain::model::ExportMode;
pub use crate::utils::error::{Result, WrangleError};
