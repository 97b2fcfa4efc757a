pub mod annalist;
pub mod engine;
pub mod explore;
pub mod fetch;
pub mod pipeline;
pub mod track;

pub use crate::domain::model::{ExportEntity, ExportMode, ExportSet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
