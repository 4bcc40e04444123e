pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, ConversionConfig};

pub use app::pipelines::atlas_pipeline::AtlasPipeline;
pub use crate::core::builder::ModelBuilder;
pub use crate::core::etl::{build_atlas, ConversionEngine, ConversionReport};
pub use domain::model::{Atlas, AtlasDefaults, AtlasMetadata, Dialect, FrameRecord, ParseMode};
pub use utils::error::{AtlasError, Result};
