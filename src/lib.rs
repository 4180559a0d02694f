pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{
    cast_store::{FileCastStore, MemoryCastStore},
    catalog::HttpFilmCatalog,
    http::HttpFetcher,
    metadata::MetadataClient,
    storage::LocalStorage,
};
pub use app::pipelines::NamesPipeline;
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, popularity::PopularityIndex};
pub use utils::error::{EtlError, Result};
