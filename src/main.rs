use clap::Parser;
use movie_names::adapters::births;
use movie_names::core::ConfigProvider;
use movie_names::utils::error::{ErrorSeverity, EtlError};
use movie_names::utils::{logger, validation::Validate};
use movie_names::{
    CliConfig, EtlEngine, FileCastStore, HttpFetcher, HttpFilmCatalog, LocalStorage,
    MetadataClient, NamesPipeline, TomlConfig,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting movie-names CLI");

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli).await,
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Run completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Severity: {:?})",
                e,
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run<C>(config: C) -> movie_names::Result<String>
where
    C: ConfigProvider + Validate + 'static,
{
    config.validate()?;

    let fetcher = HttpFetcher::new(config.http_settings())?;

    let names_source = Path::new(config.names_source()).to_path_buf();
    if let Some(url) = config.names_url() {
        births::ensure_archive(&fetcher, url, &names_source).await?;
    }
    let (start_year, end_year) = (config.start_year(), config.end_year());
    let index = tokio::task::spawn_blocking(move || {
        births::load_index(&names_source, start_year, end_year)
    })
    .await
    .map_err(|e| EtlError::ProcessingError {
        message: format!("birth record loader failed: {}", e),
    })??;

    let api_key = config
        .api_key()
        .ok_or_else(|| EtlError::MissingConfigError {
            field: "metadata.api_key".to_string(),
        })?;
    let cache = LocalStorage::new(config.cache_dir());
    let metadata = MetadataClient::new(fetcher.clone(), config.metadata_endpoint(), api_key);
    let catalog = HttpFilmCatalog::new(
        fetcher,
        config.ranking_url(),
        metadata,
        cache.clone(),
        FileCastStore::new(cache),
    );

    let storage = LocalStorage::new(config.output_path());
    let pipeline = NamesPipeline::new(storage, config, Arc::new(catalog), Arc::new(index));

    EtlEngine::new(pipeline).run().await
}
