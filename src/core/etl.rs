use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting movie-names run");

        // Extract
        tracing::info!("Extracting ranked films and casts...");
        let films = self.pipeline.extract().await?;
        tracing::info!("Extracted casts for {} films", films.len());

        // Transform
        tracing::info!("Matching character names against birth records...");
        let report = self.pipeline.transform(films).await?;
        tracing::info!(
            "Built {} comparison rows ({} lookups skipped)",
            report.rows.len(),
            report.skipped_lookups
        );

        // Load
        tracing::info!("Writing results...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {} in {:?}", output_path, started.elapsed());

        Ok(output_path)
    }
}
