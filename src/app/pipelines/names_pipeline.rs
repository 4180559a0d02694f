use crate::core::extractor::extract_characters;
use crate::core::popularity::{window_end, PopularityIndex};
use crate::core::{
    ComparisonRow, ConfigProvider, FilmCast, FilmCatalog, FilmEntry, Pipeline, Report, Storage,
};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const COMPARISON_CSV: &str = "comparison.csv";
pub const FILMS_JSON: &str = "films.json";

/// Joins ranked films, their character names and birth-record popularity.
///
/// For every character name the share of births in the year before release
/// is compared with the share over `popularity_window` years starting the
/// year after release.
pub struct NamesPipeline<S: Storage, C: ConfigProvider, F: FilmCatalog> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) catalog: Arc<F>,
    pub(crate) index: Arc<PopularityIndex>,
}

impl<S: Storage, C: ConfigProvider, F: FilmCatalog> NamesPipeline<S, C, F> {
    pub fn new(storage: S, config: C, catalog: Arc<F>, index: Arc<PopularityIndex>) -> Self {
        Self {
            storage,
            config,
            catalog,
            index,
        }
    }

    fn compare(&self, entry: &FilmEntry) -> Result<(Vec<ComparisonRow>, usize)> {
        let window = self.config.popularity_window();
        let before_year = entry.release_year - 1;
        let after_start_year = entry.release_year + 1;
        let after_end_year = window_end(after_start_year, window).ok_or_else(|| {
            EtlError::InvalidConfigValueError {
                field: "extract.popularity_window".to_string(),
                value: window.to_string(),
                reason: format!("no {}-year window fits after {}", window, entry.release_year),
            }
        })?;

        let mut rows = Vec::new();
        let mut skipped = 0;
        for name in &entry.characters {
            let lookup = self
                .index
                .popularity(name.as_str(), before_year, 1)
                .and_then(|before| {
                    let after = self.index.popularity(name.as_str(), after_start_year, window)?;
                    Ok((before, after))
                });

            match lookup {
                Ok((before_pct, after_pct)) => rows.push(ComparisonRow {
                    title: entry.title.clone(),
                    release_year: entry.release_year,
                    name: name.to_string(),
                    before_year,
                    before_pct,
                    after_start_year,
                    after_end_year,
                    after_pct,
                    change_pct: ((after_pct - before_pct) * 100.0).round() / 100.0,
                }),
                Err(e @ EtlError::DataUnavailableError { .. }) => {
                    tracing::warn!("Skipping '{}' for {}: {}", name, entry.title, e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok((rows, skipped))
    }

    fn comparison_csv(rows: &[ComparisonRow]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to finish CSV output: {}", e),
        })
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    films: &'a [FilmEntry],
    comparisons: &'a [ComparisonRow],
    skipped_lookups: usize,
}

#[async_trait::async_trait]
impl<S, C, F> Pipeline for NamesPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: FilmCatalog + 'static,
{
    async fn extract(&self) -> Result<Vec<FilmCast>> {
        let films = self.catalog.list_top_films().await?;
        let concurrency = self.config.concurrent_requests().max(1);
        tracing::info!(
            "Fetching casts for {} films ({} at a time)",
            films.len(),
            concurrency
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();
        let total = films.len();

        for (position, film) in films.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| EtlError::ProcessingError {
                        message: format!("worker pool closed: {}", e),
                    })?;
                let cast = catalog.get_cast(&film).await?;
                Ok::<_, EtlError>((position, FilmCast { film, cast }))
            });
        }

        let mut slots: Vec<Option<FilmCast>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (position, film_cast) = joined.map_err(|e| EtlError::ProcessingError {
                message: format!("cast worker failed: {}", e),
            })??;
            slots[position] = Some(film_cast);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    async fn transform(&self, data: Vec<FilmCast>) -> Result<Report> {
        let max_chars = self.config.max_chars_per_movie();
        let mut report = Report::default();

        for FilmCast { film, cast } in data {
            let characters = extract_characters(&cast, max_chars);
            tracing::debug!("{}: {:?}", film, characters.as_strs());

            let entry = FilmEntry {
                title: film.title,
                release_year: film.release_year,
                characters,
            };
            let (rows, skipped) = self.compare(&entry)?;
            report.rows.extend(rows);
            report.skipped_lookups += skipped;
            report.films.push(entry);
        }

        Ok(report)
    }

    async fn load(&self, report: Report) -> Result<String> {
        for row in &report.rows {
            println!(
                "{} ({}) {}: {:.2}% in {} -> {:.2}% in {}..={} ({:+.2})",
                row.title,
                row.release_year,
                row.name,
                row.before_pct,
                row.before_year,
                row.after_pct,
                row.after_start_year,
                row.after_end_year,
                row.change_pct
            );
        }

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    let data = Self::comparison_csv(&report.rows)?;
                    self.storage.write_file(COMPARISON_CSV, &data).await?;
                    tracing::debug!("Wrote {}", COMPARISON_CSV);
                }
                "json" => {
                    let json = JsonReport {
                        films: &report.films,
                        comparisons: &report.rows,
                        skipped_lookups: report.skipped_lookups,
                    };
                    let data = serde_json::to_vec_pretty(&json)?;
                    self.storage.write_file(FILMS_JSON, &data).await?;
                    tracing::debug!("Wrote {}", FILMS_JSON);
                }
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "load.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            }
        }

        Ok(Path::new(self.config.output_path()).display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::popularity::YearTable;
    use crate::core::{CreditedRole, FilmRef};
    use crate::domain::ports::HttpSettings;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn exists(&self, path: &str) -> bool {
            self.files.lock().await.contains_key(path)
        }
    }

    struct StaticCatalog {
        films: Vec<(FilmRef, Vec<&'static str>)>,
        cast_calls: AtomicUsize,
    }

    #[async_trait]
    impl FilmCatalog for StaticCatalog {
        async fn list_top_films(&self) -> Result<Vec<FilmRef>> {
            Ok(self.films.iter().map(|(film, _)| film.clone()).collect())
        }

        async fn get_cast(&self, film: &FilmRef) -> Result<Vec<CreditedRole>> {
            self.cast_calls.fetch_add(1, Ordering::SeqCst);
            self.films
                .iter()
                .find(|(f, _)| f == film)
                .map(|(_, cast)| cast.iter().map(|c| CreditedRole::new(*c)).collect())
                .ok_or_else(|| EtlError::retrieval(film.to_string(), "unknown film"))
        }
    }

    struct TestConfig {
        window: u32,
        formats: Vec<String>,
    }

    impl ConfigProvider for TestConfig {
        fn ranking_url(&self) -> &str {
            "http://localhost/ranking"
        }
        fn metadata_endpoint(&self) -> &str {
            "http://localhost/3"
        }
        fn api_key(&self) -> Option<&str> {
            Some("k")
        }
        fn names_source(&self) -> &str {
            "./names"
        }
        fn names_url(&self) -> Option<&str> {
            None
        }
        fn start_year(&self) -> i32 {
            1996
        }
        fn end_year(&self) -> i32 {
            1999
        }
        fn max_chars_per_movie(&self) -> usize {
            3
        }
        fn popularity_window(&self) -> u32 {
            self.window
        }
        fn concurrent_requests(&self) -> usize {
            2
        }
        fn cache_dir(&self) -> &str {
            "./cache"
        }
        fn output_path(&self) -> &str {
            "./output"
        }
        fn output_formats(&self) -> &[String] {
            &self.formats
        }
        fn http_settings(&self) -> HttpSettings {
            HttpSettings::default()
        }
    }

    fn table(rows: &[(&str, u64)]) -> YearTable {
        rows.iter().copied().collect()
    }

    fn index() -> PopularityIndex {
        let mut index = PopularityIndex::new();
        index.insert_year(1996, table(&[("Rose", 10), ("Other", 990)]));
        index.insert_year(1997, table(&[("Rose", 20), ("Other", 980)]));
        index.insert_year(1998, table(&[("Rose", 50), ("Jack", 100), ("Other", 850)]));
        index.insert_year(1999, table(&[("Rose", 30), ("Other", 970)]));
        index.insert_year(2000, YearTable::default());
        index
    }

    fn pipeline(
        films: Vec<(FilmRef, Vec<&'static str>)>,
        window: u32,
    ) -> NamesPipeline<MockStorage, TestConfig, StaticCatalog> {
        NamesPipeline::new(
            MockStorage::default(),
            TestConfig {
                window,
                formats: vec!["csv".to_string(), "json".to_string()],
            },
            Arc::new(StaticCatalog {
                films,
                cast_calls: AtomicUsize::new(0),
            }),
            Arc::new(index()),
        )
    }

    #[tokio::test]
    async fn test_extract_preserves_ranking_order() {
        let films = vec![
            (FilmRef::new("Titanic", 1997), vec!["Rose DeWitt Bukater"]),
            (FilmRef::new("Armageddon", 1998), vec!["Harry Stamper"]),
            (FilmRef::new("Godzilla", 1998), vec!["Dr. Niko Tatopoulos"]),
        ];
        let pipeline = pipeline(films, 1);

        let casts = pipeline.extract().await.unwrap();
        let titles: Vec<_> = casts.iter().map(|c| c.film.title.as_str()).collect();
        assert_eq!(titles, vec!["Titanic", "Armageddon", "Godzilla"]);
        assert_eq!(pipeline.catalog.cast_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transform_compares_year_before_with_window_after() {
        let films = vec![(
            FilmRef::new("Titanic", 1997),
            vec!["Rose DeWitt Bukater", "Jack Dawson", "The Narrator", "Cal Hockley"],
        )];
        let pipeline = pipeline(films, 2);

        let casts = pipeline.extract().await.unwrap();
        let report = pipeline.transform(casts).await.unwrap();

        assert_eq!(report.films[0].characters.as_strs(), vec!["rose", "jack"]);
        let rose = &report.rows[0];
        assert_eq!(rose.name, "rose");
        assert_eq!(rose.before_year, 1996);
        assert_eq!(rose.before_pct, 1.0);
        assert_eq!((rose.after_start_year, rose.after_end_year), (1998, 1999));
        // (50 + 30) / 2000
        assert_eq!(rose.after_pct, 4.0);
        assert_eq!(rose.change_pct, 3.0);

        let jack = &report.rows[1];
        assert_eq!(jack.before_pct, 0.0);
        assert_eq!(jack.after_pct, 5.0);
    }

    #[tokio::test]
    async fn test_transform_skips_lookups_outside_loaded_years() {
        let films = vec![(FilmRef::new("Gladiator", 2000), vec!["Maximus", "Lucilla"])];
        let pipeline = pipeline(films, 1);

        let casts = pipeline.extract().await.unwrap();
        let report = pipeline.transform(casts).await.unwrap();

        assert_eq!(report.films.len(), 1);
        assert!(report.rows.is_empty());
        assert_eq!(report.skipped_lookups, 2);
    }

    #[tokio::test]
    async fn test_transform_rejects_unrepresentable_window() {
        let films = vec![(FilmRef::new("Titanic", 1997), vec!["Rose DeWitt Bukater"])];
        let pipeline = pipeline(films, u32::MAX);

        let casts = pipeline.extract().await.unwrap();
        let err = pipeline.transform(casts).await.unwrap_err();
        assert!(matches!(
            err,
            EtlError::InvalidConfigValueError { ref field, .. } if field == "extract.popularity_window"
        ));
    }

    #[tokio::test]
    async fn test_extract_propagates_retrieval_error() {
        struct BrokenCatalog;

        #[async_trait]
        impl FilmCatalog for BrokenCatalog {
            async fn list_top_films(&self) -> Result<Vec<FilmRef>> {
                Ok(vec![FilmRef::new("Titanic", 1997), FilmRef::new("Missing", 1999)])
            }

            async fn get_cast(&self, film: &FilmRef) -> Result<Vec<CreditedRole>> {
                if film.title == "Missing" {
                    return Err(EtlError::retrieval("http://localhost/3/search/movie", "HTTP 404"));
                }
                Ok(vec![CreditedRole::new("Rose")])
            }
        }

        let pipeline = NamesPipeline::new(
            MockStorage::default(),
            TestConfig {
                window: 1,
                formats: vec!["csv".to_string()],
            },
            Arc::new(BrokenCatalog),
            Arc::new(index()),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::RetrievalError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_csv_and_json() {
        let films = vec![(FilmRef::new("Titanic", 1997), vec!["Rose DeWitt Bukater"])];
        let pipeline = pipeline(films, 1);

        let casts = pipeline.extract().await.unwrap();
        let report = pipeline.transform(casts).await.unwrap();
        let output = pipeline.load(report).await.unwrap();
        assert!(output.contains("output"));

        let files = pipeline.storage.files.lock().await;
        let csv = String::from_utf8(files.get(COMPARISON_CSV).unwrap().clone()).unwrap();
        assert!(csv.starts_with("title,release_year,name,before_year,before_pct"));
        assert!(csv.contains("Titanic,1997,rose,1996,1.0,1998,1998,5.0,4.0"));

        let json: serde_json::Value = serde_json::from_slice(files.get(FILMS_JSON).unwrap()).unwrap();
        assert_eq!(json["films"][0]["characters"], serde_json::json!(["rose"]));
        assert_eq!(json["skipped_lookups"], 0);
    }
}
