//! SSA birth-record loading.
//!
//! Each year is a headerless `yobYYYY.txt` CSV of `name,sex,count` rows. The
//! files are read either from a directory or straight out of the published
//! `names.zip` archive.

use crate::adapters::http::HttpFetcher;
use crate::core::popularity::{PopularityIndex, YearTable};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::LazyLock;

static YEAR_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^yob(\d{4})\.txt$").expect("year file regex"));

/// Aggregates one year file into a lowercase name -> count table.
pub fn parse_year_file<R: Read>(reader: R) -> Result<YearTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = YearTable::default();
    for row in csv_reader.deserialize::<(String, String, u64)>() {
        let (name, _sex, births) = row?;
        table.add(&name, births);
    }
    Ok(table)
}

/// Loads every year in `start_year..=end_year` found at `source`.
///
/// `source` is a directory of year files or a zip archive containing them.
/// Years without a file are left out of the index.
pub fn load_index(source: &Path, start_year: i32, end_year: i32) -> Result<PopularityIndex> {
    let index = if source.is_dir() {
        load_from_dir(source, start_year, end_year)?
    } else if source.is_file() {
        let file = File::open(source)?;
        load_from_archive(BufReader::new(file), start_year, end_year)?
    } else {
        return Err(EtlError::ConfigError {
            message: format!("birth records not found at {}", source.display()),
        });
    };

    match index.year_span() {
        Some((first, last)) => tracing::info!(
            "Loaded birth records for {} years ({}..={})",
            index.year_count(),
            first,
            last
        ),
        None => tracing::warn!(
            "No birth records between {} and {} in {}",
            start_year,
            end_year,
            source.display()
        ),
    }
    Ok(index)
}

fn load_from_dir(dir: &Path, start_year: i32, end_year: i32) -> Result<PopularityIndex> {
    let mut index = PopularityIndex::new();
    for year in start_year..=end_year {
        let path = dir.join(format!("yob{}.txt", year));
        if !path.is_file() {
            tracing::debug!("No file for {}", year);
            continue;
        }
        let table = parse_year_file(BufReader::new(File::open(&path)?))?;
        index.insert_year(year, table);
    }
    Ok(index)
}

pub fn load_from_archive<R: Read + Seek>(
    reader: R,
    start_year: i32,
    end_year: i32,
) -> Result<PopularityIndex> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut index = PopularityIndex::new();

    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let Some(year) = year_of(entry.name()) else {
            continue;
        };
        if year < start_year || year > end_year {
            continue;
        }
        let table = parse_year_file(entry)?;
        index.insert_year(year, table);
    }
    Ok(index)
}

fn year_of(entry_name: &str) -> Option<i32> {
    let file_name = Path::new(entry_name).file_name()?.to_str()?;
    YEAR_FILE_RE.captures(file_name)?[1].parse().ok()
}

/// Downloads the names archive to `dest` unless something already exists there.
pub async fn ensure_archive(fetcher: &HttpFetcher, url: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        return Ok(());
    }

    tracing::info!("Downloading birth records from {}", url);
    let bytes = fetcher.get_bytes(url).await?;
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, bytes).await?;
    Ok(())
}
