use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw cast entry as credited by the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditedRole {
    pub character: String,
}

impl CreditedRole {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
        }
    }
}

/// A lowercase token accepted as a plausible given name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub(crate) fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Distinct names for one film, in credit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterSet(Vec<NormalizedName>);

impl CharacterSet {
    /// Appends `name` unless it is already present. Returns whether it was added.
    pub(crate) fn insert(&mut self, name: NormalizedName) -> bool {
        if self.0.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedName> {
        self.0.iter()
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(NormalizedName::as_str).collect()
    }
}

impl<'a> IntoIterator for &'a CharacterSet {
    type Item = &'a NormalizedName;
    type IntoIter = std::slice::Iter<'a, NormalizedName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A ranked film as listed on the box-office page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilmRef {
    pub title: String,
    pub release_year: i32,
}

impl FilmRef {
    pub fn new(title: impl Into<String>, release_year: i32) -> Self {
        Self {
            title: title.into(),
            release_year,
        }
    }

    /// Key used for caching casts.
    pub fn cache_key(&self) -> String {
        format!("{} ({})", self.title, self.release_year)
    }
}

impl fmt::Display for FilmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.release_year)
    }
}

#[derive(Debug, Clone)]
pub struct FilmCast {
    pub film: FilmRef,
    pub cast: Vec<CreditedRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmEntry {
    pub title: String,
    pub release_year: i32,
    pub characters: CharacterSet,
}

/// Popularity of one character name around a film's release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub title: String,
    pub release_year: i32,
    pub name: String,
    pub before_year: i32,
    pub before_pct: f64,
    pub after_start_year: i32,
    pub after_end_year: i32,
    pub after_pct: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub films: Vec<FilmEntry>,
    pub rows: Vec<ComparisonRow>,
    pub skipped_lookups: usize,
}
