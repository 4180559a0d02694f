use crate::utils::error::{EtlError, Result};
use std::collections::{BTreeMap, HashMap};

/// Births for one year: lowercase name -> count summed across sex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearTable {
    counts: HashMap<String, u64>,
    total: u64,
}

impl YearTable {
    pub fn add(&mut self, name: &str, births: u64) {
        *self.counts.entry(name.to_lowercase()).or_insert(0) += births;
        self.total += births;
    }

    pub fn count(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    #[cfg(test)]
    pub(crate) fn distinct_names(&self) -> usize {
        self.counts.len()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for YearTable {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut table = YearTable::default();
        for (name, births) in iter {
            table.add(name.as_ref(), births);
        }
        table
    }
}

#[derive(Debug, Clone, Default)]
pub struct PopularityIndex {
    years: BTreeMap<i32, YearTable>,
}

impl PopularityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_year(&mut self, year: i32, table: YearTable) {
        self.years.insert(year, table);
    }

    pub fn year(&self, year: i32) -> Option<&YearTable> {
        self.years.get(&year)
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn year_span(&self) -> Option<(i32, i32)> {
        let first = *self.years.keys().next()?;
        let last = *self.years.keys().next_back()?;
        Some((first, last))
    }

    /// Percentage of births named `name` over `start_year ..= start_year + window - 1`,
    /// rounded to two decimals.
    ///
    /// Years missing from the index are ignored. Fails with
    /// [`EtlError::DataUnavailableError`] when the window holds no births at all.
    pub fn popularity(&self, name: &str, start_year: i32, window: u32) -> Result<f64> {
        let name = name.to_lowercase();
        let unavailable = |end_year: i32| EtlError::DataUnavailableError {
            name: name.clone(),
            start_year,
            end_year,
        };

        if window == 0 {
            return Err(unavailable(start_year.saturating_sub(1)));
        }
        let end_year = window_end(start_year, window).ok_or_else(|| unavailable(i32::MAX))?;

        let (name_count, total_count) = self
            .years
            .range(start_year..=end_year)
            .fold((0u64, 0u64), |(named, total), (_, table)| {
                (named + table.count(&name), total + table.total())
            });

        if total_count == 0 {
            return Err(unavailable(end_year));
        }

        let percent = name_count as f64 / total_count as f64 * 100.0;
        Ok(round_to_hundredths(percent))
    }
}

/// Last year of a `window`-year span starting at `start_year`, or `None` when
/// the window is empty or runs past `i32::MAX`.
pub fn window_end(start_year: i32, window: u32) -> Option<i32> {
    let span = i32::try_from(window).ok()?.checked_sub(1)?;
    if span < 0 {
        return None;
    }
    start_year.checked_add(span)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, u64)]) -> YearTable {
        rows.iter().copied().collect()
    }

    fn index() -> PopularityIndex {
        let mut index = PopularityIndex::new();
        index.insert_year(
            1996,
            table(&[("James", 300), ("Mary", 600), ("James", 100), ("Anna", 1000)]),
        );
        index.insert_year(1997, table(&[("james", 500), ("Rose", 1500)]));
        index.insert_year(1998, table(&[("Rose", 2000), ("Jack", 2000)]));
        index
    }

    #[test]
    fn test_single_year_sums_across_sex() {
        // 400 of 2000
        assert_eq!(index().popularity("james", 1996, 1).unwrap(), 20.0);
    }

    #[test]
    fn test_window_averages_over_pooled_births() {
        // (1500 + 2000) of (2000 + 4000)
        assert_eq!(index().popularity("rose", 1997, 2).unwrap(), 58.33);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let index = index();
        assert_eq!(
            index.popularity("JAMES", 1997, 1).unwrap(),
            index.popularity("james", 1997, 1).unwrap()
        );
    }

    #[test]
    fn test_missing_name_counts_zero() {
        assert_eq!(index().popularity("zelda", 1996, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_years_in_window_are_ignored() {
        // only 1998 present
        assert_eq!(index().popularity("jack", 1998, 5).unwrap(), 50.0);
    }

    #[test]
    fn test_empty_year_is_data_unavailable() {
        let mut index = PopularityIndex::new();
        index.insert_year(2001, YearTable::default());
        let err = index.popularity("amelie", 2001, 1).unwrap_err();
        assert!(matches!(
            err,
            EtlError::DataUnavailableError { start_year: 2001, end_year: 2001, .. }
        ));
    }

    #[test]
    fn test_absent_year_and_zero_window_are_data_unavailable() {
        assert!(index().popularity("rose", 1950, 1).is_err());
        assert!(index().popularity("rose", 1997, 0).is_err());
    }

    #[test]
    fn test_oversized_window_is_data_unavailable() {
        let index = index();
        for window in [u32::MAX, i32::MAX as u32, i32::MAX as u32 + 1] {
            let err = index.popularity("rose", 1990, window).unwrap_err();
            assert!(matches!(err, EtlError::DataUnavailableError { start_year: 1990, .. }));
        }
    }

    #[test]
    fn test_window_end() {
        assert_eq!(window_end(1998, 1), Some(1998));
        assert_eq!(window_end(1998, 5), Some(2002));
        assert_eq!(window_end(1998, 0), None);
        assert_eq!(window_end(1998, u32::MAX), None);
        assert_eq!(window_end(i32::MAX, 2), None);
    }

    #[test]
    fn test_year_span() {
        assert_eq!(index().year_span(), Some((1996, 1998)));
        assert_eq!(PopularityIndex::new().year_span(), None);
    }
}
