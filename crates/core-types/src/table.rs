use crate::enums::Indicator;
use crate::error::CoreError;
use crate::structs::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The full, ordered collection of records for one loaded dataset.
///
/// A `Table` is never mutated after construction. Filtering produces a new
/// sub-table and leaves the original untouched, so a single instance can be
/// shared freely between readers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    /// Builds a table with the canonical dataset header row.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::new(Self::default_headers(), records)
    }

    /// The header row the loader requires, in dataset column order.
    pub fn default_headers() -> Vec<String> {
        let mut headers = vec!["Country".to_string(), "Year".to_string()];
        headers.extend(Indicator::ALL.iter().map(|i| i.column_name().to_string()));
        headers
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct countries in the order they are first encountered.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(Record::country)
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// The smallest and largest present year, or `None` when no record has a year.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.records
            .iter()
            .filter_map(|r| r.year)
            .fold(None, |bounds, year| match bounds {
                None => Some((year, year)),
                Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
            })
    }

    /// Returns the sub-table of records accepted by `filter`, in table order.
    pub fn filter(&self, filter: &TableFilter) -> Table {
        let records = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Table::new(self.headers.clone(), records)
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Country and year-range selection applied by the dashboard.
///
/// An empty country list selects every country. Year bounds are inclusive; once
/// a bound is set, records without a year no longer match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    #[serde(default)]
    pub countries: Vec<String>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
}

impl TableFilter {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(from), Some(to)) = (self.from_year, self.to_year) {
            if from > to {
                return Err(CoreError::InvalidInput(
                    "year range".to_string(),
                    format!("from {} is after to {}", from, to),
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.countries.is_empty() {
            match record.country() {
                Some(c) if self.countries.iter().any(|s| s == c) => {}
                _ => return false,
            }
        }
        if self.from_year.is_none() && self.to_year.is_none() {
            return true;
        }
        match record.year {
            Some(year) => {
                self.from_year.is_none_or(|from| year >= from)
                    && self.to_year.is_none_or(|to| year <= to)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_records(vec![
            Record::new("Norway", 2000),
            Record::new("Chad", 2005),
            Record::new("Norway", 2010),
            Record {
                country: Some("Peru".to_string()),
                ..Record::default()
            },
        ])
    }

    #[test]
    fn countries_keep_first_encounter_order() {
        assert_eq!(sample().countries(), vec!["Norway", "Chad", "Peru"]);
    }

    #[test]
    fn year_bounds_skip_absent_years() {
        assert_eq!(sample().year_bounds(), Some((2000, 2010)));
        assert_eq!(Table::default().year_bounds(), None);
    }

    #[test]
    fn empty_filter_selects_everything() {
        let table = sample();
        assert_eq!(table.filter(&TableFilter::default()), table);
    }

    #[test]
    fn filter_by_country_and_years() {
        let filter = TableFilter {
            countries: vec!["Norway".to_string(), "Peru".to_string()],
            from_year: Some(2005),
            to_year: None,
        };
        let filtered = sample().filter(&filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].year, Some(2010));
        assert_eq!(filtered.headers(), sample().headers());
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let filter = TableFilter {
            from_year: Some(2020),
            to_year: Some(2010),
            ..TableFilter::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn default_headers_cover_every_indicator() {
        let headers = Table::default_headers();
        assert_eq!(headers.len(), 2 + Indicator::ALL.len());
        assert_eq!(headers[2], "Avg Temperature (°C)");
    }
}
