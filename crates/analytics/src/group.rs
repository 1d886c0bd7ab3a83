//! Missing-value aware building blocks shared by every query.
//!
//! All helpers skip records whose requested fields are absent. Nothing here
//! ever substitutes zero for a missing reading.

use crate::report::CountryValue;
use core_types::{Indicator, Table};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Arithmetic mean, or `None` for an empty input.
pub fn mean_of<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Present values of one indicator, in table order.
pub fn present(table: &Table, indicator: Indicator) -> impl Iterator<Item = f64> + '_ {
    table.iter().filter_map(move |r| indicator.value(r))
}

/// `(a, b)` pairs from records where both indicators are present, in table order.
pub fn filtered_pairs(
    table: &Table,
    a: Indicator,
    b: Indicator,
) -> impl Iterator<Item = (f64, f64)> + '_ {
    table
        .iter()
        .filter_map(move |r| Some((a.value(r)?, b.value(r)?)))
}

/// First and last element of an iterator.
pub fn first_last<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter();
    let first = iter.next()?;
    Some((first, iter.last().unwrap_or(first)))
}

/// Stable sort, highest value first. Ties keep their existing order.
pub fn rank_descending(values: &mut [CountryValue]) {
    values.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
}

/// Present readings of one indicator grouped by country.
///
/// Countries are kept in the order of their first qualifying record, which
/// makes every "first N countries" question deterministic.
#[derive(Debug, Clone, Default)]
pub struct CountryGroups {
    groups: Vec<(String, Vec<f64>)>,
    index: HashMap<String, usize>,
}

impl CountryGroups {
    /// Groups every record that has both a country and `indicator`.
    pub fn collect(table: &Table, indicator: Indicator) -> Self {
        let mut groups = Self::default();
        for record in table {
            if let (Some(country), Some(value)) = (record.country(), indicator.value(record)) {
                groups.push(country, value);
            }
        }
        groups
    }

    fn push(&mut self, country: &str, value: f64) {
        let slot = match self.index.get(country) {
            Some(&i) => i,
            None => {
                self.groups.push((country.to_string(), Vec::new()));
                self.index.insert(country.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].1.push(value);
    }

    pub fn values(&self, country: &str) -> Option<&[f64]> {
        self.index
            .get(country)
            .map(|&i| self.groups[i].1.as_slice())
    }

    pub fn mean(&self, country: &str) -> Option<f64> {
        self.values(country)
            .and_then(|values| mean_of(values.iter().copied()))
    }

    /// Per-country means in first-encounter order.
    pub fn means(&self) -> Vec<CountryValue> {
        self.groups
            .iter()
            .filter_map(|(country, values)| {
                mean_of(values.iter().copied()).map(|value| CountryValue::new(country, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::Record;

    fn co2(country: &str, year: i32, value: Option<f64>) -> Record {
        Record {
            co2_per_capita: value,
            ..Record::new(country, year)
        }
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean_of(Vec::new()), None);
        assert_relative_eq!(mean_of(vec![1.0, 2.0, 4.5]).unwrap(), 2.5);
    }

    #[test]
    fn groups_skip_absent_values_and_keep_order() {
        let table = Table::from_records(vec![
            co2("B", 2000, Some(4.0)),
            co2("A", 2000, None),
            co2("A", 2001, Some(1.0)),
            co2("B", 2001, Some(6.0)),
            co2("C", 2000, None),
        ]);
        let groups = CountryGroups::collect(&table, Indicator::Co2);

        let order: Vec<_> = groups.means().into_iter().map(|v| v.country).collect();
        assert_eq!(order, vec!["B", "A"]);
        assert_eq!(groups.values("C"), None);
        assert_eq!(groups.values("B"), Some(&[4.0, 6.0][..]));
        assert_relative_eq!(groups.mean("B").unwrap(), 5.0);
        assert_eq!(groups.mean("C"), None);
    }

    #[test]
    fn filtered_pairs_require_both_fields() {
        let table = Table::from_records(vec![
            Record {
                rainfall_mm: Some(900.0),
                extreme_weather_events: Some(3.0),
                ..Record::default()
            },
            Record {
                rainfall_mm: Some(700.0),
                ..Record::default()
            },
            Record {
                rainfall_mm: Some(650.0),
                extreme_weather_events: Some(0.0),
                ..Record::default()
            },
        ]);
        let pairs: Vec<_> =
            filtered_pairs(&table, Indicator::Rainfall, Indicator::ExtremeEvents).collect();
        assert_eq!(pairs, vec![(900.0, 3.0), (650.0, 0.0)]);
    }

    #[test]
    fn rank_descending_is_stable() {
        let mut values = vec![
            CountryValue::new("A", 1.0),
            CountryValue::new("B", 3.0),
            CountryValue::new("C", 1.0),
            CountryValue::new("D", 3.0),
        ];
        rank_descending(&mut values);
        let order: Vec<_> = values.iter().map(|v| v.country.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn first_last_of_single_value() {
        assert_eq!(first_last(vec![7.0]), Some((7.0, 7.0)));
        assert_eq!(first_last(vec![1.0, 2.0, 3.0]), Some((1.0, 3.0)));
        assert_eq!(first_last(Vec::new()), None);
    }
}
