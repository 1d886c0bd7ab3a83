//! Aggregates that feed the interactive dashboard: headline tiles, per-country
//! and per-year series, the correlation matrix and scatter points.

use crate::engine::MetricsEngine;
use crate::group::{CountryGroups, filtered_pairs, mean_of, present};
use crate::report::CountryValue;
use core_types::{Indicator, Table};
use serde::Serialize;
use std::collections::BTreeMap;

/// The headline tiles shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub records: usize,
    pub mean_temperature: Option<f64>,
    pub mean_co2: Option<f64>,
    /// `None` when no record reports extreme events, which is not the same as zero events.
    pub total_extreme_events: Option<f64>,
    pub mean_renewable: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub x: f64,
    pub y: f64,
}

/// Pearson coefficients between every pair of indicators.
///
/// Each pair uses only the records where both indicators are present. A cell is
/// `None` when fewer than two such records exist or either side is constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub indicators: Vec<Indicator>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Indicator, b: Indicator) -> Option<f64> {
        let i = self.indicators.iter().position(|x| *x == a)?;
        let j = self.indicators.iter().position(|x| *x == b)?;
        self.values[i][j]
    }
}

impl MetricsEngine {
    pub fn kpis(&self, table: &Table) -> Kpis {
        let mut events = present(table, Indicator::ExtremeEvents).peekable();
        let total_extreme_events = events.peek().is_some().then(|| events.sum());

        Kpis {
            records: table.len(),
            mean_temperature: mean_of(present(table, Indicator::Temperature)),
            mean_co2: mean_of(present(table, Indicator::Co2)),
            total_extreme_events,
            mean_renewable: mean_of(present(table, Indicator::Renewable)),
        }
    }

    /// Mean of `indicator` per country, in first-encounter order.
    pub fn country_means(&self, table: &Table, indicator: Indicator) -> Vec<CountryValue> {
        CountryGroups::collect(table, indicator).means()
    }

    /// Mean of `indicator` per year, ascending by year.
    pub fn year_means(&self, table: &Table, indicator: Indicator) -> Vec<YearValue> {
        let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for record in table {
            if let (Some(year), Some(value)) = (record.year, indicator.value(record)) {
                let entry = by_year.entry(year).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }
        by_year
            .into_iter()
            .map(|(year, (sum, count))| YearValue {
                year,
                value: sum / count as f64,
            })
            .collect()
    }

    pub fn correlation_matrix(&self, table: &Table) -> CorrelationMatrix {
        let indicators = Indicator::ALL.to_vec();
        let values = indicators
            .iter()
            .map(|&a| {
                indicators
                    .iter()
                    .map(|&b| pearson(filtered_pairs(table, a, b)))
                    .collect()
            })
            .collect();
        CorrelationMatrix { indicators, values }
    }

    /// Points for an `x` against `y` scatter plot, labelled by country.
    pub fn scatter_points(&self, table: &Table, x: Indicator, y: Indicator) -> Vec<ScatterPoint> {
        table
            .iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    country: r.country()?.to_string(),
                    x: x.value(r)?,
                    y: y.value(r)?,
                })
            })
            .collect()
    }
}

fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
