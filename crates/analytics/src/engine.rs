use crate::error::AnalyticsError;
use crate::group::{CountryGroups, filtered_pairs, first_last, mean_of, rank_descending};
use crate::report::{
    ClimateReport, CountryValue, ForestCo2, PopulationCo2Trend, RenewableSplit, ReportOptions,
    ScoreBoard, TemperatureDelta,
};
use configuration::Thresholds;
use core_types::{Indicator, Table};
use std::collections::HashMap;
use tracing::debug;

/// Average CO2, renewable share and forest cover of one country.
#[derive(Debug, Clone, PartialEq)]
struct CountryProfile {
    country: String,
    co2: f64,
    renewable: f64,
    forest: f64,
}

impl CountryProfile {
    fn score(&self) -> f64 {
        -self.co2 + self.renewable + self.forest
    }
}

/// A stateless calculator for the exploratory climate questions.
///
/// The engine only holds its classification thresholds. Every query takes the
/// table explicitly and never modifies it, so queries can run in any order.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    thresholds: Thresholds,
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Answers all twelve questions over `table`.
    ///
    /// Q5 and Q10 are asked about the countries Q2 ranks highest.
    pub fn report(&self, table: &Table, options: &ReportOptions) -> ClimateReport {
        let top_emitters = self.top_emitters(table, options.top_k);
        let top_names: Vec<String> = top_emitters.iter().map(|c| c.country.clone()).collect();

        let temperature_delta = self.temperature_delta(table);
        if let Err(e) = &temperature_delta {
            debug!(error = %e, "Temperature delta unavailable.");
        }

        let report = ClimateReport {
            total_rows: table.len(),
            headers: table.headers().to_vec(),
            temperature_delta,
            renewable_vs_co2: self.renewable_vs_co2_sample(table, options.sample_size),
            forest_vs_co2: self.forest_vs_co2(table, options.sample_size),
            population_co2_trend: self.population_co2_trend(table, &top_names),
            rainfall_vs_extreme_events: self
                .rainfall_vs_extreme_events_sample(table, options.sample_size),
            triple_challenge: self.triple_challenge_countries(table, options.top_k),
            climate_leaders: self.climate_leaders(table, options.top_k),
            co2_vs_temperature: self.co2_vs_temperature_sample(table, options.sample_size),
            renewable_split: self.developed_vs_developing_renewable(table, &top_names),
            renewable_improvement: self.renewable_improvement(table, options.top_k),
            overall_score: self.overall_score(table, options.top_k),
            top_emitters,
        };
        debug!(rows = report.total_rows, "Climate report computed.");
        report
    }

    /// Mean temperature in the first and the last year present in the table.
    pub fn temperature_delta(&self, table: &Table) -> Result<TemperatureDelta, AnalyticsError> {
        let (first_year, last_year) = table
            .year_bounds()
            .ok_or_else(|| AnalyticsError::NoData("no record has a year".to_string()))?;

        let mean_at = |year: i32| {
            mean_of(
                table
                    .iter()
                    .filter(|r| r.year == Some(year))
                    .filter_map(|r| r.avg_temperature),
            )
        };

        Ok(TemperatureDelta {
            first_year,
            last_year,
            first_mean: mean_at(first_year),
            last_mean: mean_at(last_year),
        })
    }

    /// Countries with the highest mean CO2 per capita across all years.
    pub fn top_emitters(&self, table: &Table, k: usize) -> Vec<CountryValue> {
        let mut ranked = CountryGroups::collect(table, Indicator::Co2).means();
        rank_descending(&mut ranked);
        ranked.truncate(k);
        ranked
    }

    pub fn renewable_vs_co2_sample(&self, table: &Table, n: usize) -> Vec<(f64, f64)> {
        filtered_pairs(table, Indicator::Renewable, Indicator::Co2)
            .take(n)
            .collect()
    }

    /// Mean forest cover for the first `n` countries that report it, alongside their mean CO2.
    pub fn forest_vs_co2(&self, table: &Table, n: usize) -> Vec<ForestCo2> {
        let co2 = CountryGroups::collect(table, Indicator::Co2);
        CountryGroups::collect(table, Indicator::Forest)
            .means()
            .into_iter()
            .take(n)
            .map(|forest| ForestCo2 {
                mean_co2: co2.mean(&forest.country),
                country: forest.country,
                mean_forest_pct: forest.value,
            })
            .collect()
    }

    /// First and last population and CO2 readings for each of `countries`.
    ///
    /// "First" and "last" follow table order, not year order. A country is left
    /// out unless it has at least one reading of each.
    pub fn population_co2_trend(
        &self,
        table: &Table,
        countries: &[String],
    ) -> Vec<PopulationCo2Trend> {
        countries
            .iter()
            .filter_map(|country| {
                let readings = |indicator: Indicator| {
                    first_last(
                        table
                            .iter()
                            .filter(|r| r.is_country(country))
                            .filter_map(move |r| indicator.value(r)),
                    )
                };
                let (first_population, last_population) = readings(Indicator::Population)?;
                let (first_co2, last_co2) = readings(Indicator::Co2)?;
                Some(PopulationCo2Trend {
                    country: country.clone(),
                    first_population,
                    last_population,
                    first_co2,
                    last_co2,
                })
            })
            .collect()
    }

    pub fn rainfall_vs_extreme_events_sample(&self, table: &Table, n: usize) -> Vec<(f64, f64)> {
        filtered_pairs(table, Indicator::Rainfall, Indicator::ExtremeEvents)
            .take(n)
            .collect()
    }

    /// High emitters that also lack renewables and forest.
    pub fn triple_challenge_countries(&self, table: &Table, k: usize) -> Vec<String> {
        let t = self.thresholds.triple_challenge;
        self.country_profiles(table)
            .into_iter()
            .filter(|p| {
                p.co2 > t.co2_above && p.renewable < t.renewable_below && p.forest < t.forest_below
            })
            .map(|p| p.country)
            .take(k)
            .collect()
    }

    /// Low emitters with a high renewable share and large forest cover.
    pub fn climate_leaders(&self, table: &Table, k: usize) -> Vec<String> {
        let t = self.thresholds.leaders;
        self.country_profiles(table)
            .into_iter()
            .filter(|p| {
                p.co2 < t.co2_below && p.renewable > t.renewable_above && p.forest > t.forest_above
            })
            .map(|p| p.country)
            .take(k)
            .collect()
    }

    pub fn co2_vs_temperature_sample(&self, table: &Table, n: usize) -> Vec<(f64, f64)> {
        filtered_pairs(table, Indicator::Co2, Indicator::Temperature)
            .take(n)
            .collect()
    }

    /// Mean renewable share of records from `countries` against all other records.
    pub fn developed_vs_developing_renewable(
        &self,
        table: &Table,
        countries: &[String],
    ) -> RenewableSplit {
        let (top, rest): (Vec<_>, Vec<_>) = table
            .iter()
            .filter_map(|r| Some((r, r.renewable_energy_pct?)))
            .partition(|(r, _)| {
                r.country()
                    .is_some_and(|c| countries.iter().any(|t| t == c))
            });

        RenewableSplit {
            top_emitters_mean: mean_of(top.into_iter().map(|(_, v)| v)),
            rest_mean: mean_of(rest.into_iter().map(|(_, v)| v)),
        }
    }

    /// Largest gains in renewable share between the first and last year of the table.
    ///
    /// A zero reading counts as not recorded, so a country that started at 0% is
    /// never listed.
    pub fn renewable_improvement(&self, table: &Table, k: usize) -> Vec<CountryValue> {
        let Some((first_year, last_year)) = table.year_bounds() else {
            return Vec::new();
        };

        let mut order: Vec<String> = Vec::new();
        let mut readings: HashMap<String, [Option<f64>; 2]> = HashMap::new();
        for record in table {
            let (Some(year), Some(value), Some(country)) =
                (record.year, record.renewable_energy_pct, record.country())
            else {
                continue;
            };
            for (slot, edge) in [first_year, last_year].into_iter().enumerate() {
                if year == edge {
                    let entry = readings.entry(country.to_string()).or_insert_with(|| {
                        order.push(country.to_string());
                        [None, None]
                    });
                    entry[slot] = Some(value);
                }
            }
        }

        let recorded = |v: Option<f64>| v.filter(|x| *x != 0.0);
        let mut improvements: Vec<CountryValue> = order
            .into_iter()
            .filter_map(|country| {
                let [first, last] = readings.get(&country).copied()?;
                let gain = recorded(last)? - recorded(first)?;
                Some(CountryValue::new(country, gain))
            })
            .collect();
        rank_descending(&mut improvements);
        improvements.truncate(k);
        improvements
    }

    /// Ranks countries by `renewable + forest - co2` and returns both ends.
    pub fn overall_score(&self, table: &Table, k: usize) -> ScoreBoard {
        let mut scores: Vec<CountryValue> = self
            .country_profiles(table)
            .iter()
            .map(|p| CountryValue::new(p.country.clone(), p.score()))
            .collect();
        rank_descending(&mut scores);

        let worst = scores[scores.len().saturating_sub(k)..].to_vec();
        scores.truncate(k);
        ScoreBoard {
            best: scores,
            worst,
        }
    }

    /// Countries with CO2 readings that also have renewable and forest readings,
    /// in the order their first CO2 reading appears.
    fn country_profiles(&self, table: &Table) -> Vec<CountryProfile> {
        let co2 = CountryGroups::collect(table, Indicator::Co2);
        let renewable = CountryGroups::collect(table, Indicator::Renewable);
        let forest = CountryGroups::collect(table, Indicator::Forest);

        co2.means()
            .into_iter()
            .filter_map(|c| {
                Some(CountryProfile {
                    renewable: renewable.mean(&c.country)?,
                    forest: forest.mean(&c.country)?,
                    co2: c.value,
                    country: c.country,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::Record;

    fn row(country: &str, year: i32) -> Record {
        Record::new(country, year)
    }

    fn profile(country: &str, year: i32, co2: f64, renewable: f64, forest: f64) -> Record {
        Record {
            co2_per_capita: Some(co2),
            renewable_energy_pct: Some(renewable),
            forest_area_pct: Some(forest),
            ..row(country, year)
        }
    }

    fn countries(values: &[CountryValue]) -> Vec<&str> {
        values.iter().map(|v| v.country.as_str()).collect()
    }

    #[test]
    fn temperature_delta_uses_true_year_bounds() {
        let table = Table::from_records(vec![
            Record { avg_temperature: Some(14.0), ..row("A", 2005) },
            Record { avg_temperature: Some(10.0), ..row("A", 2000) },
            Record { avg_temperature: Some(12.0), ..row("B", 2000) },
            Record { avg_temperature: Some(15.0), ..row("B", 2020) },
            Record { avg_temperature: None, ..row("C", 2020) },
        ]);
        let delta = MetricsEngine::new().temperature_delta(&table).unwrap();

        assert_eq!((delta.first_year, delta.last_year), (2000, 2020));
        assert_relative_eq!(delta.first_mean.unwrap(), 11.0);
        assert_relative_eq!(delta.last_mean.unwrap(), 15.0);
        assert_relative_eq!(delta.change().unwrap(), 4.0);
    }

    #[test]
    fn temperature_delta_marks_missing_side_as_no_data() {
        let table = Table::from_records(vec![
            row("A", 1990),
            Record { avg_temperature: Some(20.0), ..row("A", 2000) },
        ]);
        let delta = MetricsEngine::new().temperature_delta(&table).unwrap();

        assert_eq!(delta.first_year, 1990);
        assert_eq!(delta.first_mean, None);
        assert_eq!(delta.last_mean, Some(20.0));
        assert_eq!(delta.change(), None);
    }

    #[test]
    fn temperature_delta_without_years_is_an_error() {
        let table = Table::from_records(vec![Record {
            avg_temperature: Some(20.0),
            ..Record::default()
        }]);
        assert!(matches!(
            MetricsEngine::new().temperature_delta(&table),
            Err(AnalyticsError::NoData(_))
        ));
    }

    #[test]
    fn top_emitters_averages_across_years() {
        let table = Table::from_records(vec![
            Record { co2_per_capita: Some(10.0), ..row("X", 2000) },
            Record { co2_per_capita: Some(20.0), ..row("X", 2001) },
            Record { co2_per_capita: Some(100.0), ..row("Y", 2000) },
            row("Y", 2001),
            Record { avg_temperature: Some(3.0), ..row("Z", 2000) },
        ]);
        let top = MetricsEngine::new().top_emitters(&table, 1);
        assert_eq!(top, vec![CountryValue::new("Y", 100.0)]);
    }

    #[test]
    fn top_emitters_returns_all_when_fewer_than_k() {
        let table = Table::from_records(vec![
            Record { co2_per_capita: Some(3.0), ..row("A", 2000) },
            Record { co2_per_capita: Some(9.0), ..row("B", 2000) },
            Record { co2_per_capita: Some(3.0), ..row("C", 2000) },
        ]);
        let top = MetricsEngine::new().top_emitters(&table, 10);
        assert_eq!(countries(&top), vec!["B", "A", "C"]);
    }

    #[test]
    fn blank_fields_do_not_change_means() {
        let mut records = vec![
            Record { co2_per_capita: Some(4.0), ..row("A", 2000) },
            Record { co2_per_capita: Some(8.0), ..row("A", 2001) },
        ];
        let engine = MetricsEngine::new();
        let before = engine.top_emitters(&Table::from_records(records.clone()), 1);

        records.push(row("A", 2002));
        let after = engine.top_emitters(&Table::from_records(records), 1);

        assert_eq!(before, after);
        assert_relative_eq!(after[0].value, 6.0);
    }

    #[test]
    fn samples_take_first_complete_pairs_in_table_order() {
        let table = Table::from_records(vec![
            Record { renewable_energy_pct: Some(10.0), co2_per_capita: Some(5.0), ..row("A", 2000) },
            Record { renewable_energy_pct: Some(11.0), ..row("A", 2001) },
            Record { renewable_energy_pct: Some(12.0), co2_per_capita: Some(6.0), ..row("A", 2002) },
            Record { renewable_energy_pct: Some(13.0), co2_per_capita: Some(7.0), ..row("A", 2003) },
        ]);
        let engine = MetricsEngine::new();
        assert_eq!(
            engine.renewable_vs_co2_sample(&table, 2),
            vec![(10.0, 5.0), (12.0, 6.0)]
        );
        assert_eq!(
            engine.co2_vs_temperature_sample(&table, 5),
            Vec::<(f64, f64)>::new()
        );
    }

    #[test]
    fn forest_vs_co2_keeps_missing_co2_absent() {
        let table = Table::from_records(vec![
            Record { forest_area_pct: Some(30.0), ..row("A", 2000) },
            Record { forest_area_pct: Some(50.0), co2_per_capita: Some(2.0), ..row("B", 2000) },
            Record { forest_area_pct: Some(40.0), ..row("A", 2001) },
            Record { forest_area_pct: Some(10.0), ..row("C", 2000) },
        ]);
        let sample = MetricsEngine::new().forest_vs_co2(&table, 2);

        assert_eq!(sample.len(), 2);
        assert_eq!(sample[0].country, "A");
        assert_relative_eq!(sample[0].mean_forest_pct, 35.0);
        assert_eq!(sample[0].mean_co2, None);
        assert_eq!(sample[1].mean_co2, Some(2.0));
    }

    #[test]
    fn population_trend_follows_table_order() {
        let table = Table::from_records(vec![
            Record { population: Some(300.0), co2_per_capita: Some(9.0), ..row("A", 2010) },
            Record { population: Some(100.0), ..row("A", 2000) },
            Record { co2_per_capita: Some(7.0), ..row("A", 2005) },
            Record { population: Some(50.0), ..row("B", 2000) },
        ]);
        let trend = MetricsEngine::new()
            .population_co2_trend(&table, &["A".to_string(), "B".to_string()]);

        assert_eq!(
            trend,
            vec![PopulationCo2Trend {
                country: "A".to_string(),
                first_population: 300.0,
                last_population: 100.0,
                first_co2: 9.0,
                last_co2: 7.0,
            }]
        );
    }

    #[test]
    fn classification_requires_renewable_and_forest() {
        let table = Table::from_records(vec![
            profile("Smoky", 2000, 80.0, 5.0, 10.0),
            profile("Green", 2000, 5.0, 60.0, 70.0),
            Record { co2_per_capita: Some(90.0), renewable_energy_pct: Some(1.0), ..row("Bare", 2000) },
            profile("Middle", 2000, 30.0, 30.0, 30.0),
            profile("Sooty", 2000, 60.0, 10.0, 20.0),
        ]);
        let engine = MetricsEngine::new();

        let triple = engine.triple_challenge_countries(&table, 5);
        let leaders = engine.climate_leaders(&table, 5);
        assert_eq!(triple, vec!["Smoky", "Sooty"]);
        assert_eq!(leaders, vec!["Green"]);
        assert!(triple.iter().all(|c| !leaders.contains(c)));
        assert_eq!(engine.triple_challenge_countries(&table, 1), vec!["Smoky"]);
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let mut thresholds = Thresholds::default();
        thresholds.leaders.co2_below = 1.0;
        let table = Table::from_records(vec![profile("Green", 2000, 5.0, 60.0, 70.0)]);

        assert!(MetricsEngine::with_thresholds(thresholds)
            .climate_leaders(&table, 5)
            .is_empty());
    }

    #[test]
    fn renewable_split_separates_top_emitters() {
        let table = Table::from_records(vec![
            Record { renewable_energy_pct: Some(10.0), ..row("Top", 2000) },
            Record { renewable_energy_pct: Some(20.0), ..row("Top", 2001) },
            Record { renewable_energy_pct: Some(50.0), ..row("Other", 2000) },
            Record { renewable_energy_pct: Some(70.0), ..Record::default() },
            row("Other", 2001),
        ]);
        let engine = MetricsEngine::new();

        let split = engine.developed_vs_developing_renewable(&table, &["Top".to_string()]);
        assert_relative_eq!(split.top_emitters_mean.unwrap(), 15.0);
        assert_relative_eq!(split.rest_mean.unwrap(), 60.0);

        let split = engine.developed_vs_developing_renewable(&table, &[]);
        assert_eq!(split.top_emitters_mean, None);
    }

    #[test]
    fn renewable_improvement_round_trip() {
        let table = Table::from_records(vec![
            Record { renewable_energy_pct: Some(10.0), ..row("A", 2000) },
            Record { renewable_energy_pct: Some(30.0), ..row("A", 2010) },
            Record { renewable_energy_pct: Some(25.0), ..row("B", 2000) },
        ]);
        let improvement = MetricsEngine::new().renewable_improvement(&table, 5);
        assert_eq!(improvement, vec![CountryValue::new("A", 20.0)]);
    }

    #[test]
    fn renewable_improvement_treats_zero_as_unrecorded() {
        let table = Table::from_records(vec![
            Record { renewable_energy_pct: Some(0.0), ..row("Zero", 2000) },
            Record { renewable_energy_pct: Some(40.0), ..row("Zero", 2010) },
            Record { renewable_energy_pct: Some(5.0), ..row("Small", 2000) },
            Record { renewable_energy_pct: Some(15.0), ..row("Small", 2010) },
            Record { renewable_energy_pct: Some(5.0), ..row("Big", 2000) },
            Record { renewable_energy_pct: Some(55.0), ..row("Big", 2010) },
            Record { renewable_energy_pct: Some(90.0), ..row("Mid", 2005) },
        ]);
        let improvement = MetricsEngine::new().renewable_improvement(&table, 5);
        assert_eq!(countries(&improvement), vec!["Big", "Small"]);
        assert_relative_eq!(improvement[0].value, 50.0);
    }

    #[test]
    fn overall_score_lists_overlap_when_few_countries() {
        let table = Table::from_records(vec![
            profile("A", 2000, 10.0, 20.0, 30.0),
            profile("B", 2000, 50.0, 10.0, 10.0),
            profile("C", 2000, 0.0, 50.0, 50.0),
            Record { co2_per_capita: Some(1.0), ..row("NoForest", 2000) },
        ]);
        let board = MetricsEngine::new().overall_score(&table, 2);

        assert_eq!(countries(&board.best), vec!["C", "A"]);
        assert_eq!(countries(&board.worst), vec!["A", "B"]);
        assert_relative_eq!(board.best[0].value, 100.0);
        assert_relative_eq!(board.worst[1].value, -30.0);

        let all = MetricsEngine::new().overall_score(&table, 5);
        assert_eq!(all.best, all.worst);
        assert!(all.best.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn report_survives_a_failing_question() {
        let table = Table::from_records(vec![Record {
            country: Some("A".to_string()),
            co2_per_capita: Some(12.0),
            population: Some(10.0),
            ..Record::default()
        }]);
        let report = MetricsEngine::new().report(&table, &ReportOptions::default());

        assert_eq!(report.total_rows, 1);
        assert!(report.temperature_delta.is_err());
        assert_eq!(report.top_emitters, vec![CountryValue::new("A", 12.0)]);
        assert_eq!(report.population_co2_trend.len(), 1);
        assert!(report.renewable_improvement.is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let table = Table::from_records(vec![profile("A", 2000, 1.0, 2.0, 3.0)]);
        let report = MetricsEngine::new().report(&table, &ReportOptions::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_rows"], 1);
        assert_eq!(json["temperature_delta"]["Ok"]["first_year"], 2000);
        assert_eq!(json["top_emitters"][0]["country"], "A");
    }
}
