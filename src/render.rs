//! Human-readable output for the batch report.

use analytics::{ClimateReport, CountryValue};
use comfy_table::Table;
use rust_decimal::Decimal;
use std::fmt::Write;

const NO_DATA: &str = "no data";

/// Rounds to two decimal places, midpoint to even.
///
/// The exact binary value is rounded, so `2.675` (stored just below the
/// midpoint) becomes `2.67`.
fn round2(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(2).normalize())
}

fn num(value: f64) -> String {
    round2(value).map_or_else(|| format!("{:.2}", value), |d| d.to_string())
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), num)
}

fn pairs(values: &[(f64, f64)]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|(a, b)| format!("({}, {})", num(*a), num(*b)))
        .collect();
    format!("[{}]", items.join(", "))
}

fn ranked(values: &[CountryValue]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format!("({}, {})", v.country, num(v.value)))
        .collect();
    format!("[{}]", items.join(", "))
}

/// One labelled line per question.
pub fn text(report: &ClimateReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_text(&mut out, report)?;
    Ok(out)
}

fn write_text(out: &mut String, report: &ClimateReport) -> std::fmt::Result {
    writeln!(out, "Total rows: {}", report.total_rows)?;
    writeln!(out, "Headers: [{}]", report.headers.join(", "))?;

    match &report.temperature_delta {
        Ok(delta) => writeln!(
            out,
            "\nQ1: {} -> {} Temp: {} to {}",
            delta.first_year,
            delta.last_year,
            opt(delta.first_mean),
            opt(delta.last_mean)
        )?,
        Err(e) => writeln!(out, "\nQ1: {}", e)?,
    }

    writeln!(out, "\nQ2: Top CO2 emitters: {}", ranked(&report.top_emitters))?;
    writeln!(out, "\nQ3: Renewable vs CO2 sample: {}", pairs(&report.renewable_vs_co2))?;

    let forest: Vec<String> = report
        .forest_vs_co2
        .iter()
        .map(|f| {
            format!(
                "({}, {}, {})",
                f.country,
                num(f.mean_forest_pct),
                opt(f.mean_co2)
            )
        })
        .collect();
    writeln!(out, "\nQ4: Forest vs CO2 sample: [{}]", forest.join(", "))?;

    if report.population_co2_trend.is_empty() {
        writeln!(out, "\nQ5: {}", NO_DATA)?;
    }
    for trend in &report.population_co2_trend {
        writeln!(
            out,
            "\nQ5: {} pop: {} -> {} CO2: {} -> {}",
            trend.country,
            num(trend.first_population),
            num(trend.last_population),
            num(trend.first_co2),
            num(trend.last_co2)
        )?;
    }

    writeln!(
        out,
        "\nQ6: Rainfall vs Extreme Events sample: {}",
        pairs(&report.rainfall_vs_extreme_events)
    )?;
    writeln!(
        out,
        "\nQ7: Triple challenge countries: [{}]",
        report.triple_challenge.join(", ")
    )?;
    writeln!(out, "\nQ8: Climate leaders: [{}]", report.climate_leaders.join(", "))?;
    writeln!(out, "\nQ9: Sample CO2 vs Temp: {}", pairs(&report.co2_vs_temperature))?;
    writeln!(
        out,
        "\nQ10: Avg renewable - top emitters: {} rest: {}",
        opt(report.renewable_split.top_emitters_mean),
        opt(report.renewable_split.rest_mean)
    )?;
    writeln!(
        out,
        "\nQ11: Top renewable improvers: {}",
        ranked(&report.renewable_improvement)
    )?;
    writeln!(out, "\nQ12: Best countries: {}", ranked(&report.overall_score.best))?;
    write!(out, "Q12: Worst countries: {}", ranked(&report.overall_score.worst))
}

/// One table per question.
pub fn tables(report: &ClimateReport) -> String {
    let mut sections = vec![format!(
        "Total rows: {}\nHeaders: {}",
        report.total_rows,
        report.headers.join(", ")
    )];

    let mut q1 = Table::new();
    q1.set_header(vec!["Year", "Mean temperature (°C)"]);
    match &report.temperature_delta {
        Ok(delta) => {
            q1.add_row(vec![delta.first_year.to_string(), opt(delta.first_mean)]);
            q1.add_row(vec![delta.last_year.to_string(), opt(delta.last_mean)]);
        }
        Err(e) => {
            q1.add_row(vec![e.to_string(), String::new()]);
        }
    }
    sections.push(titled("Q1: Temperature, first vs last year", q1));

    sections.push(titled(
        "Q2: Top CO2 emitters",
        ranked_table("Mean CO2 (t/capita)", &report.top_emitters),
    ));
    sections.push(titled(
        "Q3: Renewable vs CO2 sample",
        pair_table("Renewable (%)", "CO2 (t/capita)", &report.renewable_vs_co2),
    ));

    let mut q4 = Table::new();
    q4.set_header(vec!["Country", "Mean forest (%)", "Mean CO2 (t/capita)"]);
    for f in &report.forest_vs_co2 {
        q4.add_row(vec![f.country.clone(), num(f.mean_forest_pct), opt(f.mean_co2)]);
    }
    sections.push(titled("Q4: Forest vs CO2 sample", q4));

    let mut q5 = Table::new();
    q5.set_header(vec!["Country", "Population", "CO2 (t/capita)"]);
    for t in &report.population_co2_trend {
        q5.add_row(vec![
            t.country.clone(),
            format!("{} -> {}", num(t.first_population), num(t.last_population)),
            format!("{} -> {}", num(t.first_co2), num(t.last_co2)),
        ]);
    }
    sections.push(titled("Q5: Population vs CO2", q5));

    sections.push(titled(
        "Q6: Rainfall vs extreme events sample",
        pair_table("Rainfall (mm)", "Extreme events", &report.rainfall_vs_extreme_events),
    ));
    sections.push(titled(
        "Q7: Triple challenge countries",
        list_table(&report.triple_challenge),
    ));
    sections.push(titled("Q8: Climate leaders", list_table(&report.climate_leaders)));
    sections.push(titled(
        "Q9: CO2 vs temperature sample",
        pair_table("CO2 (t/capita)", "Temperature (°C)", &report.co2_vs_temperature),
    ));

    let mut q10 = Table::new();
    q10.set_header(vec!["Group", "Mean renewable (%)"]);
    q10.add_row(vec![
        "Top emitters".to_string(),
        opt(report.renewable_split.top_emitters_mean),
    ]);
    q10.add_row(vec!["Rest".to_string(), opt(report.renewable_split.rest_mean)]);
    sections.push(titled("Q10: Renewable share, top emitters vs rest", q10));

    sections.push(titled(
        "Q11: Top renewable improvers",
        ranked_table("Improvement (pp)", &report.renewable_improvement),
    ));
    sections.push(titled(
        "Q12: Best countries",
        ranked_table("Score", &report.overall_score.best),
    ));
    sections.push(titled(
        "Q12: Worst countries",
        ranked_table("Score", &report.overall_score.worst),
    ));

    sections.join("\n\n")
}

fn titled(title: &str, table: Table) -> String {
    format!("{}\n{}", title, table)
}

fn ranked_table(value_header: &str, values: &[CountryValue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Country", value_header]);
    for v in values {
        table.add_row(vec![v.country.clone(), num(v.value)]);
    }
    table
}

fn pair_table(a: &str, b: &str, values: &[(f64, f64)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![a, b]);
    for (x, y) in values {
        table.add_row(vec![num(*x), num(*y)]);
    }
    table
}

fn list_table(countries: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Country"]);
    for c in countries {
        table.add_row(vec![c.clone()]);
    }
    table
}
