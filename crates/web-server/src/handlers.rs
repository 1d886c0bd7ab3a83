use crate::{AppState, error::AppError};
use analytics::{ClimateReport, CorrelationMatrix, CountryValue, Kpis, ScatterPoint, YearValue};
use axum::{
    Json,
    extract::{Query, State},
};
use core_types::{Indicator, Record, Table, TableFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Country and year selection, shared by every data endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    /// Comma-separated country names. Empty selects all countries.
    pub countries: Option<String>,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl FilterParams {
    pub fn to_filter(&self) -> TableFilter {
        let countries = self
            .countries
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        TableFilter {
            countries,
            from_year: self.from,
            to_year: self.to,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IndicatorParams {
    pub indicator: Option<Indicator>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScatterParams {
    pub x: Option<Indicator>,
    pub y: Option<Indicator>,
}

#[derive(Debug, Serialize)]
pub struct IndicatorInfo {
    pub id: Indicator,
    pub column: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
    /// The countries pre-selected when the dashboard opens.
    pub default_selection: Vec<String>,
    pub year_bounds: Option<(i32, i32)>,
    pub indicators: Vec<IndicatorInfo>,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub indicator: Indicator,
    pub values: Vec<CountryValue>,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub indicator: Indicator,
    pub values: Vec<YearValue>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub rows: usize,
}

async fn filtered_table(state: &AppState, params: &FilterParams) -> Result<Table, AppError> {
    let filter = params.to_filter();
    filter.validate()?;
    let table = state.table().await?;
    Ok(table.filter(&filter))
}

/// # GET /api/countries
/// Everything the filter controls need: country list, default selection and year range.
pub async fn get_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountriesResponse>, AppError> {
    let table = state.table().await?;
    let countries: Vec<String> = table.countries().into_iter().map(str::to_string).collect();
    let default_selection = countries
        .iter()
        .take(state.default_country_count)
        .cloned()
        .collect();

    Ok(Json(CountriesResponse {
        countries,
        default_selection,
        year_bounds: table.year_bounds(),
        indicators: Indicator::ALL
            .into_iter()
            .map(|id| IndicatorInfo {
                id,
                column: id.column_name(),
            })
            .collect(),
    }))
}

/// # GET /api/kpis
pub async fn get_kpis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Kpis>, AppError> {
    let table = filtered_table(&state, &params).await?;
    Ok(Json(state.engine.kpis(&table)))
}

/// # GET /api/map
/// Per-country mean of one indicator, for the choropleth.
pub async fn get_map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
    Query(selection): Query<IndicatorParams>,
) -> Result<Json<MapResponse>, AppError> {
    let indicator = selection.indicator.unwrap_or(Indicator::Co2);
    let table = filtered_table(&state, &params).await?;
    Ok(Json(MapResponse {
        indicator,
        values: state.engine.country_means(&table, indicator),
    }))
}

/// # GET /api/trend
/// Per-year mean of one indicator.
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
    Query(selection): Query<IndicatorParams>,
) -> Result<Json<TrendResponse>, AppError> {
    let indicator = selection.indicator.unwrap_or(Indicator::SeaLevel);
    let table = filtered_table(&state, &params).await?;
    Ok(Json(TrendResponse {
        indicator,
        values: state.engine.year_means(&table, indicator),
    }))
}

/// # GET /api/correlation
pub async fn get_correlation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<CorrelationMatrix>, AppError> {
    let table = filtered_table(&state, &params).await?;
    Ok(Json(state.engine.correlation_matrix(&table)))
}

/// # GET /api/scatter
/// Defaults to CO2 against temperature.
pub async fn get_scatter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
    Query(axes): Query<ScatterParams>,
) -> Result<Json<Vec<ScatterPoint>>, AppError> {
    let table = filtered_table(&state, &params).await?;
    let x = axes.x.unwrap_or(Indicator::Co2);
    let y = axes.y.unwrap_or(Indicator::Temperature);
    Ok(Json(state.engine.scatter_points(&table, x, y)))
}

/// # GET /api/records
/// The filtered rows, for the data explorer.
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Record>>, AppError> {
    let table = filtered_table(&state, &params).await?;
    Ok(Json(table.records().to_vec()))
}

/// # GET /api/report
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ClimateReport>, AppError> {
    let table = filtered_table(&state, &params).await?;
    Ok(Json(state.engine.report(&table, &state.report_options)))
}

/// # POST /api/reload
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, AppError> {
    let table = state.reload().await?;
    tracing::info!(rows = table.len(), "Dataset reloaded.");
    Ok(Json(ReloadResponse { rows: table.len() }))
}
