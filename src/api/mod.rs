mod error;
mod payload;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{EngineConfig, SimulationError, compare_scenarios, project, recommend};

pub use error::ApiError;
pub use payload::{
    AssumptionsPayload, CurrentStatePayload, EmiPayload, GoalPayload, MonthlyExpensesPayload,
    SimulatePayload, build_simulation_input,
};
pub use response::{
    CompareResponse, ScenarioOutcomeBody, ScenariosResponse, SimulateResponse,
    build_compare_response, build_scenarios_response, build_simulate_response,
};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Shared, read-only state handed to every request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<EngineConfig>,
    pub currency_symbol: Arc<str>,
}

impl AppState {
    pub fn new(config: EngineConfig, currency_symbol: &str) -> Self {
        Self {
            config: Arc::new(config),
            currency_symbol: Arc::from(currency_symbol),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default(), DEFAULT_CURRENCY_SYMBOL)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/twin/simulate", post(simulate_handler))
        .route("/twin/compare", post(compare_handler))
        .route("/twin/scenarios", get(scenarios_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "financial twin API listening");
    axum::serve(listener, app).await
}

/// Validates `payload`, projects the requested scenario and attaches
/// recommendations. `today` labels month 1 when the request has no start date.
pub fn run_simulation(
    state: &AppState,
    payload: SimulatePayload,
    today: NaiveDate,
) -> Result<SimulateResponse, ApiError> {
    let input = build_simulation_input(payload, &state.config, today).map_err(|errors| {
        tracing::warn!(%errors, "rejected simulation request");
        ApiError::validation(errors)
    })?;
    tracing::info!(
        scenario = %input.scenario,
        months = input.months,
        "running simulation"
    );

    let initial = input.state.clone();
    let months = input.months;
    let projection = project(&state.config, input).map_err(|err| failure("Simulation", err))?;
    let recommendations = recommend(
        projection.scenario,
        &projection.summary,
        &initial,
        months,
        &state.config.scenarios,
        &state.currency_symbol,
    );
    tracing::info!(
        scenario = %projection.scenario,
        final_networth = projection.summary.final_networth,
        "simulation finished"
    );

    Ok(build_simulate_response(projection, recommendations))
}

/// Same request shape as [`run_simulation`]; the `scenario` field is ignored.
pub fn run_comparison(
    state: &AppState,
    mut payload: SimulatePayload,
    today: NaiveDate,
) -> Result<CompareResponse, ApiError> {
    payload.scenario = None;
    let input = build_simulation_input(payload, &state.config, today).map_err(|errors| {
        tracing::warn!(%errors, "rejected comparison request");
        ApiError::validation(errors)
    })?;
    tracing::info!(months = input.months, "comparing scenarios");

    let comparison =
        compare_scenarios(&state.config, &input).map_err(|err| failure("Comparison", err))?;
    tracing::info!(
        best_scenario = %comparison.best_scenario,
        best_networth = comparison.best_networth,
        "comparison finished"
    );

    Ok(build_compare_response(comparison))
}

pub fn list_scenarios(state: &AppState) -> ScenariosResponse {
    build_scenarios_response(&state.config.scenarios)
}

fn failure(context: &str, err: SimulationError) -> ApiError {
    match &err {
        SimulationError::Validation(errors) => {
            tracing::warn!(%errors, "{context} rejected its input");
        }
        other => tracing::error!(error = %other, "{context} failed"),
    }
    ApiError::from_simulation(context, err)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn simulate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulatePayload>, JsonRejection>,
) -> Response {
    let result = payload
        .map_err(malformed)
        .and_then(|Json(payload)| run_simulation(&state, payload, today()));
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => err.into_response(),
    }
}

async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulatePayload>, JsonRejection>,
) -> Response {
    let result = payload
        .map_err(malformed)
        .and_then(|Json(payload)| run_comparison(&state, payload, today()));
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => err.into_response(),
    }
}

async fn scenarios_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, list_scenarios(&state))
}

async fn not_found_handler() -> Response {
    ApiError::not_found().into_response()
}

fn malformed(rejection: JsonRejection) -> ApiError {
    tracing::warn!(reason = %rejection.body_text(), "rejected malformed request body");
    ApiError::malformed_body(rejection)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}
