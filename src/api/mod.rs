use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Datelike;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::risk::{
    MarketCapUniverse, PortfolioMix, RiskAssessment, StockExposure, assess,
};
use crate::core::{
    CorpusTimePoint, FinancialProfile, ProfileError, RiskError, Scenario, ScenarioAnalysis,
    ScenarioId, SuitabilityBand, analyze, generate_scenarios, peak_corpus, project, recommend,
    retirement_marker,
};

pub struct ServerConfig {
    pub port: u16,
    pub universe: MarketCapUniverse,
}

struct AppState {
    universe: MarketCapUniverse,
}

type SharedState = Arc<AppState>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionOptions {
    base_year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(flatten)]
    profile: FinancialProfile,
    base_year: Option<i32>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum RiskMode {
    Manual,
    #[default]
    #[serde(alias = "zerodha")]
    Holdings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RiskPayload {
    mode: RiskMode,
    #[serde(alias = "fixedDepositAmount")]
    fd_value: Option<f64>,
    #[serde(alias = "stockInvestmentAmount")]
    stock_value: Option<f64>,
    #[serde(alias = "mutualFundAmount")]
    mf_value: Option<f64>,
    holdings: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    base_year: i32,
    retirement_index: Option<usize>,
    peak_corpus: Option<u64>,
    points: Vec<CorpusTimePoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioCard {
    #[serde(flatten)]
    scenario: Scenario,
    band: SuitabilityBand,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenariosResponse {
    recommended_id: Option<ScenarioId>,
    recommendation: Option<ScenarioAnalysis>,
    scenarios: Vec<ScenarioCard>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskResponse {
    mode: RiskMode,
    risk_category_label: &'static str,
    #[serde(flatten)]
    assessment: RiskAssessment,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(AppState {
        universe: config.universe,
    });
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("WealthWise API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{}/", config.port);

    axum::serve(listener, app).await
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route(
            "/api/scenarios",
            get(scenarios_get_handler).post(scenarios_post_handler),
        )
        .route("/api/risk-profile", post(risk_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", None)
}

async fn project_get_handler(
    Query(profile): Query<FinancialProfile>,
    Query(options): Query<ProjectionOptions>,
) -> Response {
    project_handler_impl(profile, options.base_year)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload.profile, payload.base_year)
}

fn project_handler_impl(profile: FinancialProfile, base_year: Option<i32>) -> Response {
    let base_year = base_year.unwrap_or_else(current_year);
    match build_projection_response(&profile, base_year) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => profile_error_response(&err),
    }
}

async fn scenarios_get_handler(Query(profile): Query<FinancialProfile>) -> Response {
    scenarios_handler_impl(profile)
}

async fn scenarios_post_handler(Json(profile): Json<FinancialProfile>) -> Response {
    scenarios_handler_impl(profile)
}

fn scenarios_handler_impl(profile: FinancialProfile) -> Response {
    match build_scenarios_response(&profile) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => profile_error_response(&err),
    }
}

async fn risk_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RiskPayload>,
) -> Response {
    match build_risk_response(payload, &state.universe) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            warn!("rejected risk profile request: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string(), None)
        }
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn build_projection_response(
    profile: &FinancialProfile,
    base_year: i32,
) -> Result<ProjectionResponse, ProfileError> {
    let points = project(profile, base_year)?;
    Ok(ProjectionResponse {
        base_year,
        retirement_index: retirement_marker(&points),
        peak_corpus: peak_corpus(&points),
        points,
    })
}

fn build_scenarios_response(
    profile: &FinancialProfile,
) -> Result<ScenariosResponse, ProfileError> {
    let scenarios = generate_scenarios(profile)?;
    let recommended_id = recommend(&scenarios).map(|s| s.id);
    let recommendation = recommended_id.and_then(|id| analyze(&scenarios, id));
    let scenarios = scenarios
        .into_iter()
        .map(|scenario| ScenarioCard {
            band: SuitabilityBand::from_score(scenario.suitability),
            scenario,
        })
        .collect();
    Ok(ScenariosResponse {
        recommended_id,
        recommendation,
        scenarios,
    })
}

fn build_risk_response(
    payload: RiskPayload,
    universe: &MarketCapUniverse,
) -> Result<RiskResponse, RiskError> {
    let stocks = match payload.mode {
        RiskMode::Manual => StockExposure::Total(payload.stock_value.unwrap_or(0.0)),
        RiskMode::Holdings => StockExposure::Holdings(payload.holdings.unwrap_or_default()),
    };
    if payload.mode == RiskMode::Holdings && universe.is_empty() {
        debug!("holdings risk request with an empty market-cap universe");
    }
    let mix = PortfolioMix {
        fixed_deposits: payload.fd_value.unwrap_or(0.0),
        stocks,
        mutual_funds: payload.mf_value.unwrap_or(0.0),
    };
    let assessment = assess(&mix, universe)?;
    Ok(RiskResponse {
        mode: payload.mode,
        risk_category_label: assessment.category.label(),
        assessment,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str, field: Option<&'static str>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            field,
        },
    )
}

fn profile_error_response(err: &ProfileError) -> Response {
    warn!("rejected profile: {err}");
    error_response(StatusCode::BAD_REQUEST, &err.to_string(), Some(err.field()))
}
