use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::core::{
    CareerProfile, CareerTrack, DataPoint, ParameterField, ProjectionParameters,
    ProjectionSummary, RateSolveConfig, RequiredRateResult, SummaryOptions, TaxJurisdiction,
    project_baseline, project_invested, resolve_career_profile, solve_required_rate, summarize,
};
use crate::error::{CliError, WealthError, WealthResult};
use crate::scenario::ScenarioStore;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTaxJurisdiction {
    Usa,
    Uk,
    Germany,
    Canada,
    Australia,
    Singapore,
    Uae,
    Switzerland,
}

impl From<CliTaxJurisdiction> for TaxJurisdiction {
    fn from(value: CliTaxJurisdiction) -> Self {
        match value {
            CliTaxJurisdiction::Usa => TaxJurisdiction::Usa,
            CliTaxJurisdiction::Uk => TaxJurisdiction::Uk,
            CliTaxJurisdiction::Germany => TaxJurisdiction::Germany,
            CliTaxJurisdiction::Canada => TaxJurisdiction::Canada,
            CliTaxJurisdiction::Australia => TaxJurisdiction::Australia,
            CliTaxJurisdiction::Singapore => TaxJurisdiction::Singapore,
            CliTaxJurisdiction::Uae => TaxJurisdiction::Uae,
            CliTaxJurisdiction::Switzerland => TaxJurisdiction::Switzerland,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiTaxJurisdiction {
    #[serde(alias = "USA", alias = "us")]
    Usa,
    #[serde(alias = "UK", alias = "gb")]
    Uk,
    #[serde(alias = "Germany", alias = "de")]
    Germany,
    #[serde(alias = "Canada")]
    Canada,
    #[serde(alias = "Australia")]
    Australia,
    #[serde(alias = "Singapore")]
    Singapore,
    #[serde(alias = "UAE")]
    Uae,
    #[serde(alias = "Switzerland")]
    Switzerland,
}

impl From<ApiTaxJurisdiction> for CliTaxJurisdiction {
    fn from(value: ApiTaxJurisdiction) -> Self {
        match value {
            ApiTaxJurisdiction::Usa => CliTaxJurisdiction::Usa,
            ApiTaxJurisdiction::Uk => CliTaxJurisdiction::Uk,
            ApiTaxJurisdiction::Germany => CliTaxJurisdiction::Germany,
            ApiTaxJurisdiction::Canada => CliTaxJurisdiction::Canada,
            ApiTaxJurisdiction::Australia => CliTaxJurisdiction::Australia,
            ApiTaxJurisdiction::Singapore => CliTaxJurisdiction::Singapore,
            ApiTaxJurisdiction::Uae => CliTaxJurisdiction::Uae,
            ApiTaxJurisdiction::Switzerland => CliTaxJurisdiction::Switzerland,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<u32>,
    annual_salary: Option<f64>,
    salary_growth: Option<f64>,
    investment_rate: Option<f64>,
    market_return: Option<f64>,
    inflation_rate: Option<f64>,
    career_track: Option<String>,
    tax_jurisdiction: Option<ApiTaxJurisdiction>,
    horizon_age: Option<u32>,

    target_age: Option<u32>,
    target_amount: Option<f64>,
    target_capital: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveScenarioPayload {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: ProjectPayload,
}

#[derive(Parser, Debug)]
#[command(
    name = "wealth-roadmap",
    about = "Career-driven wealth projection: monthly compounding vs. a no-growth baseline"
)]
struct Cli {
    #[arg(long, default_value_t = 25, help = "Starting age (18-65)")]
    current_age: u32,
    #[arg(long, default_value_t = 75000.0, help = "Starting gross annual salary")]
    annual_salary: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Annual salary growth in percent, before the career-track adjustment"
    )]
    salary_growth: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Share of monthly salary invested, in percent"
    )]
    investment_rate: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Expected annual market return in percent, compounded monthly"
    )]
    market_return: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual inflation in percent, used for real capital"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value = "global",
        help = "Career track: local, global, faang, startup, consulting, finance, healthcare, education"
    )]
    career_track: String,
    #[arg(long, value_enum, default_value_t = CliTaxJurisdiction::Usa)]
    tax_jurisdiction: CliTaxJurisdiction,
    #[arg(long, default_value_t = 35, help = "Last age to project (inclusive)")]
    horizon_age: u32,
    #[arg(
        long,
        default_value_t = 30,
        help = "Age used for the capital and passive income summary"
    )]
    target_age: u32,
    #[arg(
        long,
        default_value_t = 1000000.0,
        help = "Wealth goal for the years-to-target estimate"
    )]
    target_amount: f64,
    #[arg(
        long,
        help = "Solve for the investment rate that reaches this capital by --target-age"
    )]
    target_capital: Option<f64>,
}

#[derive(Debug)]
struct ApiRequest {
    params: ProjectionParameters,
    options: SummaryOptions,
    target_capital: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    parameters: ProjectionParameters,
    career_profile: CareerProfile,
    roadmap: Vec<DataPoint>,
    comparison: Vec<DataPoint>,
    summary: ProjectionSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteResponse {
    id: String,
    is_favorite: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    scenarios: Arc<Mutex<ScenarioStore>>,
}

fn build_inputs(cli: Cli) -> Result<ApiRequest, String> {
    let params = ProjectionParameters {
        current_age: cli.current_age,
        annual_salary: cli.annual_salary,
        salary_growth_percent: cli.salary_growth,
        investment_rate_percent: cli.investment_rate,
        market_return_percent: cli.market_return,
        inflation_rate_percent: cli.inflation_rate,
        career_track: CareerTrack::from_name(&cli.career_track),
        tax_jurisdiction: cli.tax_jurisdiction.into(),
        horizon_end_age: cli.horizon_age,
    };
    params
        .validate()
        .map_err(|violation| violation.describe(ParameterField::flag))?;
    if !cli.target_amount.is_finite() || cli.target_amount <= 0.0 {
        return Err("--target-amount must be > 0".to_string());
    }

    if params.career_track == CareerTrack::Unrecognized {
        log::warn!(
            "unknown career track '{}', using the standard profile",
            cli.career_track
        );
    }

    Ok(ApiRequest {
        params,
        options: SummaryOptions {
            target_age: cli.target_age,
            target_amount: cli.target_amount,
        },
        target_capital: cli.target_capital,
    })
}

/// One-shot projection from command-line flags, rendered as pretty JSON.
///
/// Never exits the process; clap failures come back as [`CliError::Usage`].
pub fn run_cli<I, T>(args: I) -> Result<String, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let request = build_inputs(Cli::try_parse_from(args)?).map_err(CliError::Invalid)?;
    let json = match request.target_capital {
        Some(target_capital) => {
            let result =
                solve_for_request(&request, target_capital).map_err(CliError::Invalid)?;
            serde_json::to_string_pretty(&result)
        }
        None => serde_json::to_string_pretty(&build_project_response(&request)),
    };
    json.map_err(|e| CliError::Invalid(format!("failed to serialize output: {e}")))
}

pub async fn run_http_server(port: u16, scenario_path: PathBuf) -> WealthResult<()> {
    let store = ScenarioStore::open(scenario_path)?;
    let app = build_router(AppState {
        scenarios: Arc::new(Mutex::new(store)),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("wealth roadmap listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/solve", post(solve_handler))
        .route("/api/careers", get(careers_handler))
        .route(
            "/api/scenarios",
            get(list_scenarios_handler).post(save_scenario_handler),
        )
        .route("/api/scenarios/import", post(import_scenario_handler))
        .route("/api/scenarios/:id", delete(delete_scenario_handler))
        .route("/api/scenarios/:id/favorite", post(favorite_scenario_handler))
        .route("/api/scenarios/:id/export", get(export_scenario_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            log::warn!("rejected projection request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };
    json_response(StatusCode::OK, build_project_response(&request))
}

async fn solve_handler(Json(payload): Json<ProjectPayload>) -> Response {
    let result = api_request_from_payload(payload).and_then(|request| {
        let target_capital = request
            .target_capital
            .ok_or_else(|| "targetCapital is required".to_string())?;
        solve_for_request(&request, target_capital)
    });
    match result {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(msg) => {
            log::warn!("rejected solve request: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

async fn careers_handler() -> Response {
    let profiles: Vec<CareerProfile> = CareerTrack::ALL
        .iter()
        .map(|&track| resolve_career_profile(track, 0.0))
        .collect();
    json_response(StatusCode::OK, profiles)
}

async fn list_scenarios_handler(State(state): State<AppState>) -> Response {
    match with_store(&state, |store| Ok(store.list().to_vec())).await {
        Ok(scenarios) => json_response(StatusCode::OK, scenarios),
        Err(e) => wealth_error_response(e),
    }
}

async fn save_scenario_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveScenarioPayload>,
) -> Response {
    let request = match api_request_from_payload(payload.parameters) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    match with_store(&state, move |store| {
        store.save(&payload.name, &payload.description, request.params)
    })
    .await
    {
        Ok(scenario) => json_response(StatusCode::CREATED, scenario),
        Err(e) => wealth_error_response(e),
    }
}

async fn import_scenario_handler(State(state): State<AppState>, body: String) -> Response {
    match with_store(&state, move |store| store.import_json(&body)).await {
        Ok(scenario) => json_response(StatusCode::CREATED, scenario),
        Err(e) => wealth_error_response(e),
    }
}

async fn delete_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match with_store(&state, move |store| store.delete(&id)).await {
        Ok(()) => with_cache_control(StatusCode::NO_CONTENT),
        Err(e) => wealth_error_response(e),
    }
}

async fn favorite_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let key = id.clone();
    match with_store(&state, move |store| store.toggle_favorite(&key)).await {
        Ok(is_favorite) => json_response(StatusCode::OK, FavoriteResponse { id, is_favorite }),
        Err(e) => wealth_error_response(e),
    }
}

async fn export_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let exported = with_store(&state, move |store| {
        let name = store.get(&id)?.name.clone();
        Ok((name, store.export_json(&id)?))
    })
    .await;
    match exported {
        Ok((name, json)) => with_cache_control((
            [
                (
                    header::CONTENT_TYPE,
                    "application/json; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.json\"", attachment_name(&name)),
                ),
            ],
            json,
        )),
        Err(e) => wealth_error_response(e),
    }
}

/// Runs `f` against the locked store on the blocking pool; every mutation rewrites the file.
async fn with_store<T, F>(state: &AppState, f: F) -> WealthResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut ScenarioStore) -> WealthResult<T> + Send + 'static,
{
    let scenarios = Arc::clone(&state.scenarios);
    tokio::task::spawn_blocking(move || {
        let mut store = scenarios.lock().map_err(|_| WealthError::StorePoisoned)?;
        f(&mut *store)
    })
    .await?
}

fn attachment_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn wealth_error_response(err: WealthError) -> Response {
    let status = match &err {
        WealthError::ScenarioNotFound { .. } => StatusCode::NOT_FOUND,
        WealthError::EmptyScenarioName | WealthError::InvalidScenario(_) => {
            StatusCode::BAD_REQUEST
        }
        WealthError::Io(_)
        | WealthError::Serialization(_)
        | WealthError::StorePoisoned
        | WealthError::StoreTask(_) => {
            log::error!("scenario store failure: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, &err.to_string())
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.annual_salary {
        cli.annual_salary = v;
    }
    if let Some(v) = payload.salary_growth {
        cli.salary_growth = v;
    }
    if let Some(v) = payload.investment_rate {
        cli.investment_rate = v;
    }
    if let Some(v) = payload.market_return {
        cli.market_return = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.career_track {
        cli.career_track = v;
    }
    if let Some(v) = payload.tax_jurisdiction {
        cli.tax_jurisdiction = v.into();
    }
    if let Some(v) = payload.horizon_age {
        cli.horizon_age = v;
    }

    if let Some(v) = payload.target_age {
        cli.target_age = v;
    }
    if let Some(v) = payload.target_amount {
        cli.target_amount = v;
    }
    if let Some(v) = payload.target_capital {
        cli.target_capital = Some(v);
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_age: 25,
        annual_salary: 75_000.0,
        salary_growth: 8.0,
        investment_rate: 20.0,
        market_return: 8.0,
        inflation_rate: 3.0,
        career_track: "global".to_string(),
        tax_jurisdiction: CliTaxJurisdiction::Usa,
        horizon_age: 35,
        target_age: 30,
        target_amount: 1_000_000.0,
        target_capital: None,
    }
}

fn build_project_response(request: &ApiRequest) -> ProjectResponse {
    let params = &request.params;
    let roadmap = project_invested(params);
    let comparison = project_baseline(params);
    let summary = summarize(params, &roadmap, request.options);

    ProjectResponse {
        parameters: params.clone(),
        career_profile: resolve_career_profile(params.career_track, params.salary_growth_percent),
        roadmap,
        comparison,
        summary,
    }
}

fn solve_for_request(
    request: &ApiRequest,
    target_capital: f64,
) -> Result<RequiredRateResult, String> {
    solve_required_rate(
        &request.params,
        RateSolveConfig::new(target_capital, request.options.target_age),
    )
}
