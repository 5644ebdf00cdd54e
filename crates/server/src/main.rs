//! # gestao-server
//!
//! HTTP front end for the gestao dashboard. Every request reads the
//! workbook fresh; the handlers share only the immutable configuration.

mod error;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use clap::Parser;
use error::ApiError;
use gestao_core::pages::analistas::DETAIL_EXPORT_FILE;
use gestao_core::pages::graficos::CHART_FILE_STEM;
use gestao_core::pages::nds::EXPORT_FILE;
use gestao_core::{Dashboard, DashboardConfig, GestaoResult, Page, Render, Selections};
use gestao_sheet::Sheet;
use gestao_viz::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Query keys that steer a response instead of filtering rows.
const TABLE_PARAM: &str = "table";
const FORMAT_PARAM: &str = "format";

#[derive(Parser, Debug)]
#[command(name = "gestao-server", version, about = "HTTP API for the gestao dashboard")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "GESTAO_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,

    /// Workbook to read (overrides config and GESTAO_WORKBOOK)
    #[arg(short = 'f', long = "file", value_name = "XLSX")]
    file: Option<PathBuf>,

    /// YAML configuration file (default: ./gestao.yaml when present)
    #[arg(short = 'c', long = "config", value_name = "YAML")]
    config: Option<PathBuf>,

    /// Log requests at info level
    #[arg(short, long)]
    verbose: bool,
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Entry of the page listing.
#[derive(Serialize, Deserialize)]
pub struct PageInfo {
    pub slug: String,
    pub title: String,
}

#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

/// Raw query pairs; repeated keys select several values.
type Pairs = Query<Vec<(String, String)>>;

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn pages() -> Json<Vec<PageInfo>> {
    Json(
        Page::ALL
            .iter()
            .map(|page| PageInfo {
                slug: page.slug().to_string(),
                title: page.title().to_string(),
            })
            .collect(),
    )
}

/// Run a page render off the async runtime; workbook reads block.
async fn render<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Dashboard) -> GestaoResult<T> + Send + 'static,
{
    let dashboard = Arc::clone(&state.dashboard);
    Ok(tokio::task::spawn_blocking(move || f(dashboard.as_ref())).await??)
}

/// Split steering parameters from row filters.
fn split_query(pairs: Vec<(String, String)>) -> (Selections, Vec<(String, String)>) {
    let (params, filters): (Vec<_>, Vec<_>) = pairs
        .into_iter()
        .partition(|(key, _)| key == TABLE_PARAM || key == FORMAT_PARAM);
    (Selections::from_pairs(filters), params)
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

async fn nds(State(state): State<AppState>, Query(pairs): Pairs) -> Result<Response, ApiError> {
    let (selections, _) = split_query(pairs);
    let report = render(&state, move |d| d.nds(&selections)).await?;
    Ok(Json(report).into_response())
}

async fn analistas(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Response, ApiError> {
    let (selections, _) = split_query(pairs);
    let report = render(&state, move |d| d.analistas(&selections)).await?;
    Ok(Json(report).into_response())
}

async fn graficos(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Response, ApiError> {
    let (selections, _) = split_query(pairs);
    let report = render(&state, move |d| d.graficos(&selections)).await?;
    Ok(Json(report).into_response())
}

async fn options(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Response, ApiError> {
    let page: Page = page.parse()?;
    let controls = render(&state, move |d| d.options(page)).await?;
    Ok(Json(controls).into_response())
}

async fn nds_export(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Response, ApiError> {
    let (selections, _) = split_query(pairs);
    let report = render(&state, move |d| d.nds(&selections)).await?;
    match report {
        Render::Ready(report) => xlsx_response(&report.detail, EXPORT_FILE),
        Render::NoData { warning } => Ok(Json(Render::<()>::NoData { warning }).into_response()),
    }
}

/// `table` picks `anual`, `mensal` or `detalhe` (default).
async fn analistas_export(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Response, ApiError> {
    let (selections, params) = split_query(pairs);
    let table = param(&params, TABLE_PARAM).unwrap_or("detalhe").to_lowercase();
    if !matches!(table.as_str(), "anual" | "mensal" | "detalhe") {
        return Err(ApiError::BadRequest(format!(
            "Tabela desconhecida: {table} (use anual, mensal ou detalhe)"
        )));
    }

    let report = render(&state, move |d| d.analistas(&selections)).await?;
    let Render::Ready(report) = report else {
        return Ok(Json(Render::<()>::no_data()).into_response());
    };
    match table.as_str() {
        "anual" => xlsx_response(&report.yearly.table, &report.yearly.file_name),
        "mensal" => xlsx_response(&report.monthly.table, &report.monthly.file_name),
        _ => xlsx_response(&report.detail, DETAIL_EXPORT_FILE),
    }
}

/// `format` is `html` (default) or `json`.
async fn graficos_chart(
    State(state): State<AppState>,
    Query(pairs): Pairs,
) -> Result<Response, ApiError> {
    let (selections, params) = split_query(pairs);
    let format = match param(&params, FORMAT_PARAM).map(str::to_lowercase).as_deref() {
        None | Some("html") => ExportFormat::Html,
        Some("json") => ExportFormat::Json,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Formato desconhecido: {other} (use html ou json)"
            )))
        }
    };

    let report = render(&state, move |d| d.graficos(&selections)).await?;
    let Render::Ready(report) = report else {
        return Ok(Json(Render::<()>::no_data()).into_response());
    };
    let body = report.chart.render(format).map_err(gestao_core::GestaoError::from)?;
    let file_name = format!("{CHART_FILE_STEM}.{}", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        body,
    )
        .into_response())
}

fn xlsx_response(sheet: &Sheet, file_name: &str) -> Result<Response, ApiError> {
    let bytes = sheet.to_xlsx_bytes().map_err(gestao_core::GestaoError::from)?;
    tracing::info!(file = file_name, bytes = bytes.len(), "exported workbook");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(file_name)),
        ],
        bytes,
    )
        .into_response())
}

/// Attachment header with an ASCII fallback name and the UTF-8 name
/// percent-encoded (RFC 6266).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(dashboard: Dashboard) -> Router {
    let state = AppState {
        dashboard: Arc::new(dashboard),
    };
    Router::new()
        .route("/health", get(health))
        .route("/api/pages", get(pages))
        .route("/api/nds", get(nds))
        .route("/api/nds/export", get(nds_export))
        .route("/api/analistas", get(analistas))
        .route("/api/analistas/export", get(analistas_export))
        .route("/api/graficos", get(graficos))
        .route("/api/graficos/chart", get(graficos_chart))
        .route("/api/:page/options", get(options))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn load_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(file) = &args.file {
        config.workbook.clone_from(file);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default = if args.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&args)?;
    tracing::info!(workbook = %config.workbook.display(), "serving workbook");
    let app = create_router(Dashboard::new(config));

    println!("gestao-server listening on {}", args.addr);

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
