//! Provider administration endpoints

use crate::core::types::ProviderCategory;
use crate::core::usage::MonthRange;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/providers")
            .route("/health", web::get().to(health_check_all))
            .route("/reload", web::post().to(reload))
            .route("/stats", web::get().to(provider_stats))
            .route("/{category}", web::get().to(list_providers))
            .route("/{category}/{name}/primary", web::post().to(set_primary))
            .route("/{category}/{name}/active", web::post().to(set_active)),
    );
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub category: Option<String>,
    /// First month included, `YYYY-MM`
    pub from: Option<String>,
    /// Last month included, `YYYY-MM`
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveBody {
    pub active: bool,
}

fn parse_category(value: Option<&str>) -> Result<Option<ProviderCategory>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.parse::<ProviderCategory>().map_err(ServiceError::validation))
        .transpose()
}

fn path_category(value: &str) -> Result<ProviderCategory> {
    value
        .parse::<ProviderCategory>()
        .map_err(ServiceError::not_found)
}

fn live_names(state: &AppState, category: ProviderCategory) -> Vec<String> {
    state
        .orchestrator
        .registry()
        .snapshot()
        .live(category)
        .iter()
        .map(|provider| provider.name().to_string())
        .collect()
}

/// GET /api/v1/providers/health
///
/// 200 when every live provider answered its probe, 503 otherwise.
pub async fn health_check_all(state: web::Data<AppState>) -> HttpResponse {
    let report = state.orchestrator.health_check_all().await;
    if report.overall.is_healthy() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}

/// POST /api/v1/providers/reload?category=
pub async fn reload(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse> {
    let category = parse_category(query.category.as_deref())?;
    state.orchestrator.reload(category).await?;

    let snapshot = state.orchestrator.registry().snapshot();
    let live: BTreeMap<_, _> = snapshot
        .categories
        .iter()
        .filter(|(c, _)| category.is_none_or(|only| only == **c))
        .map(|(c, set)| (*c, set.live_names()))
        .collect();
    info!(generation = snapshot.generation, "Providers reloaded");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "generation": snapshot.generation,
        "live": live,
    })))
}

/// GET /api/v1/providers/stats?category=&from=&to=
pub async fn provider_stats(
    state: web::Data<AppState>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse> {
    let category = parse_category(query.category.as_deref())?;
    let range = MonthRange::new(query.from.as_deref(), query.to.as_deref())
        .map_err(ServiceError::validation)?;

    let report = state.orchestrator.provider_stats(category, &range).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": report })))
}

/// GET /api/v1/providers/{category}
///
/// Every stored config of the category with credentials masked.
pub async fn list_providers(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let category = path_category(&path)?;
    let configs = state.orchestrator.registry().list_configs(category).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": configs })))
}

/// POST /api/v1/providers/{category}/{name}/primary
pub async fn set_primary(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (category, name) = path.into_inner();
    let category = path_category(&category)?;
    state.orchestrator.registry().set_primary(category, &name).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "live": live_names(&state, category),
    })))
}

/// POST /api/v1/providers/{category}/{name}/active
pub async fn set_active(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<ActiveBody>,
) -> Result<HttpResponse> {
    let (category, name) = path.into_inner();
    let category = path_category(&category)?;
    state
        .orchestrator
        .registry()
        .set_active(category, &name, body.active)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "live": live_names(&state, category),
    })))
}
