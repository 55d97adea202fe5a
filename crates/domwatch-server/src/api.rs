use crate::response::{ApiResponse, MSG_BAD_DOMAIN, MSG_BAD_DOMAINS};
use crate::{auth, metrics, AppState};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use domwatch_core::{CheckError, DomainStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchCheckRequest {
    pub domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SingleCheckRequest {
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct SingleCheckResponse {
    pub status: DomainStatus,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/check", post(check_domains).get(check_domains))
        .route("/api/domains/check", post(check_single_domain))
        .with_state(state)
}

/// 解析 `{ "domains": [...] }`，去掉空白项；列表为空时返回 `None`
fn parse_domain_list(body: &[u8]) -> Option<Vec<String>> {
    let request: BatchCheckRequest = serde_json::from_slice(body).ok()?;
    let names: Vec<String> = request
        .domains
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

async fn check_domains(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    metrics::record_http_request("check");

    if !auth::is_authorized(state.api_token.as_deref(), query.token.as_deref(), &headers) {
        return ApiResponse::unauthorized();
    }

    let Some(names) = parse_domain_list(&body) else {
        return ApiResponse::bad_request(MSG_BAD_DOMAINS);
    };

    tracing::info!("Batch check requested for {} domains", names.len());

    match state.checker.run(&names).await {
        Ok(report) => ApiResponse::ok(report),
        Err(e @ CheckError::ConfigMissing) => {
            tracing::info!("No alert config found");
            ApiResponse::not_found(e.to_string())
        }
        Err(e) => {
            tracing::error!("Batch check failed: {}", e);
            ApiResponse::internal(format!("检查执行失败: {}", e))
        }
    }
}

async fn check_single_domain(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    metrics::record_http_request("domain_check");

    let domain = match serde_json::from_slice::<SingleCheckRequest>(&body) {
        Ok(request) if !request.domain.trim().is_empty() => request.domain.trim().to_string(),
        _ => return ApiResponse::bad_request(MSG_BAD_DOMAIN),
    };

    let online = state.checker.prober().is_online(&domain).await;
    ApiResponse::ok(SingleCheckResponse {
        status: DomainStatus::from_online(online),
    })
}
