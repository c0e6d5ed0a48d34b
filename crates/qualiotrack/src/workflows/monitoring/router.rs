use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ItemId;
use super::repository::{FeedRepository, ItemRepository, ValidationRepository};
use super::service::{MonitoringService, ValidationRefused};
use crate::catalog::IndicatorId;
use crate::workflows::SiteId;

/// Router builder exposing the monitoring endpoints.
pub fn monitoring_router<F, I, V>(service: Arc<MonitoringService<F, I, V>>) -> Router
where
    F: FeedRepository + 'static,
    I: ItemRepository + 'static,
    V: ValidationRepository + 'static,
{
    Router::new()
        .route("/api/v1/monitoring/refresh", post(refresh_handler::<F, I, V>))
        .route(
            "/api/v1/monitoring/suggestions",
            post(suggest_handler::<F, I, V>),
        )
        .route(
            "/api/v1/monitoring/items/:item_id/validations",
            post(validate_handler::<F, I, V>),
        )
        .with_state(service)
}

pub(crate) async fn refresh_handler<F, I, V>(
    State(service): State<Arc<MonitoringService<F, I, V>>>,
) -> Response
where
    F: FeedRepository + 'static,
    I: ItemRepository + 'static,
    V: ValidationRepository + 'static,
{
    // The sweep does blocking HTTP; keep it off the async workers.
    match tokio::task::spawn_blocking(move || service.refresh_all()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            let payload = json!({ "error": format!("refresh task failed: {err}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionRequest {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) default_indicator: Option<IndicatorId>,
}

pub(crate) async fn suggest_handler<F, I, V>(
    State(service): State<Arc<MonitoringService<F, I, V>>>,
    Json(request): Json<SuggestionRequest>,
) -> Response
where
    F: FeedRepository + 'static,
    I: ItemRepository + 'static,
    V: ValidationRepository + 'static,
{
    let suggestion = service.suggest(
        &request.title,
        &request.description,
        request.default_indicator,
    );
    (StatusCode::OK, Json(suggestion)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidationRequest {
    pub(crate) indicator_id: IndicatorId,
    pub(crate) validated_by: String,
    pub(crate) site: String,
}

pub(crate) async fn validate_handler<F, I, V>(
    State(service): State<Arc<MonitoringService<F, I, V>>>,
    Path(item_id): Path<u64>,
    Json(request): Json<ValidationRequest>,
) -> Response
where
    F: FeedRepository + 'static,
    I: ItemRepository + 'static,
    V: ValidationRepository + 'static,
{
    let site = SiteId(request.site);
    match service.create_validation(
        ItemId(item_id),
        request.indicator_id,
        &request.validated_by,
        &site,
    ) {
        Ok(validation) => (StatusCode::CREATED, Json(validation)).into_response(),
        Err(err @ ValidationRefused::ItemNotFound)
        | Err(err @ ValidationRefused::IndicatorNotFound) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err @ ValidationRefused::NotMonitoringIndicator) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
