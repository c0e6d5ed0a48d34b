use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use qualiotrack::workflows::conformity::{ComplianceExporter, ConformityAggregator};
use qualiotrack::workflows::evidence::{
    AutoProofGenerator, EvidenceId, EvidenceService, EvidenceServiceError, FormationCreated,
    GeneratedProofs, NewEvidence, SessionCreated, TraineeEnrolled,
};
use qualiotrack::workflows::monitoring::{monitoring_router, MonitoringService};
use qualiotrack::workflows::{RepositoryError, SessionId, SiteId};

use crate::infra::{
    AppState, InMemoryEvidenceRepository, InMemoryFeedRepository, InMemoryItemRepository,
    InMemoryValidationRepository,
};

pub(crate) type ApiMonitoringService =
    MonitoringService<InMemoryFeedRepository, InMemoryItemRepository, InMemoryValidationRepository>;

/// Services shared by the evidence, event, and conformity endpoints.
pub(crate) struct CoreServices {
    pub(crate) evidence: EvidenceService<InMemoryEvidenceRepository>,
    pub(crate) generator: AutoProofGenerator<InMemoryEvidenceRepository>,
    pub(crate) aggregator:
        ConformityAggregator<InMemoryEvidenceRepository, InMemoryValidationRepository>,
    pub(crate) exporter: ComplianceExporter<
        InMemoryEvidenceRepository,
        InMemoryValidationRepository,
        InMemoryItemRepository,
    >,
}

pub(crate) fn application_routes(
    monitoring: Arc<ApiMonitoringService>,
    core: Arc<CoreServices>,
) -> axum::Router {
    let core_router = axum::Router::new()
        .route("/api/v1/evidence", axum::routing::post(submit_evidence))
        .route(
            "/api/v1/evidence/:evidence_id/validation",
            axum::routing::post(validate_evidence),
        )
        .route(
            "/api/v1/events/formation-created",
            axum::routing::post(formation_created),
        )
        .route(
            "/api/v1/events/session-created",
            axum::routing::post(session_created),
        )
        .route(
            "/api/v1/events/trainee-enrolled",
            axum::routing::post(trainee_enrolled),
        )
        .route(
            "/api/v1/conformity/sites/:site/sessions/:session_id",
            axum::routing::get(session_conformity),
        )
        .route(
            "/api/v1/conformity/sites/:site/sessions/:session_id/export",
            axum::routing::get(session_export),
        )
        .route(
            "/api/v1/conformity/sites/:site/dashboard",
            axum::routing::get(site_dashboard),
        )
        .with_state(core);

    monitoring_router(monitoring)
        .merge(core_router)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn submit_evidence(
    State(core): State<Arc<CoreServices>>,
    Json(submission): Json<NewEvidence>,
) -> axum::response::Response {
    match core.evidence.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(EvidenceServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "evidence already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidateEvidenceRequest {
    #[serde(default)]
    comment: Option<String>,
}

async fn validate_evidence(
    State(core): State<Arc<CoreServices>>,
    Path(evidence_id): Path<u64>,
    Json(request): Json<ValidateEvidenceRequest>,
) -> axum::response::Response {
    match core
        .evidence
        .validate(EvidenceId(evidence_id), request.comment)
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(EvidenceServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "evidence not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn proofs_response(report: GeneratedProofs) -> axum::response::Response {
    let payload = json!({
        "created": report.created,
        "skipped": report.skipped,
        "errors": report.errors,
    });
    (StatusCode::ACCEPTED, Json(payload)).into_response()
}

async fn formation_created(
    State(core): State<Arc<CoreServices>>,
    Json(event): Json<FormationCreated>,
) -> axum::response::Response {
    proofs_response(core.generator.on_formation_created(&event))
}

async fn session_created(
    State(core): State<Arc<CoreServices>>,
    Json(event): Json<SessionCreated>,
) -> axum::response::Response {
    proofs_response(core.generator.on_session_created(&event))
}

async fn trainee_enrolled(
    State(core): State<Arc<CoreServices>>,
    Json(event): Json<TraineeEnrolled>,
) -> axum::response::Response {
    proofs_response(core.generator.on_trainee_enrolled(&event))
}

async fn session_conformity(
    State(core): State<Arc<CoreServices>>,
    Path((site, session_id)): Path<(String, u64)>,
) -> axum::response::Response {
    match core
        .aggregator
        .session_conformity(SessionId(session_id), &SiteId(site))
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

async fn session_export(
    State(core): State<Arc<CoreServices>>,
    Path((site, session_id)): Path<(String, u64)>,
) -> axum::response::Response {
    match core
        .exporter
        .session_bundle(SessionId(session_id), &SiteId(site))
    {
        Ok(bundle) => (StatusCode::OK, Json(bundle)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

async fn site_dashboard(
    State(core): State<Arc<CoreServices>>,
    Path(site): Path<String>,
) -> axum::response::Response {
    match core.aggregator.site_dashboard(&SiteId(site)) {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
