use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::aml::RiskScreener;
use super::domain::{Credential, KycSubmission, RejectionRequest, SubjectId, VerificationStatus};
use super::identity::IdentityAuthority;
use super::service::{CascadeOutcome, ComplianceError, ComplianceService};
use super::store::VerificationStore;

/// Router builder exposing the KYC and AML endpoints.
pub fn compliance_router<S, C, A>(service: Arc<ComplianceService<S, C, A>>) -> Router
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    Router::new()
        .route("/api/v1/kyc/submit", post(submit_handler::<S, C, A>))
        .route(
            "/api/v1/kyc/status/:subject_id",
            get(status_handler::<S, C, A>),
        )
        .route("/api/v1/kyc/reject", post(reject_handler::<S, C, A>))
        .route(
            "/api/v1/aml/check/:subject_id",
            get(aml_check_handler::<S, C, A>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<S, C, A>(
    State(service): State<Arc<ComplianceService<S, C, A>>>,
    headers: HeaderMap,
    Json(submission): Json<KycSubmission>,
) -> Response
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    let Some(credential) = bearer_credential(&headers) else {
        return unauthorized();
    };

    match service.submit(&credential, submission).await {
        Ok(receipt) => {
            let payload = match &receipt.cascade {
                CascadeOutcome::Confirmed => json!({
                    "status": "verified",
                    "subject_id": receipt.record.subject_id,
                    "message": "KYC verification completed and identity authority updated",
                }),
                CascadeOutcome::Failed(_) => json!({
                    "status": "warning",
                    "subject_id": receipt.record.subject_id,
                    "message": "KYC verified locally but the identity authority update failed",
                }),
            };
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ComplianceError::Unauthorized(_)) => unauthorized(),
        Err(other) => internal_error(&other),
    }
}

pub(crate) async fn status_handler<S, C, A>(
    State(service): State<Arc<ComplianceService<S, C, A>>>,
    headers: HeaderMap,
    Path(subject_id): Path<i64>,
) -> Response
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    let Some(credential) = bearer_credential(&headers) else {
        return unauthorized();
    };

    let subject = SubjectId(subject_id);
    match service.status(&credential, subject).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({
                "subject_id": subject,
                "status": VerificationStatus::NotSubmitted.label(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ComplianceError::Unauthorized(_)) => unauthorized(),
        Err(other) => internal_error(&other),
    }
}

pub(crate) async fn reject_handler<S, C, A>(
    State(service): State<Arc<ComplianceService<S, C, A>>>,
    headers: HeaderMap,
    Json(request): Json<RejectionRequest>,
) -> Response
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    let Some(credential) = bearer_credential(&headers) else {
        return unauthorized();
    };

    match service.reject(&credential, request).await {
        // Cascade failures are absorbed; rejection always reads as success.
        Ok(receipt) => {
            let payload = json!({
                "status": VerificationStatus::Rejected.label(),
                "subject_id": receipt.subject_id,
                "reason": receipt.reason,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ComplianceError::Unauthorized(_)) => unauthorized(),
        Err(other) => internal_error(&other),
    }
}

pub(crate) async fn aml_check_handler<S, C, A>(
    State(service): State<Arc<ComplianceService<S, C, A>>>,
    headers: HeaderMap,
    Path(subject_id): Path<i64>,
) -> Response
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    let Some(credential) = bearer_credential(&headers) else {
        return unauthorized();
    };

    match service.aml_check(&credential, SubjectId(subject_id)).await {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(ComplianceError::Unauthorized(_)) => unauthorized(),
        Err(other) => internal_error(&other),
    }
}

fn bearer_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(Credential::new)
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "invalid or expired credential" });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn internal_error(error: &ComplianceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
