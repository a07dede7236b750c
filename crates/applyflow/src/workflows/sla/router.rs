use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{InterviewSubmission, SlaPeriodId, SubscriptionTier, UserId, VerificationId};
use super::repository::{SlaNotifier, SlaRepository};
use super::service::{SlaError, SlaService};
use super::verifier::InterviewVerifier;

#[derive(Debug, Clone, Deserialize)]
pub struct StartPeriodRequest {
    pub user_id: String,
    pub tier: SubscriptionTier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub approved: bool,
    pub verifier_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsRequest {
    pub tier: SubscriptionTier,
    #[serde(default)]
    pub consume: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisqualifyRequest {
    pub reason: String,
}

/// Router exposing guarantee periods, quotas, and interview verification.
pub fn sla_router<R, N, V>(service: Arc<SlaService<R, N, V>>) -> Router
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    Router::new()
        .route("/api/v1/sla/periods", post(start_handler::<R, N, V>))
        .route(
            "/api/v1/sla/users/:user_id/progress",
            get(progress_handler::<R, N, V>),
        )
        .route(
            "/api/v1/sla/users/:user_id/interviews",
            post(submit_interview_handler::<R, N, V>),
        )
        .route(
            "/api/v1/sla/users/:user_id/limits",
            post(limits_handler::<R, N, V>),
        )
        .route(
            "/api/v1/sla/users/:user_id/disqualify",
            post(disqualify_handler::<R, N, V>),
        )
        .route(
            "/api/v1/sla/verifications/:verification_id/decision",
            post(decision_handler::<R, N, V>),
        )
        .route(
            "/api/v1/sla/periods/:period_id/credit",
            post(credit_handler::<R, N, V>),
        )
        .route(
            "/api/v1/sla/periods/:period_id/refund",
            post(refund_handler::<R, N, V>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Json(request): Json<StartPeriodRequest>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.start_sla_period(&UserId(request.user_id), request.tier) {
        Ok(period) => (StatusCode::CREATED, Json(period)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.get_sla_progress(&UserId(user_id.clone())) {
        Ok(Some(progress)) => (StatusCode::OK, Json(progress)).into_response(),
        Ok(None) => {
            let payload = json!({
                "user_id": user_id,
                "error": "no active guarantee period",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_interview_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(user_id): Path<String>,
    Json(submission): Json<InterviewSubmission>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.submit_interview_verification(&UserId(user_id), submission) {
        Ok(verification) => (StatusCode::ACCEPTED, Json(verification)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn limits_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(user_id): Path<String>,
    Json(request): Json<LimitsRequest>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    let user_id = UserId(user_id);
    let outcome = if request.consume {
        service.try_consume_application(&user_id, request.tier)
    } else {
        service.check_application_limits(&user_id, request.tier)
    };

    match outcome {
        Ok(allowance) if request.consume && !allowance.can_apply => {
            (StatusCode::TOO_MANY_REQUESTS, Json(allowance)).into_response()
        }
        Ok(allowance) => (StatusCode::OK, Json(allowance)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn disqualify_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(user_id): Path<String>,
    Json(request): Json<DisqualifyRequest>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.disqualify_from_sla(&UserId(user_id), &request.reason) {
        Ok(period) => (StatusCode::OK, Json(json!({ "period": period }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(verification_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.verify_interview(
        &VerificationId(verification_id),
        request.approved,
        &request.verifier_id,
        request.notes,
    ) {
        Ok(verification) => (StatusCode::OK, Json(verification)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn credit_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(period_id): Path<String>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.process_sla_credit(&SlaPeriodId(period_id)) {
        Ok(period) => (StatusCode::OK, Json(period)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn refund_handler<R, N, V>(
    State(service): State<Arc<SlaService<R, N, V>>>,
    Path(period_id): Path<String>,
) -> Response
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    match service.issue_sla_refund(&SlaPeriodId(period_id)) {
        Ok(period) => (StatusCode::OK, Json(period)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SlaError) -> Response {
    let status = match &error {
        SlaError::PeriodNotFound(_) | SlaError::VerificationNotFound(_) => StatusCode::NOT_FOUND,
        SlaError::NoActivePeriod(_)
        | SlaError::VerificationAlreadyResolved { .. }
        | SlaError::PeriodNotActive { .. }
        | SlaError::InvalidPeriodState { .. } => StatusCode::CONFLICT,
        SlaError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
