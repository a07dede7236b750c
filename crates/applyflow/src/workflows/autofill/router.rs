use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::detection::{detect_fields, LabelHints, PrecomputedLabels};
use super::domain::{DetectedField, FormElement, ValidationResult};
use super::plan::{plan_fill, FillAnswers, PlannedField};
use super::validation::FieldValidator;

/// Either raw markup or element snapshots with precomputed label context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub elements: Vec<FormElement>,
    #[serde(default)]
    pub labels: HashMap<usize, LabelHints>,
}

impl DetectRequest {
    fn detect(self) -> Result<Vec<DetectedField>, &'static str> {
        match self.html {
            Some(markup) => Ok(super::detect_fields_in_html(&markup)),
            None if self.elements.is_empty() => Err("either html or elements must be provided"),
            None => {
                let lookup: PrecomputedLabels = self.labels.into_iter().collect();
                Ok(detect_fields(&self.elements, &lookup))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectResponse {
    pub fields: Vec<DetectedField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub field: DetectedField,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub fields: Vec<DetectedField>,
    #[serde(default)]
    pub answers: FillAnswers,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub fields: Vec<PlannedField>,
}

/// HTTP surface for classification, validation, and fill planning.
pub fn autofill_router(validator: Arc<FieldValidator>) -> Router {
    Router::new()
        .route("/api/v1/autofill/detect", post(detect_handler))
        .route("/api/v1/autofill/validate", post(validate_handler))
        .route("/api/v1/autofill/plan", post(plan_handler))
        .with_state(validator)
}

pub(crate) async fn detect_handler(Json(request): Json<DetectRequest>) -> Response {
    match request.detect() {
        Ok(fields) => (StatusCode::OK, Json(DetectResponse { fields })).into_response(),
        Err(message) => bad_request(message),
    }
}

pub(crate) async fn validate_handler(
    State(validator): State<Arc<FieldValidator>>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    let result: ValidationResult = validator.validate_field(&request.field, &request.value);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn plan_handler(
    State(validator): State<Arc<FieldValidator>>,
    Json(request): Json<PlanRequest>,
) -> Response {
    let fields = match request.html {
        Some(markup) => super::detect_fields_in_html(&markup),
        None if request.fields.is_empty() => {
            return bad_request("either html or fields must be provided")
        }
        None => request.fields,
    };

    let planned = plan_fill(&fields, &request.answers, &validator);
    (StatusCode::OK, Json(PlanResponse { fields: planned })).into_response()
}

fn bad_request(message: &str) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}
