use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    core::{NewPatient, PatientView, Result},
    service::RecordService,
    update::PatientPatch,
    web::{
        AppState,
        problem::{ApiProblem, ApiResult},
    },
};

pub const SERVICE_NAME: &str = "Patient Management API";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PatientAck {
    pub message: &'static str,
    pub patient_id: String,
}

/// Patients rendered as one JSON object keyed by id, in store order.
#[derive(Debug)]
pub struct PatientListing(pub Vec<PatientView>);

impl Serialize for PatientListing {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for view in &self.0 {
            map.serialize_entry(&view.id, view)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SortResponse {
    Natural(PatientListing),
    Sorted(Vec<PatientView>),
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: SERVICE_NAME,
    })
}

pub async fn about() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Stores patient records and reports BMI and health verdicts.",
    })
}

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

pub async fn list_patients(State(state): State<AppState>) -> ApiResult<Json<PatientListing>> {
    let views = run_blocking(&state, |service| service.list()).await?;
    Ok(Json(PatientListing(views)))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<PatientView>> {
    let view = run_blocking(&state, move |service| service.get(&patient_id)).await?;
    Ok(Json(view))
}

pub async fn sort_patients(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> ApiResult<Json<SortResponse>> {
    let sorted = query.sort_by.is_some();
    let views = run_blocking(&state, move |service| {
        service.sort(query.sort_by.as_deref(), query.order.as_deref())
    })
    .await?;

    Ok(Json(if sorted {
        SortResponse::Sorted(views)
    } else {
        SortResponse::Natural(PatientListing(views))
    }))
}

pub async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<NewPatient>,
) -> ApiResult<(StatusCode, Json<PatientAck>)> {
    let patient_id = run_blocking(&state, move |service| service.create(request)).await?;
    Ok((
        StatusCode::CREATED,
        Json(PatientAck {
            message: "Patient created successfully",
            patient_id,
        }),
    ))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Json(patch): Json<PatientPatch>,
) -> ApiResult<Json<PatientAck>> {
    let updated = run_blocking(&state, move |service| service.update(&patient_id, patch)).await?;
    Ok(Json(PatientAck {
        message: "Patient updated successfully",
        patient_id: updated.id,
    }))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    run_blocking(&state, move |service| service.delete(&patient_id)).await?;
    Ok(Json(MessageResponse {
        message: "Patient info deleted successfully",
    }))
}

/// Gateway I/O is synchronous; keep it off the async workers.
async fn run_blocking<T, F>(state: &AppState, operation: F) -> ApiResult<T>
where
    F: FnOnce(&RecordService) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || operation(&service))
        .await
        .map_err(|e| ApiProblem::internal(format!("worker task failed: {}", e)))?
        .map_err(ApiProblem::from)
}
