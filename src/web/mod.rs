//! HTTP surface over the record service.
//!
//! Routes mirror the patient API this crate replaces; every error kind maps
//! to one status code in [`problem`].

pub mod handlers;
pub mod problem;

use axum::{
    Router,
    http::Method,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::service::RecordService;
use handlers::{
    about, create_patient, delete_patient, get_patient, healthcheck, hello, list_patients,
    sort_patients, update_patient,
};

#[derive(Clone)]
pub struct AppState {
    pub service: RecordService,
}

impl AppState {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/about", get(about))
        .route("/health", get(healthcheck))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/sort/by", get(sort_patients))
        .route(
            "/patients/:patient_id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .with_state(state)
}
