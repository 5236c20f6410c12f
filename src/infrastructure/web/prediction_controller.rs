/*
Prediction Controller

REST endpoints of the recommender. Prediction routes decode the configured envelope and
delegate to the PredictAnnotationsUseCase; train routes accept anything and answer 204.
*/

use actix_web::{web, HttpResponse};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;

use crate::config::application_settings::ApiVariant;
use crate::core::platform::container::prediction::PredictionTask;
use crate::error::ServiceError;
use crate::infrastructure::web::envelope::{decode_request, encode_response};
use crate::setup::http_server::AppState;

/// Health response DTO
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub language: String,
}

pub async fn predict_ner(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ServiceError> {
    predict(&state, PredictionTask::Ner, &body).await
}

pub async fn predict_pos(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ServiceError> {
    predict(&state, PredictionTask::Pos, &body).await
}

async fn predict(state: &AppState, task: PredictionTask, body: &[u8]) -> Result<HttpResponse, ServiceError> {
    let variant = state.settings.api.variant;
    let request = decode_request(variant, body)?;

    if let Some(metadata) = &request.metadata {
        info!(
            "{} prediction requested for project {} document {} by user {}",
            task, metadata.project_id, metadata.document_id, metadata.user_id
        );
    }

    let use_case = state.use_cases.predict_annotations.clone();
    let outcome = web::block(move || use_case.execute(task, &request))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(encode_response(variant, &outcome.document)))
}

pub async fn train_ner(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    if state.settings.api.variant == ApiVariant::Inception {
        let path = state.settings.api.train_dump_path.clone();
        let size = body.len();
        match web::block(move || fs::write(&path, &body).map(|()| path)).await {
            Ok(Ok(path)) => debug!("Stored {} bytes of NER training data in {}", size, path),
            Ok(Err(e)) => warn!("Could not store NER training data: {}", e),
            Err(e) => warn!("NER training data was not stored: {}", e),
        }
    }
    HttpResponse::NoContent().finish()
}

pub async fn train_pos() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let model = state.use_cases.predict_annotations.nlp().model_info();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        model: model.name,
        language: model.language,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ner/predict", web::post().to(predict_ner))
        .route("/ner/train", web::post().to(train_ner))
        .route("/pos/predict", web::post().to(predict_pos))
        .route("/pos/train", web::post().to(train_pos))
        .route("/health", web::get().to(health));
}
