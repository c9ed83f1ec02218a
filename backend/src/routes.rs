use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::{StreamExt, TryStreamExt};
use log::info;
use shared::{InferenceRequest, InferenceResponse};
use std::path::PathBuf;

use crate::error::ApiError;
use crate::inference::ModelProvider;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/model/status").route(web::get().to(model_status)))
        .service(web::resource("/api/classify").route(web::post().to(classify_data_url)))
        .service(web::resource("/api/classify/upload").route(web::post().to(classify_upload)));
}

async fn model_status(provider: web::Data<ModelProvider>) -> HttpResponse {
    HttpResponse::Ok().json(provider.status())
}

async fn classify_data_url(
    provider: web::Data<ModelProvider>,
    request: web::Json<InferenceRequest>,
) -> Result<HttpResponse, ApiError> {
    let image = decode_data_url(&request.image_data)?;
    classify(provider, image).await
}

async fn classify_upload(
    provider: web::Data<ModelProvider>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    while let Some(mut field) = payload.try_next().await? {
        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            image_data.extend_from_slice(&chunk?);
        }
        if !image_data.is_empty() {
            return classify(provider, image_data).await;
        }
    }
    Err(ApiError::BadRequest("No image found in upload".into()))
}

async fn classify(
    provider: web::Data<ModelProvider>,
    image: Vec<u8>,
) -> Result<HttpResponse, ApiError> {
    info!("Classifying image of {} bytes", image.len());
    let predictions = web::block(move || provider.classify(&image))
        .await
        .map_err(|e| ApiError::Internal(format!("Classification task failed: {}", e)))??;

    Ok(HttpResponse::Ok().json(InferenceResponse { predictions }))
}

/// Extracts the payload of a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, ApiError> {
    let (header, payload) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| ApiError::BadRequest("Image data is not a data URL".into()))?;

    if !header.ends_with(";base64") {
        return Err(ApiError::BadRequest("Image data is not base64 encoded".into()));
    }
    if !header.starts_with("image/") {
        return Err(ApiError::BadRequest(format!(
            "Expected an image, got {}",
            header.trim_end_matches(";base64")
        )));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 payload: {}", e)))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Image data is empty".into()));
    }
    Ok(bytes)
}
