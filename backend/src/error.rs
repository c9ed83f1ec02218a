use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Model error: {0}")]
    Model(#[from] tch::TchError),
    #[error("Preprocessing error: {0}")]
    Preprocessing(String),
    #[error("Model lock poisoned by an earlier panic")]
    ModelLock,
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("Failed to read labels from {path}: {source}")]
    Labels {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Model not loaded yet")]
    NotLoaded,
    #[error("Failed to load AI model: {0}")]
    LoadFailed(String),
    #[error("Model loader exited without reporting a result")]
    LoaderVanished,
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Provider(ProviderError::NotLoaded)
            | ApiError::Provider(ProviderError::LoadFailed(_))
            | ApiError::Provider(ProviderError::LoaderVanished) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Provider(ProviderError::Inference(InferenceError::Decode(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Provider(ProviderError::Inference(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("Malformed upload: {}", err))
    }
}
