use gloo_net::http::{Request, Response};
use serde::Deserialize;
use shared::{InferenceRequest, InferenceResponse, ModelStatus, Prediction};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub async fn fetch_model_status() -> Result<ModelStatus, String> {
    let response = Request::get("/api/model/status")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let response = ensure_ok(response).await?;
    response
        .json::<ModelStatus>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Sends a `data:` URL to the local model and returns its ranked predictions.
pub async fn classify(data_url: String) -> Result<Vec<Prediction>, String> {
    let request = Request::post("/api/classify")
        .json(&InferenceRequest {
            image_data: data_url,
        })
        .map_err(|e| format!("Failed to build request: {}", e))?;

    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let response = ensure_ok(response).await?;
    response
        .json::<InferenceResponse>()
        .await
        .map(|body| body.predictions)
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn ensure_ok(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = parse_error_body(&body).unwrap_or(body);
    gloo_console::error!(format!("Server error: {} - {}", status, message));
    Err(format!("Server error: {} - {}", status, message))
}

fn parse_error_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.error)
}
