mod config;
mod error;
mod inference;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::{ModelConfig, ServerConfig};
use inference::{Classifier, ModelProvider, TorchClassifier};
use routes::configure_routes;
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = ServerConfig::from_env().map_err(|e| {
        log::error!("Invalid server configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // The server comes up while the model loads; the UI polls
    // /api/model/status until it is ready or has failed.
    let model_config_path = config.model_config.clone();
    let provider = ModelProvider::spawn(move || {
        let model_config = ModelConfig::load(&model_config_path)?;
        Ok(Arc::new(TorchClassifier::load(&model_config)?) as Arc<dyn Classifier>)
    });

    actix_web::rt::spawn({
        let provider = provider.clone();
        let url = format!("http://{}", config.bind_target());
        async move {
            match provider.ready().await {
                Ok(()) => log::info!("Analysis available at {}", url),
                Err(e) => log::error!("Analysis disabled: {}", e),
            }
        }
    });

    let frontend_dir = config.frontend_dir.clone();
    if !frontend_dir.exists() {
        log::warn!(
            "Frontend directory {} does not exist; run `trunk build` in frontend/",
            frontend_dir.display()
        );
    }

    let bind_address = config.bind_target();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(provider.clone()))
            .app_data(web::JsonConfig::default().limit(32 * 1024 * 1024))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
