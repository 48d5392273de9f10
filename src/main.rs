mod handlers;
mod inference;
mod models;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::env;
use std::path::PathBuf;
use std::process;

use inference::Classifier;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let model_path =
        PathBuf::from(env::var("MODEL_PATH").unwrap_or_else(|_| "model.onnx".to_string()));
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // The service has no purpose without a model: fail before binding.
    let classifier = match Classifier::load(&model_path) {
        Ok(classifier) => classifier,
        Err(e) => {
            log::error!("failed to load model from {}: {}", model_path.display(), e);
            process::exit(1);
        }
    };
    let classifier = web::Data::new(classifier);

    log::info!("model loaded from {}", model_path.display());
    log::info!("server running at http://{}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(classifier.clone())
            .service(web::resource("/predict").route(web::post().to(handlers::predict)))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
