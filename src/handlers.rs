use actix_multipart::Multipart;
use actix_web::{error, web, Error, HttpResponse, Result};
use futures_util::StreamExt;

use crate::inference::{Classifier, CLASS_NAMES};
use crate::models::PredictionResponse;

pub async fn predict(
    mut payload: Multipart,
    classifier: web::Data<Classifier>,
) -> Result<HttpResponse, Error> {
    // Read the uploaded file into memory. The first non-empty field wins;
    // the bytes live only for this request.
    let mut bytes: Vec<u8> = Vec::new();
    while let Some(item) = payload.next().await {
        let mut field = item?;
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            bytes.extend_from_slice(&data);
        }
        if !bytes.is_empty() {
            break;
        }
    }

    if bytes.is_empty() {
        return Err(error::ErrorBadRequest("No file uploaded"));
    }

    let img = image::load_from_memory(&bytes).map_err(|e| {
        log::warn!("failed to decode uploaded image: {}", e);
        error::ErrorBadRequest("Invalid image file")
    })?;

    let index = classifier.predict(&img).map_err(|e| {
        log::error!("inference failed: {}", e);
        error::ErrorInternalServerError("Inference error")
    })?;

    let label = CLASS_NAMES.get(index).copied().ok_or_else(|| {
        log::error!("model produced out-of-range class index {}", index);
        error::ErrorInternalServerError("Inference error")
    })?;

    log::info!("predicted class: {}", label);

    Ok(HttpResponse::Ok().json(PredictionResponse {
        prediction: label.to_string(),
    }))
}
