pub mod capture;
pub mod filters;

use actix_web::HttpResponse;
use log::error;

use crate::api::ApiState;
use crate::status::events::StatusEvent;
use crate::utils::error::AppError;

/// Queue an event and answer 202 once it is accepted
pub(crate) async fn enqueue(state: &ApiState, event: StatusEvent, what: &str) -> HttpResponse {
    match state.status.send(event).await {
        Ok(_) => HttpResponse::Accepted().json(serde_json::json!({
            "status": "accepted",
            "message": format!("{} queued", what)
        })),
        Err(e) => {
            error!("Failed to queue {}: {}", what, e);
            error_response(&e)
        }
    }
}

/// JSON error body matching the success envelope
pub(crate) fn error_response(err: &AppError) -> HttpResponse {
    let body = serde_json::json!({
        "status": "error",
        "message": err.to_string()
    });

    match err {
        AppError::InvalidDumpMode(_) => HttpResponse::BadRequest().json(body),
        AppError::ChannelClosed(_) => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
