use axum::{
    Router,
    routing::post,
    Json,
    extract::{rejection::JsonRejection, State},
};
use tracing::{info, warn};
use validator::Validate;

use crate::models::{AppState, ContactRequest, NewSupportMessage};
use crate::types::{AppError, AppResult, MessageResponse, SERVER_ERROR_RETRY};

pub const CONTACT_FIELDS_MISSING: &str = "Required fields are missing.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(post_contact))
        .with_state(state)
}

/// POST /api/contact - store a support message
async fn post_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected contact body: {}", rejection.body_text());
        AppError::Validation(CONTACT_FIELDS_MISSING.to_string())
    })?;

    if request.validate().is_err() {
        return Err(AppError::Validation(CONTACT_FIELDS_MISSING.to_string()));
    }
    let ContactRequest {
        email: Some(email),
        subject: Some(subject),
        message: Some(message),
        username: Some(username),
    } = request
    else {
        return Err(AppError::Validation(CONTACT_FIELDS_MISSING.to_string()));
    };

    let saved = state
        .store
        .insert_support_message(NewSupportMessage { username, email, subject, message })
        .await
        .map_err(|e| e.with_public_message(SERVER_ERROR_RETRY))?;

    info!(message_id = %saved.id, "Support message received");

    Ok(Json(MessageResponse::new("Message received successfully!")))
}
