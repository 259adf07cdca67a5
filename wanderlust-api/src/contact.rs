use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use wanderlust_core::inquiry::{ContactInquiry, InquiryReceipt};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct NewsletterResponse {
    pub message: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/contact", post(submit_contact))
        .route("/v1/newsletter", post(subscribe))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(inquiry): Json<ContactInquiry>,
) -> Result<(StatusCode, Json<InquiryReceipt>), AppError> {
    let receipt = state.inquiries.submit_contact(&inquiry).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<NewsletterRequest>,
) -> Result<Json<NewsletterResponse>, AppError> {
    state.inquiries.subscribe(req.email.trim()).await?;
    Ok(Json(NewsletterResponse {
        message: "Thanks for subscribing!",
    }))
}
