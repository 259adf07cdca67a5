use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wanderlust_booking::{BookingDraft, BookingFlow, BookingParams, BookingStep, RawBookingParams, TravelerInfo};
use wanderlust_catalog::PriceQuote;
use wanderlust_core::{CardDetails, PaymentMethod};
use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub step: BookingStep,
    pub step_number: u8,
    pub step_label: &'static str,
    pub package_title: String,
    pub draft: BookingDraft,
    pub quote: PriceQuote,
}

impl BookingResponse {
    fn new(id: Uuid, flow: &BookingFlow) -> Self {
        let step = flow.step();
        Self {
            id,
            step,
            step_number: step.number(),
            step_label: step.label(),
            package_title: flow.package().title.clone(),
            draft: flow.draft().clone(),
            quote: flow.quote(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleAddOnResponse {
    pub selected: bool,
    pub booking: BookingResponse,
}

#[derive(Debug, Serialize)]
pub struct GoBackResponse {
    pub moved: bool,
    pub booking: BookingResponse,
}

#[derive(Debug, Deserialize)]
pub struct TravelersRequest {
    pub travelers: i64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentPreferencesRequest {
    pub payment_method: Option<PaymentMethod>,
    pub installments: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(open_booking))
        .route("/v1/bookings/{id}", get(get_booking).delete(discard_booking))
        .route("/v1/bookings/{id}/restart", post(restart_booking))
        .route("/v1/bookings/{id}/addons/{index}", post(toggle_add_on))
        .route("/v1/bookings/{id}/travelers", put(set_travelers))
        .route("/v1/bookings/{id}/payment-preferences", put(set_payment_preferences))
        .route("/v1/bookings/{id}/details", post(submit_details))
        .route("/v1/bookings/{id}/payment", post(submit_payment))
        .route("/v1/bookings/{id}/back", post(go_back))
}

/// Open a booking from navigation parameters, e.g.
/// `POST /v1/bookings?package=1&travelers=2&addons=0,2`
pub async fn open_booking(
    State(state): State<AppState>,
    Query(raw): Query<RawBookingParams>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let params = BookingParams::from(raw);
    let mut bookings = state.bookings.lock().await;
    let id = bookings.open(&state.catalog, &params)?;
    let flow = bookings.get(&id)?;

    Ok((StatusCode::CREATED, Json(BookingResponse::new(id, flow))))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let bookings = state.bookings.lock().await;
    let flow = bookings.get(&id)?;
    Ok(Json(BookingResponse::new(id, flow)))
}

pub async fn discard_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.bookings.lock().await.discard(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restart_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.restart(&id)?;
    Ok(Json(BookingResponse::new(id, flow)))
}

pub async fn toggle_add_on(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ToggleAddOnResponse>, AppError> {
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.get_mut(&id)?;
    let selected = flow.toggle_add_on(index)?;

    Ok(Json(ToggleAddOnResponse {
        selected,
        booking: BookingResponse::new(id, flow),
    }))
}

pub async fn set_travelers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TravelersRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.get_mut(&id)?;
    flow.set_traveler_count(req.travelers)?;
    Ok(Json(BookingResponse::new(id, flow)))
}

pub async fn set_payment_preferences(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentPreferencesRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.get_mut(&id)?;
    if let Some(method) = req.payment_method {
        flow.set_payment_method(method)?;
    }
    if let Some(enabled) = req.installments {
        flow.set_installments(enabled)?;
    }
    Ok(Json(BookingResponse::new(id, flow)))
}

pub async fn submit_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(traveler): Json<TravelerInfo>,
) -> Result<Json<BookingResponse>, AppError> {
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.get_mut(&id)?;
    flow.submit_details(traveler)?;
    Ok(Json(BookingResponse::new(id, flow)))
}

/// Card fields may be omitted for PayPal and bank transfer
pub async fn submit_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<BookingResponse>, AppError> {
    let payment: CardDetails = if body.is_empty() {
        CardDetails::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(format!("Invalid payment details: {}", e)))?
    };
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.get_mut(&id)?;
    let code = flow.submit_payment(&payment)?;
    tracing::info!("Booking {} confirmed as {}", id, code);
    Ok(Json(BookingResponse::new(id, flow)))
}

pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GoBackResponse>, AppError> {
    let mut bookings = state.bookings.lock().await;
    let flow = bookings.get_mut(&id)?;
    let moved = flow.go_back();
    Ok(Json(GoBackResponse {
        moved,
        booking: BookingResponse::new(id, flow),
    }))
}
