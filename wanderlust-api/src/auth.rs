use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use wanderlust_core::identity::{Credentials, Registration};
use wanderlust_core::SessionUser;
use wanderlust_store::SessionState;
use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
struct SessionResponse {
    state: SessionState,
    user: Option<SessionUser>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    if !state.session.login(&credentials).await? {
        return Err(AppError::AuthenticationError("Invalid email or password".to_string()));
    }
    Ok(Json(current(&state).await))
}

async fn signup(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    if !state.session.signup(&registration).await? {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    Ok((StatusCode::CREATED, Json(current(&state).await)))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout().await;
    StatusCode::NO_CONTENT
}

async fn me(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(current(&state).await)
}

async fn current(state: &AppState) -> SessionResponse {
    let user = state.session.current_user().await;
    SessionResponse {
        state: SessionState::of(user.as_ref()),
        user,
    }
}
