use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        services::verify_password,
    },
    error::{ApiError, AppJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = payload.email.trim();

    // Unknown email and wrong password must look the same to the client.
    let Some(user) = state.users.find_by_email(email).await? else {
        warn!(%email, "login unknown email");
        return Ok(Json(LoginResponse::invalid_credentials()));
    };

    let ok = verify_password(state.hasher.clone(), payload.password, user.password.clone()).await?;
    if !ok {
        warn!(%email, user_id = user.user_id, "login invalid password");
        return Ok(Json(LoginResponse::invalid_credentials()));
    }

    info!(user_id = user.user_id, %email, "user logged in");
    Ok(Json(LoginResponse::success(user)))
}
