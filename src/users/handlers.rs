use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::services::hash_password,
    error::{ApiError, AppJson, AppPath},
    state::AppState,
    users::{
        dto::{CreatedUserResponse, MessageResponse, UserPayload},
        model::{NewUser, User, UserChanges},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// `userId` is a MySQL `INT`; larger integers cannot name a row.
fn row_id(raw: i64) -> Result<i32, ApiError> {
    i32::try_from(raw).map_err(|_| ApiError::NotFound)
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list_all().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<User>, ApiError> {
    let id = row_id(id)?;
    match state.users.get_by_id(id).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            warn!(error = %e, user_id = id, "get_user failed");
            Err(e.into())
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let email = payload.checked_email()?;
    let password = payload
        .new_password()
        .ok_or_else(|| ApiError::BadRequest("password is required".into()))?
        .to_string();

    let password_hash = hash_password(state.hasher.clone(), password).await?;

    let user_id = state
        .users
        .insert(&NewUser {
            name: payload.name,
            email,
            password_hash,
            age: payload.age,
            dob: payload.dob,
            gender: payload.gender,
            weight: payload.weight,
            height: payload.height,
        })
        .await?;

    info!(user_id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user_id,
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UserPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Body problems are reported before the row is looked up, so a bad
    // payload for a missing id is a 400, not a 404.
    let email = payload.checked_email()?;
    let password_hash = match payload.new_password() {
        Some(plain) => Some(hash_password(state.hasher.clone(), plain.to_string()).await?),
        None => None,
    };

    let changes = UserChanges {
        name: payload.name,
        email,
        password_hash,
        age: payload.age,
        dob: payload.dob,
        gender: payload.gender,
        weight: payload.weight,
        height: payload.height,
    };

    let id = row_id(id)?;
    if state.users.update(id, &changes).await? == 0 {
        warn!(user_id = id, "update_user: no such user");
        return Err(ApiError::NotFound);
    }

    info!(user_id = id, password_changed = changes.password_hash.is_some(), "user updated");
    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = row_id(id)?;
    if state.users.delete(id).await? == 0 {
        warn!(user_id = id, "delete_user: no such user");
        return Err(ApiError::NotFound);
    }

    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
