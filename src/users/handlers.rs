use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{Credentials, MessageResponse, UserMessageResponse},
    repo_types::User,
};
use crate::{
    error::{ApiError, RepoError},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    let Path(raw) = path.map_err(|e| {
        warn!(error = %e, "invalid user id");
        ApiError::validation("invalid user id")
    })?;
    raw.parse::<i32>().map_err(|_| {
        warn!(id = %raw, "invalid user id");
        ApiError::validation("invalid user id")
    })
}

fn parse_credentials(
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Credentials, ApiError> {
    let Json(creds) = payload.map_err(|e| {
        warn!(error = %e, "invalid request body");
        ApiError::validation(format!("invalid request body: {}", e.body_text()))
    })?;
    if !creds.is_complete() {
        warn!("username or password missing");
        return Err(ApiError::validation("username and password are required"));
    }
    Ok(creds)
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state, path))]
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(path)?;
    let user = state.users.get_by_id(id).await.map_err(|e| match e {
        RepoError::NotFound => ApiError::user_not_found(id),
        other => other.into(),
    })?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let creds = parse_credentials(payload)?;
    let id = state.users.create(&creds.username, &creds.password).await?;

    info!(user_id = id, username = %creds.username, "user created");
    Ok((
        StatusCode::CREATED,
        Json(User {
            id,
            username: creds.username,
            password: creds.password,
        }),
    ))
}

#[instrument(skip(state, path, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserMessageResponse>, ApiError> {
    let id = parse_id(path)?;
    let creds = parse_credentials(payload)?;

    let affected = state
        .users
        .update(id, &creds.username, &creds.password)
        .await?;
    if affected == 0 {
        warn!(user_id = id, "update of unknown user");
        return Err(ApiError::user_not_found(id));
    }

    info!(user_id = id, "user updated");
    Ok(Json(UserMessageResponse {
        message: "user updated successfully".into(),
        user: User {
            id,
            username: creds.username,
            password: creds.password,
        },
    }))
}

#[instrument(skip(state, path))]
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(path)?;

    let affected = state.users.delete(id).await?;
    if affected == 0 {
        warn!(user_id = id, "delete of unknown user");
        return Err(ApiError::user_not_found(id));
    }

    info!(user_id = id, affected, "user deleted");
    Ok(Json(MessageResponse {
        message: format!("user with id {} deleted", id),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserMessageResponse>, ApiError> {
    let creds = parse_credentials(payload)?;

    let invalid = || ApiError::Unauthorized("invalid username or password".into());

    let user = match state.users.get_by_username(&creds.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %creds.username, "login unknown username");
            return Err(invalid());
        }
    };

    // Plaintext equality; stored passwords are not hashed.
    if user.password != creds.password {
        warn!(user_id = user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(UserMessageResponse {
        message: "login successful".into(),
        user,
    }))
}
