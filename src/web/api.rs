//! JSON routes under `/api`.
//!
//! Task responses carry the whole view and the outcome of the save:
//!
//! ```json
//! {"view": {"tasks": [...], "active_count": 1, "filter": "all"}, "sync": {"status": "saved"}}
//! ```
//!
//! A failed save is not an HTTP error: the change is kept in memory and
//! `sync` reads `{"status": "failed", "message": "..."}`.

use super::error::ApiError;
use super::{blocking, end_session, expired_cookie, session_cookie, session_token, start_session, with_session, AppState, Entry, Started};
use crate::db::tasks::Tasks;
use crate::libs::engine::{Deleted, SyncStatus, TaskAdded, TaskView, Updated};
use crate::libs::messages::Message;
use crate::libs::session::{Session, SessionContext};
use crate::libs::task::{Filter, TaskId, UserId};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewTaskRequest {
    pub name: String,
}

/// Partial update; at least one field must be present.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    pub filter: String,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SessionBody {
    pub user: UserBody,
    pub view: TaskView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/tasks", get(list_tasks).post(add_task))
        .route("/tasks/clear-completed", post(clear_completed))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
        .route("/tasks/{id}/toggle", post(toggle_task))
        .route("/filter", put(set_filter))
}

async fn login(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(body): Json<CredentialsRequest>) -> Result<Response, ApiError> {
    let started = enter(state, headers, Entry::Login, body).await?;
    Ok(session_response(StatusCode::OK, started))
}

async fn register(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(body): Json<CredentialsRequest>) -> Result<Response, ApiError> {
    let started = enter(state, headers, Entry::Register, body).await?;
    Ok(session_response(StatusCode::CREATED, started))
}

async fn enter(state: Arc<AppState>, headers: HeaderMap, entry: Entry, body: CredentialsRequest) -> Result<Started, ApiError> {
    let previous = session_token(&headers);
    blocking(move || start_session(&state, previous, entry, &body.username, &body.password)).await?
}

fn session_response(status: StatusCode, started: Started) -> Response {
    let cookie = session_cookie(&started.token);
    let body = SessionBody {
        user: UserBody {
            id: started.user_id,
            username: started.username,
        },
        view: started.view,
        notice: started.notice,
    };
    (status, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response, ApiError> {
    let token = session_token(&headers);
    blocking(move || end_session(&state, token)).await?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired_cookie())]).into_response())
}

async fn list_tasks(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Json<Updated>, ApiError> {
    let updated = with_user(state, &headers, |session, _| {
        Ok(Updated {
            view: session.engine.view(),
            sync: SyncStatus::NotRequired,
        })
    })
    .await?;

    Ok(Json(updated))
}

async fn add_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewTaskRequest>,
) -> Result<(StatusCode, Json<TaskAdded>), ApiError> {
    let added = with_user(state, &headers, move |session, ctx| Ok(session.engine.add_task(&ctx, &body.name)?)).await?;

    Ok((StatusCode::CREATED, Json(added)))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Updated>, ApiError> {
    let updated = with_user(state, &headers, move |session, ctx| {
        if body.name.is_none() && body.completed.is_none() {
            return Err(ApiError::Unprocessable(Message::NothingToUpdate));
        }
        Ok(session.engine.edit_task(&ctx, TaskId(id), body.name.as_deref(), body.completed)?)
    })
    .await?;

    Ok(Json(updated))
}

async fn toggle_task(State(state): State<Arc<AppState>>, headers: HeaderMap, Path(id): Path<u64>) -> Result<Json<Updated>, ApiError> {
    let updated = with_user(state, &headers, move |session, ctx| Ok(session.engine.toggle_completion(&ctx, TaskId(id))?)).await?;

    Ok(Json(updated))
}

async fn delete_task(State(state): State<Arc<AppState>>, headers: HeaderMap, Path(id): Path<u64>) -> Result<Json<Deleted>, ApiError> {
    let deleted = with_user(state, &headers, move |session, ctx| Ok(session.engine.delete_task(&ctx, TaskId(id))?)).await?;

    Ok(Json(deleted))
}

async fn clear_completed(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Json<Updated>, ApiError> {
    let updated = with_user(state, &headers, |session, ctx| Ok(session.engine.clear_completed(&ctx))).await?;

    Ok(Json(updated))
}

async fn set_filter(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(body): Json<FilterRequest>) -> Result<Json<Updated>, ApiError> {
    let filter: Filter = body.filter.parse()?;
    let updated = with_user(state, &headers, move |session, _| Ok(session.engine.set_filter(filter))).await?;

    Ok(Json(updated))
}

/// Like [`with_session`], but an anonymous request is a 401.
async fn with_user<T, F>(state: Arc<AppState>, headers: &HeaderMap, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Session<Tasks>, SessionContext) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    match with_session(state, session_token(headers), f).await? {
        Some(result) => result,
        None => Err(ApiError::not_logged_in()),
    }
}
