//! Server-rendered HTML routes.

use super::error::ApiError;
use super::{blocking, end_session, expired_cookie, note_sync, session_cookie, session_token, start_session, with_session, AppState, Entry};
use crate::libs::engine::RenameError;
use crate::libs::messages::Message;
use crate::libs::render::{self, NoticeKind};
use crate::libs::task::{Filter, TaskId};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NameForm {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterForm {
    pub filter: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/tasks", post(add_task))
        .route("/tasks/clear-completed", post(clear_completed))
        .route("/tasks/{id}/toggle", post(toggle_task))
        .route("/tasks/{id}/rename", post(rename_task))
        .route("/tasks/{id}/delete", post(delete_task))
        .route("/filter", post(set_filter))
}

/// Task page for a logged-in session, login page otherwise.
async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Html<String>, ApiError> {
    let page = with_session(state, session_token(&headers), |session, _| {
        let notice = session.notice.take();
        let username = session.user().map(|user| user.username.clone()).unwrap_or_default();
        render::tasks_page(&session.engine.view(), &username, notice.as_deref())
    })
    .await?;

    Ok(Html(page.unwrap_or_else(|| render::login_page(None))))
}

async fn login(State(state): State<Arc<AppState>>, headers: HeaderMap, Form(form): Form<CredentialsForm>) -> Response {
    enter(state, headers, Entry::Login, form).await
}

async fn register(State(state): State<Arc<AppState>>, headers: HeaderMap, Form(form): Form<CredentialsForm>) -> Response {
    enter(state, headers, Entry::Register, form).await
}

async fn enter(state: Arc<AppState>, headers: HeaderMap, entry: Entry, form: CredentialsForm) -> Response {
    let previous = session_token(&headers);
    let started = blocking(move || start_session(&state, previous, entry, &form.username, &form.password)).await;

    match started.and_then(|started| started) {
        Ok(started) => ([(header::SET_COOKIE, session_cookie(&started.token))], Redirect::to("/")).into_response(),
        Err(e) => {
            if let ApiError::Internal(detail) = &e {
                tracing::error!(error = %detail, "login failed");
            }
            let page = render::login_page(Some((NoticeKind::Failure, &e.public_message())));
            (e.status(), Html(page)).into_response()
        }
    }
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response, ApiError> {
    let token = session_token(&headers);
    blocking(move || end_session(&state, token)).await?;

    Ok(([(header::SET_COOKIE, expired_cookie())], Redirect::to("/")).into_response())
}

async fn add_task(State(state): State<Arc<AppState>>, headers: HeaderMap, Form(form): Form<NameForm>) -> Result<Redirect, ApiError> {
    with_session(state, session_token(&headers), move |session, ctx| {
        // Blank names are ignored without a notice.
        if let Ok(added) = session.engine.add_task(&ctx, &form.name) {
            note_sync(session, &added.updated.sync);
        }
    })
    .await?;

    Ok(Redirect::to("/"))
}

async fn toggle_task(State(state): State<Arc<AppState>>, headers: HeaderMap, Path(id): Path<u64>) -> Result<Redirect, ApiError> {
    with_session(state, session_token(&headers), move |session, ctx| {
        match session.engine.toggle_completion(&ctx, TaskId(id)) {
            Ok(updated) => note_sync(session, &updated.sync),
            Err(_) => session.notice = Some(Message::TaskNotFound(id).to_string()),
        }
    })
    .await?;

    Ok(Redirect::to("/"))
}

async fn rename_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Form(form): Form<NameForm>,
) -> Result<Redirect, ApiError> {
    with_session(state, session_token(&headers), move |session, ctx| {
        match session.engine.rename_task(&ctx, TaskId(id), &form.name) {
            Ok(updated) => note_sync(session, &updated.sync),
            Err(RenameError::BlankName) => session.notice = Some(Message::BlankTaskName.to_string()),
            Err(RenameError::UnknownTask(_)) => session.notice = Some(Message::TaskNotFound(id).to_string()),
        }
    })
    .await?;

    Ok(Redirect::to("/"))
}

async fn delete_task(State(state): State<Arc<AppState>>, headers: HeaderMap, Path(id): Path<u64>) -> Result<Redirect, ApiError> {
    with_session(state, session_token(&headers), move |session, ctx| {
        match session.engine.delete_task(&ctx, TaskId(id)) {
            Ok(deleted) => note_sync(session, &deleted.updated.sync),
            Err(_) => session.notice = Some(Message::TaskNotFound(id).to_string()),
        }
    })
    .await?;

    Ok(Redirect::to("/"))
}

async fn clear_completed(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Redirect, ApiError> {
    with_session(state, session_token(&headers), |session, ctx| {
        let updated = session.engine.clear_completed(&ctx);
        note_sync(session, &updated.sync);
    })
    .await?;

    Ok(Redirect::to("/"))
}

async fn set_filter(State(state): State<Arc<AppState>>, headers: HeaderMap, Form(form): Form<FilterForm>) -> Result<Redirect, ApiError> {
    with_session(state, session_token(&headers), move |session, _| match form.filter.parse::<Filter>() {
        Ok(filter) => {
            session.engine.set_filter(filter);
        }
        Err(e) => session.notice = Some(Message::InvalidFilter(e.0).to_string()),
    })
    .await?;

    Ok(Redirect::to("/"))
}
