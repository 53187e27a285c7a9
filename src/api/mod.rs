use axum::Json;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Router, http::StatusCode};
use tracing::debug;
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    Chapter, Course, NewChapterRequest, NewCourseRequest, UpdateChapterRequest,
    UpdateCourseRequest,
};
use crate::services::VideoAssetService;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", post(create_course))
        .route(
            "/api/courses/{course_id}",
            get(get_course).patch(update_course),
        )
        .route("/api/courses/{course_id}/chapters", post(create_chapter))
        .route(
            "/api/courses/{course_id}/chapters/{chapter_id}",
            patch(update_chapter),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn create_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    let course = repository::insert_course(&state.db, &claims.sub, req).await?;
    Ok(Json(course))
}

async fn get_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = repository::find_course_for_owner(&state.db, &course_id, &claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    let course = repository::update_course(&state.db, &course_id, &claims.sub, req)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(course))
}

async fn create_chapter(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(course_id): Path<String>,
    Json(req): Json<NewChapterRequest>,
) -> Result<Json<Chapter>, AppError> {
    req.validate()?;
    repository::find_course_for_owner(&state.db, &course_id, &claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let chapter = repository::insert_chapter(&state.db, &course_id, req).await?;
    Ok(Json(chapter))
}

async fn update_chapter(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((course_id, chapter_id)): Path<(String, String)>,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Json<Chapter>, AppError> {
    repository::find_course_for_owner(&state.db, &course_id, &claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if req.is_published.is_some() {
        debug!("ignoring isPublished in chapter update payload");
    }

    // An empty string does not count as a new video URL.
    let video_url = req.video_url.clone().filter(|u| !u.is_empty());

    let chapter = repository::update_chapter(&state.db, &chapter_id, &course_id, req)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(input_url) = video_url {
        let service = VideoAssetService::new(state.db.clone(), state.video.clone());
        service.replace_chapter_asset(&chapter_id, &input_url).await?;
    }

    Ok(Json(chapter))
}
