use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::app::auth::AuthService;
use crate::app::humanize::Locale;
use crate::app::posts::PostService;
use crate::app::query::{Page, PostQuery, SortKey, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::app::times::{Elapsed, TimeService};
use crate::app::users::UserService;
use crate::domain::post::{Post, PostDraft, PostView};
use crate::domain::time_of_day::TimeOfDay;
use crate::domain::time_record::TimeRecord;
use crate::domain::user::User;
use crate::http::{AppError, AuthUser};
use crate::AppState;

const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_DURATION_LEN: usize = 200;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.health.ping().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!(error = ?err, "storage ping failed");
            "degraded"
        }
    };

    Json(HealthResponse { status })
}

/// Treats absent and empty query values alike.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_date_time(value: Option<String>) -> Result<OffsetDateTime, AppError> {
    let value = non_empty(value).ok_or_else(|| AppError::bad_request("dateTime is required"))?;
    OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map(|date_time| date_time.to_offset(UtcOffset::UTC))
        .map_err(|_| AppError::bad_request("dateTime must be an RFC 3339 timestamp"))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, AppError> {
    match non_empty(value) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("{} must be a number", name))),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub message: &'static str,
    pub user: User,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("a valid email is required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at least 8 characters"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }
    let name = match non_empty(payload.name) {
        Some(name) => name.trim().to_string(),
        None => email.split('@').next().unwrap_or(email).to_string(),
    };

    let service = AuthService::new(
        state.users.clone(),
        state.paseto_access_key,
        state.access_ttl_minutes,
    );
    let user = service
        .signup(email, &name, &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to create user");
            AppError::internal("failed to create user")
        })?;

    match user {
        Some(user) => {
            tracing::info!(user_id = %user.id, "user created");
            Ok((
                StatusCode::CREATED,
                Json(SignUpResponse {
                    message: "User created successfully",
                    user,
                }),
            ))
        }
        None => Err(AppError::conflict("email already registered")),
    }
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub user: User,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let service = AuthService::new(
        state.users.clone(),
        state.paseto_access_key,
        state.access_ttl_minutes,
    );
    let signed_in = service
        .sign_in(payload.email.trim(), &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to sign in");
            AppError::internal("failed to sign in")
        })?;

    match signed_in {
        Some((user, token)) => Ok(Json(SignInResponse {
            access_token: token.token,
            expires_at: token.expires_at,
            user,
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let service = UserService::new(state.users.clone());
    let users = service.list_users().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list users");
        AppError::internal("failed to list users")
    })?;

    Ok(Json(users))
}

pub async fn get_current_user(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.users.clone());
    let user = service.get_user(auth.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %auth.user_id, "failed to fetch user");
        AppError::internal("failed to fetch user")
    })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub description: Option<String>,
    pub time_of_day: Option<String>,
    pub month: Option<String>,
    pub weekday: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn parse_list_query(params: ListPostsQuery) -> Result<PostQuery, AppError> {
    let time_of_day = match non_empty(params.time_of_day) {
        Some(value) => Some(
            value
                .parse::<TimeOfDay>()
                .map_err(|_| AppError::bad_request("timeOfDay must be one of morning, noon, afternoon, evening"))?,
        ),
        None => None,
    };

    let sort_by = match non_empty(params.sort_by) {
        Some(value) => SortKey::parse(&value)
            .ok_or_else(|| AppError::bad_request("sortBy must be dateTime or timeOfDay"))?,
        None => SortKey::DateTime,
    };

    let sort_order = match non_empty(params.sort_order) {
        Some(value) => SortOrder::parse(&value)
            .ok_or_else(|| AppError::bad_request("sortOrder must be asc or desc"))?,
        None => SortOrder::Desc,
    };

    let page: i64 = parse_number("page", params.page)?.unwrap_or(DEFAULT_PAGE as i64);
    if page < 1 {
        return Err(AppError::bad_request("page must be at least 1"));
    }
    if page > u32::MAX as i64 {
        return Err(AppError::bad_request("page must be at most 4294967295"));
    }

    let limit: i64 = parse_number("limit", params.limit)?.unwrap_or(DEFAULT_LIMIT as i64);
    if limit < 1 || limit > MAX_LIMIT as i64 {
        return Err(AppError::bad_request("limit must be between 1 and 100"));
    }

    let month: Option<u8> = parse_number("month", params.month)?;
    if matches!(month, Some(month) if !(1..=12).contains(&month)) {
        return Err(AppError::bad_request("month must be between 1 and 12"));
    }

    let weekday: Option<u8> = parse_number("weekday", params.weekday)?;
    if matches!(weekday, Some(weekday) if !matches!(weekday, 1..=6 | 8)) {
        return Err(AppError::bad_request(
            "weekday must be 1 (Monday) through 6 (Saturday) or 8 (Sunday)",
        ));
    }

    Ok(PostQuery {
        description: non_empty(params.description),
        time_of_day,
        month,
        weekday,
        sort_by,
        sort_order,
        page: page as u32,
        limit: limit as u32,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub date_time: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

fn parse_post_request(payload: PostRequest) -> Result<PostDraft, AppError> {
    let date_time = parse_date_time(payload.date_time)?;

    let description = non_empty(payload.description)
        .ok_or_else(|| AppError::bad_request("description is required"))?;
    let description = description.trim().to_string();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::bad_request("description must be at most 2000 characters"));
    }

    let duration = non_empty(payload.duration)
        .ok_or_else(|| AppError::bad_request("duration is required"))?;
    let duration = duration.trim().to_string();
    if duration.chars().count() > MAX_DURATION_LEN {
        return Err(AppError::bad_request("duration must be at most 200 characters"));
    }

    Ok(PostDraft {
        date_time,
        description,
        duration,
    })
}

#[derive(Serialize)]
pub struct PostResponse {
    pub message: &'static str,
    pub post: Post,
}

pub async fn list_posts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListPostsQuery>,
) -> Result<Json<Page<PostView>>, AppError> {
    let query = parse_list_query(params)?;

    let service = PostService::new(state.posts.clone());
    let page = service.list_posts(&query).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list posts");
        AppError::internal("failed to list posts")
    })?;

    Ok(Json(page))
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let draft = parse_post_request(payload)?;

    let service = PostService::new(state.posts.clone());
    let post = service.create_post(draft).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %auth.user_id, "failed to create post");
        AppError::internal("failed to create post")
    })?;

    tracing::info!(post_id = %post.id, user_id = %auth.user_id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: "Post created successfully",
            post,
        }),
    ))
}

pub async fn get_post(
    Path(id): Path<Uuid>,
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Post>, AppError> {
    let service = PostService::new(state.posts.clone());
    let post = service.get_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn update_post(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let draft = parse_post_request(payload)?;

    let service = PostService::new(state.posts.clone());
    let post = service.update_post(id, draft).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to update post");
        AppError::internal("failed to update post")
    })?;

    match post {
        Some(post) => {
            tracing::info!(post_id = %id, user_id = %auth.user_id, "post updated");
            Ok(Json(PostResponse {
                message: "Post updated successfully",
                post,
            }))
        }
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn delete_post(
    Path(id): Path<Uuid>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = PostService::new(state.posts.clone());
    let deleted = service.delete_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to delete post");
        AppError::internal("failed to delete post")
    })?;

    if deleted {
        tracing::info!(post_id = %id, user_id = %auth.user_id, "post deleted");
        Ok(Json(MessageResponse {
            message: "Post deleted successfully",
        }))
    } else {
        Err(AppError::not_found("post not found"))
    }
}

// ---------------------------------------------------------------------------
// Reference time
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRequest {
    pub date_time: Option<String>,
}

#[derive(Serialize)]
pub struct TimeResponse {
    pub message: &'static str,
    pub time: TimeRecord,
}

#[derive(Deserialize)]
pub struct ElapsedQuery {
    pub locale: Option<String>,
}

pub async fn list_times(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TimeRecord>>, AppError> {
    let service = TimeService::new(state.times.clone());
    let times = service.list_times().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to fetch times");
        AppError::internal("failed to fetch times")
    })?;

    Ok(Json(times))
}

pub async fn create_time(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<TimeRequest>,
) -> Result<(StatusCode, Json<TimeResponse>), AppError> {
    let date_time = parse_date_time(payload.date_time)?;

    let service = TimeService::new(state.times.clone());
    let time = service.create_time(date_time).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to create time");
        AppError::internal("failed to create time")
    })?;

    match time {
        Some(time) => Ok((
            StatusCode::CREATED,
            Json(TimeResponse {
                message: "Time created successfully",
                time,
            }),
        )),
        None => Err(AppError::conflict("reference time already exists")),
    }
}

pub async fn update_time(
    Path(id): Path<Uuid>,
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<TimeRequest>,
) -> Result<Json<TimeResponse>, AppError> {
    let date_time = parse_date_time(payload.date_time)?;

    let service = TimeService::new(state.times.clone());
    let time = service.update_time(id, date_time).await.map_err(|err| {
        tracing::error!(error = ?err, time_id = %id, "failed to update time");
        AppError::internal("failed to update time")
    })?;

    match time {
        Some(time) => Ok(Json(TimeResponse {
            message: "Time updated successfully",
            time,
        })),
        None => Err(AppError::not_found("time not found")),
    }
}

pub async fn get_elapsed(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ElapsedQuery>,
) -> Result<Json<Elapsed>, AppError> {
    let locale = match non_empty(params.locale) {
        Some(value) => value
            .parse::<Locale>()
            .map_err(|_| AppError::bad_request("locale must be en or vi"))?,
        None => state.default_locale,
    };

    let service = TimeService::new(state.times.clone());
    let elapsed = service
        .elapsed(OffsetDateTime::now_utc(), locale)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to compute elapsed time");
            AppError::internal("failed to compute elapsed time")
        })?;

    match elapsed {
        Some(elapsed) => Ok(Json(elapsed)),
        None => Err(AppError::not_found("reference time not set")),
    }
}
