/*
 * Responsibility
 * - /users handlers (authenticate, register, CRUD, me)
 * - Path/JsonBody come in through extractors, DTO validate() runs first,
 *   then the service/repo call, then row -> DTO mapping
 * - which of these need a token is decided in routes.rs, not here
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::users::{
            AuthenticateRequest, AuthenticateResponse, RegisterRequest, UpdateUserRequest, UserDto,
        },
        extractors::{AuthCtxExtractor, JsonBody},
    },
    error::AppError,
    repos::user_repo::{self, UserPatch},
    services::user_service::{self, NewUser},
    state::AppState,
};

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("VALIDATION_ERROR", message)
}

#[utoipa::path(
    post,
    path = "/api/v1/users/authenticate",
    tag = "users",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AuthenticateResponse),
        (status = 400, description = "Invalid request or wrong credentials"),
    )
)]
pub async fn authenticate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AuthenticateRequest>,
) -> Result<Json<AuthenticateResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let user =
        user_service::authenticate(&state.db, req.username.trim(), &req.password).await?;
    let issued = state.tokens.issue_access_token(user.id)?;

    tracing::info!(user_id = user.id, "access token issued");

    Ok(Json(AuthenticateResponse {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        username: user.username,
        token: issued.access_token,
        expires_in: issued.expires_in,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    req.validate().map_err(invalid)?;

    let row = user_service::register(&state.db, NewUser::from(&req), &req.password).await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(row))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = [UserDto]),
        (status = 401, description = "Missing or rejected access token"),
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, AppError> {
    let rows = user_repo::list(&state.db)?;

    Ok(Json(rows.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = UserDto),
        (status = 401, description = "Missing or rejected access token"),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserDto>, AppError> {
    // The account can vanish between the middleware check and this read.
    let row = user_repo::get(&state.db, ctx.user_id)?.ok_or(AppError::Unauthorized)?;

    Ok(Json(UserDto::from(row)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDto>, AppError> {
    let row = user_repo::get(&state.db, user_id)?.ok_or(AppError::not_found("user"))?;

    Ok(Json(UserDto::from(row)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserDto>, AppError> {
    req.validate().map_err(invalid)?;

    let row = user_service::update(
        &state.db,
        user_id,
        UserPatch::from(&req),
        req.password.as_deref(),
    )
    .await?;

    Ok(Json(UserDto::from(row)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !user_repo::delete(&state.db, user_id)? {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
