use std::sync::Arc;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::{Json, Response},
    Extension,
};
use modkit::api::{problem::ProblemResponse, response::created_at, CallerId, ListQuery};
use tracing::{error, info};

use crate::api::rest::dto::{CreateUserReq, UpdateUserReq, UserDto};
use crate::api::rest::error::{map_domain_error, parse_id};
use crate::domain::service::Service;

/// List users matching the query-string filters
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    ListQuery { params, sort }: ListQuery,
    uri: Uri,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    info!(query = ?uri.query(), "Listing users");

    match svc.list_users(&params, sort).await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific user by ID
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    let id = parse_id(&raw_id, uri.path())?;
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Register a new user
pub async fn create_user(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<CreateUserReq>,
) -> Result<Response, ProblemResponse> {
    info!("Creating user: {}", req_body.username);

    match svc.create_user(req_body.into()).await {
        Ok(user) => {
            let location = format!("/api/users/{}", user.id);
            Ok(created_at(&location, UserDto::from(user)))
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update the caller's own profile
pub async fn update_user(
    uri: Uri,
    caller: CallerId,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    Json(req_body): Json<UpdateUserReq>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_id(&raw_id, uri.path())?;
    info!(caller = caller.get(), "Updating user {}", id);

    match svc.update_user(caller.get(), id, req_body.into()).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete the caller's own account
pub async fn delete_user(
    uri: Uri,
    caller: CallerId,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_id(&raw_id, uri.path())?;
    info!(caller = caller.get(), "Deleting user: {}", id);

    match svc.delete_user(caller.get(), id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
