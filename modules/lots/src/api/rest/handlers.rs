use std::sync::Arc;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::{Json, Response},
    Extension,
};
use modkit::api::{problem::ProblemResponse, response::created_at, CallerId, ListQuery};
use tracing::{error, info};

use crate::api::rest::dto::{CreateLotReq, LotDto, UpdateLotReq};
use crate::api::rest::error::{map_domain_error, parse_id};
use crate::domain::service::Service;

fn to_dtos(lots: Vec<crate::contract::model::Lot>) -> Vec<LotDto> {
    lots.into_iter().map(LotDto::from).collect()
}

/// List lots matching the query-string filters
pub async fn list_lots(
    Extension(svc): Extension<Arc<Service>>,
    ListQuery { params, sort }: ListQuery,
    uri: Uri,
) -> Result<Json<Vec<LotDto>>, ProblemResponse> {
    info!(query = ?uri.query(), "Listing lots");

    match svc.list_lots(&params, sort).await {
        Ok(lots) => Ok(Json(to_dtos(lots))),
        Err(e) => {
            error!("Failed to list lots: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific lot by ID
pub async fn get_lot(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    uri: Uri,
) -> Result<Json<LotDto>, ProblemResponse> {
    let id = parse_id(&raw_id, uri.path())?;
    info!("Getting lot with id: {}", id);

    match svc.get_lot(id).await {
        Ok(lot) => Ok(Json(LotDto::from(lot))),
        Err(e) => {
            error!("Failed to get lot {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// All lots published by one user
pub async fn list_user_lots(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    uri: Uri,
) -> Result<Json<Vec<LotDto>>, ProblemResponse> {
    let owner_id = parse_id(&raw_id, uri.path())?;
    info!("Listing lots of user {}", owner_id);

    match svc.list_lots_by_owner(owner_id).await {
        Ok(lots) => Ok(Json(to_dtos(lots))),
        Err(e) => {
            error!("Failed to list lots of user {}: {}", owner_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Publish a new lot on behalf of the caller
pub async fn create_lot(
    uri: Uri,
    caller: CallerId,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<CreateLotReq>,
) -> Result<Response, ProblemResponse> {
    info!(owner_id = caller.get(), "Creating lot: {:?}", req_body);

    match svc.create_lot(req_body.into_new_lot(caller.get())).await {
        Ok(lot) => {
            let location = format!("/api/lots/lot/{}", lot.id);
            Ok(created_at(&location, LotDto::from(lot)))
        }
        Err(e) => {
            error!("Failed to create lot: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update price, rooms or area of the caller's lot
pub async fn update_lot(
    uri: Uri,
    caller: CallerId,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    Json(req_body): Json<UpdateLotReq>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_id(&raw_id, uri.path())?;
    info!(owner_id = caller.get(), "Updating lot {} with: {:?}", id, req_body);

    match svc.update_lot(caller.get(), id, req_body.into()).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to update lot {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete the caller's lot
pub async fn delete_lot(
    uri: Uri,
    caller: CallerId,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_id(&raw_id, uri.path())?;
    info!(owner_id = caller.get(), "Deleting lot: {}", id);

    match svc.delete_lot(caller.get(), id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete lot {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
