use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mounts the lots endpoints under `/api/lots`.
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let lots = Router::new()
        .route("/api/lots", post(handlers::create_lot).get(handlers::list_lots))
        .route(
            "/api/lots/lot/{id}",
            get(handlers::get_lot)
                .patch(handlers::update_lot)
                .delete(handlers::delete_lot),
        )
        .route("/api/lots/user/{id}", get(handlers::list_user_lots))
        .layer(Extension(service));

    Ok(router.merge(lots))
}
