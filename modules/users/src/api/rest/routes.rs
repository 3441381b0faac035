use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let users = Router::new()
        .route("/api/users", post(handlers::create_user).get(handlers::list_users))
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(Extension(service));

    Ok(router.merge(users))
}
