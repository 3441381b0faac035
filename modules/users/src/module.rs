use std::sync::Arc;

use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UsersConfig;
use crate::contract::client::UsersApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersLocalClient;
use crate::infra::storage::fields::user_field_map;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

pub const MODULE_NAME: &str = "users";

/// Users module: storage, domain service, REST routes and the in-process client.
#[derive(Default)]
pub struct Users {
    service: arc_swap::ArcSwapOption<Service>,
}

impl Users {
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.load_full()
    }
}

#[async_trait]
impl Module for Users {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing users module");

        let cfg: UsersConfig = ctx.module_config();
        debug!(
            "Loaded users config: max_name_length={}, max_filter_atoms={}",
            cfg.max_name_length, cfg.max_filter_atoms
        );

        let db = ctx.db_required()?;
        let repo = SeaOrmUsersRepository::new(db.sea());
        let service_config = ServiceConfig {
            max_name_length: cfg.max_name_length,
            max_filter_atoms: cfg.max_filter_atoms,
            ..ServiceConfig::default()
        };
        let service = Arc::new(Service::new(
            Arc::new(repo),
            user_field_map().filter_registry(),
            service_config,
        ));

        self.service.store(Some(service.clone()));

        let api: Arc<dyn UsersApi> = Arc::new(UsersLocalClient::new(service));
        ctx.client_hub().register::<dyn UsersApi>(api);
        info!("Users API exposed to ClientHub");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[async_trait]
impl DbModule for Users {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()> {
        info!("Running users database migrations");
        crate::infra::storage::migrations::Migrator::up(db.seaorm(), None).await?;
        info!("Users database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Users {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering users REST routes");

        let service = self
            .service()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;

        let router = routes::register_routes(router, service)?;
        info!("Users REST routes registered successfully");
        Ok(router)
    }
}
