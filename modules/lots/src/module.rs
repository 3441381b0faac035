use std::sync::Arc;

use async_trait::async_trait;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::LotsConfig;
use crate::contract::client::LotsApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::LotsLocalClient;
use crate::infra::storage::fields::lot_field_map;
use crate::infra::storage::sea_orm_repo::SeaOrmLotsRepository;

pub const MODULE_NAME: &str = "lots";

/// Lots module: storage, domain service, REST routes and the in-process client.
#[derive(Default)]
pub struct Lots {
    // Set once in init, read by the REST phase.
    service: arc_swap::ArcSwapOption<Service>,
}

impl Lots {
    /// The wired service, available after `init`.
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.load_full()
    }
}

#[async_trait]
impl Module for Lots {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing lots module");

        let cfg: LotsConfig = ctx.module_config();
        debug!("Loaded lots config: max_filter_atoms={}", cfg.max_filter_atoms);

        let db = ctx.db_required()?;
        let repo = SeaOrmLotsRepository::new(db.sea());
        let service = Arc::new(Service::new(
            Arc::new(repo),
            lot_field_map().filter_registry(),
            ServiceConfig {
                max_filter_atoms: cfg.max_filter_atoms,
            },
        ));

        self.service.store(Some(service.clone()));

        let api: Arc<dyn LotsApi> = Arc::new(LotsLocalClient::new(service));
        ctx.client_hub().register::<dyn LotsApi>(api);
        info!("Lots API exposed to ClientHub");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[async_trait]
impl DbModule for Lots {
    async fn migrate(&self, db: &modkit_db::DbHandle) -> anyhow::Result<()> {
        info!("Running lots database migrations");
        crate::infra::storage::migrations::Migrator::up(db.seaorm(), None).await?;
        info!("Lots database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Lots {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering lots REST routes");

        let service = self
            .service()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;

        let router = routes::register_routes(router, service)?;
        info!("Lots REST routes registered successfully");
        Ok(router)
    }
}
