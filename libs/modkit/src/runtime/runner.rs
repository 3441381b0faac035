//! ModKit runtime runner.
//!
//! Supported DB modes:
//!   - `DbOptions::None`: modules get no DB in their contexts.
//!   - `DbOptions::Handle`: one shared `DbHandle`; `DbModule`s migrate against it.
//!
//! One stable `ModuleCtx` is built and reused across all phases
//! (init → db → rest → start → wait → stop). Shutdown can be driven by OS
//! signals, an external `CancellationToken`, or an arbitrary future.

use crate::context::{ConfigProvider, ModuleCtxBuilder};
use crate::registry::ModuleRegistry;
use crate::runtime::shutdown;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio_util::sync::CancellationToken;

/// How the runtime should provide DBs to modules.
pub enum DbOptions {
    /// No database integration. `ModuleCtx::db()` will be `None`, `db_required()` will error.
    None,
    /// A connected handle shared by every module.
    Handle(Arc<modkit_db::DbHandle>),
}

/// How the runtime should decide when to stop.
pub enum ShutdownOptions {
    /// Listen for OS signals (Ctrl+C / SIGTERM).
    Signals,
    /// An external `CancellationToken` controls the lifecycle.
    Token(CancellationToken),
    /// An arbitrary future; when it completes, we initiate shutdown.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

/// Options for running the ModKit runner.
pub struct RunOptions {
    /// Provider of module config sections (raw JSON by module name).
    pub modules_cfg: Arc<dyn ConfigProvider>,
    /// DB strategy.
    pub db: DbOptions,
    /// Shutdown strategy.
    pub shutdown: ShutdownOptions,
    /// Modules, already registered and topo-sorted.
    pub registry: ModuleRegistry,
}

/// Full cycle: init → db → rest (sync) → start → wait → stop.
pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let hub = Arc::new(crate::client_hub::ClientHub::default());
    let cancel = match &opts.shutdown {
        ShutdownOptions::Token(t) => t.clone(),
        _ => CancellationToken::new(),
    };

    match opts.shutdown {
        ShutdownOptions::Signals => {
            let c = cancel.clone();
            tokio::spawn(async move {
                match shutdown::wait_for_shutdown().await {
                    Ok(()) => {
                        tracing::info!("shutdown: signal received");
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "shutdown: primary waiter failed; falling back to ctrl_c()"
                        );
                        let _ = tokio::signal::ctrl_c().await;
                    }
                }
                c.cancel();
            });
        }
        ShutdownOptions::Future(waiter) => {
            let c = cancel.clone();
            tokio::spawn(async move {
                waiter.await;
                tracing::info!("shutdown: external future completed");
                c.cancel();
            });
        }
        ShutdownOptions::Token(_) => {
            tracing::info!("shutdown: external token will control lifecycle");
        }
    }

    let registry = opts.registry;

    let mut ctx_builder = ModuleCtxBuilder::new(cancel.clone())
        .with_client_hub(hub.clone())
        .with_config_provider(opts.modules_cfg.clone());
    if let DbOptions::Handle(ref db) = opts.db {
        ctx_builder = ctx_builder.with_db(db.clone());
    }
    let base_ctx = ctx_builder.build();

    tracing::info!("Phase: init");
    registry.run_init_phase(&base_ctx).await?;

    match &opts.db {
        DbOptions::Handle(db) => {
            tracing::info!(engine = ?db.engine(), "Phase: db");
            registry.run_db_phase(db).await?;
        }
        DbOptions::None => {
            tracing::debug!("Phase: db skipped (no database)");
        }
    }

    tracing::info!("Phase: rest (sync)");
    let _ = registry.run_rest_phase(&base_ctx, axum::Router::new())?;

    tracing::info!("Phase: start");
    registry.run_start_phase(cancel.clone()).await?;

    cancel.cancelled().await;

    tracing::info!("Phase: stop");
    registry.run_stop_phase(cancel).await?;

    if let DbOptions::Handle(db) = opts.db {
        db.close().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModuleCtx;
    use crate::contracts::{Module, StatefulModule};
    use crate::registry::RegistryBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct EmptyConfig;
    impl ConfigProvider for EmptyConfig {
        fn get_module_config(&self, _module_name: &str) -> Option<&serde_json::Value> {
            None
        }
    }

    #[derive(Default)]
    struct Tracker {
        log: Mutex<Vec<&'static str>>,
        inits: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Module for Tracker {
        async fn init(&self, _ctx: &ModuleCtx) -> anyhow::Result<()> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push("init");
            Ok(())
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[async_trait::async_trait]
    impl StatefulModule for Tracker {
        async fn start(&self, _cancel: CancellationToken) -> anyhow::Result<()> {
            self.log.lock().unwrap().push("start");
            Ok(())
        }
        async fn stop(&self, _cancel: CancellationToken) -> anyhow::Result<()> {
            self.log.lock().unwrap().push("stop");
            Ok(())
        }
    }

    fn registry_with(tracker: Arc<Tracker>) -> ModuleRegistry {
        let mut b = RegistryBuilder::default();
        b.register_core("tracker", &[], tracker.clone());
        b.register_stateful("tracker", tracker);
        b.build_topo_sorted().unwrap()
    }

    #[tokio::test]
    async fn phases_run_in_order_until_token_cancelled() {
        let tracker = Arc::new(Tracker::default());
        let cancel = CancellationToken::new();
        let opts = RunOptions {
            modules_cfg: Arc::new(EmptyConfig),
            db: DbOptions::None,
            shutdown: ShutdownOptions::Token(cancel.clone()),
            registry: registry_with(tracker.clone()),
        };

        let handle = tokio::spawn(run(opts));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        assert_eq!(*tracker.log.lock().unwrap(), vec!["init", "start", "stop"]);
        assert_eq!(tracker.inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn future_shutdown_stops_the_runner() {
        let tracker = Arc::new(Tracker::default());
        let opts = RunOptions {
            modules_cfg: Arc::new(EmptyConfig),
            db: DbOptions::None,
            shutdown: ShutdownOptions::Future(Box::pin(async {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            })),
            registry: registry_with(tracker.clone()),
        };

        tokio::time::timeout(std::time::Duration::from_secs(5), run(opts))
            .await
            .expect("runner should stop after the future completes")
            .unwrap();
        assert_eq!(tracker.log.lock().unwrap().last(), Some(&"stop"));
    }
}
