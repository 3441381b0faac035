//! HTTP ingress: owns the outer router, the global middleware stack and the
//! listener. REST modules attach their routes during the REST phase; the
//! server is started in the start phase and drains on cancellation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::{middleware::from_fn, routing::get, Router};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

const STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Main API Ingress module: the single `RestHostModule` of the process.
#[derive(Default)]
pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    // Router from the REST phase, taken by `start()`.
    final_router: Mutex<Option<Router>>,
    local_addr: Mutex<Option<SocketAddr>>,
    server: Mutex<Option<JoinHandle<()>>>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            ..Default::default()
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// Address the listener is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    /// Global middleware, innermost first:
    /// BodyLimit → CORS → Timeout → Trace → request_id extension → PropagateRequestId → SetRequestId
    ///
    /// `SetRequestId` is outermost so every inner layer, including the
    /// propagation back onto the response, sees an id.
    pub fn apply_middleware(&self, router: Router) -> Router {
        let cfg = self.get_config();
        let x_request_id = request_id::header();

        let mut router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        if cfg.timeout_sec > 0 {
            // Elapsed requests get 408; the handler future is dropped, which
            // releases any in-flight store work it owns.
            router = router.layer(TimeoutLayer::new(Duration::from_secs(cfg.timeout_sec)));
        }
        router
            .layer(request_id::create_trace_layer())
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    async fn serve(listener: tokio::net::TcpListener, router: Router, cancel: CancellationToken) {
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!(error = %e, "HTTP server terminated with error");
        }
    }
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> Result<()> {
        let cfg = ctx.module_config::<ApiIngressConfig>();
        tracing::debug!(bind_addr = %cfg.bind_addr, "api_ingress configured");
        self.config.store(Arc::new(cfg));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl modkit::contracts::RestHostModule for ApiIngress {
    fn rest_prepare(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        tracing::debug!("REST host prepared base router with health check");
        Ok(router.route("/health", get(web::health_check)))
    }

    fn rest_finalize(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        let router = self.apply_middleware(router);
        *self.final_router.lock() = Some(router.clone());
        tracing::debug!("REST host finalized router");
        Ok(router)
    }
}

#[async_trait]
impl modkit::contracts::StatefulModule for ApiIngress {
    /// Binds before returning so bind errors fail the start phase.
    async fn start(&self, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cfg.bind_addr, e))?;

        // Take the router so the guard is dropped before awaits
        let stored = { self.final_router.lock().take() };
        let router = match stored {
            Some(r) => r,
            None => {
                tracing::debug!("No router from REST phase, serving health only");
                self.apply_middleware(Router::new().route("/health", get(web::health_check)))
            }
        };

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        *self.local_addr.lock() = Some(local);
        tracing::info!(addr = %local, "HTTP server bound");

        let handle = tokio::spawn(Self::serve(listener, router, cancel));
        *self.server.lock() = Some(handle);
        Ok(())
    }

    async fn stop(&self, _cancel: CancellationToken) -> Result<()> {
        let handle = { self.server.lock().take() };
        if let Some(handle) = handle {
            match tokio::time::timeout(STOP_TIMEOUT, handle).await {
                Ok(Ok(())) => tracing::info!("HTTP server stopped"),
                Ok(Err(e)) => tracing::warn!(error = %e, "HTTP server task failed"),
                Err(_) => tracing::warn!("HTTP server did not drain within {:?}", STOP_TIMEOUT),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit::contracts::{RestHostModule, StatefulModule};
    use modkit::ModuleCtxBuilder;

    #[tokio::test]
    async fn serves_health_and_stops_on_cancel() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            bind_addr: "127.0.0.1:0".into(),
            ..Default::default()
        });
        let ctx = ModuleCtxBuilder::new(CancellationToken::new()).build();
        let router = ingress.rest_prepare(&ctx, Router::new()).unwrap();
        ingress.rest_finalize(&ctx, router).unwrap();

        let cancel = CancellationToken::new();
        ingress.start(cancel.clone()).await.unwrap();
        let addr = ingress.local_addr().expect("bound");

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.1 200"));
        assert!(text.contains("\"healthy\""));
        assert!(text.to_ascii_lowercase().contains("x-request-id"));

        cancel.cancel();
        ingress.stop(cancel).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_bind_addr_fails_start() {
        let ingress = ApiIngress::new(ApiIngressConfig {
            bind_addr: "not-an-addr".into(),
            ..Default::default()
        });
        assert!(ingress.start(CancellationToken::new()).await.is_err());
    }
}
