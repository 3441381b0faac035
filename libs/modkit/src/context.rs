use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

#[derive(Clone)]
pub struct ModuleCtx {
    pub(crate) db: Option<Arc<modkit_db::DbHandle>>,
    pub(crate) config_provider: Option<Arc<dyn ConfigProvider>>,
    pub(crate) client_hub: Arc<crate::client_hub::ClientHub>,
    pub(crate) cancellation_token: CancellationToken,
    pub(crate) module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                db: None,
                config_provider: None,
                client_hub: Arc::new(crate::client_hub::ClientHub::default()),
                cancellation_token: token,
                module_name: None,
            },
        }
    }
    pub fn with_db(mut self, db: Arc<modkit_db::DbHandle>) -> Self {
        self.inner.db = Some(db);
        self
    }
    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }
    pub fn with_client_hub(mut self, hub: Arc<crate::client_hub::ClientHub>) -> Self {
        self.inner.client_hub = hub;
        self
    }
    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name (used by the registry).
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    pub fn db(&self) -> Option<Arc<modkit_db::DbHandle>> {
        self.db.clone()
    }

    pub fn db_required(&self) -> anyhow::Result<Arc<modkit_db::DbHandle>> {
        self.db
            .clone()
            .ok_or_else(|| anyhow::anyhow!("database is not configured"))
    }

    pub fn client_hub(&self) -> Arc<crate::client_hub::ClientHub> {
        self.client_hub.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Best-effort: deserialize the module's config into `T`, fallback to `T::default()`
    /// if section is missing. An invalid section is logged and also falls back.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> T {
        let (Some(name), Some(p)) = (&self.module_name, &self.config_provider) else {
            return T::default();
        };
        match p.get_module_config(name) {
            Some(v) => serde_json::from_value::<T>(v.clone()).unwrap_or_else(|e| {
                tracing::warn!(module = %name, error = %e, "invalid module config; using defaults");
                T::default()
            }),
            None => T::default(),
        }
    }

    /// Strict: deserialize the module's config into `T`, returning a pathful error on failure.
    pub fn module_config_required<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        let name = self
            .module_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("context is not scoped to a module"))?;

        let prov = self
            .config_provider
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no ConfigProvider"))?;

        let val = prov
            .get_module_config(name)
            .ok_or_else(|| anyhow::anyhow!("missing module config: {name}"))?;

        serde_json::from_value(val.clone()).map_err(|e| anyhow::anyhow!("invalid {name} config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    #[derive(Debug, Default, serde::Deserialize, PartialEq)]
    struct Knobs {
        #[serde(default)]
        limit: u32,
    }

    fn ctx(sections: &[(&str, serde_json::Value)]) -> ModuleCtx {
        let map = sections
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(MapProvider(map)))
            .build()
    }

    #[test]
    fn module_config_reads_scoped_section() {
        let c = ctx(&[("lots", serde_json::json!({"limit": 7}))]).for_module("lots");
        assert_eq!(c.module_config::<Knobs>(), Knobs { limit: 7 });
        assert_eq!(c.current_module(), Some("lots"));
    }

    #[test]
    fn module_config_falls_back_to_default() {
        let c = ctx(&[("lots", serde_json::json!({"limit": "many"}))]).for_module("lots");
        assert_eq!(c.module_config::<Knobs>(), Knobs::default());

        let c = ctx(&[]).for_module("users");
        assert_eq!(c.module_config::<Knobs>(), Knobs::default());
        assert!(c.module_config_required::<Knobs>().is_err());
    }

    #[test]
    fn db_required_errors_without_db() {
        let c = ctx(&[]);
        assert!(c.db().is_none());
        assert!(c.db_required().is_err());
    }
}
