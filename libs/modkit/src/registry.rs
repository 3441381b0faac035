//! Module registry: collects each module's capabilities and drives the
//! lifecycle phases (init, db, rest, start, stop) in dependency order.

use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::context::ModuleCtx;
use crate::contracts::{DbModule, Module, RestHostModule, RestfulModule, StatefulModule};

struct Slot {
    name: &'static str,
    deps: &'static [&'static str],
    core: Arc<dyn Module>,
    rest: Option<Arc<dyn RestfulModule>>,
    db: Option<Arc<dyn DbModule>>,
    stateful: Option<Arc<dyn StatefulModule>>,
}

type Host = (&'static str, Arc<dyn RestHostModule>);

/// Modules in dependency order, plus the REST host if one was registered.
pub struct ModuleRegistry {
    slots: Vec<Slot>,
    host: Option<Host>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("order", &self.order())
            .field("rest_host", &self.host.as_ref().map(|(name, _)| *name))
            .finish()
    }
}

impl ModuleRegistry {
    fn order(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.name).collect()
    }

    pub async fn run_init_phase(&self, base: &ModuleCtx) -> Result<(), RegistryError> {
        for s in &self.slots {
            let ctx = base.clone().for_module(s.name);
            s.core
                .init(&ctx)
                .await
                .map_err(|source| RegistryError::phase("init", s.name, source))?;
        }
        Ok(())
    }

    pub async fn run_db_phase(&self, db: &modkit_db::DbHandle) -> Result<(), RegistryError> {
        for s in &self.slots {
            let Some(m) = &s.db else { continue };
            tracing::debug!(module = s.name, "running migrations");
            m.migrate(db)
                .await
                .map_err(|source| RegistryError::phase("migration", s.name, source))?;
        }
        Ok(())
    }

    /// Host prepares the base router, every REST module adds its routes,
    /// then the host wraps the result in its middleware.
    pub fn run_rest_phase(&self, base: &ModuleCtx, router: Router) -> Result<Router, RegistryError> {
        let Some((host_name, host)) = &self.host else {
            return if self.slots.iter().any(|s| s.rest.is_some()) {
                Err(RegistryError::RestRequiresHost)
            } else {
                Ok(router)
            };
        };
        let host_name = *host_name;
        let host_ctx = base.clone().for_module(host_name);

        let mut router = host
            .rest_prepare(&host_ctx, router)
            .map_err(|source| RegistryError::phase("rest prepare", host_name, source))?;

        for s in &self.slots {
            let Some(rest) = &s.rest else { continue };
            let ctx = base.clone().for_module(s.name);
            router = rest
                .register_rest(&ctx, router)
                .map_err(|source| RegistryError::phase("rest registration", s.name, source))?;
        }

        host.rest_finalize(&host_ctx, router)
            .map_err(|source| RegistryError::phase("rest finalize", host_name, source))
    }

    pub async fn run_start_phase(&self, cancel: CancellationToken) -> Result<(), RegistryError> {
        for s in &self.slots {
            let Some(m) = &s.stateful else { continue };
            m.start(cancel.clone())
                .await
                .map_err(|source| RegistryError::phase("start", s.name, source))?;
        }
        Ok(())
    }

    /// Stops in reverse dependency order; failures are logged, not returned.
    pub async fn run_stop_phase(&self, cancel: CancellationToken) -> Result<(), RegistryError> {
        for s in self.slots.iter().rev() {
            let Some(m) = &s.stateful else { continue };
            if let Err(err) = m.stop(cancel.clone()).await {
                tracing::warn!(module = s.name, error = %err, "module failed to stop");
            }
        }
        Ok(())
    }
}

/// Collects modules by name. Registration mistakes are recorded and
/// reported by [`RegistryBuilder::build_topo_sorted`].
#[derive(Default)]
pub struct RegistryBuilder {
    slots: Vec<Slot>,
    host: Option<Host>,
    errors: Vec<RegistryError>,
}

impl RegistryBuilder {
    pub fn register_core(
        &mut self,
        name: &'static str,
        deps: &'static [&'static str],
        m: Arc<dyn Module>,
    ) {
        if self.slots.iter().any(|s| s.name == name) {
            self.errors.push(RegistryError::DuplicateModule(name));
            return;
        }
        self.slots.push(Slot {
            name,
            deps,
            core: m,
            rest: None,
            db: None,
            stateful: None,
        });
    }

    pub fn register_rest(&mut self, name: &'static str, m: Arc<dyn RestfulModule>) {
        self.attach(name, |s| s.rest = Some(m));
    }

    pub fn register_db(&mut self, name: &'static str, m: Arc<dyn DbModule>) {
        self.attach(name, |s| s.db = Some(m));
    }

    pub fn register_stateful(&mut self, name: &'static str, m: Arc<dyn StatefulModule>) {
        self.attach(name, |s| s.stateful = Some(m));
    }

    pub fn register_rest_host(&mut self, name: &'static str, m: Arc<dyn RestHostModule>) {
        if let Some((first, _)) = &self.host {
            let first = *first;
            self.errors
                .push(RegistryError::MultipleRestHosts { first, second: name });
            return;
        }
        self.host = Some((name, m));
    }

    fn attach(&mut self, name: &'static str, f: impl FnOnce(&mut Slot)) {
        match self.slots.iter_mut().find(|s| s.name == name) {
            Some(slot) => f(slot),
            None => self
                .errors
                .push(RegistryError::UnknownModule(name.to_owned())),
        }
    }

    /// Orders modules so every dependency precedes its dependents.
    /// Ties keep registration order.
    pub fn build_topo_sorted(mut self) -> Result<ModuleRegistry, RegistryError> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }
        if let Some((name, _)) = &self.host {
            if !self.slots.iter().any(|s| s.name == *name) {
                return Err(RegistryError::UnknownModule((*name).to_owned()));
            }
        }

        let order = topo_order(&self.slots)?;
        let mut pending: Vec<Option<Slot>> = self.slots.into_iter().map(Some).collect();
        let slots: Vec<Slot> = order
            .into_iter()
            .filter_map(|i| pending[i].take())
            .collect();

        let registry = ModuleRegistry {
            slots,
            host: self.host,
        };
        tracing::info!(modules = ?registry.order(), "module order resolved");
        Ok(registry)
    }
}

/// Depth-first post-order over `deps`.
fn topo_order(slots: &[Slot]) -> Result<Vec<usize>, RegistryError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Open,
        Done,
    }

    fn visit(
        i: usize,
        slots: &[Slot],
        marks: &mut [Mark],
        path: &mut Vec<usize>,
        out: &mut Vec<usize>,
    ) -> Result<(), RegistryError> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::Open => {
                let start = path.iter().position(|&p| p == i).unwrap_or(0);
                let mut cycle: Vec<&'static str> =
                    path[start..].iter().map(|&p| slots[p].name).collect();
                cycle.push(slots[i].name);
                return Err(RegistryError::CycleDetected { path: cycle });
            }
            Mark::New => {}
        }

        marks[i] = Mark::Open;
        path.push(i);
        for dep in slots[i].deps {
            let j = slots.iter().position(|s| s.name == *dep).ok_or_else(|| {
                RegistryError::UnknownDependency {
                    module: slots[i].name.to_owned(),
                    depends_on: (*dep).to_owned(),
                }
            })?;
            visit(j, slots, marks, path, out)?;
        }
        path.pop();
        marks[i] = Mark::Done;
        out.push(i);
        Ok(())
    }

    let mut marks = vec![Mark::New; slots.len()];
    let mut path = Vec::new();
    let mut out = Vec::with_capacity(slots.len());
    for i in 0..slots.len() {
        visit(i, slots, &mut marks, &mut path, &mut out)?;
    }
    Ok(out)
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{phase} failed for module '{module}'")]
    Phase {
        phase: &'static str,
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("modules expose REST routes but no module hosts them")]
    RestRequiresHost,
    #[error("multiple REST hosts registered: '{first}' and '{second}'")]
    MultipleRestHosts {
        first: &'static str,
        second: &'static str,
    },
    #[error("module '{0}' is already registered")]
    DuplicateModule(&'static str),
    #[error("unknown module '{0}'")]
    UnknownModule(String),
    #[error("module '{module}' depends on unknown '{depends_on}'")]
    UnknownDependency { module: String, depends_on: String },
    #[error("cyclic dependency detected: {}", path.join(" -> "))]
    CycleDetected { path: Vec<&'static str> },
}

impl RegistryError {
    fn phase(phase: &'static str, module: &'static str, source: anyhow::Error) -> Self {
        Self::Phase {
            phase,
            module,
            source,
        }
    }
}
