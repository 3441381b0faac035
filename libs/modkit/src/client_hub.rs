//! Minimalistic, type-safe ClientHub.
//!
//! Providers register an implementation once; consumers fetch it by interface
//! type (trait object): `get::<dyn lots::contract::client::LotsApi>()`.
//! The key is `type_name::<T>()`, which works for `T = dyn Trait`.
//! Re-registering overwrites; Arcs already handed out stay valid.

use parking_lot::RwLock;
use std::{any::Any, collections::HashMap, sync::Arc};

#[derive(Debug, thiserror::Error)]
pub enum ClientHubError {
    #[error("client not found: type={0}")]
    NotFound(&'static str),

    #[error("type mismatch in hub for type={0}")]
    TypeMismatch(&'static str),
}

type Boxed = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct ClientHub {
    map: RwLock<HashMap<&'static str, Boxed>>,
}

impl ClientHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under the interface type `T`.
    pub fn register<T>(&self, client: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.map
            .write()
            .insert(std::any::type_name::<T>(), Box::new(client));
    }

    /// Fetch a client by interface type `T`.
    pub fn get<T>(&self) -> Result<Arc<T>, ClientHubError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = std::any::type_name::<T>();
        let r = self.map.read();
        let boxed = r.get(key).ok_or(ClientHubError::NotFound(key))?;
        boxed
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(ClientHubError::TypeMismatch(key))
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl std::fmt::Debug for ClientHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.map.read();
        f.debug_struct("ClientHub")
            .field("clients", &r.keys().collect::<Vec<_>>())
            .finish()
    }
}
