//! # ModKit - module wiring for the estate services
//!
//! Modules implement small capability traits ([`Module`], [`DbModule`],
//! [`RestfulModule`], [`RestHostModule`], [`StatefulModule`]) and are registered
//! explicitly with a [`RegistryBuilder`]. The [`runtime::run`] runner drives
//! them through the phases init → db → rest → start → wait → stop.
//!
//! ```rust,ignore
//! let mut b = modkit::RegistryBuilder::default();
//! b.register_core("lots", &[], lots.clone());
//! b.register_db("lots", lots.clone());
//! b.register_rest("lots", lots);
//! let registry = b.build_topo_sorted()?;
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

// Module system exports
pub use crate::contracts::*;
pub mod context;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};

pub mod client_hub;
pub mod registry;

pub use client_hub::ClientHub;
pub use registry::{ModuleRegistry, RegistryBuilder, RegistryError};

// Core module contracts and traits
pub mod contracts;

// HTTP-facing helpers: problems, extractors, responses
pub mod api;
pub use api::problem::{Problem, ProblemResponse};

pub mod runtime;
pub use runtime::{run, DbOptions, RunOptions, ShutdownOptions};
