//! Tracing setup driven by [`LoggingConfig`].
//!
//! Console output is plain text filtered per subsystem. Every section with a
//! non-empty `file` gets its own rotating JSON file. The "default" section
//! catches targets that have no section of their own.

use crate::config::{LoggingConfig, Section};
use crate::paths::resolve_under;
use std::{
    io::{IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" | "" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/* ---------- rotating file writer ---------- */

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn open_rotating(path: &Path, section: &Section) -> std::io::Result<RotatingFile> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100).saturating_mul(1024 * 1024);
    let keep = section.max_backups.unwrap_or(3);
    let rot = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(keep)),
        ContentLimit::BytesSurpassed(usize::try_from(max_bytes).unwrap_or(usize::MAX)),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

/* ---------- filters ---------- */

fn subsystems(cfg: &LoggingConfig) -> impl Iterator<Item = (&str, &Section)> {
    cfg.iter()
        .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
        .map(|(k, v)| (k.as_str(), v))
}

/// Console: default level from "default", one override per subsystem.
fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map(|s| parse_level(&s.console_level))
        .unwrap_or(LevelFilter::INFO);
    subsystems(cfg).fold(Targets::new().with_default(default), |t, (name, s)| {
        t.with_target(name, parse_level(&s.console_level))
    })
}

/// The default file excludes subsystems that write to a file of their own.
fn default_file_targets(cfg: &LoggingConfig, level: LevelFilter) -> Targets {
    subsystems(cfg)
        .filter(|(_, s)| !s.file.trim().is_empty())
        .fold(Targets::new().with_default(level), |t, (name, _)| {
            t.with_target(name, LevelFilter::OFF)
        })
}

fn file_layer(writer: RotatingFile, filter: Targets) -> BoxedLayer {
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(writer)
        .with_filter(filter)
        .boxed()
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let ansi = std::io::stdout().is_terminal();
    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg))
        .boxed()];

    for (name, section) in cfg.iter() {
        if section.file.trim().is_empty() {
            continue;
        }
        let path = resolve_under(base_dir, &section.file);
        let writer = match open_rotating(&path, section) {
            Ok(w) => w,
            Err(e) => {
                eprintln!(
                    "Failed to open log file for '{}': {} ({})",
                    name,
                    path.display(),
                    e
                );
                continue;
            }
        };
        let level = parse_level(&section.file_level);
        let filter = if name == DEFAULT_SECTION {
            default_file_targets(cfg, level)
        } else {
            Targets::new().with_target(name.as_str(), level)
        };
        layers.push(file_layer(writer, filter));
    }
    layers
}

/// Initialize logging.
/// - `base_dir` resolves relative log file paths (usually `server.home_dir`).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}
