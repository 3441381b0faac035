use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::{run, DbOptions, RegistryBuilder, RunOptions, ShutdownOptions};
use modkit_db::{ConnectOpts, DbHandle};
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const INGRESS_MODULE: &str = "api_ingress";

/// Estate Server - real-estate lots and users REST services
#[derive(Parser)]
#[command(name = "estate-server")]
#[command(about = "Estate Server - real-estate lots and users REST services")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    apply_ingress_defaults(&mut config);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Estate Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

/// The ingress listens on `server.host:port` unless `modules.api_ingress`
/// says otherwise. The server timeout is used when the section sets none.
fn apply_ingress_defaults(config: &mut AppConfig) {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let timeout_sec = config.server.timeout_sec;

    let section = config
        .modules
        .entry(INGRESS_MODULE.to_string())
        .or_insert_with(|| serde_json::json!({}));
    if let Some(obj) = section.as_object_mut() {
        obj.entry("bind_addr")
            .or_insert_with(|| serde_json::Value::from(bind_addr));
        if timeout_sec > 0 {
            obj.entry("timeout_sec")
                .or_insert_with(|| serde_json::Value::from(timeout_sec));
        }
    }
}

async fn connect_db(config: &AppConfig, args: &CliArgs) -> Result<DbOptions> {
    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("No database configuration found, running without database");
        return Ok(DbOptions::None);
    };

    // Relative sqlite paths are anchored at home_dir
    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = db_config.resolve_dsn(&base_dir, args.mock)?;

    let defaults = ConnectOpts::default();
    let connect_opts = ConnectOpts {
        max_conns: db_config.max_conns.or(defaults.max_conns),
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: db_config
            .busy_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms)))
            .unwrap_or(defaults.sqlite_busy_timeout),
        create_sqlite_dirs: true,
        ..defaults
    };

    tracing::info!(
        "Connecting to database: {}",
        modkit_db::redact_credentials_in_dsn(Some(&dsn))
    );
    let db = DbHandle::connect(&dsn, connect_opts).await?;
    tracing::info!("Connected DB backend: {:?}", db.engine());

    Ok(DbOptions::Handle(Arc::new(db)))
}

fn build_registry() -> Result<modkit::ModuleRegistry> {
    let mut b = RegistryBuilder::default();

    let ingress = Arc::new(api_ingress::ApiIngress::default());
    b.register_core(INGRESS_MODULE, &[], ingress.clone());
    b.register_rest_host(INGRESS_MODULE, ingress.clone());
    b.register_stateful(INGRESS_MODULE, ingress);

    let users = Arc::new(users::Users::default());
    b.register_core(users::module::MODULE_NAME, &[], users.clone());
    b.register_db(users::module::MODULE_NAME, users.clone());
    b.register_rest(users::module::MODULE_NAME, users);

    let lots = Arc::new(lots::Lots::default());
    b.register_core(lots::module::MODULE_NAME, &[], lots.clone());
    b.register_db(lots::module::MODULE_NAME, lots.clone());
    b.register_rest(lots::module::MODULE_NAME, lots);

    Ok(b.build_topo_sorted()?)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let registry = build_registry()?;
    tracing::debug!(?registry, "module registry built");

    let db = connect_db(&config, &args).await?;
    let modules_cfg = Arc::new(AppConfigProvider::new(config));

    run(RunOptions {
        modules_cfg,
        db,
        shutdown: ShutdownOptions::Signals,
        registry,
    })
    .await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    build_registry()?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
