mod api;
mod capture;
mod models;
mod net;
mod prefs;
mod status;
mod utils;

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use log::info;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{routes, ApiState};
use crate::capture::engine::EngineHandle;
use crate::models::config::{AppConfig, DEFAULT_TUNNEL_ADDRESS};
use crate::net::probe::PnetProbe;
use crate::net::resolver::AddressResolver;
use crate::prefs::{JsonFilePrefs, MemoryPrefs, PreferenceStore};
use crate::status::controller::StatusController;
use crate::status::filter_store::AppFilterStore;
use crate::status::service::StatusService;
use crate::utils::logging;

/// Events buffered between the API and the status loop
const EVENT_QUEUE_SIZE: usize = 256;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Capture status service for a traffic capture engine")]
struct Args {
    /// Port for the REST API server
    #[clap(short = 'p', long, default_value = "3000")]
    api_port: u16,

    /// Port of the engine's HTTP dump server
    #[clap(long, default_value = "8080")]
    http_server_port: u16,

    /// Collector address used in UDP exporter mode
    #[clap(long, default_value = "127.0.0.1")]
    collector_address: String,

    /// Collector port used in UDP exporter mode
    #[clap(long, default_value = "1234")]
    collector_port: u16,

    /// Tunnel address of the capture engine, never reported as the local address
    #[clap(long, default_value_t = DEFAULT_TUNNEL_ADDRESS)]
    tunnel_address: Ipv4Addr,

    /// JSON file holding the app filter and dump mode
    #[clap(long)]
    prefs_file: Option<PathBuf>,

    /// PCAP file written in pcap file mode
    #[clap(long)]
    pcap_file: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            api_port: args.api_port,
            http_server_port: args.http_server_port,
            collector_address: args.collector_address,
            collector_port: args.collector_port,
            tunnel_address: args.tunnel_address,
            pcap_file: args.pcap_file,
            prefs_file: args.prefs_file,
        }
    }
}

fn open_prefs(config: &AppConfig) -> Result<Arc<dyn PreferenceStore>> {
    let prefs: Arc<dyn PreferenceStore> = match &config.prefs_file {
        Some(path) => {
            info!("Using preference file {}", path.display());
            Arc::new(JsonFilePrefs::open(path)?)
        }
        None => {
            info!("No preference file given, preferences are kept in memory");
            Arc::new(MemoryPrefs::new())
        }
    };

    Ok(prefs)
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger with specified level
    logging::init_logger(logging::get_log_level(&args.log_level));

    info!("Starting capture-status v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from(args);
    let prefs = open_prefs(&config)?;
    info!("Dump mode: {}", prefs.dump_mode());

    let engine = Arc::new(EngineHandle::new(config.clone(), prefs.clone()));
    let resolver = AddressResolver::new(Arc::new(PnetProbe::new()), config.tunnel_address);
    let filters = AppFilterStore::new(prefs.clone());
    let controller = StatusController::new(engine.clone(), resolver, filters);

    let (status, _status_task) = StatusService::new(controller, engine.clone()).spawn(EVENT_QUEUE_SIZE);

    let app_state = web::Data::new(ApiState {
        status,
        engine,
        prefs,
    });

    info!("Starting API server on port {}", config.api_port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(("127.0.0.1", config.api_port))?
    .run()
    .await?;

    Ok(())
}
