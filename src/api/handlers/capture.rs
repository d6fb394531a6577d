use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::handlers::{enqueue, error_response};
use crate::api::ApiState;
use crate::models::stats::{StatsSnapshot, StatsSummary};
use crate::models::status::{CaptureState, DumpMode};
use crate::status::events::StatusEvent;

/// Lifecycle notification from the capture engine
#[derive(Deserialize)]
pub struct StateChangeRequest {
    pub state: CaptureState,

    /// Output file the engine is writing, announced with the transition
    #[serde(default)]
    pub pcap_file: Option<String>,
}

/// Request for changing the dump mode
#[derive(Deserialize)]
pub struct DumpModeRequest {
    /// Preference key of the mode (none, http_server, pcap_file, udp_exporter)
    pub mode: String,
}

/// Response for the dump mode setting
#[derive(Serialize)]
struct DumpModeResponse {
    mode: DumpMode,
}

/// Response for the latest statistics
#[derive(Serialize)]
struct StatsResponse {
    stats: Option<StatsSummary>,
}

/// Get the current status panel
pub async fn get_status(state: web::Data<ApiState>) -> impl Responder {
    HttpResponse::Ok().json(state.status.hub().current_view())
}

/// Push a capture lifecycle transition
pub async fn update_capture_state(
    state: web::Data<ApiState>,
    request: web::Json<StateChangeRequest>,
) -> impl Responder {
    let StateChangeRequest {
        state: capture_state,
        pcap_file,
    } = request.into_inner();
    info!("Capture state changed to {:?}", capture_state);

    if let Some(name) = pcap_file {
        info!("Engine writing pcap file {}", name);
        state.engine.set_pcap_file(Some(name));
    }

    enqueue(&state, StatusEvent::StateChanged(capture_state), "state change").await
}

/// Push a statistics snapshot
pub async fn push_stats(
    state: web::Data<ApiState>,
    request: web::Json<StatsSnapshot>,
) -> impl Responder {
    enqueue(&state, StatusEvent::Stats(request.into_inner()), "stats update").await
}

/// Get the latest formatted statistics
pub async fn get_stats(state: web::Data<ApiState>) -> impl Responder {
    HttpResponse::Ok().json(StatsResponse {
        stats: state.status.hub().current_stats(),
    })
}

/// Get the persisted dump mode
pub async fn get_dump_mode(state: web::Data<ApiState>) -> impl Responder {
    HttpResponse::Ok().json(DumpModeResponse {
        mode: state.prefs.dump_mode(),
    })
}

/// Persist a new dump mode, used from the next capture session
pub async fn update_dump_mode(
    state: web::Data<ApiState>,
    request: web::Json<DumpModeRequest>,
) -> impl Responder {
    let mode: DumpMode = match request.mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!("Rejected dump mode update: {}", e);
            return error_response(&e);
        }
    };

    info!("Setting dump mode to {}", mode);
    if let Err(e) = state.prefs.set_dump_mode(mode) {
        warn!("Failed to persist dump mode: {}", e);
    }

    HttpResponse::Ok().json(DumpModeResponse { mode })
}
