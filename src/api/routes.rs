use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use crate::api::handlers::{
    capture::{
        get_dump_mode,
        get_stats,
        get_status,
        push_stats,
        update_capture_state,
        update_dump_mode,
    },
    filters::{
        apps_loaded,
        get_filter,
        selector_action,
        set_filter,
        toggle_filter,
    },
};
use crate::api::websocket::ws_index;

/// Root endpoint to provide information about the API
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "Capture Status API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Status panel state for a traffic capture engine",
        "endpoints": [
            {
                "path": "/api/status",
                "method": "GET",
                "description": "Current status panel"
            },
            {
                "path": "/api/capture/state",
                "method": "POST",
                "description": "Push a capture lifecycle transition, optionally naming the pcap file"
            },
            {
                "path": "/api/capture/stats",
                "method": "POST",
                "description": "Push a statistics snapshot"
            },
            {
                "path": "/api/capture/stats",
                "method": "GET",
                "description": "Latest formatted statistics"
            },
            {
                "path": "/api/apps",
                "method": "POST",
                "description": "Deliver a phase of the installed apps list"
            },
            {
                "path": "/api/filter",
                "method": "GET",
                "description": "Current app filter"
            },
            {
                "path": "/api/filter",
                "method": "POST",
                "description": "Select or clear the app filter"
            },
            {
                "path": "/api/filter/toggle",
                "method": "POST",
                "description": "Enable or disable the app filter"
            },
            {
                "path": "/api/filter/selector",
                "method": "POST",
                "description": "Report the app selector was cancelled or dismissed"
            },
            {
                "path": "/api/settings/dump-mode",
                "method": "GET",
                "description": "Get the dump mode"
            },
            {
                "path": "/api/settings/dump-mode",
                "method": "POST",
                "description": "Set the dump mode for the next capture"
            },
            {
                "path": "/api/ws",
                "method": "GET",
                "description": "WebSocket endpoint for status updates"
            }
        ]
    }))
}

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint
        .route("/", web::get().to(index))
        .service(
            web::scope("/api")
                // WebSocket route for status updates
                .route("/ws", web::get().to(ws_index))
                .route("/status", web::get().to(get_status))

                // Capture engine notifications
                .service(
                    web::scope("/capture")
                        .route("/state", web::post().to(update_capture_state))
                        .route("/stats", web::post().to(push_stats))
                        .route("/stats", web::get().to(get_stats))
                )
                .route("/apps", web::post().to(apps_loaded))

                // App filter
                .service(
                    web::scope("/filter")
                        .route("", web::get().to(get_filter))
                        .route("", web::post().to(set_filter))
                        .route("/toggle", web::post().to(toggle_filter))
                        .route("/selector", web::post().to(selector_action))
                )
                .service(
                    web::scope("/settings")
                        .route("/dump-mode", web::get().to(get_dump_mode))
                        .route("/dump-mode", web::post().to(update_dump_mode))
                )
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::api_state;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_routes_are_wired() {
        let (state, mut rx) = api_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "Capture Status API");

        let req = test::TestRequest::get().uri("/api/filter").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["text"], "No app filter");

        let req = test::TestRequest::get().uri("/api/settings/dump-mode").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["mode"], "http_server");

        let req = test::TestRequest::get().uri("/api/capture/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["stats"].is_null());

        let req = test::TestRequest::post()
            .uri("/api/filter/toggle")
            .set_json(json!({ "enabled": false }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 202);
        assert!(rx.try_recv().is_ok());
    }
}
