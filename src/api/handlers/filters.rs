use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::handlers::enqueue;
use crate::api::ApiState;
use crate::models::app::AppDescriptor;
use crate::status::events::StatusEvent;

/// One phase of the installed-apps load
#[derive(Deserialize)]
pub struct AppsLoadedRequest {
    /// Apps keyed by numeric owner id
    pub apps: HashMap<i32, AppDescriptor>,

    /// Whether this is the icons phase
    #[serde(default)]
    pub with_icons: bool,
}

/// Set filter request; a missing package clears the filter
#[derive(Deserialize)]
pub struct SetFilterRequest {
    pub package: Option<String>,
}

/// Filter toggle request
#[derive(Deserialize)]
pub struct ToggleFilterRequest {
    pub enabled: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectorAction {
    Cancel,
    Dismiss,
}

/// App selector lifecycle request
#[derive(Deserialize)]
pub struct SelectorRequest {
    pub action: SelectorAction,
}

/// Deliver a phase of the installed-apps list
pub async fn apps_loaded(
    state: web::Data<ApiState>,
    request: web::Json<AppsLoadedRequest>,
) -> impl Responder {
    let AppsLoadedRequest { apps, with_icons } = request.into_inner();
    info!("Received {} apps (icons: {})", apps.len(), with_icons);

    let event = if with_icons {
        StatusEvent::AppsIconsLoaded(apps)
    } else {
        StatusEvent::AppsInfoLoaded(apps)
    };

    enqueue(&state, event, "apps list").await
}

/// Get the current app filter
pub async fn get_filter(state: web::Data<ApiState>) -> impl Responder {
    HttpResponse::Ok().json(state.status.hub().current_filter())
}

/// Select or clear the app filter
pub async fn set_filter(
    state: web::Data<ApiState>,
    request: web::Json<SetFilterRequest>,
) -> impl Responder {
    let event = match request.into_inner().package.filter(|pkg| !pkg.is_empty()) {
        Some(package) => {
            info!("Setting app filter to {}", package);
            StatusEvent::FilterSelected(package)
        }
        None => {
            info!("Clearing app filter");
            StatusEvent::FilterCleared
        }
    };

    enqueue(&state, event, "filter change").await
}

/// Flip the app filter toggle
pub async fn toggle_filter(
    state: web::Data<ApiState>,
    request: web::Json<ToggleFilterRequest>,
) -> impl Responder {
    enqueue(&state, StatusEvent::FilterToggled(request.enabled), "filter toggle").await
}

/// Report that the app selector was cancelled or dismissed
pub async fn selector_action(
    state: web::Data<ApiState>,
    request: web::Json<SelectorRequest>,
) -> impl Responder {
    let event = match request.action {
        SelectorAction::Cancel => StatusEvent::SelectorCancelled,
        SelectorAction::Dismiss => StatusEvent::SelectorDismissed,
    };

    enqueue(&state, event, "selector action").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::api_state;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_apps_phases_map_to_distinct_events() {
        let (state, mut rx) = api_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/apps", web::post().to(apps_loaded)),
        )
        .await;

        let body = serde_json::json!({
            "apps": { "10100": { "uid": 10100, "name": "Maps", "package_name": "com.maps" } }
        });
        let req = test::TestRequest::post().uri("/apps").set_json(&body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 202);

        match rx.try_recv() {
            Ok(StatusEvent::AppsInfoLoaded(apps)) => {
                assert_eq!(apps[&10100].package_name, "com.maps")
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let mut body = body;
        body["with_icons"] = serde_json::json!(true);
        let req = test::TestRequest::post().uri("/apps").set_json(&body).to_request();
        test::call_service(&app, req).await;
        assert!(matches!(rx.try_recv(), Ok(StatusEvent::AppsIconsLoaded(_))));
    }

    #[actix_rt::test]
    async fn test_set_filter_events() {
        let (state, mut rx) = api_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/filter", web::post().to(set_filter)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/filter")
            .set_json(serde_json::json!({ "package": "com.maps" }))
            .to_request();
        test::call_service(&app, req).await;
        assert!(matches!(rx.try_recv(), Ok(StatusEvent::FilterSelected(pkg)) if pkg == "com.maps"));

        for body in [serde_json::json!({}), serde_json::json!({ "package": "" })] {
            let req = test::TestRequest::post().uri("/filter").set_json(body).to_request();
            test::call_service(&app, req).await;
            assert!(matches!(rx.try_recv(), Ok(StatusEvent::FilterCleared)));
        }
    }

    #[actix_rt::test]
    async fn test_selector_actions() {
        let (state, mut rx) = api_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/selector", web::post().to(selector_action))
                .route("/toggle", web::post().to(toggle_filter)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/toggle")
            .set_json(serde_json::json!({ "enabled": true }))
            .to_request();
        test::call_service(&app, req).await;
        assert!(matches!(rx.try_recv(), Ok(StatusEvent::FilterToggled(true))));

        let req = test::TestRequest::post()
            .uri("/selector")
            .set_json(serde_json::json!({ "action": "cancel" }))
            .to_request();
        test::call_service(&app, req).await;
        assert!(matches!(rx.try_recv(), Ok(StatusEvent::SelectorCancelled)));

        let req = test::TestRequest::post()
            .uri("/selector")
            .set_json(serde_json::json!({ "action": "explode" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
