//! State machine behind the status panel.
//!
//! Lifecycle transitions come from the capture engine; the controller only
//! reacts to them. Entering `Running` latches the dump mode for the session
//! and resolves the local address when the HTTP server sink is selected.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;

use crate::capture::engine::CaptureEngine;
use crate::models::stats::{StatsSnapshot, StatsSummary};
use crate::models::status::{CaptureState, DumpMode, StatusView};
use crate::net::resolver::AddressResolver;
use crate::status::events::{StatusEvent, StatusUpdate};
use crate::status::filter_store::AppFilterStore;
use crate::status::messages;
use crate::utils::format::format_bytes;

pub struct StatusController {
    engine: Arc<dyn CaptureEngine>,
    resolver: AddressResolver,
    filters: AppFilterStore,

    /// Last state with a defined layout
    state: CaptureState,

    /// Dump mode of the running session
    session_mode: Option<DumpMode>,

    /// When the running session started
    session_started: Option<DateTime<Utc>>,

    view: StatusView,
}

impl StatusController {
    pub fn new(
        engine: Arc<dyn CaptureEngine>,
        resolver: AddressResolver,
        filters: AppFilterStore,
    ) -> Self {
        Self {
            engine,
            resolver,
            filters,
            state: CaptureState::Ready,
            session_mode: None,
            session_started: None,
            view: StatusView::ready(messages::READY),
        }
    }

    /// Last state with a defined layout
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn view(&self) -> &StatusView {
        &self.view
    }

    pub fn filters(&self) -> &AppFilterStore {
        &self.filters
    }

    #[cfg(test)]
    pub fn session_mode(&self) -> Option<DumpMode> {
        self.session_mode
    }

    /// Apply one inbound event and return what must be rendered
    pub fn handle(&mut self, event: StatusEvent) -> Vec<StatusUpdate> {
        match event {
            StatusEvent::StateChanged(state) => self
                .on_state_changed(state, Utc::now())
                .map(StatusUpdate::Render)
                .into_iter()
                .collect(),
            StatusEvent::Stats(stats) => self.on_stats(&stats, Utc::now()),
            StatusEvent::AppsInfoLoaded(apps) => self.filters.on_apps_loaded(apps, false),
            StatusEvent::AppsIconsLoaded(apps) => self.filters.on_apps_loaded(apps, true),
            StatusEvent::FilterToggled(enabled) => self.filters.set_toggle(enabled),
            StatusEvent::FilterSelected(package_name) => self.filters.select_package(&package_name),
            StatusEvent::FilterCleared => self.filters.set_filter(None),
            StatusEvent::SelectorCancelled => self.filters.selector_cancelled(),
            StatusEvent::SelectorDismissed => self.filters.selector_dismissed(),
        }
    }

    /// Rebuild the view for a lifecycle transition
    ///
    /// Returns `None` for states without a layout, leaving the view untouched.
    pub fn on_state_changed(
        &mut self,
        state: CaptureState,
        now: DateTime<Utc>,
    ) -> Option<StatusView> {
        match state {
            CaptureState::Ready => {
                info!("Capture ready");
                self.state = CaptureState::Ready;
                self.session_mode = None;
                self.session_started = None;
                self.view = StatusView::ready(messages::READY);
            }
            CaptureState::Running => {
                if self.state != CaptureState::Running || self.session_mode.is_none() {
                    let mode = self.engine.dump_mode();
                    info!("Capture running, dump mode: {}", mode);
                    self.session_mode = Some(mode);
                    self.session_started = Some(now);
                }
                self.state = CaptureState::Running;

                self.view = StatusView {
                    status_text: format_bytes(self.engine.total_bytes()),
                    collector_info_text: self.collector_info(),
                    inspector_link_visible: true,
                    collector_info_visible: true,
                    quick_settings_visible: false,
                    filter_icon: self.filters.active_icon(),
                };
            }
            CaptureState::Stopped => {
                debug!("Ignoring capture state {:?}", state);
                // The next Running starts a new session
                self.session_mode = None;
                return None;
            }
        }

        Some(self.view.clone())
    }

    /// Refresh the traffic volume from a statistics snapshot
    pub fn on_stats(&mut self, stats: &StatsSnapshot, now: DateTime<Utc>) -> Vec<StatusUpdate> {
        debug!(
            "Got stats update: bytes_sent={}, bytes_rcvd={}, pkts_sent={}, pkts_rcvd={}",
            stats.bytes_sent, stats.bytes_received, stats.packets_sent, stats.packets_received
        );

        if self.state != CaptureState::Running {
            debug!("Not running, ignoring stats update");
            return Vec::new();
        }

        self.view.status_text = format_bytes(stats.total_bytes());

        let elapsed = self
            .session_started
            .map(|start| now.signed_duration_since(start).num_seconds().max(0) as u64)
            .unwrap_or(0);

        vec![
            StatusUpdate::Render(self.view.clone()),
            StatusUpdate::Stats(StatsSummary::from_snapshot(stats, elapsed)),
        ]
    }

    /// Describe where captured traffic is going for the latched dump mode
    fn collector_info(&self) -> String {
        match self.session_mode.unwrap_or_default() {
            DumpMode::None => messages::NO_DUMP_INFO.to_string(),
            DumpMode::HttpServer => messages::http_server_status(
                self.resolver.resolve(),
                self.engine.http_server_port(),
            ),
            DumpMode::PcapFile => self
                .engine
                .pcap_file_name()
                .unwrap_or_else(|| messages::PCAP_FILE_INFO.to_string()),
            DumpMode::UdpExporter => messages::collector_info(
                &self.engine.collector_address(),
                self.engine.collector_port(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::app::{AppDescriptor, AppIcon};
    use crate::models::interface::NetInterface;
    use crate::net::resolver::tests::FakeProbe;
    use crate::prefs::{MemoryPrefs, PreferenceStore};
    use chrono::Duration;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEngine {
        bytes: u64,
        mode: Mutex<DumpMode>,
        pcap_file: Option<String>,
    }

    impl FakeEngine {
        fn new(mode: DumpMode) -> Self {
            Self {
                bytes: 2048,
                mode: Mutex::new(mode),
                pcap_file: None,
            }
        }
    }

    impl CaptureEngine for FakeEngine {
        fn total_bytes(&self) -> u64 {
            self.bytes
        }

        fn dump_mode(&self) -> DumpMode {
            *self.mode.lock()
        }

        fn http_server_port(&self) -> u16 {
            8080
        }

        fn collector_address(&self) -> String {
            "192.168.1.20".to_string()
        }

        fn collector_port(&self) -> u16 {
            1234
        }

        fn pcap_file_name(&self) -> Option<String> {
            self.pcap_file.clone()
        }
    }

    /// Probe that counts how often the network is queried
    struct CountingProbe {
        inner: FakeProbe,
        queries: AtomicUsize,
    }

    impl crate::net::probe::NetworkProbe for CountingProbe {
        fn wireless_address(&self) -> Option<Ipv4Addr> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.wireless_address()
        }

        fn interfaces(&self) -> crate::utils::error::AppResult<Vec<NetInterface>> {
            self.inner.interfaces()
        }
    }

    fn wifi_probe() -> Arc<CountingProbe> {
        Arc::new(CountingProbe {
            inner: FakeProbe {
                wireless: Some(Ipv4Addr::new(192, 168, 1, 5)),
                interfaces: Some(Vec::new()),
            },
            queries: AtomicUsize::new(0),
        })
    }

    fn controller_with(
        engine: Arc<FakeEngine>,
        probe: Arc<CountingProbe>,
        prefs: Arc<MemoryPrefs>,
    ) -> StatusController {
        let resolver = AddressResolver::new(probe, Ipv4Addr::new(10, 215, 173, 1));
        StatusController::new(engine, resolver, AppFilterStore::new(prefs))
    }

    fn controller(mode: DumpMode) -> StatusController {
        controller_with(
            Arc::new(FakeEngine::new(mode)),
            wifi_probe(),
            Arc::new(MemoryPrefs::new()),
        )
    }

    #[test]
    fn test_ready_layout() {
        let mut ctrl = controller(DumpMode::HttpServer);
        let view = ctrl.on_state_changed(CaptureState::Ready, Utc::now()).unwrap();

        assert_eq!(view.status_text, messages::READY);
        assert!(!view.inspector_link_visible);
        assert!(!view.collector_info_visible);
        assert!(view.quick_settings_visible);
    }

    #[test]
    fn test_running_with_http_server() {
        let probe = wifi_probe();
        let mut ctrl = controller_with(
            Arc::new(FakeEngine::new(DumpMode::HttpServer)),
            probe.clone(),
            Arc::new(MemoryPrefs::new()),
        );

        ctrl.on_state_changed(CaptureState::Ready, Utc::now());
        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();

        assert_eq!(view.status_text, "2.0 KB");
        assert!(view.collector_info_text.contains("192.168.1.5"));
        assert!(view.collector_info_text.contains("8080"));
        assert!(view.inspector_link_visible);
        assert!(view.collector_info_visible);
        assert!(!view.quick_settings_visible);
        assert_eq!(view.filter_icon, None);
        assert_eq!(probe.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_other_modes_do_not_resolve_address() {
        for (mode, expected) in [
            (DumpMode::None, messages::NO_DUMP_INFO.to_string()),
            (DumpMode::PcapFile, messages::PCAP_FILE_INFO.to_string()),
            (DumpMode::UdpExporter, "Sending packets to 192.168.1.20:1234".to_string()),
        ] {
            let probe = wifi_probe();
            let mut ctrl = controller_with(
                Arc::new(FakeEngine::new(mode)),
                probe.clone(),
                Arc::new(MemoryPrefs::new()),
            );

            let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
            assert_eq!(view.collector_info_text, expected);
            assert_eq!(probe.queries.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn test_pcap_file_name_shown_when_known() {
        let engine = FakeEngine {
            pcap_file: Some("PCAPdroid_19_Oct_10_00_00.pcap".to_string()),
            ..FakeEngine::new(DumpMode::PcapFile)
        };
        let mut ctrl = controller_with(Arc::new(engine), wifi_probe(), Arc::new(MemoryPrefs::new()));

        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
        assert_eq!(view.collector_info_text, "PCAPdroid_19_Oct_10_00_00.pcap");
    }

    #[test]
    fn test_dump_mode_latched_for_session() {
        let engine = Arc::new(FakeEngine::new(DumpMode::UdpExporter));
        let mut ctrl = controller_with(engine.clone(), wifi_probe(), Arc::new(MemoryPrefs::new()));

        ctrl.on_state_changed(CaptureState::Running, Utc::now());
        *engine.mode.lock() = DumpMode::None;

        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
        assert_eq!(ctrl.session_mode(), Some(DumpMode::UdpExporter));
        assert!(view.collector_info_text.contains("1234"));

        ctrl.on_state_changed(CaptureState::Ready, Utc::now());
        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
        assert_eq!(view.collector_info_text, messages::NO_DUMP_INFO);
    }

    #[test]
    fn test_unknown_state_is_ignored() {
        let mut ctrl = controller(DumpMode::HttpServer);
        ctrl.on_state_changed(CaptureState::Running, Utc::now());
        let before = ctrl.view().clone();

        assert!(ctrl.on_state_changed(CaptureState::Stopped, Utc::now()).is_none());
        assert_eq!(ctrl.state(), CaptureState::Running);
        assert_eq!(ctrl.view(), &before);
        assert!(ctrl.handle(StatusEvent::StateChanged(CaptureState::Stopped)).is_empty());
    }

    #[test]
    fn test_restart_after_stop_latches_new_mode() {
        let engine = Arc::new(FakeEngine::new(DumpMode::UdpExporter));
        let mut ctrl = controller_with(engine.clone(), wifi_probe(), Arc::new(MemoryPrefs::new()));
        let start = Utc::now();

        ctrl.on_state_changed(CaptureState::Running, start);
        ctrl.on_state_changed(CaptureState::Stopped, start + Duration::seconds(30));
        assert_eq!(ctrl.session_mode(), None);

        *engine.mode.lock() = DumpMode::None;
        let restart = start + Duration::seconds(60);
        let view = ctrl.on_state_changed(CaptureState::Running, restart).unwrap();
        assert_eq!(ctrl.session_mode(), Some(DumpMode::None));
        assert_eq!(view.collector_info_text, messages::NO_DUMP_INFO);

        let updates = ctrl.on_stats(&StatsSnapshot::default(), restart + Duration::seconds(5));
        match &updates[..] {
            [_, StatusUpdate::Stats(summary)] => assert_eq!(summary.duration, "5 s"),
            other => panic!("unexpected updates: {:?}", other),
        }
    }

    #[test]
    fn test_stats_update_status_text() {
        let mut ctrl = controller(DumpMode::None);
        let start = Utc::now();
        ctrl.on_state_changed(CaptureState::Running, start);

        let stats = StatsSnapshot {
            bytes_sent: 1_048_576,
            bytes_received: 524_288,
            packets_sent: 1200,
            packets_received: 300,
        };
        let updates = ctrl.on_stats(&stats, start + Duration::seconds(90));

        assert_eq!(ctrl.view().status_text, "1.5 MB");
        assert_eq!(ctrl.state(), CaptureState::Running);
        match &updates[..] {
            [StatusUpdate::Render(view), StatusUpdate::Stats(summary)] => {
                assert_eq!(view.status_text, "1.5 MB");
                assert_eq!(summary.total_packets, "1.5 K");
                assert_eq!(summary.duration, "> 1 m");
            }
            other => panic!("unexpected updates: {:?}", other),
        }
    }

    #[test]
    fn test_stats_ignored_when_not_running() {
        let mut ctrl = controller(DumpMode::None);
        let updates = ctrl.on_stats(&StatsSnapshot::default(), Utc::now());

        assert!(updates.is_empty());
        assert_eq!(ctrl.view().status_text, messages::READY);
    }

    #[test]
    fn test_filter_icon_decorates_collector_info() {
        let prefs = Arc::new(MemoryPrefs::new());
        prefs.set_app_filter(Some("com.maps")).unwrap();
        let mut ctrl = controller_with(
            Arc::new(FakeEngine::new(DumpMode::None)),
            wifi_probe(),
            prefs,
        );

        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
        assert_eq!(view.filter_icon, None);

        let icon = AppIcon("icons/com.maps.png".to_string());
        let maps = AppDescriptor::new(10100, "Maps", "com.maps").with_icon(icon.clone());
        ctrl.handle(StatusEvent::AppsIconsLoaded(HashMap::from([(10100, maps)])));

        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
        assert_eq!(view.filter_icon, Some(icon));

        ctrl.handle(StatusEvent::FilterCleared);
        let view = ctrl.on_state_changed(CaptureState::Running, Utc::now()).unwrap();
        assert_eq!(view.filter_icon, None);
    }

    #[test]
    fn test_deferred_selector_through_events() {
        let mut ctrl = controller(DumpMode::None);
        let apps = HashMap::from([(10100, AppDescriptor::new(10100, "Maps", "com.maps"))]);

        ctrl.handle(StatusEvent::FilterToggled(true));
        let info = ctrl.handle(StatusEvent::AppsInfoLoaded(apps.clone()));
        let icons = ctrl.handle(StatusEvent::AppsIconsLoaded(apps));

        let opens = info
            .iter()
            .chain(icons.iter())
            .filter(|u| matches!(u, StatusUpdate::OpenAppSelector { .. }))
            .count();
        assert_eq!(opens, 1);

        ctrl.handle(StatusEvent::FilterSelected("com.maps".to_string()));
        assert_eq!(ctrl.filters().filter(), Some("com.maps"));
    }
}
