use log::{debug, info, trace};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::capture::engine::EngineHandle;
use crate::models::filter::FilterStatus;
use crate::models::stats::StatsSummary;
use crate::models::status::{CaptureState, StatusView};
use crate::status::controller::StatusController;
use crate::status::events::{StatusEvent, StatusUpdate};
use crate::utils::error::{AppError, AppResult};

/// Capacity of the update broadcast; slow subscribers skip ahead
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Latest status and fan-out of updates to subscribers
pub struct StatusHub {
    view: RwLock<StatusView>,
    filter: RwLock<FilterStatus>,
    stats: RwLock<Option<StatsSummary>>,
    tx: broadcast::Sender<StatusUpdate>,
}

impl StatusHub {
    pub fn new(view: StatusView, filter: FilterStatus) -> Self {
        let (tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        Self {
            view: RwLock::new(view),
            filter: RwLock::new(filter),
            stats: RwLock::new(None),
            tx,
        }
    }

    /// Cache the update and forward it to every subscriber
    pub fn publish(&self, update: StatusUpdate) {
        match &update {
            StatusUpdate::Render(view) => *self.view.write() = view.clone(),
            StatusUpdate::FilterChanged(filter) => *self.filter.write() = filter.clone(),
            StatusUpdate::Stats(summary) => *self.stats.write() = Some(summary.clone()),
            _ => {}
        }

        // No subscribers is fine, the cached values still serve queries
        if let Err(e) = self.tx.send(update) {
            trace!("No status subscribers: {}", e);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdate> {
        self.tx.subscribe()
    }

    pub fn current_view(&self) -> StatusView {
        self.view.read().clone()
    }

    pub fn current_filter(&self) -> FilterStatus {
        self.filter.read().clone()
    }

    pub fn current_stats(&self) -> Option<StatsSummary> {
        self.stats.read().clone()
    }
}

/// Cloneable entry point for producers of status events
#[derive(Clone)]
pub struct StatusHandle {
    events: mpsc::Sender<StatusEvent>,
    hub: Arc<StatusHub>,
}

impl StatusHandle {
    pub fn new(events: mpsc::Sender<StatusEvent>, hub: Arc<StatusHub>) -> Self {
        Self { events, hub }
    }

    /// Queue an event for the status loop
    pub async fn send(&self, event: StatusEvent) -> AppResult<()> {
        self.events
            .send(event)
            .await
            .map_err(|e| AppError::ChannelClosed(e.to_string()))
    }

    pub fn hub(&self) -> &StatusHub {
        &self.hub
    }
}

/// Owns the controller; all status state is mutated from its loop only
pub struct StatusService {
    controller: StatusController,
    engine: Arc<EngineHandle>,
    hub: Arc<StatusHub>,
}

impl StatusService {
    pub fn new(controller: StatusController, engine: Arc<EngineHandle>) -> Self {
        let hub = Arc::new(StatusHub::new(
            controller.view().clone(),
            controller.filters().status(),
        ));

        Self {
            controller,
            engine,
            hub,
        }
    }

    #[cfg(test)]
    pub fn hub(&self) -> Arc<StatusHub> {
        self.hub.clone()
    }

    /// Start the event loop on the tokio runtime
    pub fn spawn(self, capacity: usize) -> (StatusHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = StatusHandle::new(tx, self.hub.clone());
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<StatusEvent>) {
        info!("Status event loop started");

        while let Some(event) = rx.recv().await {
            self.process(event);
        }

        info!("Status event loop stopped");
    }

    /// Apply one event and publish the resulting updates
    pub fn process(&mut self, event: StatusEvent) {
        trace!("Processing status event: {:?}", event);

        match &event {
            // Late snapshots of a finished session must not revive its counters
            StatusEvent::Stats(stats) if self.controller.state() == CaptureState::Running => {
                self.engine.record_stats(stats)
            }
            StatusEvent::StateChanged(CaptureState::Ready) => self.engine.reset_counters(),
            _ => {}
        }

        let updates = self.controller.handle(event);
        debug!("Publishing {} status updates", updates.len());

        for update in updates {
            self.hub.publish(update);
        }
    }
}
