use serde::Serialize;
use std::collections::HashMap;

use crate::models::app::AppDescriptor;
use crate::models::filter::FilterStatus;
use crate::models::stats::{StatsSnapshot, StatsSummary};
use crate::models::status::{CaptureState, StatusView};

/// Inbound notifications, delivered to the controller in arrival order
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// The capture engine changed lifecycle state
    StateChanged(CaptureState),

    /// Periodic statistics from the capture engine
    Stats(StatsSnapshot),

    /// First app-list phase: metadata only
    AppsInfoLoaded(HashMap<i32, AppDescriptor>),

    /// Second app-list phase: same apps, now with icons
    AppsIconsLoaded(HashMap<i32, AppDescriptor>),

    /// User flipped the app filter toggle
    FilterToggled(bool),

    /// User picked an app, by package name
    FilterSelected(String),

    /// User removed the app filter
    FilterCleared,

    /// App selector closed without a choice
    SelectorCancelled,

    /// App selector went away (after a choice or a cancel)
    SelectorDismissed,
}

/// Outbound instructions for the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusUpdate {
    /// Redraw the status panel
    Render(StatusView),

    /// The app filter or its description changed
    FilterChanged(FilterStatus),

    /// Show the app selector with these apps
    OpenAppSelector { apps: Vec<AppDescriptor> },

    /// Replace the apps of the selector already on screen
    RefreshAppSelector { apps: Vec<AppDescriptor> },

    /// Short advisory message for the user
    Notice { message: String },

    /// Latest formatted statistics
    Stats(StatsSummary),
}
