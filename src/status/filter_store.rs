use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::app::{AppDescriptor, AppIcon};
use crate::models::filter::{FilterDescription, FilterStatus};
use crate::prefs::PreferenceStore;
use crate::status::events::StatusUpdate;
use crate::status::messages;

/// Active app filter resolved against the installed apps
///
/// The app selector can be requested before the app list has loaded. The
/// request is then remembered and honored once, when the list arrives.
pub struct AppFilterStore {
    prefs: Arc<dyn PreferenceStore>,

    /// Package name of the filtered app
    filter: Option<String>,

    /// Non-virtual apps in natural order, `None` until the first phase loads
    apps: Option<Vec<AppDescriptor>>,

    /// Selector requested while the list was missing
    pending_open: bool,

    /// Selector currently on screen
    selector_open: bool,
}

impl AppFilterStore {
    /// Create a store, restoring the persisted filter
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let filter = prefs.app_filter();
        if let Some(pkg) = &filter {
            info!("Restored app filter: {}", pkg);
        }

        Self {
            prefs,
            filter,
            apps: None,
            pending_open: false,
            selector_open: false,
        }
    }

    #[cfg(test)]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    #[cfg(test)]
    pub fn apps(&self) -> Option<&[AppDescriptor]> {
        self.apps.as_deref()
    }

    #[cfg(test)]
    pub fn is_open_pending(&self) -> bool {
        self.pending_open
    }

    #[cfg(test)]
    pub fn is_selector_open(&self) -> bool {
        self.selector_open
    }

    /// The toggle reads as enabled while a filter is set or being chosen
    pub fn is_toggle_enabled(&self) -> bool {
        self.filter.is_some() || self.pending_open || self.selector_open
    }

    pub fn find_app(&self, package_name: &str) -> Option<&AppDescriptor> {
        self.apps
            .as_ref()?
            .iter()
            .find(|app| app.package_name == package_name)
    }

    pub fn describe_filter(&self) -> FilterDescription {
        match &self.filter {
            None => FilterDescription::None,
            Some(pkg) => match self.find_app(pkg) {
                Some(app) => FilterDescription::for_app(app),
                None => FilterDescription::Package {
                    package_name: pkg.clone(),
                },
            },
        }
    }

    /// Icon of the filtered app, when it is installed and its icon has loaded
    pub fn active_icon(&self) -> Option<AppIcon> {
        self.filter
            .as_deref()
            .and_then(|pkg| self.find_app(pkg))
            .and_then(|app| app.icon.clone())
    }

    pub fn status(&self) -> FilterStatus {
        let description = self.describe_filter();

        FilterStatus {
            text: description.display_text(messages::NO_APP_FILTER),
            description,
            toggle_enabled: self.is_toggle_enabled(),
        }
    }

    /// Filter on `app`, or clear the filter when `None`
    pub fn set_filter(&mut self, app: Option<&AppDescriptor>) -> Vec<StatusUpdate> {
        self.set_filter_package(app.map(|app| app.package_name.as_str()))
    }

    /// Filter on a package name, which need not be in the loaded list
    pub fn set_filter_package(&mut self, package_name: Option<&str>) -> Vec<StatusUpdate> {
        self.filter = package_name.filter(|pkg| !pkg.is_empty()).map(str::to_string);
        info!("App filter set to {:?}", self.filter);

        if let Err(e) = self.prefs.set_app_filter(self.filter.as_deref()) {
            warn!("Failed to persist app filter: {}", e);
        }

        vec![StatusUpdate::FilterChanged(self.status())]
    }

    pub fn set_toggle(&mut self, enabled: bool) -> Vec<StatusUpdate> {
        if enabled {
            if self.filter.is_none() {
                return self.request_selector();
            }
            Vec::new()
        } else {
            self.pending_open = false;
            self.selector_open = false;
            self.set_filter(None)
        }
    }

    /// Open the app selector, or defer it until the app list is loaded
    ///
    /// Does nothing while a selector is already open.
    pub fn request_selector(&mut self) -> Vec<StatusUpdate> {
        if self.selector_open {
            debug!("App selector already open");
            return Vec::new();
        }

        match &self.apps {
            None => {
                debug!("App list not loaded yet, deferring selector");
                self.pending_open = true;
                vec![
                    StatusUpdate::Notice {
                        message: messages::APPS_LOADING.to_string(),
                    },
                    StatusUpdate::FilterChanged(self.status()),
                ]
            }
            Some(apps) => {
                let apps = apps.clone();
                self.pending_open = false;
                self.selector_open = true;
                vec![StatusUpdate::OpenAppSelector { apps }]
            }
        }
    }

    /// A choice was made in the selector
    pub fn select_package(&mut self, package_name: &str) -> Vec<StatusUpdate> {
        self.selector_open = false;
        self.set_filter_package(Some(package_name))
    }

    /// Closing the selector without a choice clears the filter
    pub fn selector_cancelled(&mut self) -> Vec<StatusUpdate> {
        self.selector_open = false;
        self.set_filter(None)
    }

    pub fn selector_dismissed(&mut self) -> Vec<StatusUpdate> {
        if !self.selector_open {
            return Vec::new();
        }

        self.selector_open = false;
        vec![StatusUpdate::FilterChanged(self.status())]
    }

    /// Replace the cached app list with a newly loaded phase
    pub fn on_apps_loaded(
        &mut self,
        apps: HashMap<i32, AppDescriptor>,
        with_icons: bool,
    ) -> Vec<StatusUpdate> {
        let mut list: Vec<AppDescriptor> = apps.into_values().filter(|app| !app.is_virtual).collect();
        list.sort();
        info!("Loaded {} apps (icons: {})", list.len(), with_icons);

        let refresh_open_selector = with_icons && self.selector_open;
        self.apps = Some(list);

        let mut updates = Vec::new();

        if std::mem::take(&mut self.pending_open) {
            info!("Opening deferred app selector");
            updates.extend(self.request_selector());
        } else if refresh_open_selector {
            debug!("Reloading app icons in the open selector");
            updates.push(StatusUpdate::RefreshAppSelector {
                apps: self.apps.clone().unwrap_or_default(),
            });
        }

        updates.push(StatusUpdate::FilterChanged(self.status()));
        updates
    }
}
