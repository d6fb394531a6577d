use serde::{Deserialize, Serialize};

use crate::models::app::{AppDescriptor, AppIcon};

/// How the active app filter should be presented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterDescription {
    /// No filter set
    None,

    /// Filter on an installed app found in the loaded list
    App {
        name: String,
        package_name: String,
        icon: Option<AppIcon>,
    },

    /// Filter on a package that is not installed or not loaded yet
    Package { package_name: String },
}

impl FilterDescription {
    pub fn for_app(app: &AppDescriptor) -> Self {
        FilterDescription::App {
            name: app.name.clone(),
            package_name: app.package_name.clone(),
            icon: app.icon.clone(),
        }
    }

    /// Text shown in the filter row
    pub fn display_text(&self, no_filter_text: &str) -> String {
        match self {
            FilterDescription::None => no_filter_text.to_string(),
            FilterDescription::App {
                name, package_name, ..
            } => format!("{} ({})", name, package_name),
            FilterDescription::Package { package_name } => package_name.clone(),
        }
    }
}

/// Filter row state sent to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStatus {
    pub description: FilterDescription,

    /// Text for the filter row
    pub text: String,

    /// Whether the filter toggle should be drawn as enabled
    pub toggle_enabled: bool,
}
