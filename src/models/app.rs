use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Opaque reference to an application icon, resolved by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppIcon(pub String);

/// An installed application as reported by the application enumerator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Numeric owner id
    pub uid: i32,

    /// Human-readable label
    pub name: String,

    /// Package name, the key used by the app filter
    pub package_name: String,

    /// Icon, only present once the icon phase has loaded
    #[serde(default)]
    pub icon: Option<AppIcon>,

    /// Synthetic entries (e.g. system uids grouped under one label)
    #[serde(default)]
    pub is_virtual: bool,
}

#[cfg(test)]
impl AppDescriptor {
    pub fn new(uid: i32, name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            package_name: package_name.into(),
            icon: None,
            is_virtual: false,
        }
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: AppIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Mark the entry as synthetic
    pub fn virtual_entry(mut self) -> Self {
        self.is_virtual = true;
        self
    }
}

// Apps list in label order, case-insensitive, then by package and uid.
impl Ord for AppDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.package_name.cmp(&other.package_name))
            .then_with(|| self.uid.cmp(&other.uid))
    }
}

impl PartialOrd for AppDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AppDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AppDescriptor {}
