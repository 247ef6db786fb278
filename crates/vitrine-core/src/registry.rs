//! Application registry: static app id → descriptor table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::policy::{PolicyOverrides, WindowPolicy};

/// What kind of desktop item an application is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppCategory {
    File,
    Folder,
    #[default]
    App,
    /// External navigation; never produces a window.
    Link,
}

impl AppCategory {
    pub const fn opens_window(self) -> bool {
        !matches!(self, Self::Link)
    }
}

/// Plain-data description of one desktop application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: AppCategory,
    #[serde(default)]
    pub policy: PolicyOverrides,
}

impl AppDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: AppCategory) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            policy: PolicyOverrides::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PolicyOverrides) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve this app's policy against manager-wide defaults.
    pub fn resolve_policy(&self, defaults: &WindowPolicy) -> WindowPolicy {
        WindowPolicy::resolve(defaults, &self.policy)
    }
}

/// Lookup table of application descriptors, in registration order.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: IndexMap<String, AppDescriptor>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a descriptor. Returns the previous one for that id.
    pub fn insert(&mut self, descriptor: AppDescriptor) -> Option<AppDescriptor> {
        self.apps.insert(descriptor.id.clone(), descriptor)
    }

    pub fn remove(&mut self, id: &str) -> Option<AppDescriptor> {
        self.apps.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&AppDescriptor> {
        self.apps.get(id)
    }

    /// Descriptor for `id` only if that app produces windows.
    pub fn windowed(&self, id: &str) -> Option<&AppDescriptor> {
        self.get(id).filter(|d| d.category.opens_window())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.apps.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.apps.values()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl FromIterator<AppDescriptor> for AppRegistry {
    fn from_iter<I: IntoIterator<Item = AppDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            registry.insert(descriptor);
        }
        registry
    }
}
