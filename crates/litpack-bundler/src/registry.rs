//! Ordered plugin registry.
//!
//! Plugins run in the order they were added. Composition only ever appends:
//! nothing is sorted, replaced, or removed once registered.

use std::sync::Arc;

use crate::driver::PluginDriver;
use crate::plugin::{Plugin, SharedPlugin};

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<SharedPlugin>,
    externals: Vec<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<P: Plugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Arc::new(plugin));
    }

    pub fn add_shared(&mut self, plugin: SharedPlugin) {
        self.plugins.push(plugin);
    }

    pub fn extend(&mut self, plugins: impl IntoIterator<Item = SharedPlugin>) {
        self.plugins.extend(plugins);
    }

    /// Specifiers resolved as external before any plugin is consulted.
    pub fn add_externals(&mut self, externals: impl IntoIterator<Item = String>) {
        for external in externals {
            if !self.externals.contains(&external) {
                self.externals.push(external);
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn externals(&self) -> &[String] {
        &self.externals
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn into_driver(self) -> PluginDriver {
        PluginDriver::new(self.plugins, self.externals)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .field("externals", &self.externals)
            .finish()
    }
}
