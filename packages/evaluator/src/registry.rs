//! Components registry addressed by dotted paths (`Layout.Header`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opaque handle the host uses to identify a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(String);

impl ComponentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryEntry {
    Component(ComponentRef),
    Namespace(ComponentRegistry),
}

/// Tree of namespaces with component leaves. Read-only during interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `component` under `path`, creating namespaces on the way.
    /// A component standing where a namespace is needed gets replaced.
    pub fn register(&mut self, path: &str, component: ComponentRef) -> &mut Self {
        let segments: Vec<&str> = path.split('.').collect();
        self.insert(&segments, component);
        self
    }

    pub fn with(mut self, path: &str, component: ComponentRef) -> Self {
        self.register(path, component);
        self
    }

    fn insert(&mut self, segments: &[&str], component: ComponentRef) {
        match segments {
            [] => {}
            [last] => {
                self.entries
                    .insert((*last).to_string(), RegistryEntry::Component(component));
            }
            [head, rest @ ..] => {
                let entry = self
                    .entries
                    .entry((*head).to_string())
                    .or_insert_with(|| RegistryEntry::Namespace(ComponentRegistry::new()));
                if let RegistryEntry::Component(previous) = entry {
                    debug!(segment = %head, replaced = %previous.name(), "Replacing component with namespace");
                    *entry = RegistryEntry::Namespace(ComponentRegistry::new());
                }
                if let RegistryEntry::Namespace(namespace) = entry {
                    namespace.insert(rest, component);
                }
            }
        }
    }

    /// Split the path on `.` and walk the tree. Namespaces are not components.
    pub fn resolve(&self, path: &str) -> Option<&ComponentRef> {
        if path.is_empty() {
            return None;
        }
        let mut registry = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match (registry.entries.get(segment)?, segments.peek()) {
                (RegistryEntry::Component(component), None) => return Some(component),
                (RegistryEntry::Namespace(namespace), Some(_)) => registry = namespace,
                _ => return None,
            }
        }
        None
    }
}
