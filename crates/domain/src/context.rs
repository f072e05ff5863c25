//! Editor context — the option values available to select fields.
//!
//! Derived once from a loaded room configuration and never mutated; a reload
//! produces a fresh context.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

/// Valid choices for device, page and transition fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorContext {
    device_ids: BTreeSet<String>,
    page_ids: BTreeSet<String>,
    layer_ids: BTreeSet<String>,
    transitions: Vec<String>,
}

impl EditorContext {
    /// The transition that means "switch without animation".
    pub const NO_TRANSITION: &'static str = "None";

    /// Fixed transition catalogue, independent of the document.
    pub const TRANSITIONS: [&'static str; 3] = [Self::NO_TRANSITION, "Fade", "Slide"];

    /// Build a context from explicit device and page catalogues.
    pub fn new<D, P>(device_ids: D, page_ids: P) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            device_ids: device_ids.into_iter().map(Into::into).collect(),
            page_ids: page_ids.into_iter().map(Into::into).collect(),
            layer_ids: BTreeSet::new(),
            transitions: Self::TRANSITIONS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Derive the context from the top-level keys of a configuration
    /// document.
    ///
    /// - devices are the keys of the `Devices` map
    /// - pages are the `Id` of every `Pages` element that has one
    ///
    /// Missing or oddly shaped catalogues simply contribute nothing.
    #[must_use]
    pub fn derive(document: &Map<String, Value>) -> Self {
        let device_ids = document
            .get("Devices")
            .and_then(Value::as_object)
            .map(|devices| devices.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        let page_ids = document
            .get("Pages")
            .and_then(Value::as_array)
            .map(|pages| {
                pages
                    .iter()
                    .filter_map(|page| page.get("Id").and_then(Value::as_str))
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Self::new(device_ids, page_ids)
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.device_ids.iter().map(String::as_str)
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.page_ids.iter().map(String::as_str)
    }

    /// Layer identifiers. Configuration documents carry no layer catalogue,
    /// so this is empty unless a future document shape provides one.
    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layer_ids.iter().map(String::as_str)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &str> {
        self.transitions.iter().map(String::as_str)
    }

    #[must_use]
    pub fn has_device(&self, id: &str) -> bool {
        self.device_ids.contains(id)
    }

    #[must_use]
    pub fn has_page(&self, id: &str) -> bool {
        self.page_ids.contains(id)
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>(), std::iter::empty::<String>())
    }
}
