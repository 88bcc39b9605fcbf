//! Execution-event payloads and per-instance routing
//!
//! The host emits one payload per executed node, keyed by the node's
//! instance id. [`WidgetRegistry`] hands each payload to the widget that
//! owns that id; there is no process-wide "current widget".

use crate::media::{MediaDescriptor, MediaKind, kind_from_filename};
use crate::widget::ReviewWidget;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Media outputs of one node execution
///
/// `images` and `vewd_images` are accepted as aliases of `outputImages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutput {
    #[serde(default, alias = "images", alias = "vewd_images")]
    pub output_images: Vec<MediaDescriptor>,
    #[serde(default)]
    pub output_videos: Vec<MediaDescriptor>,
    #[serde(default)]
    pub output_audio: Vec<MediaDescriptor>,
    #[serde(default)]
    pub output_models: Vec<MediaDescriptor>,
}

impl ExecutionOutput {
    /// Parse a payload from JSON
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the payload is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every descriptor with its kind, in payload order
    ///
    /// The extension decides the kind when it is recognized, so a splat file
    /// listed under models comes out as a splat; otherwise the list it came
    /// from decides.
    #[must_use]
    pub fn descriptors(&self) -> Vec<(MediaKind, &MediaDescriptor)> {
        let lists = [
            (MediaKind::Image, &self.output_images),
            (MediaKind::Video, &self.output_videos),
            (MediaKind::Audio, &self.output_audio),
            (MediaKind::Model, &self.output_models),
        ];
        lists
            .into_iter()
            .flat_map(|(fallback, list)| {
                list.iter()
                    .map(move |d| (kind_from_filename(&d.filename).unwrap_or(fallback), d))
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output_images.is_empty()
            && self.output_videos.is_empty()
            && self.output_audio.is_empty()
            && self.output_models.is_empty()
    }
}

/// Widgets keyed by host instance id
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, ReviewWidget>,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget under its own instance id
    ///
    /// Returns the widget previously registered under that id, if any.
    pub fn register(&mut self, widget: ReviewWidget) -> Option<ReviewWidget> {
        self.widgets.insert(widget.instance_id().to_string(), widget)
    }

    pub fn unregister(&mut self, instance_id: &str) -> Option<ReviewWidget> {
        self.widgets.remove(instance_id)
    }

    #[must_use]
    pub fn get(&self, instance_id: &str) -> Option<&ReviewWidget> {
        self.widgets.get(instance_id)
    }

    pub fn get_mut(&mut self, instance_id: &str) -> Option<&mut ReviewWidget> {
        self.widgets.get_mut(instance_id)
    }

    /// Registered instance ids, sorted
    #[must_use]
    pub fn instance_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.widgets.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Feed a payload to the widget owning `instance_id`
    ///
    /// Returns the number of new entries, or `None` if no widget is
    /// registered under that id.
    pub fn route(&mut self, instance_id: &str, output: &ExecutionOutput) -> Option<usize> {
        let Some(widget) = self.widgets.get_mut(instance_id) else {
            log::debug!("No widget registered for instance {instance_id}");
            return None;
        };
        Some(widget.ingest_output(output))
    }
}
