//! View description types
//!
//! Plain serializable data. A host front end turns these into markup; tests
//! assert on them directly.

use crate::controller::{DisplayMode, PaneSlot};
use crate::media::{ItemId, MediaKind};
use crate::notices::Notice;
use crate::store::TypeFilter;
use serde::Serialize;

/// Everything needed to draw the widget once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub mode: DisplayMode,
    pub columns: usize,
    /// First grid row scrolled into view
    pub first_row: usize,
    pub tiles: Vec<TileView>,
    pub preview: PreviewView,
    pub counters: Counters,
    pub toolbar: ToolbarView,
    /// Message shown when a delete left only filtered-out entries
    pub empty_state: Option<EmptyState>,
    pub notice: Option<Notice>,
}

/// One grid tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub id: ItemId,
    pub index: usize,
    /// 1-based position shown in the tile corner
    pub label: usize,
    pub filename: String,
    pub kind: MediaKind,
    pub source: String,
    pub selected: bool,
    pub focused: bool,
    pub tagged: bool,
    pub hidden: bool,
}

impl TileView {
    /// CSS class list for the tile element
    #[must_use]
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["vewd-tile"];
        if self.selected {
            classes.push("selected");
        }
        if self.focused {
            classes.push("focused");
        }
        if self.tagged {
            classes.push("tagged");
        }
        if self.hidden {
            classes.push("hidden");
        }
        classes
    }
}

/// One preview pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneView {
    pub slot: PaneSlot,
    pub index: usize,
    pub label: usize,
    pub filename: String,
    pub kind: MediaKind,
    /// Full-resolution locator, not the thumbnail
    pub source: String,
    pub tagged: bool,
    pub active: bool,
}

/// Preview area contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum PreviewView {
    Empty,
    Single { pane: PaneView },
    Compare { left: PaneView, right: PaneView },
}

impl PreviewView {
    #[must_use]
    pub const fn pane_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single { .. } => 1,
            Self::Compare { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub total: usize,
    pub tagged: usize,
    pub visible: usize,
}

impl Counters {
    /// Toolbar text, e.g. `"12 items · 3 ♥"`
    #[must_use]
    pub fn summary(&self) -> String {
        let noun = if self.total == 1 { "item" } else { "items" };
        format!("{} {noun} · {} ♥", self.total, self.tagged)
    }
}

/// Toolbar button states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarView {
    pub type_filter: TypeFilter,
    /// The "hearted only" filter button is lit
    pub tag_filter_active: bool,
    pub auto_export: bool,
    pub fullscreen: bool,
    pub export_enabled: bool,
    pub clear_enabled: bool,
}

/// Why the grid shows no tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Nothing in the collection
    NoItems,
    /// Entries exist but every one is filtered out
    AllHidden { hidden: usize },
}
