//! Action types for widget keybinds.

/// Actions that can be triggered from the keyboard while the widget has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetAction {
    /// Move focus one tile left - Left
    NavigateLeft,
    /// Move focus one tile right - Right
    NavigateRight,
    /// Move focus one row up - Up
    NavigateUp,
    /// Move focus one row down - Down
    NavigateDown,

    /// Toggle the heart on the focused, selected or compared item(s) - Space
    ToggleTag,
    /// Show only tagged items - T
    ToggleTagFilter,
    /// Send tagged items to the save endpoint - S
    SaveTagged,

    /// Remove selected items from the collection - Delete / Backspace
    DeleteSelected,
    /// Select every visible item - Ctrl+A
    SelectAll,

    /// Switch between inline and fullscreen layout - F
    ToggleFullscreen,
    /// Leave fullscreen - Escape
    Escape,
}

impl WidgetAction {
    /// Returns whether the action needs at least one item in the collection.
    #[must_use]
    pub const fn requires_items(&self) -> bool {
        matches!(
            self,
            Self::NavigateLeft
                | Self::NavigateRight
                | Self::NavigateUp
                | Self::NavigateDown
                | Self::ToggleTag
                | Self::DeleteSelected
                | Self::SelectAll
        )
    }

    /// Whether the host editor must not see the key once the widget has it.
    ///
    /// Arrows, space and delete double as node-graph shortcuts (pan, delete
    /// node), so they are swallowed even when the action itself is a no-op.
    #[must_use]
    pub const fn always_consumes(&self) -> bool {
        matches!(
            self,
            Self::NavigateLeft
                | Self::NavigateRight
                | Self::NavigateUp
                | Self::NavigateDown
                | Self::ToggleTag
                | Self::DeleteSelected
        )
    }

    /// Returns a human-readable description of the action.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NavigateLeft => "Move focus left",
            Self::NavigateRight => "Move focus right",
            Self::NavigateUp => "Move focus up one row",
            Self::NavigateDown => "Move focus down one row",
            Self::ToggleTag => "Toggle heart on current item(s)",
            Self::ToggleTagFilter => "Show only hearted items",
            Self::SaveTagged => "Save hearted items",
            Self::DeleteSelected => "Remove selected items",
            Self::SelectAll => "Select all visible items",
            Self::ToggleFullscreen => "Toggle fullscreen",
            Self::Escape => "Exit fullscreen",
        }
    }
}
