//! Action metadata registry - single source of truth for keybind information

use crate::keybinds::actions::WidgetAction;
use crate::keybinds::config::KeybindConfig;

/// Metadata for a widget action
#[derive(Debug, Clone)]
pub struct ActionMetadata {
    /// Action enum variant
    pub action: WidgetAction,

    /// Internal action identifier (e.g., "toggle_tag")
    pub id: &'static str,

    /// Default keybind(s) in internal format (e.g., "space", "ctrl-a")
    pub default_keys: &'static [&'static str],

    /// Short human-readable name (e.g., "Heart")
    pub short_name: &'static str,

    /// Category for grouping in help
    pub category: ActionCategory,
}

/// Category for organizing actions in help displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    /// Focus movement
    Navigation,
    /// Hearting and tag filtering
    Tagging,
    /// Selection and removal
    Collection,
    /// Layout changes
    View,
}

impl ActionMetadata {
    /// Convert internal key format to human-readable (e.g., "ctrl-a" -> "Ctrl+A")
    #[must_use]
    pub fn format_key(key: &str) -> String {
        key.split('-')
            .map(|part| match part {
                "ctrl" => "Ctrl".to_string(),
                "space" => "Space".to_string(),
                "bspace" | "backspace" => "Backspace".to_string(),
                "esc" | "escape" => "Esc".to_string(),
                "left" => "←".to_string(),
                "right" => "→".to_string(),
                "up" => "↑".to_string(),
                "down" => "↓".to_string(),
                other if other.len() == 1 => other.to_uppercase(),
                other => {
                    let mut chars = other.chars();
                    match chars.next() {
                        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                        None => other.to_string(),
                    }
                }
            })
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Get configured keybind(s) from config, falling back to defaults
    #[must_use]
    pub fn get_keys(&self, config: &KeybindConfig) -> Vec<String> {
        let configured = config.get(self.id);
        if configured.is_empty() {
            self.default_keys.iter().map(|s| (*s).to_string()).collect()
        } else {
            configured
        }
    }

    /// Get human-readable keybind(s)
    #[must_use]
    pub fn get_keys_human(&self, config: &KeybindConfig) -> Vec<String> {
        self.get_keys(config).iter().map(|k| Self::format_key(k)).collect()
    }
}

/// Global registry of all action metadata
pub struct ActionRegistry;

impl ActionRegistry {
    /// Get all registered actions
    #[must_use]
    pub const fn all() -> &'static [ActionMetadata] {
        ALL_ACTIONS
    }

    /// Get metadata for a specific action
    #[must_use]
    pub fn get(action: WidgetAction) -> Option<&'static ActionMetadata> {
        ALL_ACTIONS.iter().find(|m| m.action == action)
    }

    /// Get metadata by action ID
    #[must_use]
    pub fn get_by_id(id: &str) -> Option<&'static ActionMetadata> {
        ALL_ACTIONS.iter().find(|m| m.id == id)
    }

    /// Get actions by category
    #[must_use]
    pub fn by_category(category: ActionCategory) -> Vec<&'static ActionMetadata> {
        ALL_ACTIONS.iter().filter(|m| m.category == category).collect()
    }
}

static ALL_ACTIONS: &[ActionMetadata] = &[
    // Navigation
    ActionMetadata {
        action: WidgetAction::NavigateLeft,
        id: "navigate_left",
        default_keys: &["left"],
        short_name: "Left",
        category: ActionCategory::Navigation,
    },
    ActionMetadata {
        action: WidgetAction::NavigateRight,
        id: "navigate_right",
        default_keys: &["right"],
        short_name: "Right",
        category: ActionCategory::Navigation,
    },
    ActionMetadata {
        action: WidgetAction::NavigateUp,
        id: "navigate_up",
        default_keys: &["up"],
        short_name: "Up",
        category: ActionCategory::Navigation,
    },
    ActionMetadata {
        action: WidgetAction::NavigateDown,
        id: "navigate_down",
        default_keys: &["down"],
        short_name: "Down",
        category: ActionCategory::Navigation,
    },
    // Tagging
    ActionMetadata {
        action: WidgetAction::ToggleTag,
        id: "toggle_tag",
        default_keys: &["space"],
        short_name: "Heart",
        category: ActionCategory::Tagging,
    },
    ActionMetadata {
        action: WidgetAction::ToggleTagFilter,
        id: "toggle_tag_filter",
        default_keys: &["t"],
        short_name: "Filter Hearted",
        category: ActionCategory::Tagging,
    },
    ActionMetadata {
        action: WidgetAction::SaveTagged,
        id: "save_tagged",
        default_keys: &["s"],
        short_name: "Save Hearted",
        category: ActionCategory::Tagging,
    },
    // Collection
    ActionMetadata {
        action: WidgetAction::DeleteSelected,
        id: "delete_selected",
        default_keys: &["delete", "backspace"],
        short_name: "Remove",
        category: ActionCategory::Collection,
    },
    ActionMetadata {
        action: WidgetAction::SelectAll,
        id: "select_all",
        default_keys: &["ctrl-a"],
        short_name: "Select All",
        category: ActionCategory::Collection,
    },
    // View
    ActionMetadata {
        action: WidgetAction::ToggleFullscreen,
        id: "toggle_fullscreen",
        default_keys: &["f"],
        short_name: "Fullscreen",
        category: ActionCategory::View,
    },
    ActionMetadata {
        action: WidgetAction::Escape,
        id: "escape",
        default_keys: &["escape"],
        short_name: "Exit Fullscreen",
        category: ActionCategory::View,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_key() {
        assert_eq!(ActionMetadata::format_key("ctrl-a"), "Ctrl+A");
        assert_eq!(ActionMetadata::format_key("space"), "Space");
        assert_eq!(ActionMetadata::format_key("left"), "←");
        assert_eq!(ActionMetadata::format_key("delete"), "Delete");
    }

    #[test]
    fn test_registry_covers_every_action() {
        for action in [
            WidgetAction::NavigateLeft,
            WidgetAction::NavigateRight,
            WidgetAction::NavigateUp,
            WidgetAction::NavigateDown,
            WidgetAction::ToggleTag,
            WidgetAction::ToggleTagFilter,
            WidgetAction::SaveTagged,
            WidgetAction::DeleteSelected,
            WidgetAction::SelectAll,
            WidgetAction::ToggleFullscreen,
            WidgetAction::Escape,
        ] {
            assert!(ActionRegistry::get(action).is_some(), "{action:?} missing");
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<&str> = ActionRegistry::all().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len());
    }

    #[test]
    fn test_by_category() {
        assert_eq!(ActionRegistry::by_category(ActionCategory::Navigation).len(), 4);
    }
}
