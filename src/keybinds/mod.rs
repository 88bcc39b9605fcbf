//! Keybind system for the review widget.
//!
//! Maps key names such as `"right"`, `"space"` or `"ctrl-a"` to
//! [`WidgetAction`]s. Defaults come from the action registry and can be
//! overridden per action in the `[keybinds]` table of the config file.

pub mod actions;
pub mod config;
pub mod metadata;

pub use actions::WidgetAction;
pub use config::{KeybindConfig, KeybindDef, Keymap};
pub use metadata::{ActionCategory, ActionMetadata, ActionRegistry};
