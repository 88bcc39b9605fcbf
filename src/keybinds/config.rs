//! Configuration for keybinds.

use crate::keybinds::actions::WidgetAction;
use crate::keybinds::metadata::ActionRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keybind table, keyed by action id.
///
/// Serialized as a flat table (`toggle_tag = "space"`). Actions absent from
/// the table keep their registry defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeybindConfig {
    /// Keybind mappings
    pub keybinds: HashMap<String, KeybindDef>,
}

/// Keybind definition - can be single key, multiple keys, or disabled.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeybindDef {
    /// Single keybind
    Single(String),
    /// Multiple alternative keybinds for the same action
    Multiple(Vec<String>),
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            keybinds: default_keybinds(),
        }
    }
}

fn default_keybinds() -> HashMap<String, KeybindDef> {
    ActionRegistry::all()
        .iter()
        .map(|meta| {
            let def = match meta.default_keys {
                [single] => KeybindDef::Single((*single).to_string()),
                many => KeybindDef::Multiple(many.iter().map(|k| (*k).to_string()).collect()),
            };
            (meta.id.to_string(), def)
        })
        .collect()
}

impl KeybindConfig {
    /// Get the keybind(s) for a given action name.
    ///
    /// Returns an empty vector if the action is not configured.
    #[must_use]
    pub fn get(&self, action: &str) -> Vec<String> {
        self.keybinds.get(action).map_or_else(Vec::new, |def| match def {
            KeybindDef::Single(key) => vec![key.clone()],
            KeybindDef::Multiple(keys) => keys.clone(),
        })
    }

    /// Check if a keybind is disabled for an action.
    #[must_use]
    pub fn is_disabled(&self, action: &str) -> bool {
        self.keybinds.get(action).is_some_and(|def| match def {
            KeybindDef::Single(key) => key == "none",
            KeybindDef::Multiple(keys) => keys.iter().all(|k| k == "none"),
        })
    }

    /// Build the key-name lookup table used at dispatch time
    ///
    /// Actions missing from the table fall back to their registry defaults.
    #[must_use]
    pub fn keymap(&self) -> Keymap {
        let mut bindings = HashMap::new();
        for meta in ActionRegistry::all() {
            if self.is_disabled(meta.id) {
                continue;
            }
            for key in meta.get_keys(self) {
                bindings.insert(key.to_ascii_lowercase(), meta.action);
            }
        }
        Keymap { bindings }
    }
}

/// Resolved key-name to action table
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<String, WidgetAction>,
}

impl Keymap {
    /// Look up the action bound to a key name such as `"ctrl-a"`
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<WidgetAction> {
        self.bindings.get(key).copied()
    }
}
