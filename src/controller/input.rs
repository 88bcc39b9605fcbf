//! Raw input events delivered by the host

use crate::store::RemovalOutcome;
use serde::Serialize;

/// Modifier keys held during a click or key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS; treated like Ctrl
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    #[must_use]
    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    #[must_use]
    pub const fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl or Cmd held
    #[must_use]
    pub const fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the widget distinguishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Delete,
    Backspace,
    Escape,
    Char(char),
    Other(String),
}

impl Key {
    /// Parse a browser `KeyboardEvent.key` value
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            " " | "Spacebar" => Self::Space,
            "Delete" => Self::Delete,
            "Backspace" => Self::Backspace,
            "Escape" | "Esc" => Self::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c.to_ascii_lowercase()),
                    _ => Self::Other(other.to_string()),
                }
            }
        }
    }

    /// Parse an internal key name; inverse of [`Key::name`]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "space" => Self::Space,
            "delete" | "del" => Self::Delete,
            "backspace" => Self::Backspace,
            "escape" | "esc" => Self::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other(other.to_string()),
                }
            }
        }
    }

    /// Internal key name used by keybind tables
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Left => "left".to_string(),
            Self::Right => "right".to_string(),
            Self::Up => "up".to_string(),
            Self::Down => "down".to_string(),
            Self::Space => "space".to_string(),
            Self::Delete => "delete".to_string(),
            Self::Backspace => "backspace".to_string(),
            Self::Escape => "escape".to_string(),
            Self::Char(c) => c.to_ascii_lowercase().to_string(),
            Self::Other(name) => name.to_ascii_lowercase(),
        }
    }
}

/// One of the two preview panes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneSlot {
    /// Left pane; shows the lowest selected index
    Primary,
    /// Right pane; shows the second-lowest selected index in comparison mode
    Secondary,
}

/// Widget layout state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Inline,
    Fullscreen,
}

/// Pointer and keyboard input routed to the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    TileClick { index: usize, modifiers: Modifiers },
    TileDoubleClick { index: usize },
    PaneClick { slot: PaneSlot },
    PaneDoubleClick { slot: PaneSlot },
    KeyDown { key: Key, modifiers: Modifiers },
    /// The toolbar fullscreen button
    FullscreenTrigger,
}

/// State change produced by an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEffect {
    SelectionChanged,
    TagsChanged { tagged: usize },
    Removed(RemovalOutcome),
    FilterChanged,
    PaneActivated(PaneSlot),
    DisplayModeChanged(DisplayMode),
    /// Grid scroll moved so `index` is fully in view
    ScrolledTo { index: usize, first_row: usize },
    SaveTaggedRequested,
}

/// What the controller did with an event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// The host must not run its own handler for this event
    pub consumed: bool,
    pub effects: Vec<ControllerEffect>,
}

impl EventResponse {
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            consumed: false,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub const fn consumed() -> Self {
        Self {
            consumed: true,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, effect: ControllerEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn has(&self, predicate: impl Fn(&ControllerEffect) -> bool) -> bool {
        self.effects.iter().any(predicate)
    }
}
