//! Input interpretation for the review widget
//!
//! `SelectionController` turns clicks and key presses into
//! [`MediaStore`](crate::store::MediaStore) operations and reports what
//! changed as a list of [`ControllerEffect`]s. It owns the layout state the
//! store does not care about: display mode, column count, grid scroll and the
//! active comparison pane.
//!
//! # Click semantics
//!
//! | Input          | Selection                       | Focus            |
//! |----------------|---------------------------------|------------------|
//! | click `i`      | `{i}`                           | `i`              |
//! | ctrl-click `i` | toggle `i`                      | `i` when added   |
//! | shift-click `i`| `[min(f, i) ..= max(f, i)]`     | `i`              |

pub mod input;

pub use input::{ControllerEffect, DisplayMode, EventResponse, InputEvent, Key, Modifiers, PaneSlot};

use crate::keybinds::{KeybindConfig, Keymap, WidgetAction};
use crate::store::MediaStore;

/// Grid geometry per display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub inline_columns: usize,
    pub inline_rows: usize,
    pub fullscreen_columns: usize,
    pub fullscreen_rows: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            inline_columns: 4,
            inline_rows: 2,
            fullscreen_columns: 6,
            fullscreen_rows: 4,
        }
    }
}

/// Layout facts the renderer needs from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub mode: DisplayMode,
    pub columns: usize,
    pub first_row: usize,
    pub visible_rows: usize,
    pub active_pane: Option<PaneSlot>,
}

/// Interprets input events against a media store
#[derive(Debug, Clone)]
pub struct SelectionController {
    keymap: Keymap,
    grid: GridLayout,
    mode: DisplayMode,
    first_row: usize,
    active_pane: Option<PaneSlot>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(&KeybindConfig::default(), GridLayout::default())
    }
}

impl SelectionController {
    #[must_use]
    pub fn new(keybinds: &KeybindConfig, grid: GridLayout) -> Self {
        Self {
            keymap: keybinds.keymap(),
            grid,
            mode: DisplayMode::Inline,
            first_row: 0,
            active_pane: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    #[must_use]
    pub const fn active_pane(&self) -> Option<PaneSlot> {
        self.active_pane
    }

    /// Column count used for row navigation in the current mode
    #[must_use]
    pub fn columns(&self) -> usize {
        match self.mode {
            DisplayMode::Inline => self.grid.inline_columns,
            DisplayMode::Fullscreen => self.grid.fullscreen_columns,
        }
        .max(1)
    }

    fn visible_rows(&self) -> usize {
        match self.mode {
            DisplayMode::Inline => self.grid.inline_rows,
            DisplayMode::Fullscreen => self.grid.fullscreen_rows,
        }
        .max(1)
    }

    #[must_use]
    pub fn layout(&self) -> LayoutState {
        LayoutState {
            mode: self.mode,
            columns: self.columns(),
            first_row: self.first_row,
            visible_rows: self.visible_rows(),
            active_pane: self.active_pane,
        }
    }

    /// Handle one input event
    pub fn handle(&mut self, store: &mut MediaStore, event: InputEvent) -> EventResponse {
        match event {
            InputEvent::TileClick { index, modifiers } => self.click(store, index, modifiers),
            InputEvent::TileDoubleClick { index } => {
                if index >= store.len() {
                    return EventResponse::ignored();
                }
                self.active_pane = None;
                store.select_only(index);
                let response = EventResponse::consumed().with(ControllerEffect::SelectionChanged);
                self.enter_fullscreen(response)
            }
            InputEvent::PaneClick { slot } => {
                if !Self::pane_shown(store, slot) {
                    return EventResponse::ignored();
                }
                self.active_pane = Some(slot);
                EventResponse::consumed().with(ControllerEffect::PaneActivated(slot))
            }
            InputEvent::PaneDoubleClick { slot } => {
                if !Self::pane_shown(store, slot) {
                    return EventResponse::ignored();
                }
                self.enter_fullscreen(EventResponse::consumed())
            }
            InputEvent::KeyDown { key, modifiers } => self.key(store, &key, modifiers),
            InputEvent::FullscreenTrigger => self.toggle_fullscreen(store),
        }
    }

    fn pane_shown(store: &MediaStore, slot: PaneSlot) -> bool {
        match slot {
            PaneSlot::Primary => !store.selected().is_empty(),
            PaneSlot::Secondary => store.comparison_pair().is_some(),
        }
    }

    fn click(&mut self, store: &mut MediaStore, index: usize, modifiers: Modifiers) -> EventResponse {
        if index >= store.len() {
            return EventResponse::ignored();
        }
        self.active_pane = None;

        if modifiers.command() {
            if store.toggle_selected(index) {
                store.set_focus(index);
            }
        } else if let (true, Some(anchor)) = (modifiers.shift, store.focus()) {
            store.select_range(anchor, index);
            store.set_focus(index);
        } else {
            store.select_only(index);
        }

        EventResponse::consumed().with(ControllerEffect::SelectionChanged)
    }

    fn resolve(&self, key: &Key, modifiers: Modifiers) -> Option<WidgetAction> {
        let name = key.name();
        if modifiers.command() {
            // Ctrl+arrow moves focus without touching the selection.
            return self.keymap.resolve(&format!("ctrl-{name}")).or_else(|| {
                self.keymap
                    .resolve(&name)
                    .filter(|action| Self::delta_for(*action, 1).is_some())
            });
        }
        self.keymap.resolve(&name)
    }

    fn key(&mut self, store: &mut MediaStore, key: &Key, modifiers: Modifiers) -> EventResponse {
        let Some(action) = self.resolve(key, modifiers) else {
            return EventResponse::ignored();
        };

        let mut response = EventResponse {
            consumed: action.always_consumes(),
            effects: Vec::new(),
        };
        if action.requires_items() && store.is_empty() {
            return response;
        }

        if let Some(delta) = Self::delta_for(action, self.columns()) {
            self.navigate(store, delta, modifiers, &mut response);
            return response;
        }

        match action {
            WidgetAction::ToggleTag => {
                if self.toggle_tag(store) {
                    response.effects.push(ControllerEffect::TagsChanged {
                        tagged: store.tagged().len(),
                    });
                }
            }
            WidgetAction::DeleteSelected => {
                if !store.selected().is_empty() {
                    let doomed: Vec<usize> = store.selected().iter().copied().collect();
                    let outcome = store.remove_many(&doomed);
                    self.active_pane = None;
                    response.effects.push(ControllerEffect::Removed(outcome));
                    if let Some(focus) = store.focus() {
                        self.scroll_to(focus, &mut response);
                    }
                }
            }
            WidgetAction::SelectAll => {
                store.select_all_visible();
                self.active_pane = None;
                response.consumed = true;
                response.effects.push(ControllerEffect::SelectionChanged);
            }
            WidgetAction::ToggleTagFilter => {
                store.set_tag_filter_only(!store.tag_filter_only());
                response.consumed = true;
                response.effects.push(ControllerEffect::FilterChanged);
            }
            WidgetAction::SaveTagged => {
                response.consumed = true;
                response.effects.push(ControllerEffect::SaveTaggedRequested);
            }
            WidgetAction::ToggleFullscreen => return self.toggle_fullscreen(store),
            WidgetAction::Escape => {
                if self.mode == DisplayMode::Fullscreen {
                    return self.exit_fullscreen(store);
                }
            }
            WidgetAction::NavigateLeft
            | WidgetAction::NavigateRight
            | WidgetAction::NavigateUp
            | WidgetAction::NavigateDown => {}
        }
        response
    }

    const fn delta_for(action: WidgetAction, columns: usize) -> Option<isize> {
        #[allow(clippy::cast_possible_wrap)]
        let row = columns as isize;
        match action {
            WidgetAction::NavigateLeft => Some(-1),
            WidgetAction::NavigateRight => Some(1),
            WidgetAction::NavigateUp => Some(-row),
            WidgetAction::NavigateDown => Some(row),
            _ => None,
        }
    }

    fn navigate(&mut self, store: &mut MediaStore, delta: isize, modifiers: Modifiers, response: &mut EventResponse) {
        let last = store.len() - 1;
        let target = match store.focus() {
            #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
            Some(focus) => (focus as isize + delta).clamp(0, last as isize) as usize,
            None => 0,
        };

        if modifiers.shift {
            if let Some(focus) = store.focus() {
                store.add_selected(focus);
            }
            store.add_selected(target);
            store.set_focus(target);
        } else if modifiers.command() {
            store.set_focus(target);
        } else {
            store.select_only(target);
        }

        self.active_pane = None;
        response.effects.push(ControllerEffect::SelectionChanged);
        self.scroll_to(target, response);
    }

    /// Scroll the grid the minimum amount that brings `index` fully into view
    fn scroll_to(&mut self, index: usize, response: &mut EventResponse) {
        let row = index / self.columns();
        let visible = self.visible_rows();
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + visible {
            self.first_row = row + 1 - visible;
        }
        response.effects.push(ControllerEffect::ScrolledTo {
            index,
            first_row: self.first_row,
        });
    }

    /// Apply the three-way tag policy; returns whether anything changed
    fn toggle_tag(&self, store: &mut MediaStore) -> bool {
        if let (Some(slot), Some((primary, secondary))) = (self.active_pane, store.comparison_pair()) {
            let index = match slot {
                PaneSlot::Primary => primary,
                PaneSlot::Secondary => secondary,
            };
            store.toggle_tag(index);
            return true;
        }

        if store.selected().len() > 1 {
            let selected: Vec<usize> = store.selected().iter().copied().collect();
            let any_tagged = selected.iter().any(|i| store.tagged().contains(i));
            store.set_tagged(selected, !any_tagged);
            return true;
        }

        match store.focus() {
            Some(focus) => {
                store.toggle_tag(focus);
                true
            }
            None => false,
        }
    }

    fn toggle_fullscreen(&mut self, store: &MediaStore) -> EventResponse {
        match self.mode {
            DisplayMode::Inline => self.enter_fullscreen(EventResponse::consumed()),
            DisplayMode::Fullscreen => self.exit_fullscreen(store),
        }
    }

    fn enter_fullscreen(&mut self, response: EventResponse) -> EventResponse {
        if self.mode == DisplayMode::Fullscreen {
            return response;
        }
        self.mode = DisplayMode::Fullscreen;
        self.first_row = 0;
        response.with(ControllerEffect::DisplayModeChanged(DisplayMode::Fullscreen))
    }

    fn exit_fullscreen(&mut self, store: &MediaStore) -> EventResponse {
        self.mode = DisplayMode::Inline;
        self.first_row = 0;
        let mut response = EventResponse::consumed().with(ControllerEffect::DisplayModeChanged(DisplayMode::Inline));
        if let Some(focus) = store.focus() {
            self.scroll_to(focus, &mut response);
        }
        response
    }

    /// Forget layout state that pointed into a collection that was cleared
    pub fn reset(&mut self) {
        self.first_row = 0;
        self.active_pane = None;
    }
}
