//! Display commands - list, render, bindings and instances

use crate::config::WidgetConfig;
use crate::keybinds::{ActionCategory, ActionRegistry};
use crate::output;
use crate::persist::StateStore;
use crate::widget::ReviewWidget;
use crate::VewdError;
use colored::Colorize;

type Result<T> = std::result::Result<T, VewdError>;

/// List entries, newest first
pub fn list(widget: &ReviewWidget, quiet: bool) -> Result<()> {
    let view = widget.render();
    if view.tiles.is_empty() {
        if !quiet {
            println!("No items.");
        }
        return Ok(());
    }

    if !quiet {
        println!("{}", view.counters.summary().bold());
    }
    for tile in view.tiles.iter().filter(|t| !quiet || !t.hidden) {
        println!("{}", output::tile_line(tile, quiet));
    }
    Ok(())
}

/// Print the view description
pub fn render(widget: &ReviewWidget, json: bool) -> Result<()> {
    let view = widget.render();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", output::view_summary(&view));
    }
    Ok(())
}

/// Print the effective keybinds, grouped by category
pub fn bindings(config: &WidgetConfig, quiet: bool) -> Result<()> {
    let categories = [
        ActionCategory::Navigation,
        ActionCategory::Tagging,
        ActionCategory::Collection,
        ActionCategory::View,
    ];
    for category in categories {
        if !quiet {
            println!("{}", format!("{category:?}").bold());
        }
        for meta in ActionRegistry::by_category(category) {
            let keys = if config.keybinds.is_disabled(meta.id) {
                "(disabled)".to_string()
            } else {
                meta.get_keys_human(&config.keybinds).join(", ")
            };
            println!("  {:<16} {:<14} {}", meta.id, keys, meta.action.description());
        }
    }
    Ok(())
}

/// List instance ids with stored state
pub fn instances(state: &StateStore, quiet: bool) -> Result<()> {
    let ids = state.instances()?;
    if ids.is_empty() && !quiet {
        println!("No stored instances.");
    }
    for id in ids {
        match state.load(&id)? {
            Some(record) if !quiet => println!("  {id} ({} item(s), {} tagged)", record.items.len(), record.tagged.len()),
            _ => println!("{id}"),
        }
    }
    Ok(())
}
