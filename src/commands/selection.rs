//! Selection commands - select, press, tag and delete
//!
//! These replay the same input events a pointer or keyboard would produce,
//! so the CLI goes through exactly the controller paths the widget uses.

use crate::cli::{labels_to_indices, parse_key_spec};
use crate::controller::{InputEvent, Key, Modifiers};
use crate::widget::ReviewWidget;
use crate::VewdError;

type Result<T> = std::result::Result<T, VewdError>;

fn indices(widget: &ReviewWidget, positions: &[usize]) -> Result<Vec<usize>> {
    let indices = labels_to_indices(positions).map_err(VewdError::InvalidInput)?;
    let len = widget.store().len();
    if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
        return Err(VewdError::InvalidInput(format!(
            "position {} is out of range (1-{len})",
            bad + 1
        )));
    }
    Ok(indices)
}

/// Click the given positions; with `range`, shift-click from the first to the second
pub fn select(widget: &mut ReviewWidget, positions: &[usize], range: bool) -> Result<()> {
    let indices = indices(widget, positions)?;
    let Some((&first, rest)) = indices.split_first() else {
        return Ok(());
    };

    widget.handle_event(InputEvent::TileClick {
        index: first,
        modifiers: Modifiers::NONE,
    });

    if range {
        let [end] = rest else {
            return Err(VewdError::InvalidInput("--range takes exactly two positions".to_string()));
        };
        widget.handle_event(InputEvent::TileClick {
            index: *end,
            modifiers: Modifiers::shift(),
        });
        return Ok(());
    }

    for &index in rest {
        widget.handle_event(InputEvent::TileClick {
            index,
            modifiers: Modifiers::ctrl(),
        });
    }
    Ok(())
}

/// Press each key spec in order
pub fn press(widget: &mut ReviewWidget, keys: &[String], quiet: bool) -> Result<()> {
    for spec in keys {
        let event = parse_key_spec(spec).map_err(VewdError::InvalidInput)?;
        let response = widget.handle_event(event);
        if !quiet && !response.consumed {
            println!("{spec}: not handled");
        }
    }
    Ok(())
}

/// Select the given positions and toggle their tag
pub fn tag(widget: &mut ReviewWidget, positions: &[usize]) -> Result<()> {
    select(widget, positions, false)?;
    widget.handle_event(InputEvent::KeyDown {
        key: Key::Space,
        modifiers: Modifiers::NONE,
    });
    Ok(())
}

/// Select the given positions and delete them
pub fn delete(widget: &mut ReviewWidget, positions: &[usize], quiet: bool) -> Result<()> {
    let before = widget.store().len();
    select(widget, positions, false)?;
    widget.handle_event(InputEvent::KeyDown {
        key: Key::Delete,
        modifiers: Modifiers::NONE,
    });
    if !quiet {
        println!("Deleted {} item(s)", before - widget.store().len());
    }
    Ok(())
}
