//! Command-line interface definitions and parsing
//!
//! The `vewd` binary drives one persisted widget instance from a terminal.
//! Each invocation restores the instance from the state database, applies
//! one command, and persists again.
//!
//! Positions on the command line are the 1-based labels shown by `vewd list`.
//!
//! # Examples
//!
//! ```bash
//! vewd ingest outputs.json
//! vewd scan ~/renders
//! vewd select 1 3
//! vewd press shift-right space
//! vewd --tagged-only export
//! vewd -i node-12 render --json
//! ```

use crate::controller::{InputEvent, Key, Modifiers};
use crate::store::TypeFilter;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Media review widget driver
#[derive(Parser, Debug)]
#[command(name = "vewd", version, about = "Review, tag and export generated media")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Widget instance to operate on
    #[arg(short = 'i', long = "instance", global = true, default_value = "default")]
    pub instance: String,

    /// Host server base URL (overrides config)
    #[arg(long = "server", global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Show only entries of this kind (all, image, video, audio, model)
    #[arg(long = "type", global = true, value_name = "KIND")]
    pub type_filter: Option<TypeFilter>,

    /// Show only tagged entries
    #[arg(long = "tagged-only", global = true)]
    pub tagged_only: bool,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ingest an execution payload (JSON file, or - for stdin)
    Ingest {
        #[arg(value_name = "PAYLOAD")]
        payload: PathBuf,
    },

    /// Upload local files and add them to the collection
    Import {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Import every media file in a folder, oldest first
    Scan {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// List entries with their selection and tag state
    #[command(visible_alias = "ls")]
    List,

    /// Select entries; the first position becomes the focus
    Select {
        #[arg(required = true, value_name = "POS")]
        positions: Vec<usize>,

        /// Select everything between the two given positions
        #[arg(short = 'r', long = "range")]
        range: bool,
    },

    /// Press keys, e.g. `right`, `shift-down`, `space`, `ctrl-a`
    Press {
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
    },

    /// Select entries and toggle their tag
    Tag {
        #[arg(required = true, value_name = "POS")]
        positions: Vec<usize>,
    },

    /// Delete entries
    #[command(visible_alias = "rm")]
    Delete {
        #[arg(required = true, value_name = "POS")]
        positions: Vec<usize>,
    },

    /// Export the given positions, or the current targets
    Export {
        #[arg(value_name = "POS")]
        positions: Vec<usize>,
    },

    /// Save the given positions, or the current targets
    Save {
        #[arg(value_name = "POS")]
        positions: Vec<usize>,
    },

    /// Save every tagged entry
    SaveTagged,

    /// Remove every entry and forget seen assets
    Clear {
        /// Do not ask for confirmation
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Print the view description
    Render {
        /// Print JSON instead of a summary
        #[arg(long = "json")]
        json: bool,
    },

    /// Show keybinds
    Bindings,

    /// List instances with stored state
    Instances,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Convert 1-based labels to indices
///
/// # Errors
///
/// Returns a message naming the first label that is zero.
pub fn labels_to_indices(labels: &[usize]) -> Result<Vec<usize>, String> {
    labels
        .iter()
        .map(|&label| label.checked_sub(1).ok_or_else(|| "positions start at 1".to_string()))
        .collect()
}

/// Parse a key spec such as `ctrl-a` or `shift-right` into a key press
///
/// # Errors
///
/// Returns a message if the spec is empty or names an unknown modifier.
pub fn parse_key_spec(spec: &str) -> Result<InputEvent, String> {
    let mut parts: Vec<&str> = spec.split('-').collect();
    let name = parts.pop().filter(|n| !n.is_empty()).ok_or_else(|| format!("empty key in '{spec}'"))?;

    let mut modifiers = Modifiers::NONE;
    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "cmd" | "meta" => modifiers.meta = true,
            "shift" => modifiers.shift = true,
            other => return Err(format!("unknown modifier '{other}' in '{spec}'")),
        }
    }

    Ok(InputEvent::KeyDown {
        key: Key::from_name(name),
        modifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_spec() {
        assert_eq!(
            parse_key_spec("shift-right").unwrap(),
            InputEvent::KeyDown { key: Key::Right, modifiers: Modifiers::shift() }
        );
        assert_eq!(
            parse_key_spec("ctrl-a").unwrap(),
            InputEvent::KeyDown { key: Key::Char('a'), modifiers: Modifiers::ctrl() }
        );
        assert_eq!(
            parse_key_spec("space").unwrap(),
            InputEvent::KeyDown { key: Key::Space, modifiers: Modifiers::NONE }
        );
        assert!(parse_key_spec("hyper-x").is_err());
        assert!(parse_key_spec("ctrl-").is_err());
    }

    #[test]
    fn test_labels_to_indices() {
        assert_eq!(labels_to_indices(&[1, 3]).unwrap(), vec![0, 2]);
        assert!(labels_to_indices(&[0]).is_err());
    }

    #[test]
    fn test_cli_parses_globals() {
        let cli = Cli::try_parse_from(["vewd", "--type", "video", "-i", "n3", "select", "-r", "1", "4"]).unwrap();
        assert_eq!(cli.type_filter, Some(TypeFilter::Video));
        assert_eq!(cli.instance, "n3");
        match cli.command {
            Commands::Select { positions, range } => {
                assert_eq!(positions, vec![1, 4]);
                assert!(range);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
