//! Vewd - selection, tagging and export core for a media review widget
//!
//! The widget collects generated media emitted by a node-graph editor's
//! execution events, shows it in a grid with a live preview, and lets the
//! user navigate, multi-select, tag, filter, delete, import and export
//! subsets through the host server.
//!
//! Layers:
//! - [`store::MediaStore`]: the ordered collection and its selection, tag and
//!   focus sets; all index reconciliation lives here
//! - [`controller::SelectionController`]: pointer and keyboard input
//! - [`view::render`]: pure projection onto a view description
//! - [`widget::ReviewWidget`]: composes the above with the backend,
//!   persistence and notices

use thiserror::Error;

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod events;
pub mod export;
pub mod forward;
pub mod keybinds;
pub mod media;
pub mod notices;
pub mod output;
pub mod persist;
pub mod store;
pub mod view;
pub mod widget;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum VewdError {
    /// Persistence error
    #[error("Persistence error: {0}")]
    Persist(#[from] persist::PersistError),
    /// Host server error
    #[error("Backend error: {0}")]
    Backend(#[from] backend::BackendError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Malformed execution payload
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
