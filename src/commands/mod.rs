//! Command implementations
//!
//! Each function takes the restored widget (or the config/state it needs)
//! and performs one CLI command against it.

pub mod collection;
pub mod selection;
pub mod show;
pub mod transfer;

pub use collection::{clear, import, ingest, scan};
pub use selection::{delete, press, select, tag};
pub use show::{bindings, instances, list, render};
pub use transfer::{export, save_tagged};
