//! Command-line client for the resolution endpoint

pub mod orchestrator;
pub mod render;

pub use orchestrator::{LinkOutcome, Orchestrator, parse_links};
pub use render::{Banner, format_size, format_timestamp, render_entry, render_json};
