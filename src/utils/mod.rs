//! Utility functions and helpers

pub mod version;

pub use version::{VERSION, client_user_agent, get_version};
