//! Type definitions for the resolver
//!
//! This module contains the main data structures used for requests and responses.

pub mod internal;
pub mod request;
pub mod response;

pub use internal::{FileListing, ProviderSession};
pub use request::{ResolveParams, ResolveQuery};
pub use response::{ErrorResponse, FileEntry, PingResponse, Thumbnails};
