//! Server-side resolution of sealed share links

pub mod manager;

pub use manager::Resolver;
