//! Resolution tokens
//!
//! A resolution token carries the share link(s) a client wants resolved,
//! sealed under the deployment secret, so the link travels through a public
//! query string without the browser ever talking to the provider itself.
//! Tokens live for a few seconds and are accepted once.

pub mod codec;
pub mod payload;
pub mod replay;

pub use codec::TokenCodec;
pub use payload::{Target, TokenPayload, now_millis};
pub use replay::ReplayGuard;
