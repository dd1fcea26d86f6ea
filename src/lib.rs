//! Terabox share-link resolver
//!
//! Turns a share link from the Terabox family of hosts into a direct,
//! time-limited download URL plus file metadata, without exposing the
//! provider's listing API to the client.
//!
//! # Architecture
//!
//! - **Token codec**: seals the submitted link(s), an expiry and a nonce into
//!   an opaque URL-safe string with XChaCha20-Poly1305.
//! - **Provider scraper**: loads the share page, extracts the anti-bot js
//!   token and log id, then queries the listing endpoint.
//! - **Resolution endpoint**: `GET /api?data=<token>&index=<n>` opens the
//!   token, checks expiry, replay and host, scrapes, and returns one entry.
//! - **Client orchestrator**: seals each submitted link and resolves them
//!   concurrently against the endpoint.
//!
//! # Usage
//!
//! ```bash
//! export RESOLVER_SECRET="at-least-thirty-two-characters-of-secret"
//! terabox-resolver server --port 4416
//! terabox-resolver resolve "https://terabox.com/s/abc123"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use terabox_resolver::{Settings, TokenCodec};
//!
//! # fn example() -> terabox_resolver::Result<()> {
//! let mut settings = Settings::default();
//! settings.token.secret = "an-example-secret-of-sufficient-length".to_string();
//!
//! let codec = TokenCodec::new(&settings.token.secret)?;
//! let token = codec.issue("https://terabox.com/s/abc123", settings.token.ttl_ms)?;
//! let payload = codec.decode(&token)?;
//! assert_eq!(payload.target.get(0), Some("https://terabox.com/s/abc123"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod token;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use resolver::Resolver;
pub use token::{TokenCodec, TokenPayload};
pub use types::{ErrorResponse, FileEntry, PingResponse};
