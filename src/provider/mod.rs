//! Provider integration
//!
//! Everything that knows about the third-party share service lives here:
//! which hosts are accepted, how the share page is scraped, and how the
//! listing endpoint is queried.

pub mod allowlist;
pub mod extractor;
pub mod network;
pub mod scraper;

pub use allowlist::HostAllowList;
pub use extractor::{DelimiterExtractor, Delimiters, TokenExtractor, find_between};
pub use network::ClientFactory;
pub use scraper::{ShareProvider, TeraboxScraper};
