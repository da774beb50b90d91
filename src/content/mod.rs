//! Webpage content fetching for evidence gathering
//!
//! Retrieves candidate pages and reduces them to clean text the classifier
//! can cite.
//!
//! ## Architecture
//!
//! ```text
//! Candidate URLs → ContentFetcher (parallel, bounded) → HTML → extract_text → Clean Text
//! ```
//!
//! Fetching is best-effort and non-retrying: any transport, TLS, or parse
//! failure yields empty text for that URL and the pipeline moves on.

pub mod config;
pub mod extractor;
pub mod fetcher;

pub use config::FetchConfig;
pub use extractor::extract_text;
pub use fetcher::{ContentFetcher, FetchOutcome};
