//! PubMed search, fetch and screening
//!
//! - `client` - [`PubMedClient`]: paginated ESearch and batched EFetch
//! - `parser` - EFetch XML into [`RawArticle`]s
//! - `screening` - [`ArticleScreener`]: non-academic authors and email choice
//! - `query` - [`SearchQuery`] normalization
//! - `models` - raw and screened article types

pub mod client;
pub mod models;
pub mod parser;
pub mod query;
pub(crate) mod responses;
pub mod screening;

// Re-export public types
pub use client::PubMedClient;
pub use models::{CompanyArticle, PubDate, RawArticle, RawAuthor};
pub use parser::parse_articles;
pub use query::SearchQuery;
pub use screening::ArticleScreener;
