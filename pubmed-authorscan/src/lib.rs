//! # PubMed Author Scan
//!
//! Finds PubMed articles that have at least one author affiliated with a
//! non-academic (pharmaceutical, biotech or other commercial) organization, and
//! resolves a best-effort corresponding author email for each of them.
//!
//! ## Pipeline
//!
//! - **Search**: paginated ESearch over PubMed for a free-text query
//! - **Fetch**: batched EFetch of the matching records as XML
//! - **Screen**: classify every author affiliation and collect candidate emails
//! - **Resolve**: when no email is present inline, fall back to CrossRef and
//!   Europe PMC lookups in a fixed order
//!
//! All requests are issued sequentially and paced by a fixed throttle interval.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_authorscan::PubMedClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new()?;
//!
//!     let pmids = client.fetch_ids("crispr therapeutics").await?;
//!     let articles = client.fetch_details(&pmids).await?;
//!
//!     for article in articles {
//!         println!("{}: {}", article.pmid, article.non_academic_authors);
//!         println!("  email: {}", article.corresponding_email);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod affiliation;
pub mod config;
pub mod email;
pub mod error;
pub mod pubmed;
pub mod rate_limit;
pub mod resolvers;

// Re-export main types for convenience
pub use affiliation::is_non_academic;
pub use config::ClientConfig;
pub use email::extract_email;
pub use error::{PubMedError, Result};
pub use pubmed::{
    ArticleScreener, CompanyArticle, PubMedClient, RawArticle, RawAuthor, SearchQuery,
    parse_articles,
};
pub use rate_limit::Throttle;
pub use resolvers::{
    ArticleIds, CrossRefResolver, EmailResolver, EuropePmcEmailsResolver,
    EuropePmcSearchResolver, ResolverChain,
};
