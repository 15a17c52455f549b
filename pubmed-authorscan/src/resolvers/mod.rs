//! Corresponding author email resolution
//!
//! When an article carries no email of its own, a [`ResolverChain`] asks a
//! fixed sequence of external services for one. Each service is an
//! [`EmailResolver`]; the first non-empty answer wins and later resolvers are
//! never called. A failing resolver never fails the article: its error is
//! logged and the chain moves on.

mod crossref;
mod europe_pmc;

pub use crossref::CrossRefResolver;
pub use europe_pmc::{EuropePmcEmailsResolver, EuropePmcSearchResolver};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::rate_limit::Throttle;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

/// Identifiers available for an article
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleIds<'a> {
    pub doi: Option<&'a str>,
    pub pmid: Option<&'a str>,
}

/// An external source of corresponding author emails
#[async_trait]
pub trait EmailResolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// The identifier this resolver looks up, if the article has it
    fn identifier<'a>(&self, ids: &ArticleIds<'a>) -> Option<&'a str>;

    /// Look up an email for `id`
    ///
    /// `Ok(None)` means the service answered but had no email.
    async fn lookup(&self, id: &str) -> Result<Option<String>>;
}

/// Ordered fallback over several [`EmailResolver`]s
pub struct ResolverChain {
    resolvers: Vec<Box<dyn EmailResolver>>,
    throttle: Throttle,
}

impl ResolverChain {
    /// Create a chain that tries `resolvers` in order, pausing after each call
    pub fn new(resolvers: Vec<Box<dyn EmailResolver>>, throttle: Throttle) -> Self {
        Self {
            resolvers,
            throttle,
        }
    }

    /// The standard chain: CrossRef by DOI, then Europe PMC search by PMID,
    /// then the Europe PMC emails endpoint by PMID
    pub fn from_config(config: &ClientConfig, client: reqwest::Client) -> Self {
        let timeout = config.resolver_timeout;
        let resolvers: Vec<Box<dyn EmailResolver>> = vec![
            Box::new(CrossRefResolver::new(
                client.clone(),
                config.effective_crossref_url(),
                timeout,
            )),
            Box::new(EuropePmcSearchResolver::new(
                client.clone(),
                config.effective_europe_pmc_url(),
                timeout,
            )),
            Box::new(EuropePmcEmailsResolver::new(
                client,
                config.effective_europe_pmc_url(),
                timeout,
            )),
        ];

        Self::new(resolvers, Throttle::new(config.resolver_delay))
    }

    /// A chain that never finds anything
    pub fn empty() -> Self {
        Self::new(Vec::new(), Throttle::disabled())
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Return the first email any resolver finds
    ///
    /// Resolvers whose identifier is missing are skipped without a request.
    /// Errors and empty answers fall through to the next resolver.
    #[instrument(skip(self, ids), fields(doi = ?ids.doi, pmid = ?ids.pmid))]
    pub async fn resolve(&self, ids: &ArticleIds<'_>) -> Option<String> {
        for resolver in &self.resolvers {
            let Some(id) = resolver.identifier(ids) else {
                continue;
            };

            let outcome = resolver.lookup(id).await;
            self.throttle.pause().await;

            match outcome {
                Ok(Some(email)) if !email.trim().is_empty() => {
                    debug!(resolver = resolver.name(), email = %email, "Resolved email");
                    return Some(email.trim().to_string());
                }
                Ok(_) => {
                    debug!(resolver = resolver.name(), "No email found");
                }
                Err(e) => {
                    debug!(resolver = resolver.name(), error = %e, "Email lookup failed");
                }
            }
        }

        None
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.resolvers.iter().map(|r| r.name()).collect();
        f.debug_struct("ResolverChain")
            .field("resolvers", &names)
            .field("throttle", &self.throttle)
            .finish()
    }
}

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build a resolver's endpoint URL from a base URL that may end with `/`
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
