//! Client configuration
//!
//! [`ClientConfig`] carries everything the client reads at call sites: NCBI
//! courtesy parameters, endpoint base URLs, timeouts, pacing intervals and
//! paging sizes. All values are fixed once the client is built.

use std::time::Duration;

const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_CROSSREF_URL: &str = "https://api.crossref.org";
const DEFAULT_EUROPE_PMC_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest";

/// NCBI allows about three requests per second without an API key
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(340);

/// Pause after every external email lookup
pub const DEFAULT_RESOLVER_DELAY: Duration = Duration::from_millis(200);

/// Upper bound on ids per EFetch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Default number of ids requested per ESearch page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Configuration for [`PubMedClient`](crate::PubMedClient)
///
/// # Example
///
/// ```
/// use pubmed_authorscan::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("researcher@example.com")
///     .with_throttle_interval(Duration::from_millis(100));
///
/// assert_eq!(config.batch_size, 100);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key
    pub api_key: Option<String>,
    /// Contact email sent to NCBI
    pub email: Option<String>,
    /// Tool name sent to NCBI
    pub tool: Option<String>,
    /// Custom User-Agent header
    pub user_agent: Option<String>,
    /// E-utilities base URL
    pub base_url: Option<String>,
    /// CrossRef REST API base URL
    pub crossref_base_url: Option<String>,
    /// Europe PMC REST API base URL
    pub europe_pmc_base_url: Option<String>,
    /// Timeout for E-utilities requests
    pub timeout: Duration,
    /// Timeout for each email resolver request
    pub resolver_timeout: Duration,
    /// Pause between consecutive E-utilities requests
    pub throttle_interval: Duration,
    /// Pause after each email resolver request
    pub resolver_delay: Duration,
    /// Ids per ESearch page
    pub page_size: usize,
    /// Ids per EFetch request
    pub batch_size: usize,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults and no API key
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            user_agent: None,
            base_url: None,
            crossref_base_url: None,
            europe_pmc_base_url: None,
            timeout: Duration::from_secs(30),
            resolver_timeout: Duration::from_secs(10),
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            resolver_delay: DEFAULT_RESOLVER_DELAY,
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Point E-utilities requests at another host (mock servers, mirrors)
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_crossref_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.crossref_base_url = Some(base_url.into());
        self
    }

    pub fn with_europe_pmc_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.europe_pmc_base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_resolver_timeout(mut self, timeout: Duration) -> Self {
        self.resolver_timeout = timeout;
        self
    }

    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    pub fn with_resolver_delay(mut self, delay: Duration) -> Self {
        self.resolver_delay = delay;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the EFetch batch size, clamped to [`MAX_BATCH_SIZE`]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.min(MAX_BATCH_SIZE);
        self
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_EUTILS_URL)
    }

    pub fn effective_crossref_url(&self) -> &str {
        self.crossref_base_url
            .as_deref()
            .unwrap_or(DEFAULT_CROSSREF_URL)
    }

    pub fn effective_europe_pmc_url(&self) -> &str {
        self.europe_pmc_base_url
            .as_deref()
            .unwrap_or(DEFAULT_EUROPE_PMC_URL)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            )
        })
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(env!("CARGO_PKG_NAME"))
    }

    /// Query parameters appended to every E-utilities request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }

        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }

        if self.api_key.is_some() || self.email.is_some() || self.tool.is_some() {
            params.push(("tool".to_string(), self.effective_tool().to_string()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
