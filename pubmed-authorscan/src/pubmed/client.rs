//! PubMed E-utilities client
//!
//! Paginated ESearch for PMIDs, batched EFetch for article XML, and the
//! screening step that turns parsed articles into [`CompanyArticle`] records.

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::pubmed::models::CompanyArticle;
use crate::pubmed::parser::parse_articles;
use crate::pubmed::query::SearchQuery;
use crate::pubmed::responses::ESearchResult;
use crate::pubmed::screening::ArticleScreener;
use crate::rate_limit::Throttle;
use crate::resolvers::ResolverChain;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

/// Client for searching PubMed and screening articles for industry authors
///
/// Every request is awaited before the next one is issued. E-utilities calls
/// are paced by [`ClientConfig::throttle_interval`]; email lookups by
/// [`ClientConfig::resolver_delay`].
#[derive(Debug)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
    throttle: Throttle,
    screener: ArticleScreener,
}

impl PubMedClient {
    /// Create a new client with default configuration
    ///
    /// Uses the NCBI default pacing (one request every 340 ms) and no API key.
    ///
    /// # Errors
    ///
    /// Returns [`PubMedError::Client`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_authorscan::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@example.com");
    ///
    /// let client = PubMedClient::with_config(config)?;
    /// # Ok::<(), pubmed_authorscan::PubMedError>(())
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .map_err(|e| PubMedError::Client(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing HTTP client
    ///
    /// The same HTTP client is shared by the E-utilities requests and the
    /// email resolvers.
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let resolvers = ResolverChain::from_config(&config, client.clone());
        Self {
            base_url: config.effective_base_url().trim_end_matches('/').to_string(),
            throttle: Throttle::new(config.throttle_interval),
            screener: ArticleScreener::new(resolvers),
            client,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Return every PMID matching `query`, in ESearch order
    ///
    /// Pages of [`ClientConfig::page_size`] ids are requested until the total
    /// reported by the first page is reached.
    ///
    /// # Errors
    ///
    /// * [`PubMedError::MalformedResponse`] if a page is not valid ESearch JSON
    /// * [`PubMedError::ApiError`] on a non-success status or an NCBI error message
    /// * [`PubMedError::RequestError`] on transport failure
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_authorscan::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let pmids = client.fetch_ids("monoclonal antibody AND 2024[dp]").await?;
    ///     println!("{} ids", pmids.len());
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_ids(&self, query: &str) -> Result<Vec<String>> {
        self.fetch_ids_with_page_size(query, self.config.page_size)
            .await
    }

    /// [`fetch_ids`](Self::fetch_ids) with an explicit page size
    #[instrument(skip(self))]
    pub async fn fetch_ids_with_page_size(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<String>> {
        let query = SearchQuery::new(query);
        if query.is_empty() {
            debug!("Empty query, skipping search");
            return Ok(Vec::new());
        }
        if page_size == 0 {
            return Err(PubMedError::InvalidParameter(
                "page size must be greater than zero".to_string(),
            ));
        }

        let term = urlencoding::encode(query.as_str());
        let mut ids = Vec::new();
        let mut retstart = 0;
        let mut total: Option<usize> = None;

        loop {
            let url = format!(
                "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retstart={}&retmode=json",
                self.base_url, term, page_size, retstart
            );

            let response = self.make_request(&url).await?;
            let body = response.text().await?;
            self.throttle.pause().await;

            let page: ESearchResult = serde_json::from_str(&body).map_err(|e| {
                debug!(body = %body, "Undecodable ESearch response");
                PubMedError::MalformedResponse {
                    endpoint: "esearch".to_string(),
                    message: e.to_string(),
                }
            })?;
            let data = page.esearchresult;

            if let Some(message) = &data.error {
                warn!(error = %message, "ESearch reported an error");
                return Err(PubMedError::ApiError {
                    status: 200,
                    message: message.clone(),
                });
            }

            let total_count = *total.get_or_insert_with(|| {
                let count = data.total_count();
                info!(total = count, "Total results found");
                count
            });

            debug!(retstart, received = data.idlist.len(), "Fetched ESearch page");
            ids.extend(data.idlist);

            retstart += page_size;
            if retstart >= total_count {
                break;
            }
        }

        info!(ids = ids.len(), "Search complete");
        Ok(ids)
    }

    /// Fetch and screen the articles for `ids`
    ///
    /// Ids are fetched in batches of [`ClientConfig::batch_size`]. Articles
    /// without a non-academic author are dropped; the rest keep the order
    /// EFetch returned them in.
    ///
    /// # Errors
    ///
    /// * [`PubMedError::XmlError`] if a batch is not well-formed XML
    /// * [`PubMedError::ApiError`] on a non-success status
    /// * [`PubMedError::RequestError`] on transport failure
    ///
    /// Email resolver failures never surface here.
    pub async fn fetch_details<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<CompanyArticle>> {
        self.fetch_details_with_batch_size(ids, self.config.batch_size)
            .await
    }

    /// [`fetch_details`](Self::fetch_details) with an explicit batch size,
    /// clamped to 100
    #[instrument(skip(self, ids), fields(ids_count = ids.len()))]
    pub async fn fetch_details_with_batch_size<S: AsRef<str>>(
        &self,
        ids: &[S],
        batch_size: usize,
    ) -> Result<Vec<CompanyArticle>> {
        if batch_size == 0 {
            return Err(PubMedError::InvalidParameter(
                "batch size must be greater than zero".to_string(),
            ));
        }
        let batch_size = batch_size.min(crate::config::MAX_BATCH_SIZE);

        let mut records = Vec::new();

        for (index, batch) in ids.chunks(batch_size).enumerate() {
            if index > 0 {
                self.throttle.pause().await;
            }

            let id_list = batch
                .iter()
                .map(|id| id.as_ref().trim())
                .collect::<Vec<_>>()
                .join(",");
            let url = format!(
                "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
                self.base_url, id_list
            );

            let response = self.make_request(&url).await?;
            let xml = response.text().await?;
            let articles = parse_articles(&xml)?;

            debug!(
                batch = index,
                requested = batch.len(),
                parsed = articles.len(),
                "Fetched EFetch batch"
            );

            for article in &articles {
                if let Some(record) = self.screener.screen(article).await {
                    records.push(record);
                }
            }
        }

        info!(records = records.len(), "Screening complete");
        Ok(records)
    }

    /// Search and screen in one call
    pub async fn search_company_articles(&self, query: &str) -> Result<Vec<CompanyArticle>> {
        let ids = self.fetch_ids(query).await?;
        self.fetch_details(&ids).await
    }

    /// GET `url` with the NCBI courtesy parameters appended
    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        debug!("Making API request to: {}", final_url);
        let response = self.client.get(&final_url).send().await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PubMedError::from_status(response.status()));
        }

        Ok(response)
    }
}
