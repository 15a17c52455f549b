//! Europe PMC email lookups by PMID
//!
//! Two endpoints are consulted, each as its own resolver: the article search
//! (author list and affiliation of the matching record) and the dedicated
//! `emails` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{ArticleIds, EmailResolver, join_url, null_as_default};
use crate::email::extract_email;
use crate::error::{PubMedError, Result};

/// Searches Europe PMC for the MEDLINE record of a PMID
#[derive(Debug, Clone)]
pub struct EuropePmcSearchResolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl EuropePmcSearchResolver {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl EmailResolver for EuropePmcSearchResolver {
    fn name(&self) -> &'static str {
        "europepmc-search"
    }

    fn identifier<'a>(&self, ids: &ArticleIds<'a>) -> Option<&'a str> {
        ids.pmid
    }

    #[instrument(skip(self), fields(resolver = "europepmc-search"))]
    async fn lookup(&self, pmid: &str) -> Result<Option<String>> {
        let query = format!("EXT_ID:{} AND SRC:MED", pmid);
        let url = join_url(
            &self.base_url,
            &format!("search?query={}&format=json", urlencoding::encode(&query)),
        );

        let search: SearchResponse = get_json(&self.client, &url, self.timeout).await?;
        Ok(email_from_search(&search))
    }
}

/// Reads the Europe PMC `emails` endpoint for a PMID
#[derive(Debug, Clone)]
pub struct EuropePmcEmailsResolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl EuropePmcEmailsResolver {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl EmailResolver for EuropePmcEmailsResolver {
    fn name(&self) -> &'static str {
        "europepmc-emails"
    }

    fn identifier<'a>(&self, ids: &ArticleIds<'a>) -> Option<&'a str> {
        ids.pmid
    }

    #[instrument(skip(self), fields(resolver = "europepmc-emails"))]
    async fn lookup(&self, pmid: &str) -> Result<Option<String>> {
        let url = join_url(&self.base_url, &format!("MED/{}/emails/json", pmid));

        let emails: EmailsResponse = get_json(&self.client, &url, self.timeout).await?;
        Ok(email_from_list(&emails))
    }
}

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str, timeout: Duration) -> Result<T> {
    debug!("Querying Europe PMC: {}", url);

    let response = client.get(url).timeout(timeout).send().await?;
    if !response.status().is_success() {
        return Err(PubMedError::from_status(response.status()));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    result_list: ResultList,
}

#[derive(Debug, Default, Deserialize)]
struct ResultList {
    #[serde(default, deserialize_with = "null_as_default")]
    result: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    author_list: AuthorList,
    #[serde(default)]
    affiliation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthorList {
    #[serde(default, deserialize_with = "null_as_default")]
    author: Vec<SearchAuthor>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchAuthor {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    email_list: EmailList,
}

#[derive(Debug, Default, Deserialize)]
struct EmailList {
    #[serde(default, deserialize_with = "null_as_default")]
    email: Vec<String>,
}

/// Author email of the first search hit, else an address in its affiliation
fn email_from_search(search: &SearchResponse) -> Option<String> {
    let first = search.result_list.result.first()?;

    first
        .author_list
        .author
        .iter()
        .filter_map(|author| author.email.as_deref())
        .map(str::trim)
        .find(|email| !email.is_empty())
        .map(str::to_string)
        .or_else(|| {
            first
                .affiliation
                .as_deref()
                .filter(|affiliation| affiliation.contains('@'))
                .and_then(extract_email)
        })
}

fn email_from_list(emails: &EmailsResponse) -> Option<String> {
    emails
        .email_list
        .email
        .first()
        .map(|email| email.trim())
        .filter(|email| !email.is_empty())
        .map(str::to_string)
}
