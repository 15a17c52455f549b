//! CrossRef works lookup
//!
//! Fetches `/works/{doi}` and takes the first author email, falling back to a
//! `mailto:` link inside an affiliation name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ArticleIds, EmailResolver, join_url, null_as_default};
use crate::email::extract_mailto_email;
use crate::error::{PubMedError, Result};

/// Looks up author emails in CrossRef work metadata by DOI
#[derive(Debug, Clone)]
pub struct CrossRefResolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CrossRefResolver {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl EmailResolver for CrossRefResolver {
    fn name(&self) -> &'static str {
        "crossref"
    }

    fn identifier<'a>(&self, ids: &ArticleIds<'a>) -> Option<&'a str> {
        ids.doi
    }

    #[instrument(skip(self), fields(resolver = "crossref"))]
    async fn lookup(&self, doi: &str) -> Result<Option<String>> {
        let url = join_url(&self.base_url, &work_path(doi));
        debug!("Querying CrossRef: {}", url);

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            return Err(PubMedError::from_status(response.status()));
        }

        let body = response.text().await?;
        let work: CrossRefWork = serde_json::from_str(&body)?;

        Ok(email_from_work(&work))
    }
}

/// `works/{doi}` with each DOI segment percent-encoded
///
/// SICI-style DOIs contain `#`, `?` and `<`, which would otherwise end the path.
fn work_path(doi: &str) -> String {
    let encoded: Vec<_> = doi.trim().split('/').map(urlencoding::encode).collect();
    format!("works/{}", encoded.join("/"))
}

#[derive(Debug, Default, Deserialize)]
struct CrossRefWork {
    #[serde(default, deserialize_with = "null_as_default")]
    message: CrossRefMessage,
}

#[derive(Debug, Default, Deserialize)]
struct CrossRefMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    author: Vec<CrossRefAuthor>,
}

#[derive(Debug, Default, Deserialize)]
struct CrossRefAuthor {
    #[serde(default)]
    email: Option<EmailField>,
    #[serde(default, deserialize_with = "null_as_default")]
    affiliation: Vec<CrossRefAffiliation>,
}

#[derive(Debug, Default, Deserialize)]
struct CrossRefAffiliation {
    #[serde(default)]
    name: Option<String>,
}

/// CrossRef deposits carry either a single address or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmailField {
    Single(String),
    Many(Vec<String>),
}

impl EmailField {
    fn first(&self) -> Option<&str> {
        let email = match self {
            EmailField::Single(email) => email.as_str(),
            EmailField::Many(emails) => emails.first()?.as_str(),
        };
        let email = email.trim();
        (!email.is_empty()).then_some(email)
    }
}

/// First author email, else the first `mailto:` link in any affiliation name
fn email_from_work(work: &CrossRefWork) -> Option<String> {
    let authors = &work.message.author;

    authors
        .iter()
        .find_map(|author| author.email.as_ref().and_then(EmailField::first))
        .map(str::to_string)
        .or_else(|| {
            authors
                .iter()
                .flat_map(|author| &author.affiliation)
                .filter_map(|affiliation| affiliation.name.as_deref())
                .find_map(extract_mailto_email)
        })
}
