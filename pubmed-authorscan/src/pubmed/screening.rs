//! Non-academic author screening
//!
//! Turns a [`RawArticle`] into a [`CompanyArticle`] when at least one of its
//! authors lists a commercial affiliation, choosing a corresponding email from
//! the article itself before falling back to external resolvers.

use crate::affiliation::is_non_academic;
use crate::email::extract_email;
use crate::pubmed::models::{CompanyArticle, RawArticle};
use crate::resolvers::{ArticleIds, ResolverChain};
use tracing::{debug, instrument};

const SEPARATOR: &str = "; ";

/// What the article itself says about non-academic authors and emails
#[derive(Debug, Default, PartialEq, Eq)]
struct Screening {
    names: Vec<String>,
    affiliations: Vec<String>,
    candidate_emails: Vec<String>,
}

impl Screening {
    fn of(article: &RawArticle) -> Self {
        let mut screening = Screening::default();

        for author in &article.authors {
            if let Some(email) = author.embedded_email() {
                screening.candidate_emails.push(email.to_string());
            }

            for affiliation in &author.affiliations {
                if !is_non_academic(affiliation) {
                    continue;
                }

                screening.names.push(author.display_name());
                screening.affiliations.push(affiliation.clone());

                if let Some(email) = extract_email(affiliation) {
                    if affiliation.to_lowercase().contains("corresponding") {
                        screening.candidate_emails.insert(0, email);
                    } else {
                        screening.candidate_emails.push(email);
                    }
                }
            }
        }

        screening
    }
}

/// Classifies authors and picks a corresponding email
#[derive(Debug)]
pub struct ArticleScreener {
    resolvers: ResolverChain,
}

impl ArticleScreener {
    pub fn new(resolvers: ResolverChain) -> Self {
        Self { resolvers }
    }

    /// Screen one article
    ///
    /// Returns `None` when no author has a non-academic affiliation. The
    /// resolver chain is consulted only when the article carries no email.
    #[instrument(skip(self, article), fields(pmid = %article.pmid))]
    pub async fn screen(&self, article: &RawArticle) -> Option<CompanyArticle> {
        let screening = Screening::of(article);
        if screening.names.is_empty() {
            return None;
        }

        let corresponding_email = match screening.candidate_emails.into_iter().next() {
            Some(email) => email,
            None => {
                let ids = ArticleIds {
                    doi: article.doi.as_deref(),
                    pmid: Some(article.pmid.as_str()).filter(|pmid| !pmid.is_empty()),
                };
                self.resolvers.resolve(&ids).await.unwrap_or_default()
            }
        };

        debug!(
            authors = screening.names.len(),
            has_email = !corresponding_email.is_empty(),
            "Found non-academic authors"
        );

        Some(CompanyArticle {
            pmid: article.pmid.clone(),
            title: article.title.clone(),
            publication_date: article.pub_date.to_date_string(),
            non_academic_authors: screening.names.join(SEPARATOR),
            company_affiliations: screening.affiliations.join(SEPARATOR),
            corresponding_email,
        })
    }
}
