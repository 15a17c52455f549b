//! PubMed EFetch XML parser
//!
//! Streams a `<PubmedArticleSet>` with quick-xml and decodes each
//! `<PubmedArticle>` into a [`RawArticle`]. Only the fields the screening step
//! needs are kept: PMID, title, journal issue date, authors with their
//! affiliations and embedded emails, and the DOI.
//!
//! Titles and affiliations may carry inline markup (`<i>`, `<sup>`, ...); all
//! text nested under them is concatenated in document order.

use crate::error::{PubMedError, Result};
use crate::pubmed::models::{RawArticle, RawAuthor};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufReader;
use tracing::{debug, instrument};

/// Per-article parsing state
#[derive(Default)]
struct ArticleBuilder {
    article: RawArticle,
    has_article: bool,
    in_title: bool,
    in_affiliation: bool,
    affiliation: String,
    author: Option<RawAuthor>,
    identifier_source: String,
    article_id_type: String,
}

impl ArticleBuilder {
    /// Handle a start tag. `parents` excludes the element being opened.
    fn open(&mut self, parents: &[String], name: &str, element: &BytesStart) {
        match name {
            "Article" if ancestor(parents, 0) == Some("MedlineCitation") => {
                self.has_article = true;
            }
            "ArticleTitle"
                if ancestor(parents, 0) == Some("Article")
                    && ancestor(parents, 1) == Some("MedlineCitation") =>
            {
                self.in_title = true;
            }
            "Author"
                if ancestor(parents, 0) == Some("AuthorList")
                    && ancestor(parents, 1) == Some("Article") =>
            {
                self.author = Some(RawAuthor::default());
            }
            "Identifier" if ancestor(parents, 0) == Some("Author") => {
                self.identifier_source = attribute(element, b"Source").unwrap_or_default();
            }
            "Affiliation"
                if self.author.is_some() && ancestor(parents, 0) == Some("AffiliationInfo") =>
            {
                self.in_affiliation = true;
                self.affiliation.clear();
            }
            "ArticleId" => {
                self.article_id_type = attribute(element, b"IdType").unwrap_or_default();
            }
            _ => {}
        }
    }

    /// Route a text fragment. Returns `false` if the caller should treat it as leaf text.
    fn absorb_text(&mut self, chunk: &str) -> bool {
        if self.in_title {
            self.article.title.push_str(chunk);
            true
        } else if self.in_affiliation {
            self.affiliation.push_str(chunk);
            true
        } else {
            false
        }
    }

    /// Handle an end tag. `parents` excludes the element being closed.
    fn close(&mut self, parents: &[String], name: &str, text: &str) {
        let value = text.trim();
        let parent = ancestor(parents, 0);

        match name {
            "ArticleTitle" if self.in_title => self.in_title = false,
            "PMID" if parent == Some("MedlineCitation") && self.article.pmid.is_empty() => {
                self.article.pmid = value.to_string();
            }
            "Year" | "Month" | "Day"
                if parent == Some("PubDate") && ancestor(parents, 1) == Some("JournalIssue") =>
            {
                let slot = match name {
                    "Year" => &mut self.article.pub_date.year,
                    "Month" => &mut self.article.pub_date.month,
                    _ => &mut self.article.pub_date.day,
                };
                *slot = non_empty(value);
            }
            "LastName" | "Initials" | "Identifier" | "ElectronicAddress"
                if parent == Some("Author") =>
            {
                if let Some(author) = self.author.as_mut() {
                    match name {
                        "LastName" => author.last_name = non_empty(value),
                        "Initials" => author.initials = non_empty(value),
                        "Identifier" => {
                            if self.identifier_source.eq_ignore_ascii_case("email")
                                && !value.is_empty()
                            {
                                author.identifier_email = Some(value.to_string());
                            }
                            self.identifier_source.clear();
                        }
                        _ => {
                            if !value.is_empty() {
                                author.electronic_address = Some(value.to_string());
                            }
                        }
                    }
                }
            }
            "Affiliation" if self.in_affiliation => {
                self.in_affiliation = false;
                let affiliation = self.affiliation.trim();
                if affiliation.is_empty() {
                    return;
                }
                if let Some(author) = self.author.as_mut() {
                    author.affiliations.push(affiliation.to_string());
                }
            }
            "Author" if parent == Some("AuthorList") => {
                if let Some(author) = self.author.take() {
                    self.article.authors.push(author);
                }
            }
            "ArticleId" => {
                let is_doi = self.article_id_type.eq_ignore_ascii_case("doi");
                let in_references = parents.iter().any(|p| p == "ReferenceList");
                if is_doi && !in_references && self.article.doi.is_none() && !value.is_empty() {
                    self.article.doi = Some(value.to_string());
                }
                self.article_id_type.clear();
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Option<RawArticle> {
        if !self.has_article {
            debug!(pmid = %self.article.pmid, "Skipping record without Article element");
            return None;
        }
        self.article.title = self.article.title.trim().to_string();
        Some(self.article)
    }
}

/// Parse every `<PubmedArticle>` of an EFetch XML response
///
/// Records without a `MedlineCitation/Article` element are skipped. Missing
/// optional fields are left empty.
///
/// # Errors
///
/// Returns [`PubMedError::XmlError`] if the document is not well-formed.
///
/// # Example
///
/// ```
/// use pubmed_authorscan::parse_articles;
///
/// let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
///     <PMID>1</PMID>
///     <Article><ArticleTitle>Effects of <i>X</i> on Y</ArticleTitle></Article>
/// </MedlineCitation></PubmedArticle></PubmedArticleSet>"#;
///
/// let articles = parse_articles(xml)?;
/// assert_eq!(articles[0].title, "Effects of X on Y");
/// # Ok::<(), pubmed_authorscan::PubMedError>(())
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles(xml: &str) -> Result<Vec<RawArticle>> {
    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));

    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut current: Option<ArticleBuilder> = None;
    let mut articles = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                text.clear();

                if name == "PubmedArticle" {
                    current = Some(ArticleBuilder::default());
                } else if let Some(builder) = current.as_mut() {
                    builder.open(&path, &name, e);
                }
                path.push(name);
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                path.pop();

                if name == "PubmedArticle" {
                    if let Some(article) = current.take().and_then(ArticleBuilder::finish) {
                        articles.push(article);
                    }
                } else if let Some(builder) = current.as_mut() {
                    builder.close(&path, &name, &text);
                }
                text.clear();
            }
            Ok(Event::Text(e)) => {
                let chunk = match e.unescape() {
                    Ok(chunk) => chunk.into_owned(),
                    Err(err) => {
                        debug!(error = %err, "Keeping undecodable text fragment as-is");
                        String::from_utf8_lossy(&e).into_owned()
                    }
                };
                let absorbed = current
                    .as_mut()
                    .is_some_and(|builder| builder.absorb_text(&chunk));
                if !absorbed {
                    text.push_str(&chunk);
                }
            }
            Ok(Event::CData(e)) => {
                let chunk = String::from_utf8_lossy(&e.into_inner()).into_owned();
                let absorbed = current
                    .as_mut()
                    .is_some_and(|builder| builder.absorb_text(&chunk));
                if !absorbed {
                    text.push_str(&chunk);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PubMedError::XmlError(format!(
                    "Failed to read EFetch XML: {}",
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(articles = articles.len(), "Completed XML parsing");

    Ok(articles)
}

/// Name of the `depth`-th ancestor counting from the innermost open element
fn ancestor(parents: &[String], depth: usize) -> Option<&str> {
    parents.iter().rev().nth(depth).map(String::as_str)
}

fn attribute(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
