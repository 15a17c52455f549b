use serde::{Deserialize, Serialize};

/// Publication date components as they appear in `JournalIssue/PubDate`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PubDate {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl PubDate {
    /// Join the present components with `-`, e.g. `2023-Mar-07` or `2023`
    pub fn to_date_string(&self) -> String {
        [&self.year, &self.month, &self.day]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// One author of a raw PubMed record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthor {
    pub last_name: Option<String>,
    pub initials: Option<String>,
    /// Affiliation strings in document order
    pub affiliations: Vec<String>,
    /// Text of an `<Identifier Source="email">` element
    pub identifier_email: Option<String>,
    /// Text of an `<ElectronicAddress>` element
    pub electronic_address: Option<String>,
}

impl RawAuthor {
    /// `"Last, Initials"`, `"Last"`, or `"Unknown"`
    pub fn display_name(&self) -> String {
        match (&self.last_name, &self.initials) {
            (Some(last), Some(initials)) => format!("{last}, {initials}"),
            (Some(last), None) => last.clone(),
            (None, _) => "Unknown".to_string(),
        }
    }

    /// Email embedded directly in the author element
    ///
    /// `ElectronicAddress` takes precedence over an email-typed `Identifier`.
    pub fn embedded_email(&self) -> Option<&str> {
        self.electronic_address
            .as_deref()
            .or(self.identifier_email.as_deref())
    }
}

/// One `<PubmedArticle>` decoded into plain fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    /// PubMed ID
    pub pmid: String,
    /// Article title with inline markup flattened
    pub title: String,
    pub pub_date: PubDate,
    pub authors: Vec<RawAuthor>,
    /// DOI (Digital Object Identifier)
    pub doi: Option<String>,
}

/// An article with at least one non-academic author
///
/// Field names serialize to the column headers of the CSV report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyArticle {
    #[serde(rename = "PubmedID")]
    pub pmid: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    /// Non-academic author names joined with `"; "`
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    /// Company affiliations joined with `"; "`, parallel to the author names
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}
