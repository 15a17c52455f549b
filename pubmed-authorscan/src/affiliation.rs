//! Academic vs. non-academic affiliation classification
//!
//! Classification is plain case-insensitive substring matching. Academic
//! keywords are checked first and veto any commercial match, so joint
//! industry/academia affiliations count as academic.

/// Substrings marking an academic or clinical affiliation
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "hospital",
    "faculty",
    "department",
    "center",
    "centre",
    "academy",
    "université",
    "universidad",
    "università",
    "clinic",
];

/// Substrings marking a pharmaceutical, biotech or corporate affiliation
pub const COMMERCIAL_KEYWORDS: &[&str] = &[
    "pharma",
    "biotech",
    "therapeutics",
    "laboratories",
    "inc",
    "ltd",
    "gmbh",
    "s.a.",
    "s.r.l.",
    "corp",
    "llc",
];

/// Returns `true` if the affiliation looks commercial and not academic
///
/// # Example
///
/// ```
/// use pubmed_authorscan::is_non_academic;
///
/// assert!(is_non_academic("Acme Pharma Inc, Boston, MA"));
/// assert!(!is_non_academic("Department of Chemistry, Acme Pharma Inc"));
/// assert!(!is_non_academic(""));
/// ```
pub fn is_non_academic(affiliation: &str) -> bool {
    if affiliation.trim().is_empty() {
        return false;
    }

    let lowered = affiliation.to_lowercase();

    if ACADEMIC_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return false;
    }

    COMMERCIAL_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
