//! Email address extraction from free text

use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("Failed to compile email regex")
    })
}

fn mailto_regex() -> &'static Regex {
    static MAILTO_REGEX: OnceLock<Regex> = OnceLock::new();
    MAILTO_REGEX.get_or_init(|| {
        Regex::new(r"mailto:([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})")
            .expect("Failed to compile mailto regex")
    })
}

/// Return the first email-shaped substring of `text`
///
/// # Example
///
/// ```
/// use pubmed_authorscan::extract_email;
///
/// assert_eq!(
///     extract_email("Acme Pharma Inc, contact: jane@acme.com"),
///     Some("jane@acme.com".to_string())
/// );
/// assert_eq!(extract_email("Acme Pharma Inc"), None);
/// ```
pub fn extract_email(text: &str) -> Option<String> {
    email_regex()
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Return the address of the first `mailto:` link in `text`, without the scheme
pub fn extract_mailto_email(text: &str) -> Option<String> {
    mailto_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
