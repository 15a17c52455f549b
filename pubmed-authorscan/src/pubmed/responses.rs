use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
}

impl ESearchData {
    /// Total hit count; missing or unparseable counts read as zero
    pub fn total_count(&self) -> usize {
        self.count
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0)
    }
}
