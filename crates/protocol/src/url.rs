use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{SearchConfiguration, RESULTS_PATH, SUGGESTIONS_ENDPOINT_PATH};

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Results-page URL carrying `query` as its only parameter.
pub fn results_url(query: &str) -> String {
    format!("{RESULTS_PATH}?q={}", encode_uri_component(query))
}

/// Site name scoped by the remote service: the first DNS label of the host
/// once a leading `www.` is removed.
pub fn site_name_from_host(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.').next().unwrap_or_default().to_string()
}

/// One request to the suggestions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub query: String,
    pub site_name: String,
    pub collections: Vec<String>,
    pub search_fields: Vec<String>,
    /// Session credential to attach, when the fetcher was given a source.
    pub session_token: Option<String>,
}

impl SuggestionQuery {
    pub fn new(query: &str, site_name: &str, config: &SearchConfiguration) -> Self {
        Self {
            query: query.to_string(),
            site_name: site_name.to_string(),
            collections: config.selected_collections.clone(),
            search_fields: config.selected_fields.clone(),
            session_token: None,
        }
    }

    /// Path and query string, relative to the API base.
    pub fn to_path(&self) -> String {
        format!(
            "{SUGGESTIONS_ENDPOINT_PATH}?query={}&siteName={}&collections={}&searchFields={}",
            encode_uri_component(&self.query),
            encode_uri_component(&self.site_name),
            encode_uri_component(&json_array(&self.collections)),
            encode_uri_component(&json_array(&self.search_fields)),
        )
    }
}

fn json_array(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}
