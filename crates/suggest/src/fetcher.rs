use crate::sanitize::{sanitize_text, to_title_case};
use crate::Result;
use assist_protocol::{
    results_url, site_name_from_host, SearchConfiguration, SuggestionQuery, SuggestionsResponse,
};
use assist_session::{SessionToken, SessionTokenManager};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Remote suggestions endpoint (`GET /api/suggestions`).
#[async_trait]
pub trait SuggestionClient: Send + Sync {
    async fn fetch(&self, query: &SuggestionQuery) -> Result<SuggestionsResponse>;
}

/// Supplies a credential to attach to outgoing suggestion requests.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credential(&self) -> Option<String>;
}

#[async_trait]
impl CredentialSource for SessionTokenManager {
    async fn credential(&self) -> Option<String> {
        self.get_session_token().await.map(SessionToken::into_string)
    }
}

/// One candidate as rendered in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionItem {
    /// String as returned by the service.
    pub raw: String,
    /// Markup-free text; this is what the results page searches for.
    pub text: String,
    /// Title-cased `text` for display.
    pub display: String,
    /// Results-page URL for `text`.
    pub target: String,
}

impl SuggestionItem {
    pub fn from_raw(raw: &str) -> Self {
        let text = sanitize_text(raw);
        Self {
            raw: raw.to_string(),
            display: to_title_case(&text),
            target: results_url(&text),
            text,
        }
    }
}

#[derive(Clone)]
pub struct SuggestionFetcher {
    client: Arc<dyn SuggestionClient>,
    site_name: String,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl SuggestionFetcher {
    pub fn new(client: Arc<dyn SuggestionClient>, host: &str) -> Self {
        Self {
            client,
            site_name: site_name_from_host(host),
            credentials: None,
        }
    }

    /// Attach the credential from `source` to every request.
    pub fn with_credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    /// Candidates for `query`, in service order. Blank queries return nothing
    /// without a request; failures are logged and yield an empty list.
    pub async fn fetch_suggestions(
        &self,
        query: &str,
        config: &SearchConfiguration,
    ) -> Vec<SuggestionItem> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut request = SuggestionQuery::new(query, &self.site_name, config);
        if let Some(source) = &self.credentials {
            request.session_token = source.credential().await;
        }

        match self.client.fetch(&request).await {
            Ok(response) => response
                .suggestions
                .iter()
                .map(|raw| SuggestionItem::from_raw(raw))
                .collect(),
            Err(err) => {
                log::error!("Failed to fetch suggestions: {err}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SuggestError;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<SuggestionQuery>>,
        reply: Option<Vec<&'static str>>,
    }

    #[async_trait]
    impl SuggestionClient for RecordingClient {
        async fn fetch(&self, query: &SuggestionQuery) -> Result<SuggestionsResponse> {
            self.requests.lock().unwrap().push(query.clone());
            match &self.reply {
                Some(list) => Ok(SuggestionsResponse {
                    suggestions: list.iter().map(|s| s.to_string()).collect(),
                }),
                None => Err(SuggestError::HttpStatus(502)),
            }
        }
    }

    struct StaticCredential(&'static str);

    #[async_trait]
    impl CredentialSource for StaticCredential {
        async fn credential(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn config() -> SearchConfiguration {
        SearchConfiguration {
            selected_collections: vec!["blog".to_string()],
            selected_fields: vec!["title".to_string()],
            ..SearchConfiguration::default()
        }
    }

    #[tokio::test]
    async fn blank_query_makes_no_request() {
        let client = Arc::new(RecordingClient {
            reply: Some(vec!["x"]),
            ..RecordingClient::default()
        });
        let fetcher = SuggestionFetcher::new(client.clone(), "www.acme.com");

        assert!(fetcher.fetch_suggestions("", &config()).await.is_empty());
        assert!(fetcher.fetch_suggestions(" \t\n", &config()).await.is_empty());
        assert!(client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn builds_items_in_response_order() {
        let client = Arc::new(RecordingClient {
            reply: Some(vec!["<em>red</em> shoes", "BLUE hat", "salt &amp; pepper"]),
            ..RecordingClient::default()
        });
        let fetcher = SuggestionFetcher::new(client.clone(), "www.acme.com");

        let items = fetcher.fetch_suggestions("  re ", &config()).await;
        let displays: Vec<_> = items.iter().map(|i| i.display.as_str()).collect();
        assert_eq!(displays, vec!["Red Shoes", "Blue Hat", "Salt & Pepper"]);
        assert_eq!(items[1].text, "BLUE hat");
        assert_eq!(items[1].target, "/search-app-results?q=BLUE%20hat");
        assert_eq!(items[2].target, "/search-app-results?q=salt%20%26%20pepper");

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "re");
        assert_eq!(requests[0].site_name, "acme");
        assert_eq!(requests[0].collections, vec!["blog".to_string()]);
        assert_eq!(requests[0].search_fields, vec!["title".to_string()]);
        assert_eq!(requests[0].session_token, None);
    }

    #[tokio::test]
    async fn failure_maps_to_empty() {
        let client = Arc::new(RecordingClient::default());
        let fetcher = SuggestionFetcher::new(client.clone(), "acme.com");
        assert!(fetcher.fetch_suggestions("red", &config()).await.is_empty());
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn attaches_credential_when_configured() {
        let client = Arc::new(RecordingClient {
            reply: Some(vec![]),
            ..RecordingClient::default()
        });
        let fetcher = SuggestionFetcher::new(client.clone(), "acme.com")
            .with_credentials(Arc::new(StaticCredential("tok")));

        fetcher.fetch_suggestions("red", &config()).await;
        assert_eq!(
            client.requests.lock().unwrap()[0].session_token.as_deref(),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn session_manager_serves_as_credential_source() {
        use assist_session::test_support::encode_test_token;
        use assist_session::{unix_now, MemoryStore, TokenClient};
        use assist_protocol::{VisitorTokenRequest, VisitorTokenResponse, SESSION_TOKEN_KEY};

        struct NoNetwork;

        #[async_trait]
        impl TokenClient for NoNetwork {
            async fn request_token(
                &self,
                _request: &VisitorTokenRequest,
            ) -> assist_session::Result<VisitorTokenResponse> {
                Err(assist_session::SessionError::Other("offline".to_string()))
            }
        }

        let stored = encode_test_token(&serde_json::json!({"exp": unix_now() + 600}));
        let store = Arc::new(MemoryStore::with_entries([(SESSION_TOKEN_KEY, stored.clone())]));
        let manager = SessionTokenManager::new(store, Arc::new(NoNetwork), "acme.com", "ua");

        assert_eq!(manager.credential().await, Some(stored));
    }
}
