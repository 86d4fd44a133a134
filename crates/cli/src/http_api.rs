use anyhow::{Context as AnyhowContext, Result};
use assist_protocol::{
    SuggestionQuery, SuggestionsResponse, VisitorTokenRequest, VisitorTokenResponse,
    TOKEN_ENDPOINT_PATH,
};
use assist_session::{SessionError, TokenClient};
use assist_suggest::{SuggestError, SuggestionClient};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Both remote endpoints of the search service, relative to `base`.
#[derive(Clone)]
pub(crate) struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    pub(crate) fn new(base: &str, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

fn check_status(status: StatusCode) -> Option<u16> {
    (!status.is_success()).then(|| status.as_u16())
}

#[async_trait]
impl TokenClient for HttpApi {
    async fn request_token(
        &self,
        request: &VisitorTokenRequest,
    ) -> assist_session::Result<VisitorTokenResponse> {
        let url = self.url(TOKEN_ENDPOINT_PATH);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| SessionError::Transport(format!("POST {url}: {err}")))?;
        if let Some(code) = check_status(response.status()) {
            return Err(SessionError::HttpStatus(code));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| SessionError::Transport(format!("POST {url}: {err}")))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SuggestionClient for HttpApi {
    async fn fetch(&self, query: &SuggestionQuery) -> assist_suggest::Result<SuggestionsResponse> {
        let url = self.url(&query.to_path());
        let mut request = self.client.get(&url);
        if let Some(token) = &query.session_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| SuggestError::Transport(format!("GET {url}: {err}")))?;
        if let Some(code) = check_status(response.status()) {
            return Err(SuggestError::HttpStatus(code));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| SuggestError::Transport(format!("GET {url}: {err}")))?;
        Ok(serde_json::from_slice(&body)?)
    }
}
