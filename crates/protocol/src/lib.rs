use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod url;

pub use config::{ConfigAttributes, DisplayMode, SearchConfiguration};
pub use url::{encode_uri_component, results_url, site_name_from_host, SuggestionQuery};

/// Path of the results page the widget redirects to.
pub const RESULTS_PATH: &str = "/search-app-results";
pub const TOKEN_ENDPOINT_PATH: &str = "/api/visitor-token";
pub const SUGGESTIONS_ENDPOINT_PATH: &str = "/api/suggestions";

/// Persistent storage key holding the visitor identifier.
pub const VISITOR_ID_KEY: &str = "visitorId";
/// Persistent storage key holding the session token.
pub const SESSION_TOKEN_KEY: &str = "visitorSessionToken";

/// Body of `POST /api/visitor-token`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitorTokenRequest {
    pub visitor_id: String,
    pub user_agent: String,
    pub site_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct VisitorTokenResponse {
    pub token: String,
}

/// Body of a successful `GET /api/suggestions`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Decoded middle segment of a session token.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
}

/// JSON Schemas for every wire type, keyed by type name.
pub fn wire_schemas() -> serde_json::Value {
    serde_json::json!({
        "VisitorTokenRequest": schemars::schema_for!(VisitorTokenRequest),
        "VisitorTokenResponse": schemars::schema_for!(VisitorTokenResponse),
        "SuggestionsResponse": schemars::schema_for!(SuggestionsResponse),
        "TokenClaims": schemars::schema_for!(TokenClaims),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_request_uses_camel_case_keys() {
        let req = VisitorTokenRequest {
            visitor_id: "v-1".to_string(),
            user_agent: "ua".to_string(),
            site_name: "acme".to_string(),
        };
        let raw = serde_json::to_value(&req).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"visitorId": "v-1", "userAgent": "ua", "siteName": "acme"})
        );
    }

    #[test]
    fn suggestions_response_tolerates_missing_field() {
        let parsed: SuggestionsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.suggestions.is_empty());
    }

    #[test]
    fn schemas_cover_all_wire_types() {
        let schemas = wire_schemas();
        for name in [
            "VisitorTokenRequest",
            "VisitorTokenResponse",
            "SuggestionsResponse",
            "TokenClaims",
        ] {
            assert!(schemas.get(name).is_some(), "missing schema for {name}");
        }
    }
}
