use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Builds a `header.<claims>.signature` token around `claims`.
pub fn encode_test_token(claims: &serde_json::Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
}
