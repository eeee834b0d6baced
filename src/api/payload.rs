use serde_json::Value;

/// Wrap a JSON request body the way the portal's web front-end does: the
/// whole document percent-encoded into a single `requestPara` form field.
/// Non-ASCII text stays literal in the JSON and is encoded as UTF-8 bytes.
pub fn encode_request_para(body: &Value) -> String {
    let json = body.to_string();
    format!("requestPara={}", urlencoding::encode(&json))
}
