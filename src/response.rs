use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

/// Response metadata plus parsed data, returned by the `*_raw` operations.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    /// Final URL after redirects.
    pub url: String,
    #[serde(serialize_with = "serialize_headers")]
    pub headers: HeaderMap,
    pub data: Value,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn serialize_headers<S: serde::Serializer>(
    headers: &HeaderMap,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
    )
}

/// Parses a response body: empty is `null`, JSON is parsed, anything else is
/// kept as a string.
pub(crate) fn parse_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
