use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result};

const REDACTED: [&str; 3] = ["authorization", "cookie", "x-api-key"];

/// Ordered header list with case-insensitive names.
///
/// Inserting a name that is already present (in any case) replaces the old
/// entry in place; the newer spelling of the name is kept.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Content-Type` and `Accept` set to `application/json`.
    pub(crate) fn json_defaults() -> Self {
        Self::new()
            .with("Content-Type", "application/json")
            .with("Accept", "application/json")
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .0
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Overlays `other` on top of `self`; `other` wins on collisions.
    pub fn merge(mut self, other: &Headers) -> Self {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
        self
    }

    pub(crate) fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.0.len());
        for (name, value) in &self.0 {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(name.clone()))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, value)| {
                let shown = if REDACTED.iter().any(|r| name.eq_ignore_ascii_case(r)) {
                    "<redacted>"
                } else {
                    value.as_str()
                };
                (name, shown)
            }))
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(values: [(K, V); N]) -> Self {
        values.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Headers;

    #[test]
    fn insert_replaces_case_insensitively() {
        let headers = Headers::json_defaults().with("content-type", "text/plain");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["content-type", "Accept"]);
    }

    #[test]
    fn merge_prefers_right_hand_side() {
        let base = Headers::from([("Authorization", "Bearer a"), ("X-Api-Version", "v1")]);
        let call = Headers::from([("authorization", "Bearer b"), ("X-Request-Id", "r")]);
        let merged = base.merge(&call);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("AUTHORIZATION"), Some("Bearer b"));
        assert_eq!(merged.get("x-api-version"), Some("v1"));
    }

    #[test]
    fn debug_redacts_credentials() {
        let headers = Headers::from([("Authorization", "Bearer secret"), ("X-Trace", "t1")]);
        let debug = format!("{headers:?}");
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("t1"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let headers = Headers::from([("bad header", "x")]);
        assert!(headers.to_header_map().is_err());
    }
}
