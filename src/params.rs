use crate::ParamValue;

/// Ordered query parameters appended to a request URL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(String, ParamValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Repeated keys are kept in order.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.push((key.into(), value.into()));
    }

    /// Builder form of [`QueryParams::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs that end up in the query string; null values are dropped.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.0
            .iter()
            .filter_map(|(key, value)| Some((key.as_str(), value.to_query_value()?)))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(values: [(K, V); N]) -> Self {
        values.into_iter().collect()
    }
}

impl From<Vec<(String, ParamValue)>> for QueryParams {
    fn from(values: Vec<(String, ParamValue)>) -> Self {
        Self(values)
    }
}
