/// Scalar value appended to a request's query string.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Skipped when the query string is built.
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// String form used in the query string, `None` for [`ParamValue::Null`].
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Text(value) => Some(value.clone()),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use crate::ParamValue;

    #[test]
    fn query_values_are_stringified() {
        assert_eq!(ParamValue::from(123).to_query_value().as_deref(), Some("123"));
        assert_eq!(ParamValue::from(true).to_query_value().as_deref(), Some("true"));
        assert_eq!(ParamValue::from(4.5).to_query_value().as_deref(), Some("4.5"));
        assert_eq!(ParamValue::text("kit").to_query_value().as_deref(), Some("kit"));
    }

    #[test]
    fn null_and_none_are_skipped() {
        assert_eq!(ParamValue::null().to_query_value(), None);
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some("x")), ParamValue::text("x"));
    }
}
