use url::Url;

use crate::{Error, QueryParams, Result};

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_owned(),
        source,
    })
}

/// Parses `url` and appends non-null `params` after any existing query.
pub(crate) fn build_url(url: &str, params: &QueryParams) -> Result<Url> {
    let mut parsed = parse(url)?;
    let pairs: Vec<_> = params.query_pairs().collect();
    if !pairs.is_empty() {
        parsed.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(parsed)
}

/// Base URL of a bound client, with exactly one trailing slash removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BaseUrl {
    normalized: String,
    parsed: Url,
}

impl BaseUrl {
    pub fn parse(base: &str) -> Result<Self> {
        let normalized = base.strip_suffix('/').unwrap_or(base).to_owned();
        let parsed = parse(&normalized)?;
        // Joined paths are appended textually, so they would land in these.
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(Error::InvalidBaseUrl(base.to_owned()));
        }
        Ok(Self { normalized, parsed })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Resolves a call path against the base.
    ///
    /// Absolute URLs pass through untouched. Anything else is joined to the
    /// base with a single `/`, dot segments are resolved, and the result must
    /// stay under the base's origin and path.
    pub fn join(&self, path: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(path) {
            if absolute.has_host() {
                return Ok(absolute.into());
            }
        }

        let relative = path.strip_prefix('/').unwrap_or(path);
        let resolved = parse(&format!("{}/{relative}", self.normalized))?;

        if !self.contains(&resolved) {
            return Err(Error::PathTraversal {
                base: self.normalized.clone(),
                path: path.to_owned(),
            });
        }
        Ok(resolved.into())
    }

    fn contains(&self, candidate: &Url) -> bool {
        if candidate.origin() != self.parsed.origin() {
            return false;
        }
        let prefix = self.parsed.path().trim_end_matches('/');
        let path = candidate.path();
        prefix.is_empty()
            || path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::{build_url, BaseUrl};
    use crate::{Error, ParamValue, QueryParams};

    #[test]
    fn params_are_appended_after_existing_query() {
        let params = QueryParams::new().with("page", 1);
        let url = build_url("https://api.example.com/users?sort=name", &params).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users?sort=name&page=1");
    }

    #[test]
    fn null_params_are_skipped() {
        let params = QueryParams::new()
            .with("page", 1)
            .with("filter", ParamValue::Null)
            .with("search", None::<String>)
            .with("active", true);
        let url = build_url("https://api.example.com/users", &params).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users?page=1&active=true");
    }

    #[test]
    fn all_null_params_leave_url_untouched() {
        let params = QueryParams::new().with("filter", ParamValue::Null);
        let url = build_url("https://api.example.com/users", &params).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users");
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = build_url("/users", &QueryParams::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn join_ignores_trailing_and_leading_slashes() {
        for base in ["https://api.example.com", "https://api.example.com/"] {
            let base = BaseUrl::parse(base).unwrap();
            assert_eq!(base.join("/users").unwrap(), "https://api.example.com/users");
            assert_eq!(base.join("users").unwrap(), "https://api.example.com/users");
        }
    }

    #[test]
    fn join_keeps_base_path() {
        let base = BaseUrl::parse("https://api.example.com/v1/").unwrap();
        assert_eq!(base.as_str(), "https://api.example.com/v1");
        assert_eq!(
            base.join("/users/1?x=y").unwrap(),
            "https://api.example.com/v1/users/1?x=y"
        );
    }

    #[test]
    fn join_passes_absolute_urls_through() {
        let base = BaseUrl::parse("https://api.example.com").unwrap();
        assert_eq!(
            base.join("https://other.example.com/a").unwrap(),
            "https://other.example.com/a"
        );
    }

    #[test]
    fn join_rejects_traversal_out_of_base_path() {
        let base = BaseUrl::parse("https://api.example.com/v1").unwrap();
        let err = base.join("/../../admin").unwrap_err();
        assert!(matches!(err, Error::PathTraversal { .. }));
        assert!(base.join("/users/../items").is_ok());
    }

    #[test]
    fn base_with_query_or_fragment_is_rejected() {
        for base in ["https://a.com/v1?k=1", "https://a.com/v1?", "https://a.com/v1#top"] {
            let err = BaseUrl::parse(base).unwrap_err();
            assert!(matches!(err, Error::InvalidBaseUrl(_)), "{base}");
        }
    }

    #[test]
    fn join_rejects_sibling_prefix() {
        let base = BaseUrl::parse("https://api.example.com/v1").unwrap();
        assert!(base.join("/../v10/users").is_err());
    }
}
