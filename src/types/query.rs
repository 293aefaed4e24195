//! Search query validation.
//!
//! Raw query-string values arrive as [`RawSearchParams`] and are turned into
//! a [`SearchQuery`] exactly once, at the boundary. A `SearchQuery` can only
//! be obtained through [`SearchQuery::validate`] (or [`SearchQuery::new`],
//! which applies the same rules), so anything downstream can rely on its
//! invariants.

use crate::error::ValidationError;

/// Query text used when the caller sends none.
pub const DEFAULT_QUERY: &str = "nature";

/// Page used when the caller sends none.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller sends none.
pub const DEFAULT_PER_PAGE: u32 = 8;

/// Maximum query length, in characters.
pub const MAX_QUERY_CHARS: usize = 100;

/// A single raw query-string parameter.
///
/// `Many` captures a key that was repeated (`?query=a&query=b`), which is
/// not a usable string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawParam {
    #[default]
    Missing,
    One(String),
    Many(Vec<String>),
}

impl RawParam {
    fn push(&mut self, value: String) {
        *self = match std::mem::take(self) {
            RawParam::Missing => RawParam::One(value),
            RawParam::One(first) => RawParam::Many(vec![first, value]),
            RawParam::Many(mut values) => {
                values.push(value);
                RawParam::Many(values)
            }
        };
    }
}

impl From<&str> for RawParam {
    fn from(value: &str) -> Self {
        RawParam::One(value.to_string())
    }
}

impl From<Option<&str>> for RawParam {
    fn from(value: Option<&str>) -> Self {
        value.map_or(RawParam::Missing, RawParam::from)
    }
}

/// Unvalidated search parameters, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSearchParams {
    pub query: RawParam,
    pub page: RawParam,
    pub per_page: RawParam,
}

impl RawSearchParams {
    pub fn new(
        query: impl Into<RawParam>,
        page: impl Into<RawParam>,
        per_page: impl Into<RawParam>,
    ) -> Self {
        Self {
            query: query.into(),
            page: page.into(),
            per_page: per_page.into(),
        }
    }

    /// Collect parameters from decoded query-string pairs. Unknown keys are
    /// ignored; repeated keys become [`RawParam::Many`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "page" => &mut params.page,
                "per_page" => &mut params.per_page,
                _ => continue,
            };
            slot.push(value.into());
        }
        params
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    text: String,
    page: u32,
    per_page: u32,
}

impl SearchQuery {
    /// Build a query from already-typed values, enforcing the same
    /// invariants as [`SearchQuery::validate`].
    pub fn new(text: impl Into<String>, page: u32, per_page: u32) -> Result<Self, ValidationError> {
        let text = text.into();
        check_text(&text)?;
        if page < 1 || per_page < 1 {
            return Err(ValidationError::InvalidPagination);
        }
        Ok(Self {
            text,
            page,
            per_page,
        })
    }

    /// Validate and normalize raw parameters.
    ///
    /// There is no upper bound on `page`/`per_page`; the provider applies
    /// its own limits.
    pub fn validate(raw: &RawSearchParams) -> Result<Self, ValidationError> {
        let text = match &raw.query {
            RawParam::Missing => DEFAULT_QUERY.to_string(),
            RawParam::One(text) => text.clone(),
            RawParam::Many(_) => return Err(ValidationError::InvalidQuery),
        };
        check_text(&text)?;

        let page = parse_positive(&raw.page, DEFAULT_PAGE)?;
        let per_page = parse_positive(&raw.per_page, DEFAULT_PER_PAGE)?;

        Ok(Self {
            text,
            page,
            per_page,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

fn check_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() || text.chars().count() > MAX_QUERY_CHARS {
        return Err(ValidationError::InvalidQuery);
    }
    Ok(())
}

fn parse_positive(raw: &RawParam, default: u32) -> Result<u32, ValidationError> {
    let value = match raw {
        RawParam::Missing => return Ok(default),
        RawParam::One(value) => value,
        RawParam::Many(_) => return Err(ValidationError::InvalidPagination),
    };
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidationError::InvalidPagination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_everything_missing() {
        let query = SearchQuery::validate(&RawSearchParams::default()).unwrap();
        assert_eq!(query.text(), "nature");
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 8);
    }

    #[test]
    fn accepts_explicit_values() {
        let raw = RawSearchParams::new("cats", "2", "5");
        let query = SearchQuery::validate(&raw).unwrap();
        assert_eq!(query, SearchQuery::new("cats", 2, 5).unwrap());
    }

    #[test]
    fn accepts_boundary_lengths() {
        for len in [1, 50, MAX_QUERY_CHARS] {
            let text = "a".repeat(len);
            let raw = RawSearchParams::new(text.as_str(), RawParam::Missing, RawParam::Missing);
            let query = SearchQuery::validate(&raw).unwrap();
            assert_eq!(query.text(), text);
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(MAX_QUERY_CHARS);
        let raw = RawSearchParams::new(text.as_str(), RawParam::Missing, RawParam::Missing);
        assert!(SearchQuery::validate(&raw).is_ok());
    }

    #[test]
    fn rejects_long_query() {
        let text = "a".repeat(MAX_QUERY_CHARS + 1);
        let raw = RawSearchParams::new(text.as_str(), RawParam::Missing, RawParam::Missing);
        assert_eq!(
            SearchQuery::validate(&raw),
            Err(ValidationError::InvalidQuery)
        );
    }

    #[test]
    fn rejects_empty_query() {
        let raw = RawSearchParams::new("", RawParam::Missing, RawParam::Missing);
        assert_eq!(
            SearchQuery::validate(&raw),
            Err(ValidationError::InvalidQuery)
        );
    }

    #[test]
    fn rejects_repeated_query_key() {
        let raw = RawSearchParams::from_pairs([("query", "a"), ("query", "b")]);
        assert_eq!(
            SearchQuery::validate(&raw),
            Err(ValidationError::InvalidQuery)
        );
    }

    #[test]
    fn query_is_checked_before_pagination() {
        let long = "a".repeat(MAX_QUERY_CHARS + 1);
        let raw = RawSearchParams::new(long.as_str(), "0", "x");
        assert_eq!(
            SearchQuery::validate(&raw),
            Err(ValidationError::InvalidQuery)
        );
    }

    #[test]
    fn rejects_bad_pagination() {
        // Whole-string parsing: a numeric prefix ("5abc", "1.5") is not
        // accepted as its leading integer.
        for (page, per_page) in [
            ("0", "8"),
            ("5abc", "8"),
            ("1", "8px"),
            ("1", "0"),
            ("abc", "8"),
            ("1", "eight"),
            ("-3", "8"),
            ("", "8"),
            ("1.5", "8"),
            ("99999999999", "8"),
        ] {
            let raw = RawSearchParams::new("cats", page, per_page);
            assert_eq!(
                SearchQuery::validate(&raw),
                Err(ValidationError::InvalidPagination),
                "page={page:?} per_page={per_page:?}"
            );
        }
    }

    #[test]
    fn rejects_repeated_page_key() {
        let raw = RawSearchParams::from_pairs([("page", "1"), ("page", "2")]);
        assert_eq!(
            SearchQuery::validate(&raw),
            Err(ValidationError::InvalidPagination)
        );
    }

    #[test]
    fn trims_whitespace_around_numbers() {
        let raw = RawSearchParams::new("cats", " 3 ", "10");
        let query = SearchQuery::validate(&raw).unwrap();
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn no_upper_bound_on_pagination() {
        let raw = RawSearchParams::new("cats", "100000", "5000");
        let query = SearchQuery::validate(&raw).unwrap();
        assert_eq!(query.page(), 100_000);
        assert_eq!(query.per_page(), 5_000);
    }

    #[test]
    fn from_pairs_ignores_unknown_keys() {
        let raw = RawSearchParams::from_pairs([
            ("query", "dogs"),
            ("orientation", "portrait"),
            ("per_page", "3"),
        ]);
        assert_eq!(raw.query, RawParam::One("dogs".into()));
        assert_eq!(raw.page, RawParam::Missing);
        assert_eq!(raw.per_page, RawParam::One("3".into()));
    }

    #[test]
    fn new_enforces_invariants() {
        assert_eq!(
            SearchQuery::new("", 1, 1),
            Err(ValidationError::InvalidQuery)
        );
        assert_eq!(
            SearchQuery::new("cats", 0, 1),
            Err(ValidationError::InvalidPagination)
        );
    }
}
