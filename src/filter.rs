//! Filter expressions for the content API's `_where` query grammar.
//!
//! The API reads nested objects out of bracketed query keys, e.g.
//! `_where[_or][0][name_contains]=Jazz`. A [`Filter`] is compiled into the
//! flat list of such `(key, value)` pairs by [`Filter::to_query_pairs`] and
//! url-encoded by [`Filter::to_query_string`]; neither step touches the
//! network.

use thiserror::Error;

/// Root key the content API reads filters from.
pub const WHERE_KEY: &str = "_where";

/// Fields matched by the free-text event search.
pub const SEARCH_FIELDS: [&str; 4] = ["name", "performers", "description", "venue"];

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("failed to encode filter: {0}")]
    Encode(String),
    /// An `And`/`Or` group without members has no query representation.
    #[error("empty filter group at {0}")]
    EmptyGroup(String),
}

/// Comparison applied by a single filter condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Case-insensitive substring match.
    Contains,
    NotContains,
    /// Case-sensitive substring match.
    ContainsCaseSensitive,
}

impl Operator {
    fn suffix(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Contains => "contains",
            Operator::NotContains => "ncontains",
            Operator::ContainsCaseSensitive => "containss",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

/// Boolean combination of field conditions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Condition(Condition),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn condition(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Self {
        Filter::Condition(Condition {
            field: field.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::condition(field, Operator::Eq, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::condition(field, Operator::Contains, value)
    }

    /// Matches records where any of `fields` contains `term`.
    pub fn search<I, S>(term: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Or(
            fields
                .into_iter()
                .map(|field| Filter::contains(field, term))
                .collect(),
        )
    }

    /// The free-text event search over [`SEARCH_FIELDS`].
    pub fn event_search(term: &str) -> Self {
        Self::search(term, SEARCH_FIELDS)
    }

    /// Flattens the expression into bracketed `_where` query pairs.
    ///
    /// An empty `And`/`Or` anywhere in the tree is rejected: it would emit no
    /// pairs and the API would read the query as unfiltered.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, FilterError> {
        let mut pairs = Vec::new();
        self.write_pairs(WHERE_KEY, &mut pairs)?;
        Ok(pairs)
    }

    /// Url-encodes [`Filter::to_query_pairs`] into a query string.
    pub fn to_query_string(&self) -> Result<String, FilterError> {
        encode_pairs(&self.to_query_pairs()?)
    }

    fn write_pairs(
        &self,
        prefix: &str,
        pairs: &mut Vec<(String, String)>,
    ) -> Result<(), FilterError> {
        let (filters, group) = match self {
            Filter::Condition(condition) => {
                pairs.push((
                    format!(
                        "{prefix}[{}_{}]",
                        condition.field,
                        condition.operator.suffix()
                    ),
                    condition.value.clone(),
                ));
                return Ok(());
            }
            Filter::And(filters) => (filters, ""),
            Filter::Or(filters) => (filters, "[_or]"),
        };

        if filters.is_empty() {
            return Err(FilterError::EmptyGroup(format!("{prefix}{group}")));
        }
        for (index, filter) in filters.iter().enumerate() {
            filter.write_pairs(&format!("{prefix}{group}[{index}]"), pairs)?;
        }
        Ok(())
    }
}

/// Url-encodes query pairs the same way browsers encode form data.
pub fn encode_pairs(pairs: &[(String, String)]) -> Result<String, FilterError> {
    serde_html_form::to_string(pairs).map_err(|err| FilterError::Encode(err.to_string()))
}
