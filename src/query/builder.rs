//! Builds query strings from structured search-form fields.

use crate::query::compiler::KEY_VALUE_SEPARATOR;
use crate::query::dates::FILTER_DATE_FORMAT;
use crate::query::error::{SearchError, SearchResult};
use crate::query::types::{DateFieldSelector, OrderSpec, QueryParameterKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which folder the search runs over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Inbox,
    Shared,
    All,
}

impl SearchScope {
    pub fn token(&self) -> &'static str {
        match self {
            SearchScope::Inbox => "inbox",
            SearchScope::Shared => "shared",
            SearchScope::All => "all",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for SearchScope {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbox" => Ok(SearchScope::Inbox),
            "shared" => Ok(SearchScope::Shared),
            "all" => Ok(SearchScope::All),
            other => Err(SearchError::invalid_param(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DateBounds {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateBounds {
    fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// Query string builder.
///
/// Only one date filter ends up in the query: a creation-date range wins over a
/// last-modified range when both are set.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    scope: SearchScope,
    creators: Vec<String>,
    with: Vec<String>,
    created: DateBounds,
    last_modified: DateBounds,
    order_by: Vec<OrderSpec>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Add creators; the field may hold several names separated by spaces or commas.
    pub fn creators(mut self, field: &str) -> Self {
        self.creators.extend(split_field(field));
        self
    }

    pub fn with_participants(mut self, field: &str) -> Self {
        self.with.extend(split_field(field));
        self
    }

    pub fn created_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.created = DateBounds { from, to };
        self
    }

    pub fn last_modified_between(
        mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.last_modified = DateBounds { from, to };
        self
    }

    pub fn order_by(mut self, spec: OrderSpec) -> Self {
        if !self.order_by.contains(&spec) {
            self.order_by.push(spec);
        }
        self
    }

    /// Produce the query string. Fails if a participant value cannot be
    /// expressed as a single query token.
    pub fn build(&self) -> SearchResult<String> {
        let mut tokens = vec![token(QueryParameterKind::In, self.scope.token())];

        for (kind, values) in
            [(QueryParameterKind::Creator, &self.creators), (QueryParameterKind::With, &self.with)]
        {
            for value in values {
                if value.contains(KEY_VALUE_SEPARATOR) {
                    return Err(SearchError::invalid_param(value));
                }
                tokens.push(token(kind, value));
            }
        }

        let dated = if self.created.is_set() {
            Some((DateFieldSelector::CreateDate, self.created))
        } else if self.last_modified.is_set() {
            Some((DateFieldSelector::LastModDate, self.last_modified))
        } else {
            None
        };
        if let Some((field, bounds)) = dated {
            tokens.push(token(QueryParameterKind::UseDate, field.token()));
            if let Some(from) = bounds.from {
                tokens.push(token(QueryParameterKind::From, &format_date(from)));
            }
            if let Some(to) = bounds.to {
                tokens.push(token(QueryParameterKind::To, &format_date(to)));
            }
        }

        for spec in &self.order_by {
            tokens.push(token(QueryParameterKind::OrderBy, spec.token()));
        }

        Ok(tokens.join(" "))
    }
}

fn token(kind: QueryParameterKind, value: &str) -> String {
    format!("{}{}{}", kind.token(), KEY_VALUE_SEPARATOR, value)
}

fn format_date(date: NaiveDate) -> String {
    date.format(FILTER_DATE_FORMAT).to_string()
}

fn split_field(field: &str) -> impl Iterator<Item = String> + '_ {
    field.split(|c: char| c == ',' || c.is_whitespace()).filter(|v| !v.is_empty()).map(String::from)
}
