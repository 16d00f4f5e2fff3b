//! Search query compiler.
//!
//! Turns a free-text query such as `in:inbox with:bob orderby:creatorasc` into a
//! [`ParsedQuery`]: a map from parameter kind to the ordered, de-duplicated set of
//! values given for it. Every value in the map has been validated; the first
//! invalid token fails the whole parse.

use crate::query::dates::{EvalZone, format_filter_date, parse_filter_date};
use crate::query::error::{SearchError, SearchResult};
use crate::query::types::{DateFieldSelector, OrderSpec, QueryParameterKind};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Separator between a key and its value inside a token
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Validated query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedQuery {
    params: BTreeMap<QueryParameterKind, IndexSet<String>>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of distinct keys present
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn contains(&self, kind: QueryParameterKind) -> bool {
        self.params.contains_key(&kind)
    }

    /// Values for `kind` in first-seen order
    pub fn values(&self, kind: QueryParameterKind) -> impl Iterator<Item = &str> {
        self.params.get(&kind).into_iter().flatten().map(String::as_str)
    }

    pub fn first(&self, kind: QueryParameterKind) -> Option<&str> {
        self.values(kind).next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryParameterKind, &IndexSet<String>)> {
        self.params.iter().map(|(kind, values)| (*kind, values))
    }

    /// Requested orderings in the order they appeared in the query
    pub fn order_specs(&self) -> impl Iterator<Item = OrderSpec> + '_ {
        self.values(QueryParameterKind::OrderBy).filter_map(OrderSpec::from_token)
    }

    fn insert(&mut self, kind: QueryParameterKind, value: String) {
        self.params.entry(kind).or_default().insert(value);
    }
}

/// Compiles query strings, interpreting dates in a fixed evaluation zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryCompiler {
    zone: EvalZone,
}

impl QueryCompiler {
    pub fn new(zone: EvalZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> EvalZone {
        self.zone
    }

    /// Parse a query string. Blank input yields an empty query.
    pub fn parse(&self, query: &str) -> SearchResult<ParsedQuery> {
        let query = query.trim_ascii();
        let mut parsed = ParsedQuery::default();
        if query.is_empty() {
            trace!("Empty search query");
            return Ok(parsed);
        }

        let mut token_count = 0usize;
        for token in query.split_ascii_whitespace() {
            let (kind, raw_value) = split_token(token)?;
            let value = self.validate(&parsed, kind, raw_value)?;
            parsed.insert(kind, value);
            token_count += 1;
        }

        debug!(
            tokens = token_count,
            keys = parsed.len(),
            zone = %self.zone,
            "Compiled search query"
        );
        Ok(parsed)
    }

    /// Render a parsed query back into canonical query syntax, with date bounds
    /// in `yyyyMMdd` form. Parsing the result yields an equal [`ParsedQuery`].
    pub fn render(&self, parsed: &ParsedQuery) -> String {
        let mut tokens = Vec::new();
        for (kind, values) in parsed.iter() {
            for value in values {
                let wire_value = if kind.is_date_bound() {
                    value
                        .parse::<i64>()
                        .ok()
                        .and_then(|millis| format_filter_date(millis, self.zone))
                        .unwrap_or_else(|| value.clone())
                } else {
                    value.clone()
                };
                tokens.push(format!("{}{}{}", kind.token(), KEY_VALUE_SEPARATOR, wire_value));
            }
        }
        tokens.join(" ")
    }

    /// Kind-specific validation. Returns the value to store, which for date
    /// bounds is the epoch-millisecond string.
    fn validate(
        &self,
        parsed: &ParsedQuery,
        kind: QueryParameterKind,
        value: &str,
    ) -> SearchResult<String> {
        match kind {
            QueryParameterKind::OrderBy => match OrderSpec::from_token(value) {
                Some(_) => Ok(value.to_string()),
                None => Err(SearchError::invalid_order_by(value)),
            },
            QueryParameterKind::UseDate => {
                let field = DateFieldSelector::from_token(value)
                    .ok_or_else(|| SearchError::invalid_use_date(value))?;
                // Only one date field may scope the from/to bounds
                match parsed.first(QueryParameterKind::UseDate) {
                    Some(existing) if existing != field.token() => {
                        Err(SearchError::conflicting_use_date(value))
                    },
                    _ => Ok(value.to_string()),
                }
            },
            QueryParameterKind::From | QueryParameterKind::To => {
                parse_filter_date(value, self.zone)
                    .map(|millis| millis.to_string())
                    .ok_or_else(|| SearchError::invalid_date(value))
            },
            QueryParameterKind::In
            | QueryParameterKind::With
            | QueryParameterKind::Creator
            | QueryParameterKind::Id
            | QueryParameterKind::Tag => Ok(value.to_string()),
        }
    }
}

/// Parse a query with dates evaluated in UTC.
pub fn parse_query(query: &str) -> SearchResult<ParsedQuery> {
    QueryCompiler::default().parse(query)
}

/// Split `key:value`; exactly one separator, both sides non-empty, known key.
fn split_token(token: &str) -> SearchResult<(QueryParameterKind, &str)> {
    let mut parts = token.split(KEY_VALUE_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.is_empty() && !value.is_empty() => {
            QueryParameterKind::from_token(key)
                .map(|kind| (kind, value))
                .ok_or_else(|| SearchError::invalid_param(token))
        },
        _ => Err(SearchError::invalid_param(token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2023_UTC: i64 = 1_672_531_200_000;

    fn values(parsed: &ParsedQuery, kind: QueryParameterKind) -> Vec<&str> {
        parsed.values(kind).collect()
    }

    #[test]
    fn test_blank_queries_are_empty() {
        assert!(parse_query("").unwrap().is_empty());
        assert!(parse_query("   ").unwrap().is_empty());
        assert!(parse_query("\t\n ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_basic_query() {
        let parsed = parse_query("  in:inbox   with:bob creator:alice@example.com ").unwrap();
        assert_eq!(values(&parsed, QueryParameterKind::In), vec!["inbox"]);
        assert_eq!(values(&parsed, QueryParameterKind::With), vec!["bob"]);
        assert_eq!(values(&parsed, QueryParameterKind::Creator), vec!["alice@example.com"]);
        assert!(!parsed.contains(QueryParameterKind::OrderBy));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_values_keep_first_seen_order_and_collapse_duplicates() {
        let parsed = parse_query("with:carol with:alice with:carol with:bob").unwrap();
        assert_eq!(values(&parsed, QueryParameterKind::With), vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        for (query, offending) in [
            ("bogus", "bogus"),
            ("a:b:c", "a:b:c"),
            ("in:inbox in:", "in:"),
            (":inbox", ":inbox"),
            ("in::inbox", "in::inbox"),
            ("unknown:value", "unknown:value"),
            ("IN:inbox", "IN:inbox"),
        ] {
            match parse_query(query) {
                Err(SearchError::InvalidQuery { token, message }) => {
                    assert_eq!(token, offending);
                    assert_eq!(message, format!("Invalid query param: {}", offending));
                },
                other => panic!("expected InvalidQuery for {:?}, got {:?}", query, other),
            }
        }
    }

    #[test]
    fn test_compiler_reports_its_zone() {
        let zone: EvalZone = "+05:30".parse().unwrap();
        assert_eq!(QueryCompiler::new(zone).zone(), zone);
        assert_eq!(QueryCompiler::default().zone(), EvalZone::Utc);
    }

    #[test]
    fn test_only_ascii_whitespace_separates_tokens() {
        let err = parse_query("in:inbox\u{a0}with:bob").unwrap_err();
        assert_eq!(err.offending(), "in:inbox\u{a0}with:bob");
        assert!(parse_query("\u{a0}").is_err());
        assert_eq!(parse_query("in:inbox\twith:bob\r\n").unwrap().len(), 2);
    }

    #[test]
    fn test_orderby_is_validated() {
        let err = parse_query("orderby:bogus").unwrap_err();
        assert_eq!(err.to_string(), "Invalid orderby query value: bogus");
        assert_eq!(err.offending(), "bogus");

        let parsed = parse_query("orderby:dateasc orderby:creatordesc").unwrap();
        let specs: Vec<_> = parsed.order_specs().collect();
        assert_eq!(specs, vec![OrderSpec::DATE_ASC, OrderSpec::CREATOR_DESC]);
    }

    #[test]
    fn test_usedate_is_validated() {
        let err = parse_query("usedate:yesterday").unwrap_err();
        assert_eq!(err.to_string(), "Invalid usedate query value: yesterday");

        let parsed = parse_query("usedate:createdate usedate:createdate").unwrap();
        assert_eq!(values(&parsed, QueryParameterKind::UseDate), vec!["createdate"]);

        let err = parse_query("usedate:createdate usedate:lastmoddate").unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery { ref token, .. } if token == "lastmoddate"));
    }

    #[test]
    fn test_dates_are_normalized_to_epoch_millis() {
        let parsed = parse_query("from:20230101 to:20230102").unwrap();
        assert_eq!(values(&parsed, QueryParameterKind::From), vec![JAN_1_2023_UTC.to_string()]);
        assert_eq!(
            values(&parsed, QueryParameterKind::To),
            vec![(JAN_1_2023_UTC + 86_400_000).to_string()]
        );
    }

    #[test]
    fn test_dates_use_compiler_zone() {
        let compiler = QueryCompiler::new("+01:00".parse().unwrap());
        let parsed = compiler.parse("from:20230101").unwrap();
        assert_eq!(parsed.first(QueryParameterKind::From), Some("1672527600000"));
    }

    #[test]
    fn test_invalid_date_fails_whole_parse() {
        let err = parse_query("in:inbox from:2023-01-01 orderby:dateasc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid date query value: 2023-01-01");

        assert!(parse_query("to:20231332").is_err());
        assert!(parse_query("from:1").is_err());
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse_query("orderby:bogus nokey").unwrap_err();
        assert_eq!(err.offending(), "bogus");
    }

    #[test]
    fn test_render_is_reparseable() {
        let compiler = QueryCompiler::default();
        let parsed = compiler
            .parse("orderby:creatorasc in:inbox from:20230101 with:bob orderby:dateasc to:20230105")
            .unwrap();
        let rendered = compiler.render(&parsed);
        assert_eq!(
            rendered,
            "in:inbox with:bob from:20230101 to:20230105 orderby:creatorasc orderby:dateasc"
        );
        assert_eq!(compiler.parse(&rendered).unwrap(), parsed);
    }

    #[test]
    fn test_serializes_as_key_map() {
        let parsed = parse_query("in:inbox with:bob with:carol").unwrap();
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!({ "in": ["inbox"], "with": ["bob", "carol"] })
        );
    }
}
