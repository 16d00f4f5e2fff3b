//! Closed vocabularies of the search query grammar.
//!
//! Every enumeration carries its wire token; reverse lookup goes through a table
//! built once on first use and never mutated afterwards.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Recognized query keys, in the order they are rendered back to a query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryParameterKind {
    In,
    With,
    Creator,
    Id,
    Tag,
    UseDate,
    From,
    To,
    OrderBy,
}

impl QueryParameterKind {
    pub const ALL: [QueryParameterKind; 9] = [
        QueryParameterKind::In,
        QueryParameterKind::With,
        QueryParameterKind::Creator,
        QueryParameterKind::Id,
        QueryParameterKind::Tag,
        QueryParameterKind::UseDate,
        QueryParameterKind::From,
        QueryParameterKind::To,
        QueryParameterKind::OrderBy,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            QueryParameterKind::In => "in",
            QueryParameterKind::With => "with",
            QueryParameterKind::Creator => "creator",
            QueryParameterKind::Id => "id",
            QueryParameterKind::Tag => "tag",
            QueryParameterKind::UseDate => "usedate",
            QueryParameterKind::From => "from",
            QueryParameterKind::To => "to",
            QueryParameterKind::OrderBy => "orderby",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        static LOOKUP: Lazy<HashMap<&'static str, QueryParameterKind>> =
            Lazy::new(|| QueryParameterKind::ALL.iter().map(|kind| (kind.token(), *kind)).collect());
        LOOKUP.get(token).copied()
    }

    /// Keys whose values are date bounds
    pub fn is_date_bound(&self) -> bool {
        matches!(self, QueryParameterKind::From | QueryParameterKind::To)
    }
}

impl fmt::Display for QueryParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// What a result ordering sorts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDimension {
    /// Max last-modified time of the conversational wavelets
    LastModified,
    /// Max creation time of the conversational wavelets
    Created,
    /// Author of the conversation root
    Creator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison result
    #[inline]
    pub fn apply(&self, ascending: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }
}

/// An `orderby` value: a dimension and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderSpec {
    pub dimension: SortDimension,
    pub direction: SortDirection,
}

impl OrderSpec {
    pub const DATE_ASC: OrderSpec = OrderSpec::new(SortDimension::LastModified, SortDirection::Asc);
    pub const DATE_DESC: OrderSpec =
        OrderSpec::new(SortDimension::LastModified, SortDirection::Desc);
    pub const CREATED_ASC: OrderSpec = OrderSpec::new(SortDimension::Created, SortDirection::Asc);
    pub const CREATED_DESC: OrderSpec = OrderSpec::new(SortDimension::Created, SortDirection::Desc);
    pub const CREATOR_ASC: OrderSpec = OrderSpec::new(SortDimension::Creator, SortDirection::Asc);
    pub const CREATOR_DESC: OrderSpec = OrderSpec::new(SortDimension::Creator, SortDirection::Desc);

    pub const ALL: [OrderSpec; 6] = [
        OrderSpec::DATE_ASC,
        OrderSpec::DATE_DESC,
        OrderSpec::CREATED_ASC,
        OrderSpec::CREATED_DESC,
        OrderSpec::CREATOR_ASC,
        OrderSpec::CREATOR_DESC,
    ];

    /// Ordering used when the query has no `orderby`
    pub const DEFAULT: OrderSpec = OrderSpec::DATE_DESC;

    pub const fn new(dimension: SortDimension, direction: SortDirection) -> Self {
        Self { dimension, direction }
    }

    pub fn token(&self) -> &'static str {
        match (self.dimension, self.direction) {
            (SortDimension::LastModified, SortDirection::Asc) => "dateasc",
            (SortDimension::LastModified, SortDirection::Desc) => "datedesc",
            (SortDimension::Created, SortDirection::Asc) => "createdasc",
            (SortDimension::Created, SortDirection::Desc) => "createddesc",
            (SortDimension::Creator, SortDirection::Asc) => "creatorasc",
            (SortDimension::Creator, SortDirection::Desc) => "creatordesc",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        static LOOKUP: Lazy<HashMap<&'static str, OrderSpec>> =
            Lazy::new(|| OrderSpec::ALL.iter().map(|spec| (spec.token(), *spec)).collect());
        LOOKUP.get(token).copied()
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Which timestamp `from`/`to` bounds apply to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFieldSelector {
    CreateDate,
    #[default]
    LastModDate,
}

impl DateFieldSelector {
    pub const ALL: [DateFieldSelector; 2] =
        [DateFieldSelector::CreateDate, DateFieldSelector::LastModDate];

    pub fn token(&self) -> &'static str {
        match self {
            DateFieldSelector::CreateDate => "createdate",
            DateFieldSelector::LastModDate => "lastmoddate",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        static LOOKUP: Lazy<HashMap<&'static str, DateFieldSelector>> = Lazy::new(|| {
            DateFieldSelector::ALL.iter().map(|field| (field.token(), *field)).collect()
        });
        LOOKUP.get(token).copied()
    }
}

impl fmt::Display for DateFieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
