//! Filter and sort primitives shared by the query builder and the `read` RPC.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::codec::TypeCodec;
use crate::error::{Error, ErrorKind};
use crate::value::FieldValue;

/// One filter condition: field path, relation and operand values.
///
/// Relations are server-defined names such as `is`, `is_not`, `in`,
/// `between` or `greater_than`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub path: String,
    pub relation: String,
    pub values: Vec<FieldValue>,
}

impl Filter {
    /// Condition with a single operand.
    pub fn new(
        path: impl Into<String>,
        relation: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            path: path.into(),
            relation: relation.into(),
            values: vec![value.into()],
        }
    }

    /// Condition with several operands, e.g. `between`.
    pub fn with_values(
        path: impl Into<String>,
        relation: impl Into<String>,
        values: Vec<FieldValue>,
    ) -> Self {
        Self {
            path: path.into(),
            relation: relation.into(),
            values,
        }
    }

    pub(crate) fn to_wire(&self, codec: &TypeCodec) -> Value {
        json!({
            "path": self.path,
            "relation": self.relation,
            "values": self.values.iter().map(|v| codec.encode(v)).collect::<Vec<_>>(),
        })
    }
}

/// How filter conditions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterOperator {
    /// Every condition must hold.
    #[default]
    All,
    /// At least one condition must hold.
    Any,
}

impl FilterOperator {
    /// Logical operator name on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            FilterOperator::All => "and",
            FilterOperator::Any => "or",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "and" => Ok(FilterOperator::All),
            "any" | "or" => Ok(FilterOperator::Any),
            other => Err(Error::new(ErrorKind::Config(format!(
                "filter_operator must be 'all' or 'any', got '{other}'"
            )))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(Error::new(ErrorKind::Config(format!(
                "sort direction must be 'asc' or 'desc', got '{other}'"
            )))),
        }
    }
}

/// Sort clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field_name: String,
    pub direction: Direction,
}

impl Order {
    pub fn new(field_name: impl Into<String>, direction: Direction) -> Self {
        Self {
            field_name: field_name.into(),
            direction,
        }
    }

    pub(crate) fn to_wire(&self) -> Value {
        json!({
            "field_name": self.field_name,
            "direction": self.direction.to_string(),
        })
    }
}
