// Dynamic Filtering
//
// Turns the listing endpoint's `search` and `filters` parameters into a SQL
// predicate. Column names pass through the allow-list in
// [`evcat_common::schema`] before any SQL is assembled, and every value is
// bound as a typed parameter. The only text that reaches the statement is
// quoted identifiers from the allow-list and operator tokens chosen here.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;

use evcat_common::schema::{self, Column, ColumnKind};

/// Rejection of a `search`/`filters` input, reported to the client as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The `filters` parameter was not parseable JSON.
    #[error("Invalid filters JSON")]
    Json,

    /// The JSON parsed but did not have the expected shape.
    #[error("{0}")]
    Shape(String),

    /// A filter referenced a column outside the allow-list.
    #[error("Invalid filter column: {0}")]
    Column(String),

    /// A filter used an operator outside the supported set.
    #[error("Invalid filter operator: {0}")]
    Operator(String),
}

/// A value ready to bind, converted to the column's storage type so that
/// comparisons happen numerically or chronologically, not lexically.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// Case-insensitive containment over Brand or Model.
    Search(String),
    /// Pattern match on one column; non-text columns are compared as text.
    Like {
        column: &'static Column,
        pattern: String,
    },
    /// Typed comparison with one of `=`, `>`, `<`.
    Compare {
        column: &'static Column,
        op: &'static str,
        value: BindValue,
    },
    /// Null/blank check. On non-text columns blank means NULL only.
    Empty {
        column: &'static Column,
        empty: bool,
    },
}

/// A validated predicate over the vehicles table.
///
/// Construction via [`VehicleFilter::parse`] is the only place client input
/// is interpreted; once a `VehicleFilter` exists, applying it cannot fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    clauses: Vec<Clause>,
}

impl VehicleFilter {
    /// Validate the raw query parameters into a predicate.
    ///
    /// `search` contributes a Brand-or-Model containment clause unless blank.
    /// `filters_json` must be a JSON array of `{column, op, value}` objects;
    /// all clauses are combined with AND. No input at all yields a predicate
    /// that matches every row.
    pub fn parse(
        search: Option<&str>,
        filters_json: Option<&str>,
    ) -> Result<VehicleFilter, FilterError> {
        let mut clauses = Vec::new();

        if let Some(term) = search {
            let term = term.trim();
            if !term.is_empty() {
                clauses.push(Clause::Search(format!("%{term}%")));
            }
        }

        if let Some(raw) = filters_json {
            if !raw.is_empty() {
                let parsed: Value = serde_json::from_str(raw).map_err(|_| FilterError::Json)?;
                let items = parsed
                    .as_array()
                    .ok_or_else(|| FilterError::Shape("filters must be an array".to_string()))?;

                for item in items {
                    clauses.push(parse_item(item)?);
                }
            }
        }

        Ok(VehicleFilter { clauses })
    }

    /// Append this predicate to a statement as a `WHERE` clause.
    ///
    /// A no-clause filter appends nothing. Values are always pushed with
    /// `push_bind`, never into the SQL text.
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.clauses.is_empty() {
            return;
        }

        qb.push(" WHERE ");
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            match clause {
                Clause::Search(pattern) => {
                    qb.push("(\"Brand\" ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR \"Model\" ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(")");
                }
                Clause::Like { column, pattern } => {
                    qb.push(column.quoted());
                    if !column.is_text() {
                        qb.push("::TEXT");
                    }
                    qb.push(" ILIKE ");
                    qb.push_bind(pattern.clone());
                }
                Clause::Compare { column, op, value } => {
                    qb.push(column.quoted());
                    qb.push(format!(" {op} "));
                    match value {
                        BindValue::Text(s) => qb.push_bind(s.clone()),
                        BindValue::Int(i) => qb.push_bind(*i),
                        BindValue::Float(f) => qb.push_bind(*f),
                        BindValue::Decimal(d) => qb.push_bind(*d),
                        BindValue::Date(d) => qb.push_bind(*d),
                    };
                }
                Clause::Empty { column, empty } => {
                    let q = column.quoted();
                    if column.is_text() {
                        if *empty {
                            qb.push(format!("({q} IS NULL OR {q} = '')"));
                        } else {
                            qb.push(format!("({q} IS NOT NULL AND {q} != '')"));
                        }
                    } else if *empty {
                        qb.push(format!("{q} IS NULL"));
                    } else {
                        qb.push(format!("{q} IS NOT NULL"));
                    }
                }
            }
        }
    }
}

fn parse_item(item: &Value) -> Result<Clause, FilterError> {
    let shape = |msg: &str| FilterError::Shape(msg.to_string());

    let obj = item.as_object().ok_or_else(|| shape("invalid filter item"))?;
    let column_name = obj
        .get("column")
        .and_then(Value::as_str)
        .ok_or_else(|| shape("invalid filter item"))?;
    let op = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| shape("invalid filter item"))?;

    let column = schema::column(column_name)
        .ok_or_else(|| FilterError::Column(column_name.to_string()))?;
    let value = obj.get("value");

    let clause = match op {
        "contains" => Clause::Like {
            column,
            pattern: format!("%{}%", text_value(column, value)?),
        },
        "startsWith" => Clause::Like {
            column,
            pattern: format!("{}%", text_value(column, value)?),
        },
        "endsWith" => Clause::Like {
            column,
            pattern: format!("%{}", text_value(column, value)?),
        },
        "equals" => Clause::Compare {
            column,
            op: "=",
            value: typed_value(column, value)?,
        },
        "gt" => Clause::Compare {
            column,
            op: ">",
            value: typed_value(column, value)?,
        },
        "lt" => Clause::Compare {
            column,
            op: "<",
            value: typed_value(column, value)?,
        },
        "isEmpty" => Clause::Empty {
            column,
            empty: is_truthy(value),
        },
        other => return Err(FilterError::Operator(other.to_string())),
    };

    Ok(clause)
}

/// The text rendition of a value, for pattern operators.
fn text_value(column: &'static Column, value: Option<&Value>) -> Result<String, FilterError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(invalid_value(column)),
    }
}

/// Convert a value to the column's storage type, for comparison operators.
fn typed_value(column: &'static Column, value: Option<&Value>) -> Result<BindValue, FilterError> {
    if column.is_text() {
        return Ok(BindValue::Text(text_value(column, value)?));
    }

    let invalid = || invalid_value(column);
    let raw = value.ok_or_else(invalid)?;

    let bound = match (column.kind, raw) {
        (ColumnKind::Int, Value::Number(n)) => n
            .as_i64()
            .map(BindValue::Int)
            .or_else(|| n.as_f64().map(BindValue::Float))
            .ok_or_else(invalid)?,
        (ColumnKind::Int, Value::String(s)) => s
            .parse::<i64>()
            .map(BindValue::Int)
            .or_else(|_| s.parse::<f64>().map(BindValue::Float))
            .map_err(|_| invalid())?,
        (ColumnKind::Float, Value::Number(n)) => BindValue::Float(n.as_f64().ok_or_else(invalid)?),
        (ColumnKind::Float, Value::String(s)) => {
            BindValue::Float(s.parse().map_err(|_| invalid())?)
        }
        (ColumnKind::Decimal, Value::Number(n)) => {
            BindValue::Decimal(n.as_f64().and_then(Decimal::from_f64).ok_or_else(invalid)?)
        }
        (ColumnKind::Decimal, Value::String(s)) => {
            BindValue::Decimal(s.parse().map_err(|_| invalid())?)
        }
        (ColumnKind::Date, Value::String(s)) => BindValue::Date(s.parse().map_err(|_| invalid())?),
        _ => return Err(invalid()),
    };

    Ok(bound)
}

fn invalid_value(column: &Column) -> FilterError {
    FilterError::Shape(format!("Invalid filter value for column: {}", column.name))
}

/// `isEmpty` checks for blankness when the value is `true` (boolean or the
/// string `"true"`) and for presence otherwise.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}
