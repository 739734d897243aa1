//! Catalog Table Vocabulary
//!
//! The `vehicles` table keeps its column names exactly as they appear in the
//! source CSV (mixed case), so every identifier that reaches SQL is emitted
//! quoted. Dynamic column references (filters and sort fields) must resolve
//! through [`column`]; a name that is not in [`COLUMNS`] is rejected before
//! any SQL is assembled. That allow-list is the injection boundary for the
//! whole listing API.

/// Name of the catalog table.
pub const TABLE: &str = "vehicles";

/// Storage type of a column.
///
/// Determines how a filter value is bound when comparing against the column:
/// integers bind as integers, dates as dates, and so on, so that `gt`/`lt`
/// compare numerically (or chronologically) rather than lexically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer storage (including the store-assigned `id`)
    Int,
    /// Double-precision floating point
    Float,
    /// Fixed-precision decimal
    Decimal,
    /// Character data
    Text,
    /// Calendar date
    Date,
}

/// A column of the `vehicles` table that clients may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    /// The identifier as it appears in SQL, quoted to preserve case.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.name)
    }

    pub fn is_text(&self) -> bool {
        self.kind == ColumnKind::Text
    }
}

/// Every queryable column, `id` first, data columns in storage order.
pub const COLUMNS: &[Column] = &[
    Column { name: "id", kind: ColumnKind::Int },
    Column { name: "Brand", kind: ColumnKind::Text },
    Column { name: "Model", kind: ColumnKind::Text },
    Column { name: "AccelSec", kind: ColumnKind::Float },
    Column { name: "TopSpeed_KmH", kind: ColumnKind::Int },
    Column { name: "Range_Km", kind: ColumnKind::Int },
    Column { name: "Efficiency_WhKm", kind: ColumnKind::Float },
    Column { name: "FastCharge_KmH", kind: ColumnKind::Int },
    Column { name: "RapidCharge", kind: ColumnKind::Text },
    Column { name: "PowerTrain", kind: ColumnKind::Text },
    Column { name: "PlugType", kind: ColumnKind::Text },
    Column { name: "BodyStyle", kind: ColumnKind::Text },
    Column { name: "Segment", kind: ColumnKind::Text },
    Column { name: "Seats", kind: ColumnKind::Int },
    Column { name: "PriceEuro", kind: ColumnKind::Decimal },
    Column { name: "Date", kind: ColumnKind::Date },
];

/// Columns written during ingestion: everything except the store-assigned
/// `id`.
pub fn data_columns() -> &'static [Column] {
    &COLUMNS[1..]
}

/// Look up a column by exact name.
///
/// Lookup is case-sensitive: the allow-list holds the canonical spellings,
/// and anything else, including a near-miss like `brand`, is treated as
/// unknown.
pub fn column(name: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|c| c.name == name)
}

/// Comma-separated quoted list of all columns, for SELECT clauses.
pub fn select_list() -> String {
    quoted_list(COLUMNS)
}

/// Comma-separated quoted list of the data columns, for INSERT clauses.
pub fn insert_list() -> String {
    quoted_list(data_columns())
}

fn quoted_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_column() {
        let col = column("Brand").unwrap();
        assert_eq!(col.name, "Brand");
        assert_eq!(col.kind, ColumnKind::Text);

        let col = column("PriceEuro").unwrap();
        assert_eq!(col.kind, ColumnKind::Decimal);

        let col = column("id").unwrap();
        assert_eq!(col.kind, ColumnKind::Int);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(column("brand").is_none());
        assert!(column("BRAND").is_none());
        assert!(column("Topspeed_KmH").is_none());
    }

    #[test]
    fn test_lookup_rejects_unknown_names() {
        assert!(column("").is_none());
        assert!(column("Colour").is_none());
        assert!(column("id; DROP TABLE vehicles").is_none());
        assert!(column("Brand\" OR 1=1 --").is_none());
    }

    #[test]
    fn test_quoted_preserves_case() {
        assert_eq!(column("TopSpeed_KmH").unwrap().quoted(), "\"TopSpeed_KmH\"");
        assert_eq!(column("id").unwrap().quoted(), "\"id\"");
    }

    #[test]
    fn test_data_columns_exclude_id() {
        assert_eq!(data_columns().len(), COLUMNS.len() - 1);
        assert!(data_columns().iter().all(|c| c.name != "id"));
    }

    #[test]
    fn test_select_and_insert_lists() {
        let select = select_list();
        assert!(select.starts_with("\"id\", \"Brand\""));
        assert!(select.ends_with("\"Date\""));

        let insert = insert_list();
        assert!(insert.starts_with("\"Brand\""));
        assert!(!insert.contains("\"id\""));
    }
}
