use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the three fixed slots an uploaded dataset can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sites,
    Markets,
    Transport,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Sites, Role::Markets, Role::Transport];

    /// Form-field name the optimization service expects for this role.
    pub fn field_name(&self) -> &'static str {
        match self {
            Role::Sites => "usines_file",
            Role::Markets => "marches_file",
            Role::Transport => "transport_file",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sites => write!(f, "sites"),
            Role::Markets => write!(f, "markets"),
            Role::Transport => write!(f, "transport"),
        }
    }
}

/// A single spreadsheet cell after decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(Decimal),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(d) => Some(*d),
            CellValue::Text(s) => Decimal::from_str(s.trim()).ok(),
            CellValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(d) => write!(f, "{d}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Empty => Ok(()),
        }
    }
}

/// One decoded spreadsheet row, keyed by column name.
pub type RawRow = BTreeMap<String, CellValue>;

/// Case-insensitive column lookup over a row, trying candidates in order.
pub fn row_value<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a CellValue> {
    for candidate in candidates {
        if let Some((_, value)) = row.iter().find(|(k, _)| k.eq_ignore_ascii_case(candidate)) {
            return Some(value);
        }
    }
    None
}

/// A decoded spreadsheet: the header-row column set plus the data rows.
///
/// The preview is a derived slice of the rows, never a second source of
/// truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedSheet {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl DecodedSheet {
    pub const PREVIEW_ROWS: usize = 5;

    /// First rows for display, at most [`Self::PREVIEW_ROWS`].
    pub fn preview(&self) -> &[RawRow] {
        &self.rows[..self.rows.len().min(Self::PREVIEW_ROWS)]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One normalized assignment of a market to a factory.
///
/// `id` is the market key from the response and is unique within a plan.
/// Rows are immutable once reconciled; a new run replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: String,
    pub factory: String,
    pub market: String,
    pub quantity: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Factory,
    Market,
}

/// A map location derived from the uploaded datasets, not the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_served: Option<bool>,
}

/// A factory→market connection, keyed by stored identifiers.
///
/// Only emitted when both endpoints resolve; see the reconcile module for
/// how unresolved joins are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEdge {
    pub from: String,
    pub to: String,
    pub quantity: Decimal,
}
