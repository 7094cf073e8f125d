use std::collections::{BTreeMap, BTreeSet};

use crate::model::{row_value, DecodedSheet, RawRow};

/// Identifier column candidates.
pub(crate) const ID_COLUMNS: &[&str] = &["id"];

/// Display-name column candidates; covers both the documented headers and
/// the legacy French workbook headers.
pub(crate) const NAME_COLUMNS: &[&str] = &["name", "usine", "marché", "marche"];

/// Name→identifier lookup table, built once per run from one dataset.
///
/// Resolution tries the display name first, then an explicit identifier,
/// so a response keyed by id still joins when names differ. Duplicate
/// names keep the first row's identifier.
#[derive(Debug, Clone, Default)]
pub struct RefIndex {
    by_name: BTreeMap<String, String>,
    ids: BTreeSet<String>,
}

impl RefIndex {
    pub fn from_sheet(sheet: &DecodedSheet) -> Self {
        let mut by_name = BTreeMap::new();
        let mut ids = BTreeSet::new();

        for row in &sheet.rows {
            let Some((id, name)) = identify(row) else {
                continue;
            };
            by_name.entry(name.to_lowercase()).or_insert_with(|| id.clone());
            ids.insert(id);
        }

        Self { by_name, ids }
    }

    /// Resolve a display name (or explicit id) to a stored identifier.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        if let Some(id) = self.by_name.get(&key.to_lowercase()) {
            return Some(id.as_str());
        }
        self.ids.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Pull (id, name) out of a row, falling back to whichever is present.
/// A row with neither cannot be joined against.
pub(crate) fn identify(row: &RawRow) -> Option<(String, String)> {
    let id = non_empty(row, ID_COLUMNS);
    let name = non_empty(row, NAME_COLUMNS);
    match (id, name) {
        (Some(id), Some(name)) => Some((id, name)),
        (Some(id), None) => Some((id.clone(), id)),
        (None, Some(name)) => Some((name.clone(), name)),
        (None, None) => None,
    }
}

fn non_empty(row: &RawRow, candidates: &[&str]) -> Option<String> {
    row_value(row, candidates)
        .map(|v| v.to_string())
        .filter(|s| !s.is_empty())
}
