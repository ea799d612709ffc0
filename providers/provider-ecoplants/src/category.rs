//! Mapping from browser category paths to PBRMAX category IDs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vendor ID meaning "do not filter by category".
pub const NO_CATEGORY: i64 = -10000;

/// A single category request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryQuery {
    /// Query without a category filter.
    Any,
    /// Query one vendor category.
    Id(i64),
}

impl From<i64> for CategoryQuery {
    fn from(id: i64) -> Self {
        if id == NO_CATEGORY {
            CategoryQuery::Any
        } else {
            CategoryQuery::Id(id)
        }
    }
}

impl CategoryQuery {
    pub fn id(&self) -> Option<i64> {
        match self {
            CategoryQuery::Any => None,
            CategoryQuery::Id(id) => Some(*id),
        }
    }
}

/// Normalized category key to ordered vendor category IDs.
///
/// Keys are uppercased path segments joined with commas, e.g. `ARCHITECTURE,HOUSE`.
/// The empty key is used when no category filter is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    entries: BTreeMap<String, Vec<i64>>,
}

impl CategoryTable {
    /// An empty table. Every lookup fails until entries are inserted.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, ids: Vec<i64>) -> Option<Vec<i64>> {
        self.entries.insert(key.into(), ids)
    }

    /// IDs registered for a normalized key.
    pub fn get(&self, key: &str) -> Option<&[i64]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalize a browser path like `/Architecture/House` to `ARCHITECTURE,HOUSE`.
    pub fn normalize_path(path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        path.split('/').collect::<Vec<_>>().join(",").to_uppercase()
    }

    /// Lookup key for a set of category filters.
    ///
    /// Only the last filter entry is used; earlier entries are ignored.
    pub fn lookup_key(categories: &[String]) -> String {
        categories
            .last()
            .map(|path| Self::normalize_path(path))
            .unwrap_or_default()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let entries = [
            ("", vec![NO_CATEGORY]),
            ("VEHICLES", vec![309, 311, 312]),
            ("VEGETATION", vec![156, 153, 152, 154, 155, 137, 138, 139]),
            ("FURNITURE,SEAT", vec![196]),
            ("ARCHIVE,RESIDENTIAL", vec![191, 192, 194, 195, 201, 179]),
            ("ARCHIVE,INDUSTRIAL", vec![315, 317, 320, 284, 285, 286]),
            ("ARCHIVE,COMMERCIAL", vec![202, 218, 219, 173, 168, 170, 181]),
            ("ARCHITECTURE,ROAD", vec![308, 310, 249]),
            ("ARCHITECTURE,HOUSE", vec![264, 274, 275]),
            ("ARCHITECTURE,BUILDING", vec![261, 263, 267]),
            ("ARCHITECTURE,ARCHAEOLOGY", vec![270, 260, 259]),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(key, ids)| (key.to_string(), ids))
                .collect(),
        }
    }
}
