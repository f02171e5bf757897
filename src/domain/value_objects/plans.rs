use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weekly fascicle: the products shipped together that week and the
/// total amount charged for them. `price_minor` covers the whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekEntry {
    pub product_ids: Vec<Uuid>,
    pub price_minor: i64,
    #[serde(default)]
    pub note: String,
}

/// Ordered sequence of weekly fascicles. Index 0 is the first week, charged
/// at the initial purchase. An empty plan means the feature is disabled for
/// the product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    entries: Vec<WeekEntry>,
}

impl Plan {
    pub fn new(entries: Vec<WeekEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[WeekEntry] {
        &self.entries
    }

    /// Total row lookup: `Some` for `0 <= index < len`, `None` for anything
    /// else including negative indexes. Out-of-range is the normal "no more
    /// weeks" signal, not an error.
    pub fn row(&self, index: i64) -> Option<&WeekEntry> {
        if index < 0 {
            return None;
        }
        self.entries.get(index as usize)
    }

    pub fn last_index(&self) -> Option<u32> {
        if self.entries.is_empty() {
            None
        } else {
            Some((self.entries.len() - 1) as u32)
        }
    }

    /// Decodes a persisted snapshot. Malformed or empty JSON yields the
    /// empty plan; a bad snapshot must read as "no plan", never as an error.
    pub fn from_snapshot(snapshot: &str) -> Self {
        if snapshot.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str::<Vec<WeekEntry>>(snapshot)
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn to_snapshot(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}
