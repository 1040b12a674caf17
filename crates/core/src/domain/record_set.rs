use std::collections::HashSet;

use crate::domain::record::RawRecord;

/// Records coalesced by id, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<RawRecord>,
    seen: HashSet<String>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when a record with the same id is already present.
    pub fn insert(&mut self, record: RawRecord) -> bool {
        if let Some(id) = record.id() {
            if !self.seen.insert(id.to_string()) {
                return false;
            }
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawRecord> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(RawRecord::id)
    }
}

impl IntoIterator for RecordSet {
    type Item = RawRecord;
    type IntoIter = std::vec::IntoIter<RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;
    use crate::domain::record::RecordKind;

    fn thread(id: &str) -> RawRecord {
        let mut attrs = Map::new();
        attrs.insert("id".to_string(), json!(id));
        RawRecord::new(RecordKind::Thread, attrs)
    }

    #[test]
    fn coalesces_by_id_keeping_first() {
        let mut set = RecordSet::new();
        assert!(set.insert(thread("a")));
        assert!(set.insert(thread("b")));
        assert!(!set.insert(thread("a")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(set.contains("b"));
    }

    #[test]
    fn records_without_id_are_kept() {
        let mut set = RecordSet::new();
        assert!(set.insert(RawRecord::new(RecordKind::Thread, Map::new())));
        assert!(set.insert(RawRecord::new(RecordKind::Thread, Map::new())));
        assert_eq!(set.len(), 2);
    }
}
