use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A backend record addressed by its `_id`.
pub trait Record {
    fn id(&self) -> &str;

    /// Human readable name used in tables and pickers
    fn label(&self) -> &str;
}

/// Reference to another record. The backend returns either the bare id or,
/// on populated endpoints, the whole referenced record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
pub enum RecordRef<T> {
    Id(String),
    Populated(T),
}

impl<T: Record> RecordRef<T> {
    pub fn id(&self) -> &str {
        match self {
            RecordRef::Id(id) => id,
            RecordRef::Populated(record) => record.id(),
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            RecordRef::Id(_) => None,
            RecordRef::Populated(record) => Some(record),
        }
    }

    /// Label of the referenced record, falling back to its id.
    pub fn label(&self) -> &str {
        self.populated().map(Record::label).unwrap_or_else(|| self.id())
    }

    /// Resolve the reference against a fetched collection.
    pub fn resolve<'a>(&'a self, records: &'a [T]) -> Option<&'a T> {
        self.populated()
            .or_else(|| records.iter().find(|r| r.id() == self.id()))
    }
}

impl<T> From<String> for RecordRef<T> {
    fn from(id: String) -> Self {
        RecordRef::Id(id)
    }
}

/// Ids of a list of references, in order.
pub fn ref_ids<T: Record>(refs: &[RecordRef<T>]) -> Vec<String> {
    refs.iter().map(|r| r.id().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fish::Fish;

    #[test]
    fn bare_and_populated_refs_share_id() {
        let refs: Vec<RecordRef<Fish>> = serde_json::from_str(
            r#"["f1", {"_id": "f2", "name": "Tilapia", "scientific_name": "Oreochromis niloticus"}]"#,
        )
        .unwrap();

        assert_eq!(ref_ids(&refs), vec!["f1", "f2"]);
        assert!(refs[0].populated().is_none());
        assert_eq!(refs[1].label(), "Tilapia");
        assert_eq!(refs[0].label(), "f1");
    }

    #[test]
    fn resolve_looks_up_bare_ids() {
        let fish = vec![Fish {
            id: "f1".to_string(),
            name: "Rohu".to_string(),
            scientific_name: None,
        }];
        let reference: RecordRef<Fish> = RecordRef::Id("f1".to_string());
        assert_eq!(reference.resolve(&fish).map(|f| f.name.as_str()), Some("Rohu"));

        let missing: RecordRef<Fish> = RecordRef::Id("nope".to_string());
        assert!(missing.resolve(&fish).is_none());
    }
}
