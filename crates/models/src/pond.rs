use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{
    farm::Farm,
    pond_geometry::{PondMeta, StoredPondMeta},
    record_ref::{Record, RecordRef},
};

/// Role of the pond in the production flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PondType {
    Culture,
    Nursery,
    Service,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display)]
pub enum PondClassification {
    #[serde(rename = "ordinary")]
    #[strum(serialize = "ordinary")]
    Ordinary,
    #[serde(rename = "contraction")]
    #[strum(serialize = "contraction")]
    Contraction,
    #[serde(rename = "R&D")]
    #[strum(to_string = "R&D", serialize = "rnd")]
    ResearchAndDevelopment,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Pond {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub farm_id: Option<RecordRef<Farm>>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    pub pond_size: Option<f64>,
    #[serde(default)]
    pub pond_meta: Option<StoredPondMeta>,
    #[serde(default)]
    pub pond_type: Option<PondType>,
    #[serde(default)]
    pub pond_classification: Option<PondClassification>,
    #[serde(default)]
    pub pond_image: Option<String>,
}

impl Record for Pond {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Pond {
    pub fn farm_id(&self) -> Option<&str> {
        self.farm_id.as_ref().map(RecordRef::id)
    }

    /// Stored metadata, or an empty record for ponds saved without one
    pub fn stored_meta(&self) -> StoredPondMeta {
        self.pond_meta.clone().unwrap_or_default()
    }
}

/// Body of `POST /api/pond/create` and `PUT /api/pond/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CreatePond {
    pub name: String,
    pub farm_id: String,
    pub pond_size: f64,
    pub pond_meta: PondMeta,
    pub pond_type: PondType,
    pub pond_classification: PondClassification,
    pub pond_image: String,
}

pub type UpdatePond = CreatePond;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pond_geometry::PondShape;

    #[test]
    fn pond_with_populated_farm_and_legacy_meta() {
        let pond: Pond = serde_json::from_str(
            r#"{
                "_id": "p1",
                "name": "Grow-out 3",
                "farm_id": {"_id": "f1", "name": "North"},
                "pond_size": 80,
                "pond_meta": {"pond_shape": "rectangle", "length": 10, "width": 4, "depth": 2},
                "pond_type": "culture",
                "pond_classification": "R&D",
                "pond_image": "https://example.org/p1.jpg"
            }"#,
        )
        .unwrap();

        assert_eq!(pond.farm_id(), Some("f1"));
        assert_eq!(
            pond.pond_classification,
            Some(PondClassification::ResearchAndDevelopment)
        );
        let meta = pond.stored_meta().to_meta().unwrap();
        assert_eq!(meta.shape(), PondShape::Rectangle);
        assert_eq!(meta.volume(), pond.pond_size.unwrap());
    }

    #[test]
    fn payload_serialises_tagged_meta() {
        let payload = CreatePond {
            name: "Nursery A".to_string(),
            farm_id: "f1".to_string(),
            pond_size: 0.0,
            pond_meta: PondMeta::Rounded {
                circumference: 0.0,
                depth: 1.0,
            },
            pond_type: PondType::Nursery,
            pond_classification: PondClassification::Ordinary,
            pond_image: String::new(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["pond_meta"]["shape"], "rounded");
        assert_eq!(json["pond_type"], "nursery");
        assert!(json["pond_meta"].get("length").is_none());
    }

    #[test]
    fn classification_parses_cli_spelling() {
        assert_eq!(
            "rnd".parse::<PondClassification>().unwrap(),
            PondClassification::ResearchAndDevelopment
        );
        assert_eq!(
            PondClassification::ResearchAndDevelopment.to_string(),
            "R&D"
        );
    }

    #[test]
    fn lenient_numbers_export_as_plain_numbers() {
        let decl = Pond::decl();
        assert!(decl.contains("pond_size: number | null"), "{decl}");
        let stored = StoredPondMeta::decl();
        assert!(stored.contains("circumference"), "{stored}");
        assert!(!stored.contains("PickFirst"), "{stored}");
    }
}
