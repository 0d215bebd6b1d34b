use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::record_ref::Record;

/// A fish species stocked in culture cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Fish {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
}

impl Record for Fish {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CreateFish {
    pub name: String,
    pub scientific_name: String,
}

pub type UpdateFish = CreateFish;
