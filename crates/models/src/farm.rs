use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use ts_rs::TS;

use crate::record_ref::Record;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Farm {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    pub area_size: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<i64>")]
    pub number_of_pond: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    pub production_capacity: Option<f64>,
}

impl Record for Farm {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CreateFarm {
    pub name: String,
    pub location: String,
    pub area_size: f64,
    pub number_of_pond: i64,
    pub production_capacity: f64,
}

/// Updates resubmit the whole form, same as creation.
pub type UpdateFarm = CreateFarm;

impl CreateFarm {
    /// Prefill an edit form from an existing farm
    pub fn from_existing(farm: &Farm) -> Self {
        Self {
            name: farm.name.clone(),
            location: farm.location.clone().unwrap_or_default(),
            area_size: farm.area_size.unwrap_or_default(),
            number_of_pond: farm.number_of_pond.unwrap_or_default(),
            production_capacity: farm.production_capacity.unwrap_or_default(),
        }
    }
}
