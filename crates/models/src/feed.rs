use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::record_ref::{Record, RecordRef};

/// Feed catalogue entry. Read-only from the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Feed {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl Record for Feed {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[strum(ascii_case_insensitive)]
pub enum FeedUnit {
    #[default]
    #[serde(rename = "KG")]
    #[strum(serialize = "KG")]
    Kg,
    #[serde(rename = "GM")]
    #[strum(serialize = "GM")]
    Gm,
    #[serde(rename = "Pieces")]
    #[strum(serialize = "Pieces")]
    Pieces,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct FeedStock {
    #[serde(rename = "_id")]
    pub id: String,
    pub feed_id: RecordRef<Feed>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: FeedUnit,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    pub price: Option<f64>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl Record for FeedStock {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        self.feed_id.label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CreateFeedStock {
    pub feed_id: String,
    pub amount: f64,
    pub unit: FeedUnit,
    pub price: f64,
    #[serde(default)]
    pub remarks: String,
}

pub type UpdateFeedStock = CreateFeedStock;

impl CreateFeedStock {
    pub fn from_existing(stock: &FeedStock) -> Self {
        Self {
            feed_id: stock.feed_id.id().to_string(),
            amount: stock.amount.unwrap_or_default(),
            unit: stock.unit,
            price: stock.price.unwrap_or_default(),
            remarks: stock.remarks.clone().unwrap_or_default(),
        }
    }
}
