use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::{
    fish::Fish,
    pond::Pond,
    record_ref::{Record, RecordRef},
};

/// Monoculture stocks exactly one species, polyculture any number
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CultureType {
    Mono,
    #[default]
    Poly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CultureCycle {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub culture_type: Option<CultureType>,
    /// As stored by the backend: an ISO timestamp or a plain date
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub ponds: Vec<RecordRef<Pond>>,
    #[serde(default)]
    pub fish: Vec<RecordRef<Fish>>,
}

impl Record for CultureCycle {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl CultureCycle {
    /// Calendar day the cycle started, in UTC.
    pub fn start_day(&self) -> Option<NaiveDate> {
        let raw = self.start_date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CreateCultureCycle {
    pub name: String,
    pub culture_type: CultureType,
    pub start_date: NaiveDate,
    pub ponds: Vec<String>,
    pub fish: Vec<String>,
}

pub type UpdateCultureCycle = CreateCultureCycle;
