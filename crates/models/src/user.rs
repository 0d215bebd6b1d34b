use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    access::Role,
    record_ref::{Record, RecordRef},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<RecordRef<Role>>,
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
