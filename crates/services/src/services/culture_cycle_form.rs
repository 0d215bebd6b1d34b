use chrono::NaiveDate;
use models::{
    culture_cycle::{CreateCultureCycle, CultureCycle, CultureType},
    record_ref::ref_ids,
};

use super::forms::{FormError, FormMode, required};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// State behind the culture cycle form.
#[derive(Debug, Clone, Default)]
pub struct CultureCycleForm {
    mode: FormMode,
    pub name: String,
    culture_type: CultureType,
    /// `YYYY-MM-DD` as typed
    pub start_date: String,
    ponds: Vec<String>,
    fish: Vec<String>,
}

impl CultureCycleForm {
    /// Empty form; new cycles default to polyculture.
    pub fn open_create() -> Self {
        Self::default()
    }

    pub fn open_edit(cycle: &CultureCycle) -> Self {
        Self {
            mode: FormMode::Edit {
                id: cycle.id.clone(),
            },
            name: cycle.name.clone(),
            culture_type: cycle.culture_type.unwrap_or_default(),
            start_date: cycle
                .start_day()
                .map(|day| day.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            ponds: ref_ids(&cycle.ponds),
            fish: ref_ids(&cycle.fish),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn culture_type(&self) -> CultureType {
        self.culture_type
    }

    pub fn ponds(&self) -> &[String] {
        &self.ponds
    }

    pub fn fish(&self) -> &[String] {
        &self.fish
    }

    /// Changing the culture type invalidates the species picked so far.
    pub fn set_culture_type(&mut self, culture_type: CultureType) {
        if culture_type != self.culture_type {
            self.culture_type = culture_type;
            self.fish.clear();
        }
    }

    pub fn select_ponds<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ponds = dedup(ids);
    }

    /// Monoculture keeps only the first species selected.
    pub fn select_fish<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fish = dedup(ids);
        if self.culture_type == CultureType::Mono {
            fish.truncate(1);
        }
        self.fish = fish;
    }

    pub fn submit(&self) -> Result<CreateCultureCycle, FormError> {
        let name = required("name", &self.name)?;
        let raw_date = required("start_date", &self.start_date)?;
        let start_date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate(raw_date.clone()))?;

        Ok(CreateCultureCycle {
            name,
            culture_type: self.culture_type,
            start_date,
            ponds: self.ponds.clone(),
            fish: self.fish.clone(),
        })
    }
}

fn dedup<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        let id = id.into();
        let id = id.trim();
        if !id.is_empty() && !out.iter().any(|existing| existing == id) {
            out.push(id.to_string());
        }
    }
    out
}
