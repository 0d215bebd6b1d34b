//! State behind the create/edit pond form.
//!
//! The form owns the transient [`PondShapeInput`] and keeps `size`/`meta`
//! in step with it: any change to the shape selector or a dimension field
//! reruns the calculator. Typing into the size field directly overrides the
//! computed value until the next dimension change.

use models::{
    pond::{CreatePond, Pond, PondClassification, PondType},
    pond_geometry::{
        Coercion, DimensionField, DimensionPolicy, PondMeta, PondShapeInput, parse_leading_float,
    },
};
use strum_macros::{Display, EnumString};

use super::forms::{FormError, FormMode, choice, required};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PondField {
    Name,
    FarmId,
    PondSize,
    #[strum(serialize = "pond_shape", serialize = "shape")]
    PondShape,
    Length,
    Width,
    Depth,
    Circumference,
    PondType,
    PondClassification,
    PondImage,
}

impl PondField {
    fn dimension(self) -> Option<DimensionField> {
        match self {
            PondField::Length => Some(DimensionField::Length),
            PondField::Width => Some(DimensionField::Width),
            PondField::Depth => Some(DimensionField::Depth),
            PondField::Circumference => Some(DimensionField::Circumference),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PondForm {
    mode: FormMode,
    policy: DimensionPolicy,
    pub name: String,
    pub farm_id: String,
    pub pond_type: String,
    pub pond_classification: String,
    pub pond_image: String,
    shape: PondShapeInput,
    size: Option<f64>,
    /// Size field explicitly cleared since the last recompute
    size_cleared: bool,
    meta: Option<PondMeta>,
}

impl PondForm {
    pub fn open_create() -> Self {
        Self::default()
    }

    /// Prefill from an existing pond, decomposing its stored metadata.
    pub fn open_edit(pond: &Pond) -> Self {
        let stored = pond.stored_meta();
        Self {
            mode: FormMode::Edit {
                id: pond.id.clone(),
            },
            policy: DimensionPolicy::default(),
            name: pond.name.clone(),
            farm_id: pond.farm_id().unwrap_or_default().to_string(),
            pond_type: pond.pond_type.map(|t| t.to_string()).unwrap_or_default(),
            pond_classification: pond
                .pond_classification
                .map(|c| c.to_string())
                .unwrap_or_default(),
            pond_image: pond.pond_image.clone().unwrap_or_default(),
            shape: stored.to_input(),
            size: pond.pond_size,
            size_cleared: false,
            meta: stored.to_meta(),
        }
    }

    pub fn with_policy(mut self, policy: DimensionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn shape_input(&self) -> &PondShapeInput {
        &self.shape
    }

    pub fn size(&self) -> Option<f64> {
        self.size
    }

    pub fn meta(&self) -> Option<&PondMeta> {
        self.meta.as_ref()
    }

    /// Apply one field edit. Under a strict policy an invalid dimension is
    /// still recorded, but size and meta keep their previous values.
    pub fn handle_change(&mut self, field: PondField, value: &str) -> Result<(), FormError> {
        match field {
            PondField::Name => self.name = value.to_string(),
            PondField::FarmId => self.farm_id = value.to_string(),
            PondField::PondType => self.pond_type = value.to_string(),
            PondField::PondClassification => self.pond_classification = value.to_string(),
            PondField::PondImage => self.pond_image = value.to_string(),
            PondField::PondSize if value.trim().is_empty() => {
                self.size = None;
                self.size_cleared = true;
            }
            PondField::PondSize => {
                self.size = Some(self.parse_size(value)?);
                self.size_cleared = false;
            }
            PondField::PondShape => {
                self.shape.shape = value.trim().to_string();
                if let Err(err) = self.recompute() {
                    // meta must never describe a shape other than the selected one
                    self.meta = None;
                    return Err(err);
                }
            }
            PondField::Length | PondField::Width | PondField::Depth | PondField::Circumference => {
                if let Some(dimension) = field.dimension() {
                    self.shape.dimensions.set(dimension, value);
                }
                self.recompute()?;
            }
        }
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), FormError> {
        match self.shape.compute_with(self.policy)? {
            Some(result) => {
                self.size = Some(result.size);
                self.size_cleared = false;
                self.meta = Some(result.meta);
            }
            // unknown selector: size stays as it was
            None => self.meta = None,
        }
        Ok(())
    }

    fn parse_size(&self, value: &str) -> Result<f64, FormError> {
        let parsed = match self.policy.coercion {
            Coercion::Coerce => Some(
                parse_leading_float(value)
                    .filter(|v| !v.is_nan())
                    .unwrap_or(0.0),
            ),
            Coercion::Reject => value.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        };
        parsed.ok_or_else(|| FormError::InvalidNumber {
            field: "pond_size",
            value: value.to_string(),
        })
    }

    /// Validate and build the request body.
    pub fn submit(&self) -> Result<CreatePond, FormError> {
        let name = required("name", &self.name)?;
        let farm_id = required("farm_id", &self.farm_id)?;
        let pond_type: PondType = choice("pond_type", &self.pond_type)?;
        let pond_classification: PondClassification =
            choice("pond_classification", &self.pond_classification)?;

        let Some(shape) = self.shape.selected_shape() else {
            return Err(FormError::MissingField("pond_shape"));
        };
        for &field in shape.fields() {
            required(field.into(), self.shape.dimensions.get(field))?;
        }
        if self.size_cleared {
            return Err(FormError::MissingField("pond_size"));
        }
        let Some(computed) = self.shape.compute_with(self.policy)? else {
            return Err(FormError::MissingField("pond_shape"));
        };
        let pond_size = self.size.unwrap_or(computed.size);

        Ok(CreatePond {
            name,
            farm_id,
            pond_size,
            pond_meta: computed.meta,
            pond_type,
            pond_classification,
            pond_image: self.pond_image.trim().to_string(),
        })
    }
}
