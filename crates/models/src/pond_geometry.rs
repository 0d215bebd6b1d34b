//! Pond volume calculation from user-entered shape dimensions.
//!
//! The calculator is recomputed on every keystroke of the pond form, so it
//! never fails under the default [`DimensionPolicy`]: blank or half-typed
//! numbers count as zero. The strict policy turns those cases into
//! [`GeometryError`]s for callers that want validation instead.

use std::{convert::Infallible, f64::consts::PI};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use strum_macros::{Display, EnumString, IntoStaticStr};
use thiserror::Error;
use ts_rs::TS;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PondShape {
    /// Rectangular prism: length x width x depth
    Rectangle,
    /// Right circular cylinder measured by its circumference
    Rounded,
}

impl PondShape {
    /// Resolve a shape selector. Empty or unrecognised selectors are `None`.
    pub fn from_selector(selector: &str) -> Option<Self> {
        selector.parse().ok()
    }

    /// Dimension fields that apply to this shape, in form order.
    pub fn fields(self) -> &'static [DimensionField] {
        match self {
            PondShape::Rectangle => &[
                DimensionField::Length,
                DimensionField::Width,
                DimensionField::Depth,
            ],
            PondShape::Rounded => &[DimensionField::Circumference, DimensionField::Depth],
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    TS,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DimensionField {
    Length,
    Width,
    Depth,
    Circumference,
}

/// What to do with dimension text that is not a number.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Coercion {
    /// Treat it as zero
    #[default]
    Coerce,
    /// Report it as [`GeometryError::Unparseable`]
    Reject,
}

/// Sign contract for dimension values.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignRule {
    #[default]
    Allow,
    RejectNegative,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct DimensionPolicy {
    #[serde(default)]
    pub coercion: Coercion,
    #[serde(default)]
    pub sign: SignRule,
}

impl DimensionPolicy {
    /// Blank means zero, negatives pass through.
    pub const PERMISSIVE: Self = Self {
        coercion: Coercion::Coerce,
        sign: SignRule::Allow,
    };

    pub const STRICT: Self = Self {
        coercion: Coercion::Reject,
        sign: SignRule::RejectNegative,
    };
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{field} is not a number: {raw:?}")]
    Unparseable { field: DimensionField, raw: String },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: DimensionField, value: f64 },
}

/// Raw dimension text as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct RawDimensions {
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub depth: String,
    #[serde(default)]
    pub circumference: String,
}

impl RawDimensions {
    pub fn get(&self, field: DimensionField) -> &str {
        match field {
            DimensionField::Length => &self.length,
            DimensionField::Width => &self.width,
            DimensionField::Depth => &self.depth,
            DimensionField::Circumference => &self.circumference,
        }
    }

    pub fn set(&mut self, field: DimensionField, value: impl Into<String>) {
        let slot = match field {
            DimensionField::Length => &mut self.length,
            DimensionField::Width => &mut self.width,
            DimensionField::Depth => &mut self.depth,
            DimensionField::Circumference => &mut self.circumference,
        };
        *slot = value.into();
    }
}

/// Transient shape input backing a pond form. Never persisted itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct PondShapeInput {
    /// Raw selector value, empty until the user picks a shape
    #[serde(default)]
    pub shape: String,
    #[serde(flatten)]
    pub dimensions: RawDimensions,
}

impl PondShapeInput {
    pub fn rectangle(
        length: impl Into<String>,
        width: impl Into<String>,
        depth: impl Into<String>,
    ) -> Self {
        Self {
            shape: PondShape::Rectangle.to_string(),
            dimensions: RawDimensions {
                length: length.into(),
                width: width.into(),
                depth: depth.into(),
                ..Default::default()
            },
        }
    }

    pub fn rounded(circumference: impl Into<String>, depth: impl Into<String>) -> Self {
        Self {
            shape: PondShape::Rounded.to_string(),
            dimensions: RawDimensions {
                circumference: circumference.into(),
                depth: depth.into(),
                ..Default::default()
            },
        }
    }

    pub fn selected_shape(&self) -> Option<PondShape> {
        PondShape::from_selector(&self.shape)
    }

    pub fn compute(&self) -> Option<PondSizeResult> {
        compute_size(&self.shape, &self.dimensions)
    }

    pub fn compute_with(
        &self,
        policy: DimensionPolicy,
    ) -> Result<Option<PondSizeResult>, GeometryError> {
        compute_size_with(policy, &self.shape, &self.dimensions)
    }
}

/// Normalised shape metadata, tagged by `shape`. Only the fields of the
/// chosen shape exist, so switching shape cannot leave stale dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum PondMeta {
    Rectangle { length: f64, width: f64, depth: f64 },
    Rounded { circumference: f64, depth: f64 },
}

impl PondMeta {
    pub fn shape(&self) -> PondShape {
        match self {
            PondMeta::Rectangle { .. } => PondShape::Rectangle,
            PondMeta::Rounded { .. } => PondShape::Rounded,
        }
    }

    /// Volume described by these dimensions.
    pub fn volume(&self) -> f64 {
        match *self {
            PondMeta::Rectangle {
                length,
                width,
                depth,
            } => length * width * depth,
            PondMeta::Rounded {
                circumference,
                depth,
            } => {
                let radius = circumference / (2.0 * PI);
                PI * radius.powi(2) * depth
            }
        }
    }

    pub fn value(&self, field: DimensionField) -> Option<f64> {
        match (*self, field) {
            (PondMeta::Rectangle { length, .. }, DimensionField::Length) => Some(length),
            (PondMeta::Rectangle { width, .. }, DimensionField::Width) => Some(width),
            (PondMeta::Rectangle { depth, .. }, DimensionField::Depth)
            | (PondMeta::Rounded { depth, .. }, DimensionField::Depth) => Some(depth),
            (PondMeta::Rounded { circumference, .. }, DimensionField::Circumference) => {
                Some(circumference)
            }
            _ => None,
        }
    }

    /// Decompose back into form input, e.g. when opening an edit form.
    pub fn to_input(&self) -> PondShapeInput {
        let shape = self.shape();
        let mut input = PondShapeInput {
            shape: shape.to_string(),
            dimensions: RawDimensions::default(),
        };
        for field in shape.fields() {
            input
                .dimensions
                .set(*field, field_text(self.value(*field)));
        }
        input
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct PondSizeResult {
    pub size: f64,
    pub meta: PondMeta,
}

/// Compute a pond's size under the permissive policy.
///
/// Returns `None` when `shape` is not a known selector, meaning the caller
/// keeps whatever size it had before.
pub fn compute_size(shape: &str, dimensions: &RawDimensions) -> Option<PondSizeResult> {
    let shape = PondShape::from_selector(shape)?;
    let Ok(meta) = build_meta::<Infallible>(shape, |field| Ok(coerce(dimensions.get(field))));
    Some(PondSizeResult {
        size: meta.volume(),
        meta,
    })
}

pub fn compute_size_with(
    policy: DimensionPolicy,
    shape: &str,
    dimensions: &RawDimensions,
) -> Result<Option<PondSizeResult>, GeometryError> {
    let Some(shape) = PondShape::from_selector(shape) else {
        return Ok(None);
    };
    let meta = build_meta(shape, |field| {
        let raw = dimensions.get(field);
        let value = match policy.coercion {
            Coercion::Coerce => coerce(raw),
            Coercion::Reject => strict(raw).ok_or_else(|| GeometryError::Unparseable {
                field,
                raw: raw.to_string(),
            })?,
        };
        if policy.sign == SignRule::RejectNegative && value < 0.0 {
            return Err(GeometryError::Negative { field, value });
        }
        Ok(value)
    })?;
    Ok(Some(PondSizeResult {
        size: meta.volume(),
        meta,
    }))
}

fn build_meta<E>(
    shape: PondShape,
    mut value: impl FnMut(DimensionField) -> Result<f64, E>,
) -> Result<PondMeta, E> {
    Ok(match shape {
        PondShape::Rectangle => PondMeta::Rectangle {
            length: value(DimensionField::Length)?,
            width: value(DimensionField::Width)?,
            depth: value(DimensionField::Depth)?,
        },
        PondShape::Rounded => PondMeta::Rounded {
            circumference: value(DimensionField::Circumference)?,
            depth: value(DimensionField::Depth)?,
        },
    })
}

/// Permissive parse: longest numeric prefix, anything else (and NaN) is 0.
fn coerce(raw: &str) -> f64 {
    parse_leading_float(raw)
        .filter(|v| !v.is_nan() && *v != 0.0)
        .unwrap_or(0.0)
}

fn strict(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the longest leading decimal number of `raw`, so partially typed
/// input such as `"3."` or `"1e"` still yields a value.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Form text for a stored dimension; zero and missing render blank.
fn field_text(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v.to_string(),
        _ => String::new(),
    }
}

/// Pond metadata as persisted by the backend.
///
/// Older records store the selector under `pond_shape`, and records created
/// before shapes existed carry an empty object, so every field is optional.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct StoredPondMeta {
    #[serde(default, alias = "pond_shape", skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[ts(as = "Option<f64>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circumference: Option<f64>,
}

impl StoredPondMeta {
    fn get(&self, field: DimensionField) -> Option<f64> {
        match field {
            DimensionField::Length => self.length,
            DimensionField::Width => self.width,
            DimensionField::Depth => self.depth,
            DimensionField::Circumference => self.circumference,
        }
    }

    /// Normalised metadata, if the stored shape is one we know.
    pub fn to_meta(&self) -> Option<PondMeta> {
        let shape = PondShape::from_selector(self.shape.as_deref()?)?;
        let Ok(meta) = build_meta::<Infallible>(shape, |field| Ok(self.get(field).unwrap_or(0.0)));
        Some(meta)
    }

    /// Populate form input from the stored record. Unknown shapes keep their
    /// raw selector so the form shows exactly what was stored.
    pub fn to_input(&self) -> PondShapeInput {
        let mut input = PondShapeInput {
            shape: self.shape.clone().unwrap_or_default(),
            dimensions: RawDimensions::default(),
        };
        for field in [
            DimensionField::Length,
            DimensionField::Width,
            DimensionField::Depth,
            DimensionField::Circumference,
        ] {
            input.dimensions.set(field, field_text(self.get(field)));
        }
        input
    }
}

impl From<PondMeta> for StoredPondMeta {
    fn from(meta: PondMeta) -> Self {
        let field = |f| meta.value(f);
        Self {
            shape: Some(meta.shape().to_string()),
            length: field(DimensionField::Length),
            width: field(DimensionField::Width),
            depth: field(DimensionField::Depth),
            circumference: field(DimensionField::Circumference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn rectangle_ten_by_four_by_two() {
        let result = PondShapeInput::rectangle("10", "4", "2").compute().unwrap();
        assert_eq!(result.size, 80.0);
        assert_eq!(
            result.meta,
            PondMeta::Rectangle {
                length: 10.0,
                width: 4.0,
                depth: 2.0
            }
        );
    }

    #[test]
    fn rounded_uses_circumference_radius() {
        let result = PondShapeInput::rounded("31.4159", "3").compute().unwrap();
        assert!((result.size - 235.62).abs() < 0.01, "size {}", result.size);

        let c: f64 = 31.4159;
        assert_close(result.size, c * c * 3.0 / (4.0 * PI));
    }

    #[test]
    fn rectangle_matches_product() {
        for (l, w, d) in [(0.0, 1.0, 2.0), (1.5, 2.25, 0.5), (120.0, 45.5, 3.2)] {
            let input = PondShapeInput::rectangle(l.to_string(), w.to_string(), d.to_string());
            assert_eq!(input.compute().unwrap().size, l * w * d);
        }
    }

    #[test]
    fn rounded_matches_closed_form() {
        for (c, d) in [(1.0, 1.0), (62.83, 2.5), (400.0, 0.75)] {
            let input = PondShapeInput::rounded(c.to_string(), d.to_string());
            assert_close(input.compute().unwrap().size, c * c * d / (4.0 * PI));
        }
    }

    #[test]
    fn blank_width_gives_zero_size() {
        let result = PondShapeInput::rectangle("10", "", "2").compute().unwrap();
        assert_eq!(result.size, 0.0);
        assert_eq!(result.meta.value(DimensionField::Width), Some(0.0));
    }

    #[test]
    fn rounded_with_zero_depth_is_empty() {
        let result = PondShapeInput::rounded("500", "0").compute().unwrap();
        assert_eq!(result.size, 0.0);
    }

    #[test]
    fn unknown_shape_computes_nothing() {
        let mut input = PondShapeInput::rectangle("10", "4", "2");
        input.shape = String::new();
        assert!(input.compute().is_none());
        input.shape = "triangle".to_string();
        assert!(input.compute().is_none());
        assert_eq!(
            input.compute_with(DimensionPolicy::STRICT).unwrap(),
            None
        );
    }

    #[test]
    fn rounded_meta_has_no_rectangle_keys() {
        let mut input = PondShapeInput::rectangle("10", "4", "2");
        input.shape = "rounded".to_string();
        input.dimensions.circumference = "20".to_string();

        let json = serde_json::to_value(input.compute().unwrap().meta).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.get("shape").unwrap(), "rounded");
        assert!(obj.contains_key("circumference"));
        assert!(obj.contains_key("depth"));
        assert!(!obj.contains_key("length"));
        assert!(!obj.contains_key("width"));
    }

    #[test]
    fn rectangle_meta_has_no_circumference() {
        let mut input = PondShapeInput::rectangle("10", "4", "2");
        input.dimensions.circumference = "99".to_string();
        let json = serde_json::to_value(input.compute().unwrap().meta).unwrap();
        assert!(!json.as_object().unwrap().contains_key("circumference"));
    }

    #[test]
    fn compute_is_idempotent() {
        let input = PondShapeInput::rounded("12.5", "1.75");
        assert_eq!(input.compute(), input.compute());
    }

    #[test]
    fn meta_volume_reproduces_size() {
        for input in [
            PondShapeInput::rectangle("7.3", "2.1", "1.9"),
            PondShapeInput::rounded("33.3", "2.2"),
        ] {
            let result = input.compute().unwrap();
            assert_eq!(result.meta.volume(), result.size);
            assert_eq!(result.meta.shape(), input.selected_shape().unwrap());
        }
    }

    #[test]
    fn partial_typing_uses_numeric_prefix() {
        assert_eq!(parse_leading_float("3."), Some(3.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("  12m"), Some(12.0));
        assert_eq!(parse_leading_float("-.5"), Some(-0.5));
        assert_eq!(parse_leading_float("2.5e2x"), Some(250.0));
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn negative_dimensions_pass_by_default() {
        let result = PondShapeInput::rectangle("-2", "3", "1").compute().unwrap();
        assert_eq!(result.size, -6.0);
    }

    #[test]
    fn strict_policy_rejects_blank_and_negative() {
        let blank = PondShapeInput::rectangle("10", "", "2");
        assert_eq!(
            blank.compute_with(DimensionPolicy::STRICT),
            Err(GeometryError::Unparseable {
                field: DimensionField::Width,
                raw: String::new()
            })
        );

        let negative = PondShapeInput::rounded("-5", "2");
        assert_eq!(
            negative.compute_with(DimensionPolicy::STRICT),
            Err(GeometryError::Negative {
                field: DimensionField::Circumference,
                value: -5.0
            })
        );

        let prefix = PondShapeInput::rectangle("10m", "4", "2");
        assert!(prefix.compute_with(DimensionPolicy::STRICT).is_err());
    }

    #[test]
    fn permissive_policy_matches_compute_size() {
        let input = PondShapeInput::rectangle("4", "x", "2");
        assert_eq!(
            input.compute_with(DimensionPolicy::PERMISSIVE).unwrap(),
            input.compute()
        );
    }

    #[test]
    fn meta_decomposes_into_form_input() {
        let meta = PondMeta::Rounded {
            circumference: 31.5,
            depth: 2.0,
        };
        let input = meta.to_input();
        assert_eq!(input.shape, "rounded");
        assert_eq!(input.dimensions.circumference, "31.5");
        assert_eq!(input.dimensions.depth, "2");
        assert!(input.dimensions.length.is_empty());
        assert_eq!(input.compute().unwrap().meta, meta);
    }

    #[test]
    fn stored_meta_accepts_legacy_shape_key() {
        let stored: StoredPondMeta = serde_json::from_str(
            r#"{"pond_shape":"rectangle","length":10,"width":"4","depth":2}"#,
        )
        .unwrap();
        assert_eq!(
            stored.to_meta(),
            Some(PondMeta::Rectangle {
                length: 10.0,
                width: 4.0,
                depth: 2.0
            })
        );
        assert_eq!(stored.to_input().dimensions.width, "4");
    }

    #[test]
    fn empty_stored_meta_decomposes_to_blank_form() {
        let stored: StoredPondMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(stored.to_meta(), None);
        assert_eq!(stored.to_input(), PondShapeInput::default());
    }

    #[test]
    fn stored_meta_from_rounded_skips_rectangle_fields() {
        let stored = StoredPondMeta::from(PondMeta::Rounded {
            circumference: 10.0,
            depth: 1.0,
        });
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"shape": "rounded", "circumference": 10.0, "depth": 1.0})
        );
    }
}
