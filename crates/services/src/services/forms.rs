use models::pond_geometry::GeometryError;
use thiserror::Error;

/// Whether a form submits a new record or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit { id: String },
}

impl FormMode {
    pub fn record_id(&self) -> Option<&str> {
        match self {
            FormMode::Create => None,
            FormMode::Edit { id } => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid {field}: {value:?}")]
    InvalidChoice { field: &'static str, value: String },
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Trimmed value of a required text field.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Parse a choice field through its `FromStr` impl.
pub(crate) fn choice<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    trimmed.parse().map_err(|_| FormError::InvalidChoice {
        field,
        value: value.to_string(),
    })
}
