//! Silobag input validation
//!
//! Field rules are shared by single-record creates and by batch
//! mutations:
//! - weight: finite number > 0
//! - size, species: non-empty strings
//! - bagging_date: calendar date (`YYYY-MM-DD` or an ISO 8601 date-time)
//! - name: optional string

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use super::ValidationError;

/// Validated silobag ready for INSERT
#[derive(Debug, Clone, PartialEq)]
pub struct NewSilobag {
    pub weight: f64,
    pub size: String,
    pub species: String,
    pub bagging_date: NaiveDate,
    pub name: Option<String>,
}

impl NewSilobag {
    /// Validate a create body, checking fields in a fixed order so the
    /// first failing field decides the error code.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use siloctl_server::models::{NewSilobag, ValidationError};
    ///
    /// let body = json!({"weight": 500, "size": "small", "species": "soy", "bagging_date": "2024-01-01"});
    /// assert!(NewSilobag::from_json(body.as_object().unwrap()).is_ok());
    ///
    /// let body = json!({"size": "small"});
    /// assert_eq!(
    ///     NewSilobag::from_json(body.as_object().unwrap()),
    ///     Err(ValidationError::WeightRequired)
    /// );
    /// ```
    pub fn from_json(data: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            weight: weight(data.get("weight"))?,
            size: size(data.get("size"))?,
            species: species(data.get("species"))?,
            bagging_date: bagging_date(data.get("bagging_date"))?,
            name: name(data.get("name"))?,
        })
    }
}

/// Columns a batch update may touch
///
/// `id` and `user_id` are immutable after creation and are not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatableField {
    Name,
    Weight,
    Size,
    Species,
    BaggingDate,
}

impl UpdatableField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Weight,
        Self::Size,
        Self::Species,
        Self::BaggingDate,
    ];

    /// Column name, identical to the JSON key in mutation data.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Weight => "weight",
            Self::Size => "size",
            Self::Species => "species",
            Self::BaggingDate => "bagging_date",
        }
    }
}

/// Partial update of the allowlisted silobag columns
///
/// `None` leaves a column untouched. `name` is nullable, so
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SilobagPatch {
    pub name: Option<Option<String>>,
    pub weight: Option<f64>,
    pub size: Option<String>,
    pub species: Option<String>,
    pub bagging_date: Option<NaiveDate>,
}

impl SilobagPatch {
    /// Build a patch from mutation data.
    ///
    /// Keys outside [`UpdatableField::ALL`] are ignored. Supplied fields
    /// go through the same checks as a create.
    pub fn from_json(data: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut patch = Self::default();

        for field in UpdatableField::ALL {
            let Some(value) = data.get(field.column()) else {
                continue;
            };
            let value = Some(value);
            match field {
                UpdatableField::Name => patch.name = Some(name(value)?),
                UpdatableField::Weight => patch.weight = Some(weight(value)?),
                UpdatableField::Size => patch.size = Some(size(value)?),
                UpdatableField::Species => patch.species = Some(species(value)?),
                UpdatableField::BaggingDate => patch.bagging_date = Some(bagging_date(value)?),
            }
        }

        if patch.is_empty() {
            return Err(ValidationError::NoUpdatableFields);
        }
        Ok(patch)
    }

    /// Fields set on this patch, in column order.
    pub fn fields(&self) -> Vec<UpdatableField> {
        UpdatableField::ALL
            .into_iter()
            .filter(|field| match field {
                UpdatableField::Name => self.name.is_some(),
                UpdatableField::Weight => self.weight.is_some(),
                UpdatableField::Size => self.size.is_some(),
                UpdatableField::Species => self.species.is_some(),
                UpdatableField::BaggingDate => self.bagging_date.is_some(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

fn weight(value: Option<&Value>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::WeightRequired)?;
    match value.as_f64() {
        Some(w) if w.is_finite() && w > 0.0 => Ok(w),
        _ => Err(ValidationError::InvalidWeight),
    }
}

fn size(value: Option<&Value>) -> Result<String, ValidationError> {
    required_text(value, ValidationError::SizeRequired, ValidationError::InvalidSize)
}

fn species(value: Option<&Value>) -> Result<String, ValidationError> {
    required_text(
        value,
        ValidationError::SpeciesRequired,
        ValidationError::InvalidSpecies,
    )
}

fn bagging_date(value: Option<&Value>) -> Result<NaiveDate, ValidationError> {
    let raw = required_text(
        value,
        ValidationError::BaggingDateRequired,
        ValidationError::InvalidBaggingDate,
    )?;
    parse_date(&raw).ok_or(ValidationError::InvalidBaggingDate)
}

fn name(value: Option<&Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidName),
    }
}

/// Missing, null and empty are "required"; other non-strings are "invalid".
fn required_text(
    value: Option<&Value>,
    required: ValidationError,
    invalid: ValidationError,
) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(required),
        Some(Value::String(s)) if s.is_empty() => Err(required),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(invalid),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
