use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::DecodingError;
use crate::domain::{ReportType, Timestamp, ValidationError};

pub const TYPE_FIELD: &str = "type";

/// Wire object prefixed with its `type` discriminator.
#[derive(Debug, Clone, Serialize)]
pub struct Tagged<T> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Tagged<T> {
    pub fn new(kind: &'static str, body: T) -> Self {
        Self { kind, body }
    }
}

/// Read the `type` discriminator and pick the matching entry of `table`.
pub fn lookup<'t, D>(
    entity: &'static str,
    value: &Value,
    table: &'t [(&'static str, D)],
) -> Result<&'t D, DecodingError> {
    let kind = match value.get(TYPE_FIELD) {
        None | Some(Value::Null) => {
            return Err(DecodingError::MissingField { field: TYPE_FIELD });
        }
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => {
            return Err(DecodingError::UnsupportedValue {
                field: TYPE_FIELD,
                value: other.to_string(),
            });
        }
    };

    let (_, entry) = table
        .iter()
        .find(|(name, _)| *name == kind)
        .ok_or_else(|| DecodingError::UnknownType {
            entity,
            found: kind.to_owned(),
        })?;
    tracing::trace!(entity, kind, "dispatching on discriminator");
    Ok(entry)
}

/// Parse JSON text into a wire struct, naming the property on type mismatches.
pub fn from_str<T: DeserializeOwned>(json: &str) -> Result<T, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    from_value(value)
}

/// Map a JSON value onto a wire struct, naming the property on type mismatches.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, DecodingError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let at_root = err.path().iter().next().is_none();
        let field = err.path().to_string();
        let source = err.into_inner();
        if at_root {
            DecodingError::Json(source)
        } else {
            DecodingError::InvalidType { field, source }
        }
    })
}

/// Map the value of property `field` onto a wire struct; mismatches are
/// reported under `field`.
pub fn from_field_value<T: DeserializeOwned>(
    field: &'static str,
    value: Value,
) -> Result<T, DecodingError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let field = if err.path().iter().next().is_none() {
            field.to_owned()
        } else {
            format!("{field}.{path}")
        };
        DecodingError::InvalidType {
            field,
            source: err.into_inner(),
        }
    })
}

pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, DecodingError> {
    value.ok_or(DecodingError::MissingField { field })
}

pub fn validated<T>(
    field: &'static str,
    result: Result<T, ValidationError>,
) -> Result<T, DecodingError> {
    result.map_err(|source| DecodingError::InvalidValue { field, source })
}

pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, DecodingError> {
    hex::decode(value).map_err(|source| DecodingError::InvalidHex { field, source })
}

pub fn format_timestamp(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(field: &'static str, value: &str) -> Result<Timestamp, DecodingError> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|source| DecodingError::InvalidTimestamp { field, source })
}

pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Timestamp>, DecodingError> {
    value
        .map(|value| parse_timestamp(field, &value))
        .transpose()
}

pub fn parse_report_type(value: Option<String>) -> Result<Option<ReportType>, DecodingError> {
    value
        .map(|name| {
            ReportType::from_name(&name).ok_or(DecodingError::UnsupportedValue {
                field: ReportType::FIELD,
                value: name,
            })
        })
        .transpose()
}

/// Take a JSON string property that may arrive as any JSON value.
pub fn string_value(field: &'static str, value: Value) -> Result<String, DecodingError> {
    match value {
        Value::String(value) => Ok(value),
        other => Err(DecodingError::UnsupportedValue {
            field,
            value: other.to_string(),
        }),
    }
}
