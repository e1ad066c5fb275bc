//! Transport layer: wire-format details (JSON property names, discriminators,
//! hex and timestamp field encodings, query parameters).

mod batch;
mod delivery_report;
mod filter;
mod group;
mod inbound;
mod page;
mod parameters;
mod wire;

use crate::domain::ValidationError;

pub use batch::{
    decode_batch_create_json, decode_batch_result_json, decode_batch_update_json,
    decode_dry_run_json, encode_batch_create, encode_batch_result, encode_batch_update,
    encode_dry_run,
};
pub use delivery_report::{
    decode_batch_report_json, decode_callback_json, decode_recipient_report_json,
    encode_batch_report, encode_recipient_report,
};
pub use filter::{
    encode_batch_delivery_report_query, encode_batch_filter_query,
    encode_delivery_report_filter_query, encode_group_filter_query, encode_inbounds_filter_query,
};
pub use group::{
    decode_group_result_json, decode_tags_json, decode_tags_update_json, encode_delivery_feedback,
    encode_group_create, encode_group_result, encode_group_update, encode_tags,
    encode_tags_update,
};
pub use inbound::{decode_inbound_json, encode_inbound};
pub use page::{
    decode_batch_page_json, decode_delivery_report_page_json, decode_group_page_json,
    decode_inbound_page_json, encode_batch_page, encode_delivery_report_page, encode_group_page,
    encode_inbound_page,
};
pub use parameters::{decode_parameter_values_json, encode_parameter_values};

/// Errors raised while mapping JSON into domain values.
///
/// Every variant that concerns a single property names it.
#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("unknown {entity} type `{found}`")]
    UnknownType { entity: &'static str, found: String },

    #[error("field `{field}` is not valid hex: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("field `{field}` is not an ISO-8601 timestamp with offset: {source}")]
    InvalidTimestamp {
        field: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("field `{field}` is invalid: {source}")]
    InvalidValue {
        field: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("field `{field}` has unsupported value {value}")]
    UnsupportedValue { field: &'static str, value: String },

    /// A property is present but of the wrong JSON type; `field` is its path
    /// (`udh`, `to[1]`, `statuses[0].count`).
    #[error("field `{field}` has the wrong type: {source}")]
    InvalidType {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodingError {
    /// JSON property the error is about, when it concerns a single one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::UnknownType { .. } => Some(wire::TYPE_FIELD),
            Self::MissingField { field }
            | Self::InvalidHex { field, .. }
            | Self::InvalidTimestamp { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::UnsupportedValue { field, .. } => Some(*field),
            Self::InvalidType { field, .. } => Some(field.as_str()),
        }
    }
}
