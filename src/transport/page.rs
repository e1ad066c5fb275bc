use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DecodingError;
use super::batch::{WireBatchResult, decode_batch_result_value, encode_batch_result};
use super::delivery_report::{
    WireRecipientReport, decode_recipient_report_value, encode_recipient_report,
};
use super::group::{WireGroupResult, encode_group_result, group_result_from_wire};
use super::inbound::{WireInbound, decode_inbound_value, encode_inbound};
use super::wire::{Tagged, from_str, from_value, required};
use crate::domain::{BatchResult, GroupResult, Inbound, Page, RecipientDeliveryReport};

const BATCHES: &str = "batches";
const INBOUNDS: &str = "inbounds";
const GROUPS: &str = "groups";
const DELIVERY_REPORTS: &str = "delivery_reports";

/// Listing envelope without its content array.
#[derive(Debug, Deserialize)]
struct WirePageHeader {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
    #[serde(default)]
    count: Option<u64>,
}

/// Listing envelope; the content array sits under a resource-specific key and
/// is emitted even when empty.
#[derive(Debug, Clone, Serialize)]
pub struct WirePage<W> {
    page: u32,
    page_size: u32,
    count: u64,
    #[serde(flatten)]
    content: BTreeMap<&'static str, Vec<W>>,
}

pub fn encode_batch_page(page: &Page<BatchResult>) -> WirePage<Tagged<WireBatchResult>> {
    encode_page(page, BATCHES, encode_batch_result)
}

pub fn encode_inbound_page(page: &Page<Inbound>) -> WirePage<Tagged<WireInbound>> {
    encode_page(page, INBOUNDS, encode_inbound)
}

pub fn encode_group_page(page: &Page<GroupResult>) -> WirePage<WireGroupResult> {
    encode_page(page, GROUPS, encode_group_result)
}

pub fn encode_delivery_report_page(
    page: &Page<RecipientDeliveryReport>,
) -> WirePage<Tagged<WireRecipientReport>> {
    encode_page(page, DELIVERY_REPORTS, encode_recipient_report)
}

fn encode_page<T, W>(
    page: &Page<T>,
    content_key: &'static str,
    encode_entry: impl Fn(&T) -> W,
) -> WirePage<W> {
    let entries = page.content.iter().map(encode_entry).collect();
    WirePage {
        page: page.page,
        page_size: page.page_size,
        count: page.total_size,
        content: BTreeMap::from([(content_key, entries)]),
    }
}

pub fn decode_batch_page_json(json: &str) -> Result<Page<BatchResult>, DecodingError> {
    decode_page(json, BATCHES, decode_batch_result_value)
}

pub fn decode_inbound_page_json(json: &str) -> Result<Page<Inbound>, DecodingError> {
    decode_page(json, INBOUNDS, decode_inbound_value)
}

pub fn decode_group_page_json(json: &str) -> Result<Page<GroupResult>, DecodingError> {
    decode_page(json, GROUPS, |value| {
        let wire: WireGroupResult = from_value(value)?;
        group_result_from_wire(wire)
    })
}

pub fn decode_delivery_report_page_json(
    json: &str,
) -> Result<Page<RecipientDeliveryReport>, DecodingError> {
    decode_page(json, DELIVERY_REPORTS, decode_recipient_report_value)
}

fn decode_page<T>(
    json: &str,
    content_key: &'static str,
    decode_entry: impl Fn(Value) -> Result<T, DecodingError>,
) -> Result<Page<T>, DecodingError> {
    let mut object: Map<String, Value> = from_str(json)?;
    let entries = object.remove(content_key);
    let header: WirePageHeader = from_value(Value::Object(object))?;

    // An empty page may leave out the content array.
    let content = match entries {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                decode_entry(entry).map_err(|err| within_entry(content_key, index, err))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(DecodingError::UnsupportedValue {
                field: content_key,
                value: other.to_string(),
            });
        }
    };

    Ok(Page {
        page: required("page", header.page)?,
        page_size: required("page_size", header.page_size)?,
        total_size: required("count", header.count)?,
        content,
    })
}

/// Type mismatches inside an entry carry the entry's position in the listing.
fn within_entry(content_key: &str, index: usize, err: DecodingError) -> DecodingError {
    match err {
        DecodingError::InvalidType { field, source } => DecodingError::InvalidType {
            field: format!("{content_key}[{index}].{field}"),
            source,
        },
        other => other,
    }
}
