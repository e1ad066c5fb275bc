use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DecodingError;
use super::batch::{msisdns_from_wire, msisdns_to_wire};
use super::inbound::{MO_BINARY, MO_TEXT, decode_inbound_value};
use super::wire::{
    Tagged, format_timestamp, from_value, lookup, parse_optional_timestamp, parse_timestamp,
    required, validated,
};
use crate::domain::{
    BatchDeliveryReport, BatchId, Callback, DeliveryStatus, MessageChannel, Msisdn,
    RecipientDeliveryReport, StatusBucket,
};

const DELIVERY_REPORT_SMS: &str = "delivery_report_sms";
const DELIVERY_REPORT_MMS: &str = "delivery_report_mms";
const RECIPIENT_DELIVERY_REPORT_SMS: &str = "recipient_delivery_report_sms";
const RECIPIENT_DELIVERY_REPORT_MMS: &str = "recipient_delivery_report_mms";

const BATCH_ID: &str = "batch_id";

const BATCH_REPORTS: &[(&str, MessageChannel)] = &[
    (DELIVERY_REPORT_SMS, MessageChannel::Sms),
    (DELIVERY_REPORT_MMS, MessageChannel::Mms),
];

const RECIPIENT_REPORTS: &[(&str, MessageChannel)] = &[
    (RECIPIENT_DELIVERY_REPORT_SMS, MessageChannel::Sms),
    (RECIPIENT_DELIVERY_REPORT_MMS, MessageChannel::Mms),
];

type CallbackDecoder = fn(Value) -> Result<Callback, DecodingError>;

const CALLBACKS: &[(&str, CallbackDecoder)] = &[
    (MO_TEXT, inbound_callback),
    (MO_BINARY, inbound_callback),
    (DELIVERY_REPORT_SMS, batch_report_callback),
    (DELIVERY_REPORT_MMS, batch_report_callback),
    (RECIPIENT_DELIVERY_REPORT_SMS, recipient_report_callback),
    (RECIPIENT_DELIVERY_REPORT_MMS, recipient_report_callback),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireBatchReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_message_count: Option<u64>,
    #[serde(default)]
    statuses: Vec<WireStatusBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireStatusBucket {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRecipientReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator_status_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number_of_message_parts: Option<u32>,
}

pub fn encode_batch_report(report: &BatchDeliveryReport) -> Tagged<WireBatchReport> {
    let kind = match report.channel {
        MessageChannel::Sms => DELIVERY_REPORT_SMS,
        MessageChannel::Mms => DELIVERY_REPORT_MMS,
    };
    Tagged::new(
        kind,
        WireBatchReport {
            batch_id: Some(report.batch_id.as_str().to_owned()),
            total_message_count: Some(report.total_message_count),
            statuses: report
                .statuses
                .iter()
                .map(|bucket| WireStatusBucket {
                    code: Some(bucket.code),
                    status: Some(bucket.status.as_str().to_owned()),
                    count: Some(bucket.count),
                    recipients: msisdns_to_wire(&bucket.recipients),
                })
                .collect(),
            client_reference: report.client_reference.clone(),
        },
    )
}

pub fn decode_batch_report_json(json: &str) -> Result<BatchDeliveryReport, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    decode_batch_report_value(value)
}

pub(crate) fn decode_batch_report_value(
    value: Value,
) -> Result<BatchDeliveryReport, DecodingError> {
    let channel = *lookup("batch delivery report", &value, BATCH_REPORTS)?;
    let wire: WireBatchReport = from_value(value)?;

    let statuses = wire
        .statuses
        .into_iter()
        .map(|bucket| {
            let status = required(DeliveryStatus::FIELD, bucket.status)?;
            Ok(StatusBucket {
                code: required("code", bucket.code)?,
                status: DeliveryStatus::new(status),
                count: required("count", bucket.count)?,
                recipients: msisdns_from_wire("recipients", bucket.recipients)?,
            })
        })
        .collect::<Result<Vec<_>, DecodingError>>()?;

    Ok(BatchDeliveryReport {
        channel,
        batch_id: batch_id(wire.batch_id)?,
        total_message_count: required("total_message_count", wire.total_message_count)?,
        statuses,
        client_reference: wire.client_reference,
    })
}

pub fn encode_recipient_report(report: &RecipientDeliveryReport) -> Tagged<WireRecipientReport> {
    let kind = match report.channel {
        MessageChannel::Sms => RECIPIENT_DELIVERY_REPORT_SMS,
        MessageChannel::Mms => RECIPIENT_DELIVERY_REPORT_MMS,
    };
    Tagged::new(
        kind,
        WireRecipientReport {
            batch_id: Some(report.batch_id.as_str().to_owned()),
            recipient: Some(report.recipient.as_str().to_owned()),
            code: Some(report.code),
            status: Some(report.status.as_str().to_owned()),
            status_message: report.status_message.clone(),
            operator: report.operator.clone(),
            at: Some(format_timestamp(&report.at)),
            operator_status_at: report.operator_status_at.as_ref().map(format_timestamp),
            client_reference: report.client_reference.clone(),
            encoding: report.encoding.clone(),
            number_of_message_parts: report.number_of_message_parts,
        },
    )
}

pub fn decode_recipient_report_json(
    json: &str,
) -> Result<RecipientDeliveryReport, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    decode_recipient_report_value(value)
}

pub(crate) fn decode_recipient_report_value(
    value: Value,
) -> Result<RecipientDeliveryReport, DecodingError> {
    let channel = *lookup("recipient delivery report", &value, RECIPIENT_REPORTS)?;
    let wire: WireRecipientReport = from_value(value)?;

    let recipient = required("recipient", wire.recipient)?;
    let at = required("at", wire.at)?;
    Ok(RecipientDeliveryReport {
        channel,
        batch_id: batch_id(wire.batch_id)?,
        recipient: validated("recipient", Msisdn::new(recipient))?,
        code: required("code", wire.code)?,
        status: DeliveryStatus::new(required(DeliveryStatus::FIELD, wire.status)?),
        at: parse_timestamp("at", &at)?,
        status_message: wire.status_message,
        operator: wire.operator,
        operator_status_at: parse_optional_timestamp(
            "operator_status_at",
            wire.operator_status_at,
        )?,
        client_reference: wire.client_reference,
        encoding: wire.encoding,
        number_of_message_parts: wire.number_of_message_parts,
    })
}

/// Decode anything posted to a callback URL: inbound messages and both report shapes.
pub fn decode_callback_json(json: &str) -> Result<Callback, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    let decode = *lookup("callback", &value, CALLBACKS)?;
    decode(value)
}

fn inbound_callback(value: Value) -> Result<Callback, DecodingError> {
    decode_inbound_value(value).map(Callback::Inbound)
}

fn batch_report_callback(value: Value) -> Result<Callback, DecodingError> {
    decode_batch_report_value(value).map(Callback::BatchDeliveryReport)
}

fn recipient_report_callback(value: Value) -> Result<Callback, DecodingError> {
    decode_recipient_report_value(value).map(Callback::RecipientDeliveryReport)
}

fn batch_id(value: Option<String>) -> Result<BatchId, DecodingError> {
    validated(BATCH_ID, BatchId::new(required(BATCH_ID, value)?))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::{InboundMessage, KnownDeliveryStatus};

    const FULL_REPORT: &str = r#"
    {
      "type": "delivery_report_sms",
      "batch_id": "3SD49KIOW8lL1Z5E",
      "total_message_count": 3,
      "statuses": [
        {"code": 0, "status": "Delivered", "count": 2, "recipients": ["123", "456"]},
        {"code": 401, "status": "Dispatched", "count": 1, "recipients": ["789"]}
      ],
      "client_reference": "campaign-7"
    }
    "#;

    const RECIPIENT_REPORT: &str = r#"
    {
      "type": "recipient_delivery_report_mms",
      "batch_id": "3-mbA7z9wDKY76ag",
      "recipient": "+46701234567",
      "code": 402,
      "status": "Failed",
      "status_message": "unreachable",
      "operator": "35000",
      "at": "2024-06-01T12:00:00.123Z",
      "operator_status_at": "2024-06-01T11:59:59+02:00",
      "encoding": "GSM",
      "number_of_message_parts": 2
    }
    "#;

    #[test]
    fn decode_full_batch_report() {
        let report = decode_batch_report_json(FULL_REPORT).unwrap();
        assert_eq!(report.channel, MessageChannel::Sms);
        assert_eq!(report.batch_id.as_str(), "3SD49KIOW8lL1Z5E");
        assert_eq!(report.statuses.len(), 2);
        assert_eq!(report.statuses[0].recipients.len(), 2);
        assert_eq!(
            report.count_for(&KnownDeliveryStatus::Delivered.into()),
            2
        );
        assert_eq!(report.client_reference.as_deref(), Some("campaign-7"));

        let json = serde_json::to_string(&encode_batch_report(&report)).unwrap();
        assert_eq!(decode_batch_report_json(&json).unwrap(), report);
    }

    #[test]
    fn summary_report_omits_recipients() {
        let json = r#"{"type":"delivery_report_mms","batch_id":"b","total_message_count":1,"statuses":[{"code":0,"status":"Delivered","count":1}]}"#;
        let report = decode_batch_report_json(json).unwrap();
        assert_eq!(report.channel, MessageChannel::Mms);
        assert!(report.statuses[0].recipients.is_empty());

        let encoded = serde_json::to_string(&encode_batch_report(&report)).unwrap();
        assert_eq!(encoded, json);
    }

    #[test]
    fn decode_recipient_report_keeps_unknown_status() {
        let report = decode_recipient_report_json(RECIPIENT_REPORT).unwrap();
        assert_eq!(report.channel, MessageChannel::Mms);
        assert_eq!(report.status.known_kind(), Some(KnownDeliveryStatus::Failed));
        assert_eq!(report.number_of_message_parts, Some(2));
        assert!(report.operator_status_at.is_some());

        let custom = RECIPIENT_REPORT.replace("\"Failed\"", "\"Cancelled\"");
        let report = decode_recipient_report_json(&custom).unwrap();
        assert_eq!(report.status.as_str(), "Cancelled");
        assert_eq!(report.status.known_kind(), None);

        let json = serde_json::to_string(&encode_recipient_report(&report)).unwrap();
        assert_eq!(decode_recipient_report_json(&json).unwrap(), report);
    }

    #[test]
    fn recipient_report_requires_timestamp() {
        let json = r#"{"type":"recipient_delivery_report_sms","batch_id":"b","recipient":"1","code":0,"status":"Delivered"}"#;
        let err = decode_recipient_report_json(json).unwrap_err();
        assert!(matches!(err, DecodingError::MissingField { field: "at" }));
    }

    #[rstest]
    #[case::numeric_at(
        r#"{"type":"recipient_delivery_report_sms","batch_id":"b1","recipient":"1","code":0,"status":"Delivered","at":5}"#,
        "at"
    )]
    #[case::string_code(
        r#"{"type":"recipient_delivery_report_mms","batch_id":"b1","recipient":"1","code":"0","status":"Delivered","at":"2024-06-01T12:00:00Z"}"#,
        "code"
    )]
    #[case::bucket_count(
        r#"{"type":"delivery_report_sms","batch_id":"b1","total_message_count":1,"statuses":[{"code":0,"status":"Delivered","count":"1"}]}"#,
        "statuses[0].count"
    )]
    #[case::bucket_recipient(
        r#"{"type":"delivery_report_sms","batch_id":"b1","total_message_count":1,"statuses":[{"code":0,"status":"Delivered","count":1,"recipients":[4]}]}"#,
        "statuses[0].recipients[0]"
    )]
    fn callback_names_field_of_the_wrong_type(#[case] json: &str, #[case] field: &str) {
        let err = decode_callback_json(json).unwrap_err();
        assert!(matches!(err, DecodingError::InvalidType { .. }), "{err:?}");
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn report_kinds_are_not_interchangeable() {
        let err = decode_batch_report_json(RECIPIENT_REPORT).unwrap_err();
        assert!(matches!(err, DecodingError::UnknownType { .. }));
    }

    #[rstest]
    #[case::batch_report(FULL_REPORT, "batch")]
    #[case::recipient_report(RECIPIENT_REPORT, "recipient")]
    #[case::inbound(
        r#"{"type":"mo_text","id":"i","from":"1","to":"2","body":"hi","received_at":"2024-06-01T11:00:00Z"}"#,
        "inbound"
    )]
    fn callback_dispatches_on_type(#[case] json: &str, #[case] expected: &str) {
        let kind = match decode_callback_json(json).unwrap() {
            Callback::Inbound(inbound) => {
                assert!(matches!(inbound.message, InboundMessage::Text { .. }));
                "inbound"
            }
            Callback::BatchDeliveryReport(_) => "batch",
            Callback::RecipientDeliveryReport(_) => "recipient",
        };
        assert_eq!(kind, expected);
    }

    #[test]
    fn callback_rejects_outbound_batches() {
        let err = decode_callback_json(r#"{"type":"mt_text","to":["1"],"body":"x"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            DecodingError::UnknownType {
                entity: "callback",
                ..
            }
        ));
    }
}
