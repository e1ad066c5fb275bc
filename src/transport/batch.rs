use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DecodingError;
use super::parameters::{WireParameters, decode_parameters, encode_parameters, parameters_to_wire};
use super::wire::{
    Tagged, decode_hex, encode_hex, format_timestamp, from_field_value, from_str, from_value,
    lookup, parse_optional_timestamp, parse_report_type, required, string_value, validated,
};
use crate::domain::{
    BatchCreate, BatchId, BatchMessage, BatchOptions, BatchResult, BatchUpdate,
    BatchUpdateMessage, BatchUpdateOptions, BinaryMessage, BinaryUpdate, CallbackUrl,
    DryRunRecipient, DryRunResult, MediaBody, MmsMessage, MmsUpdate, Msisdn, Sender,
    TextMessage, TextUpdate,
};

const MT_TEXT: &str = "mt_text";
const MT_BINARY: &str = "mt_binary";
const MT_MEDIA: &str = "mt_media";

const BODY: &str = "body";
const UDH: &str = "udh";

type PayloadDecoder = fn(&mut WireBatch) -> Result<BatchMessage, DecodingError>;
type UpdateDecoder = fn(&mut WireBatchUpdate) -> Result<BatchUpdateMessage, DecodingError>;

const BATCH_PAYLOADS: &[(&str, PayloadDecoder)] = &[
    (MT_TEXT, text_payload),
    (MT_BINARY, binary_payload),
    (MT_MEDIA, mms_payload),
];

const UPDATE_PAYLOADS: &[(&str, UpdateDecoder)] = &[
    (MT_TEXT, text_update),
    (MT_BINARY, binary_update),
    (MT_MEDIA, mms_update),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    send_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expire_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feedback_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    udh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<WireParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strict_validation: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireBatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    batch: WireBatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified_at: Option<String>,
    canceled: bool,
}

/// Server-assigned properties of a batch result, read next to the `WireBatch`
/// fields of the same object.
#[derive(Debug, Deserialize)]
struct WireBatchMeta {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    modified_at: Option<String>,
    #[serde(default)]
    canceled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireBatchUpdate {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    to_add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    to_remove: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    send_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expire_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    udh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<WireParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strict_validation: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WireMediaBody {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDryRun {
    #[serde(default)]
    number_of_recipients: Option<u64>,
    #[serde(default)]
    number_of_messages: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    per_recipient: Vec<WireDryRunRecipient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireDryRunRecipient {
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    number_of_parts: Option<u32>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

pub fn encode_batch_create(request: &BatchCreate) -> Tagged<WireBatch> {
    let mut wire = WireBatch {
        to: Some(msisdns_to_wire(request.recipients())),
        ..Default::default()
    };
    push_options(&mut wire, request.options());
    let kind = push_payload(&mut wire, request.message());
    Tagged::new(kind, wire)
}

pub fn decode_batch_create_json(json: &str) -> Result<BatchCreate, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    let decode_payload = *lookup("batch", &value, BATCH_PAYLOADS)?;
    let mut wire: WireBatch = from_value(value)?;

    let message = decode_payload(&mut wire)?;
    let recipients = take_recipients(&mut wire)?;
    let options = take_options(&mut wire)?;
    validated(
        Msisdn::FIELD,
        BatchCreate::new(recipients, message, options),
    )
}

pub fn encode_batch_result(result: &BatchResult) -> Tagged<WireBatchResult> {
    let mut batch = WireBatch {
        to: Some(msisdns_to_wire(&result.recipients)),
        ..Default::default()
    };
    push_options(&mut batch, &result.options);
    let kind = push_payload(&mut batch, &result.message);

    Tagged::new(
        kind,
        WireBatchResult {
            id: Some(result.id.as_str().to_owned()),
            batch,
            created_at: result.created_at.as_ref().map(format_timestamp),
            modified_at: result.modified_at.as_ref().map(format_timestamp),
            canceled: result.canceled,
        },
    )
}

pub fn decode_batch_result_json(json: &str) -> Result<BatchResult, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    decode_batch_result_value(value)
}

pub(crate) fn decode_batch_result_value(value: Value) -> Result<BatchResult, DecodingError> {
    let decode_payload = *lookup("batch", &value, BATCH_PAYLOADS)?;
    let WireBatchMeta {
        id,
        created_at,
        modified_at,
        canceled,
    } = from_value(value.clone())?;
    let mut batch: WireBatch = from_value(value)?;

    let id = validated(BatchId::FIELD, BatchId::new(required(BatchId::FIELD, id)?))?;
    let message = decode_payload(&mut batch)?;
    let recipients = take_recipients(&mut batch)?;
    let options = take_options(&mut batch)?;

    Ok(BatchResult {
        id,
        recipients,
        message,
        options,
        created_at: parse_optional_timestamp("created_at", created_at)?,
        modified_at: parse_optional_timestamp("modified_at", modified_at)?,
        canceled: required("canceled", canceled)?,
    })
}

pub fn encode_batch_update(request: &BatchUpdate) -> Tagged<WireBatchUpdate> {
    let options = request.options();
    let mut wire = WireBatchUpdate {
        to_add: msisdns_to_wire(request.recipient_insertions()),
        to_remove: msisdns_to_wire(request.recipient_removals()),
        from: options.sender.as_ref().map(|sender| sender.as_str().to_owned()),
        delivery_report: options
            .delivery_report
            .map(|report| report.as_str().to_owned()),
        send_at: options.send_at.as_ref().map(format_timestamp),
        expire_at: options.expire_at.as_ref().map(format_timestamp),
        callback_url: options
            .callback_url
            .as_ref()
            .map(|url| url.as_str().to_owned()),
        ..Default::default()
    };

    let kind = match request.message() {
        BatchUpdateMessage::Text(update) => {
            wire.body = update.body.clone().map(Value::String);
            wire.parameters = update.parameters.as_ref().map(encode_parameters);
            MT_TEXT
        }
        BatchUpdateMessage::Binary(update) => {
            wire.body = update
                .body
                .as_deref()
                .map(|body| Value::String(encode_hex(body)));
            wire.udh = update.udh.as_deref().map(encode_hex);
            MT_BINARY
        }
        BatchUpdateMessage::Mms(update) => {
            wire.body = update.body.as_ref().map(media_body_to_wire);
            wire.parameters = update.parameters.as_ref().map(encode_parameters);
            wire.strict_validation = update.strict_validation;
            MT_MEDIA
        }
    };
    Tagged::new(kind, wire)
}

pub fn decode_batch_update_json(json: &str) -> Result<BatchUpdate, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    let decode_payload = *lookup("batch update", &value, UPDATE_PAYLOADS)?;
    let mut wire: WireBatchUpdate = from_value(value)?;

    let message = decode_payload(&mut wire)?;
    let options = BatchUpdateOptions {
        sender: wire
            .from
            .take()
            .map(|from| validated(Sender::FIELD, Sender::new(from)))
            .transpose()?,
        delivery_report: parse_report_type(wire.delivery_report.take())?,
        send_at: parse_optional_timestamp("send_at", wire.send_at.take())?,
        expire_at: parse_optional_timestamp("expire_at", wire.expire_at.take())?,
        callback_url: wire
            .callback_url
            .take()
            .map(|url| validated(CallbackUrl::FIELD, CallbackUrl::new(url)))
            .transpose()?,
    };

    Ok(BatchUpdate::new(message, options)
        .add_recipients(msisdns_from_wire("to_add", wire.to_add)?)
        .remove_recipients(msisdns_from_wire("to_remove", wire.to_remove)?))
}

pub fn encode_dry_run(result: &DryRunResult) -> WireDryRun {
    WireDryRun {
        number_of_recipients: Some(result.number_of_recipients),
        number_of_messages: Some(result.number_of_messages),
        per_recipient: result
            .per_recipient
            .iter()
            .map(|entry| WireDryRunRecipient {
                recipient: Some(entry.recipient.as_str().to_owned()),
                number_of_parts: Some(entry.number_of_parts),
                body: Some(entry.body.clone()),
                encoding: Some(entry.encoding.clone()),
            })
            .collect(),
    }
}

pub fn decode_dry_run_json(json: &str) -> Result<DryRunResult, DecodingError> {
    let parsed: WireDryRun = from_str(json)?;
    let per_recipient = parsed
        .per_recipient
        .into_iter()
        .map(|entry| {
            let recipient = required("recipient", entry.recipient)?;
            Ok(DryRunRecipient {
                recipient: validated("recipient", Msisdn::new(recipient))?,
                number_of_parts: required("number_of_parts", entry.number_of_parts)?,
                body: required(BODY, entry.body)?,
                encoding: required("encoding", entry.encoding)?,
            })
        })
        .collect::<Result<Vec<_>, DecodingError>>()?;

    Ok(DryRunResult {
        number_of_recipients: required("number_of_recipients", parsed.number_of_recipients)?,
        number_of_messages: required("number_of_messages", parsed.number_of_messages)?,
        per_recipient,
    })
}

fn push_options(wire: &mut WireBatch, options: &BatchOptions) {
    wire.from = options.sender.as_ref().map(|sender| sender.as_str().to_owned());
    wire.delivery_report = options
        .delivery_report
        .map(|report| report.as_str().to_owned());
    wire.send_at = options.send_at.as_ref().map(format_timestamp);
    wire.expire_at = options.expire_at.as_ref().map(format_timestamp);
    wire.callback_url = options
        .callback_url
        .as_ref()
        .map(|url| url.as_str().to_owned());
    wire.feedback_enabled = options.feedback_enabled;
    wire.client_reference = options.client_reference.clone();
}

fn push_payload(wire: &mut WireBatch, message: &BatchMessage) -> &'static str {
    match message {
        BatchMessage::Text(text) => {
            wire.body = Some(Value::String(text.body().to_owned()));
            wire.parameters = parameters_to_wire(text.parameters());
            MT_TEXT
        }
        BatchMessage::Binary(binary) => {
            wire.body = Some(Value::String(encode_hex(binary.body())));
            wire.udh = Some(encode_hex(binary.udh()));
            MT_BINARY
        }
        BatchMessage::Mms(mms) => {
            wire.body = Some(media_body_to_wire(mms.body()));
            wire.parameters = parameters_to_wire(mms.parameters());
            wire.strict_validation = mms.strict_validation();
            MT_MEDIA
        }
    }
}

fn take_recipients(wire: &mut WireBatch) -> Result<Vec<Msisdn>, DecodingError> {
    let to = required(Msisdn::FIELD, wire.to.take())?;
    msisdns_from_wire(Msisdn::FIELD, to)
}

fn take_options(wire: &mut WireBatch) -> Result<BatchOptions, DecodingError> {
    Ok(BatchOptions {
        sender: wire
            .from
            .take()
            .map(|from| validated(Sender::FIELD, Sender::new(from)))
            .transpose()?,
        delivery_report: parse_report_type(wire.delivery_report.take())?,
        send_at: parse_optional_timestamp("send_at", wire.send_at.take())?,
        expire_at: parse_optional_timestamp("expire_at", wire.expire_at.take())?,
        callback_url: wire
            .callback_url
            .take()
            .map(|url| validated(CallbackUrl::FIELD, CallbackUrl::new(url)))
            .transpose()?,
        feedback_enabled: wire.feedback_enabled.take(),
        client_reference: wire.client_reference.take(),
    })
}

fn text_payload(wire: &mut WireBatch) -> Result<BatchMessage, DecodingError> {
    let body = string_value(BODY, required(BODY, wire.body.take())?)?;
    let parameters = decode_parameters(wire.parameters.take().unwrap_or_default())?;
    let message = parameters
        .into_iter()
        .fold(TextMessage::new(body), |message, (name, values)| {
            message.with_parameter(name, values)
        });
    Ok(BatchMessage::Text(message))
}

fn binary_payload(wire: &mut WireBatch) -> Result<BatchMessage, DecodingError> {
    let body = string_value(BODY, required(BODY, wire.body.take())?)?;
    let udh = required(UDH, wire.udh.take())?;
    Ok(BatchMessage::Binary(BinaryMessage::new(
        decode_hex(BODY, &body)?,
        decode_hex(UDH, &udh)?,
    )))
}

fn mms_payload(wire: &mut WireBatch) -> Result<BatchMessage, DecodingError> {
    let body = media_body_from_wire(required(BODY, wire.body.take())?)?;
    let parameters = decode_parameters(wire.parameters.take().unwrap_or_default())?;
    let mut message = parameters
        .into_iter()
        .fold(MmsMessage::new(body), |message, (name, values)| {
            message.with_parameter(name, values)
        });
    if let Some(strict) = wire.strict_validation.take() {
        message = message.with_strict_validation(strict);
    }
    Ok(BatchMessage::Mms(message))
}

fn text_update(wire: &mut WireBatchUpdate) -> Result<BatchUpdateMessage, DecodingError> {
    Ok(BatchUpdateMessage::Text(TextUpdate {
        body: wire
            .body
            .take()
            .map(|body| string_value(BODY, body))
            .transpose()?,
        parameters: wire.parameters.take().map(decode_parameters).transpose()?,
    }))
}

fn binary_update(wire: &mut WireBatchUpdate) -> Result<BatchUpdateMessage, DecodingError> {
    let body = wire
        .body
        .take()
        .map(|body| string_value(BODY, body))
        .transpose()?;
    Ok(BatchUpdateMessage::Binary(BinaryUpdate {
        body: body.map(|body| decode_hex(BODY, &body)).transpose()?,
        udh: wire
            .udh
            .take()
            .map(|udh| decode_hex(UDH, &udh))
            .transpose()?,
    }))
}

fn mms_update(wire: &mut WireBatchUpdate) -> Result<BatchUpdateMessage, DecodingError> {
    Ok(BatchUpdateMessage::Mms(MmsUpdate {
        body: wire.body.take().map(media_body_from_wire).transpose()?,
        parameters: wire.parameters.take().map(decode_parameters).transpose()?,
        strict_validation: wire.strict_validation.take(),
    }))
}

fn media_body_to_wire(body: &MediaBody) -> Value {
    let mut wire = serde_json::Map::new();
    wire.insert(
        MediaBody::FIELD.to_owned(),
        Value::String(body.url().as_str().to_owned()),
    );
    if let Some(message) = body.message() {
        wire.insert("message".to_owned(), Value::String(message.to_owned()));
    }
    Value::Object(wire)
}

fn media_body_from_wire(value: Value) -> Result<MediaBody, DecodingError> {
    let wire: WireMediaBody = from_field_value(BODY, value)?;
    let url = required(MediaBody::FIELD, wire.url)?;
    let body = validated(MediaBody::FIELD, MediaBody::new(url))?;
    Ok(match wire.message {
        Some(message) => body.with_message(message),
        None => body,
    })
}

pub(crate) fn msisdns_to_wire(values: &[Msisdn]) -> Vec<String> {
    values.iter().map(|value| value.as_str().to_owned()).collect()
}

pub(crate) fn msisdns_from_wire(
    field: &'static str,
    values: Vec<String>,
) -> Result<Vec<Msisdn>, DecodingError> {
    validated(field, Msisdn::list(values))
}
