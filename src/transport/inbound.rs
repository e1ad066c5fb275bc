use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DecodingError;
use super::wire::{
    Tagged, decode_hex, encode_hex, format_timestamp, from_value, lookup,
    parse_optional_timestamp, parse_timestamp, required, validated,
};
use crate::domain::{Inbound, InboundId, InboundMessage, Msisdn, Sender};

pub(crate) const MO_TEXT: &str = "mo_text";
pub(crate) const MO_BINARY: &str = "mo_binary";

const BODY: &str = "body";
const UDH: &str = "udh";

type PayloadDecoder = fn(&mut WireInbound) -> Result<InboundMessage, DecodingError>;

const INBOUND_PAYLOADS: &[(&str, PayloadDecoder)] =
    &[(MO_TEXT, text_payload), (MO_BINARY, binary_payload)];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireInbound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    udh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sent_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    received_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_reference: Option<String>,
}

pub fn encode_inbound(inbound: &Inbound) -> Tagged<WireInbound> {
    let mut wire = WireInbound {
        id: Some(inbound.id.as_str().to_owned()),
        from: Some(inbound.sender.as_str().to_owned()),
        to: Some(inbound.recipient.as_str().to_owned()),
        operator_id: inbound.operator_id.clone(),
        sent_at: inbound.sent_at.as_ref().map(format_timestamp),
        received_at: Some(format_timestamp(&inbound.received_at)),
        client_reference: inbound.client_reference.clone(),
        ..Default::default()
    };

    let kind = match &inbound.message {
        InboundMessage::Text { body, keyword } => {
            wire.body = Some(body.clone());
            wire.keyword = keyword.clone();
            MO_TEXT
        }
        InboundMessage::Binary { body, udh } => {
            wire.body = Some(encode_hex(body));
            wire.udh = Some(encode_hex(udh));
            MO_BINARY
        }
    };
    Tagged::new(kind, wire)
}

pub fn decode_inbound_json(json: &str) -> Result<Inbound, DecodingError> {
    let value: Value = serde_json::from_str(json)?;
    decode_inbound_value(value)
}

pub(crate) fn decode_inbound_value(value: Value) -> Result<Inbound, DecodingError> {
    let decode_payload = *lookup("inbound", &value, INBOUND_PAYLOADS)?;
    let mut wire: WireInbound = from_value(value)?;

    let message = decode_payload(&mut wire)?;
    let id = required(InboundId::FIELD, wire.id)?;
    let from = required(Sender::FIELD, wire.from)?;
    let to = required(Msisdn::FIELD, wire.to)?;
    let received_at = required("received_at", wire.received_at)?;

    Ok(Inbound {
        id: validated(InboundId::FIELD, InboundId::new(id))?,
        sender: validated(Sender::FIELD, Msisdn::new(from))?,
        recipient: validated(Msisdn::FIELD, Msisdn::new(to))?,
        received_at: parse_timestamp("received_at", &received_at)?,
        sent_at: parse_optional_timestamp("sent_at", wire.sent_at)?,
        operator_id: wire.operator_id,
        client_reference: wire.client_reference,
        message,
    })
}

fn text_payload(wire: &mut WireInbound) -> Result<InboundMessage, DecodingError> {
    Ok(InboundMessage::Text {
        body: required(BODY, wire.body.take())?,
        keyword: wire.keyword.take(),
    })
}

fn binary_payload(wire: &mut WireInbound) -> Result<InboundMessage, DecodingError> {
    let body = required(BODY, wire.body.take())?;
    let udh = required(UDH, wire.udh.take())?;
    Ok(InboundMessage::Binary {
        body: decode_hex(BODY, &body)?,
        udh: decode_hex(UDH, &udh)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use rstest::rstest;

    use super::*;

    fn inbound(message: InboundMessage) -> Inbound {
        Inbound {
            id: InboundId::new("01XXXXX01234567").unwrap(),
            sender: Msisdn::new("+46701234567").unwrap(),
            recipient: Msisdn::new("54321").unwrap(),
            received_at: DateTime::parse_from_rfc3339("2024-06-01T12:00:00.5+01:00").unwrap(),
            sent_at: Some(DateTime::parse_from_rfc3339("2024-06-01T10:59:59Z").unwrap()),
            operator_id: Some("24001".to_owned()),
            client_reference: None,
            message,
        }
    }

    #[test]
    fn decode_text_inbound() {
        let json = r#"
        {
          "type": "mo_text",
          "id": "01XXXXX01234567",
          "from": "+46701234567",
          "to": "54321",
          "body": "STOP now",
          "keyword": "STOP",
          "received_at": "2024-06-01T11:00:00Z"
        }
        "#;
        let inbound = decode_inbound_json(json).unwrap();
        assert_eq!(inbound.recipient.as_str(), "54321");
        assert!(inbound.sent_at.is_none());
        assert_eq!(
            inbound.message,
            InboundMessage::Text {
                body: "STOP now".to_owned(),
                keyword: Some("STOP".to_owned()),
            }
        );
    }

    #[test]
    fn encode_binary_inbound_as_hex() {
        let inbound = inbound(InboundMessage::Binary {
            body: vec![0x62, 0x6F, 0x64, 0x79],
            udh: vec![0x75, 0x64, 0x68],
        });
        let json = serde_json::to_value(encode_inbound(&inbound)).unwrap();
        assert_eq!(json["type"], "mo_binary");
        assert_eq!(json["body"], "626f6479");
        assert_eq!(json["udh"], "756468");
        assert_eq!(json["received_at"], "2024-06-01T12:00:00.500+01:00");
        assert!(json.get("keyword").is_none());
        assert!(json.get("client_reference").is_none());
    }

    #[rstest]
    #[case::text(InboundMessage::Text { body: "hej".to_owned(), keyword: None })]
    #[case::text_with_keyword(InboundMessage::Text {
        body: "JOIN club".to_owned(),
        keyword: Some("JOIN".to_owned()),
    })]
    #[case::binary(InboundMessage::Binary { body: vec![0x00, 0xFF], udh: vec![0x05, 0x00] })]
    #[case::empty_binary(InboundMessage::Binary { body: Vec::new(), udh: Vec::new() })]
    fn inbound_round_trips(#[case] message: InboundMessage) {
        let original = inbound(message);
        let json = serde_json::to_string(&encode_inbound(&original)).unwrap();
        let decoded = decode_inbound_json(&json).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(
            decoded.received_at.offset(),
            original.received_at.offset()
        );
    }

    #[rstest]
    #[case::no_body(r#"{"type":"mo_text","id":"1","from":"1","to":"2","received_at":"2024-06-01T11:00:00Z"}"#, "body")]
    #[case::no_udh(r#"{"type":"mo_binary","id":"1","from":"1","to":"2","body":"00","received_at":"2024-06-01T11:00:00Z"}"#, "udh")]
    #[case::no_id(r#"{"type":"mo_text","from":"1","to":"2","body":"x","received_at":"2024-06-01T11:00:00Z"}"#, "id")]
    #[case::no_received_at(r#"{"type":"mo_text","id":"1","from":"1","to":"2","body":"x"}"#, "received_at")]
    fn decode_names_missing_field(#[case] json: &str, #[case] field: &str) {
        let err = decode_inbound_json(json).unwrap_err();
        assert!(matches!(err, DecodingError::MissingField { .. }));
        assert_eq!(err.field(), Some(field));
    }

    #[rstest]
    #[case::numeric_body(r#"{"type":"mo_text","id":"1","from":"1","to":"2","body":1234,"received_at":"2024-06-01T11:00:00Z"}"#, "body")]
    #[case::numeric_received_at(r#"{"type":"mo_text","id":"1","from":"1","to":"2","body":"x","received_at":17}"#, "received_at")]
    #[case::array_udh(r#"{"type":"mo_binary","id":"1","from":"1","to":"2","body":"00","udh":[1],"received_at":"2024-06-01T11:00:00Z"}"#, "udh")]
    #[case::boolean_sender(r#"{"type":"mo_text","id":"1","from":true,"to":"2","body":"x","received_at":"2024-06-01T11:00:00Z"}"#, "from")]
    fn decode_names_field_of_the_wrong_type(#[case] json: &str, #[case] field: &str) {
        let err = decode_inbound_json(json).unwrap_err();
        assert!(matches!(err, DecodingError::InvalidType { .. }), "{err:?}");
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn decode_rejects_outbound_type() {
        let err = decode_inbound_json(r#"{"type":"mt_text","body":"x"}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodingError::UnknownType {
                entity: "inbound",
                ..
            }
        ));
    }
}
