//! Domain layer: strong types with validation and invariants (no I/O, no serde).

mod filter;
mod request;
mod response;
mod validation;
mod value;

pub use filter::{
    BatchDeliveryReportParams, BatchFilter, BatchReportDetail, DeliveryReportFilter, GroupFilter,
    InboundsFilter,
};
pub use request::{
    AutoUpdate, BatchCreate, BatchMessage, BatchOptions, BatchUpdate, BatchUpdateMessage,
    BatchUpdateOptions, BinaryMessage, BinaryUpdate, DeliveryFeedback, GroupCreate, GroupUpdate,
    KeywordPair, MediaBody, MmsMessage, MmsUpdate, ParameterValues, Parameters, TagsUpdate,
    TextMessage, TextUpdate,
};
pub use response::{
    BatchDeliveryReport, BatchResult, Callback, DryRunRecipient, DryRunResult, GroupResult,
    Inbound, InboundMessage, MessageChannel, Page, RecipientDeliveryReport, StatusBucket, Tags,
};
pub use validation::ValidationError;
pub use value::{
    BatchId, CallbackUrl, DeliveryStatus, GroupId, InboundId, KnownDeliveryStatus, Msisdn,
    PhoneNumber, ReportType, Sender, Timestamp,
};

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    fn recipients() -> Vec<Msisdn> {
        Msisdn::list(["+46701234567", "+46709876543"]).unwrap()
    }

    #[test]
    fn batch_requires_at_least_one_recipient() {
        let err = BatchCreate::text(Vec::new(), TextMessage::new("hi"), BatchOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: Msisdn::FIELD
            }
        );
    }

    #[test]
    fn batch_rejects_empty_recipient_string() {
        let err = Msisdn::list(["+46701234567", ""])
            .and_then(|to| BatchCreate::text(to, TextMessage::new("hi"), BatchOptions::default()))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "to" }));
    }

    #[test]
    fn batch_rejects_empty_sender() {
        let err = Sender::new("")
            .and_then(|sender| {
                BatchCreate::text(
                    recipients(),
                    TextMessage::new("hi"),
                    BatchOptions {
                        sender: Some(sender),
                        ..Default::default()
                    },
                )
            })
            .unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "from" }));
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let batch = BatchCreate::binary(
            recipients(),
            BinaryMessage::new(vec![1], vec![]),
            BatchOptions::default(),
        )
        .unwrap();
        assert_eq!(batch.options(), &BatchOptions::default());
        assert!(batch.options().sender.is_none());
        assert!(batch.options().send_at.is_none());
        assert_eq!(batch.recipients().len(), 2);
        assert!(matches!(batch.message(), BatchMessage::Binary(_)));
    }

    #[test]
    fn binary_payload_is_not_validated() {
        let batch = BatchCreate::binary(
            recipients(),
            BinaryMessage::new(Vec::new(), Vec::new()),
            BatchOptions::default(),
        );
        assert!(batch.is_ok());
    }

    #[test]
    fn parameter_values_reject_reserved_default_key() {
        let mut substitutions = BTreeMap::new();
        substitutions.insert("default".to_owned(), "x".to_owned());
        let err = ParameterValues::new(substitutions, None).unwrap_err();
        assert_eq!(err, ValidationError::ReservedKey { key: "default" });
    }

    #[test]
    fn parameter_values_resolve_falls_back_to_default() {
        let mut substitutions = BTreeMap::new();
        substitutions.insert("123".to_owned(), "A".to_owned());
        let values = ParameterValues::new(substitutions, Some("B".to_owned())).unwrap();

        assert_eq!(values.resolve("123"), Some("A"));
        assert_eq!(values.resolve("456"), Some("B"));
        assert_eq!(ParameterValues::default().resolve("456"), None);
    }

    #[test]
    fn tags_update_requires_disjoint_sets() {
        let add = BTreeSet::from(["a".to_owned(), "b".to_owned()]);
        let remove = BTreeSet::from(["b".to_owned()]);
        let err = TagsUpdate::new(add.clone(), remove).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OverlappingTags {
                tag: "b".to_owned()
            }
        );

        let update = TagsUpdate::new(add, BTreeSet::from(["c".to_owned()])).unwrap();
        assert_eq!(update.insertions().len(), 2);
        assert_eq!(update.removals().len(), 1);
    }

    #[test]
    fn media_body_requires_http_url() {
        let body = MediaBody::new("https://example.com/cat.jpg")
            .unwrap()
            .with_message("meow");
        assert_eq!(body.url().as_str(), "https://example.com/cat.jpg");
        assert_eq!(body.message(), Some("meow"));

        assert!(matches!(
            MediaBody::new("file:///etc/passwd"),
            Err(ValidationError::InvalidUrl { field: "url", .. })
        ));
    }

    #[test]
    fn batch_update_collects_recipient_changes() {
        let update = BatchUpdate::new(
            BatchUpdateMessage::Text(TextUpdate {
                body: Some("new body".to_owned()),
                ..Default::default()
            }),
            BatchUpdateOptions::default(),
        )
        .add_recipients(Msisdn::list(["111"]).unwrap())
        .remove_recipients(Msisdn::list(["222", "333"]).unwrap());

        assert_eq!(update.recipient_insertions().len(), 1);
        assert_eq!(update.recipient_removals().len(), 2);
    }

    #[test]
    fn page_knows_when_more_entries_remain() {
        let page = Page::<()> {
            page: 0,
            page_size: 10,
            total_size: 25,
            content: Vec::new(),
        };
        assert!(page.has_next(10));

        let last = Page::<()> { page: 2, ..page.clone() };
        assert!(!last.has_next(10));
        assert!(!page.has_next(0));
    }

    #[test]
    fn batch_report_counts_by_status() {
        let report = BatchDeliveryReport {
            channel: MessageChannel::Sms,
            batch_id: BatchId::new("b1").unwrap(),
            total_message_count: 3,
            statuses: vec![
                StatusBucket {
                    code: 0,
                    status: KnownDeliveryStatus::Delivered.into(),
                    count: 2,
                    recipients: Vec::new(),
                },
                StatusBucket {
                    code: 400,
                    status: KnownDeliveryStatus::Queued.into(),
                    count: 1,
                    recipients: Vec::new(),
                },
            ],
            client_reference: None,
        };
        assert_eq!(report.count_for(&DeliveryStatus::new("Delivered")), 2);
        assert_eq!(report.count_for(&DeliveryStatus::new("Failed")), 0);
    }
}
