//! Codec layer: renders domain values as JSON text and query strings, and parses
//! responses and callbacks back into domain values.

use serde::Serialize;

use crate::domain::{
    BatchCreate, BatchDeliveryReport, BatchDeliveryReportParams, BatchFilter, BatchResult,
    BatchUpdate, Callback, DeliveryFeedback, DeliveryReportFilter, DryRunResult, GroupCreate,
    GroupFilter, GroupResult, GroupUpdate, Inbound, InboundsFilter, Page, ParameterValues,
    RecipientDeliveryReport, Tags, TagsUpdate,
};
use crate::transport::{self, DecodingError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Layout of the JSON text produced by [`Codec`].
pub enum JsonStyle {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Indented, one property per line.
    Pretty,
}

#[derive(Debug, Clone, Default)]
/// Builder for [`Codec`].
pub struct CodecBuilder {
    style: JsonStyle,
}

impl CodecBuilder {
    /// Create a builder producing compact JSON.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how encoded JSON is laid out.
    pub fn style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    /// Build a [`Codec`].
    pub fn build(self) -> Codec {
        Codec { style: self.style }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Entry point for mapping XMS resources to and from their wire form.
///
/// Encoding only fails if the serializer itself does; every domain value is valid by
/// construction. Decoding failures are [`DecodingError`]s naming the offending field and
/// are logged at `debug` level.
pub struct Codec {
    style: JsonStyle,
}

impl Codec {
    /// Create a codec producing compact JSON.
    ///
    /// For more customization, use [`Codec::builder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a codec with custom settings.
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    pub fn style(&self) -> JsonStyle {
        self.style
    }

    /// Request body for `POST /batches` (and `POST /batches/dry_run`).
    pub fn encode_batch_create(&self, batch: &BatchCreate) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_batch_create(batch))
    }

    pub fn decode_batch_create(&self, json: &str) -> Result<BatchCreate, DecodingError> {
        logged("batch", transport::decode_batch_create_json(json))
    }

    pub fn encode_batch_result(&self, batch: &BatchResult) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_batch_result(batch))
    }

    pub fn decode_batch_result(&self, json: &str) -> Result<BatchResult, DecodingError> {
        logged("batch result", transport::decode_batch_result_json(json))
    }

    /// Request body for `POST /batches/{id}`.
    pub fn encode_batch_update(&self, update: &BatchUpdate) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_batch_update(update))
    }

    pub fn decode_batch_update(&self, json: &str) -> Result<BatchUpdate, DecodingError> {
        logged("batch update", transport::decode_batch_update_json(json))
    }

    pub fn encode_dry_run(&self, result: &DryRunResult) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_dry_run(result))
    }

    pub fn decode_dry_run(&self, json: &str) -> Result<DryRunResult, DecodingError> {
        logged("dry run", transport::decode_dry_run_json(json))
    }

    pub fn encode_inbound(&self, inbound: &Inbound) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_inbound(inbound))
    }

    pub fn decode_inbound(&self, json: &str) -> Result<Inbound, DecodingError> {
        logged("inbound", transport::decode_inbound_json(json))
    }

    pub fn encode_batch_report(
        &self,
        report: &BatchDeliveryReport,
    ) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_batch_report(report))
    }

    pub fn decode_batch_report(&self, json: &str) -> Result<BatchDeliveryReport, DecodingError> {
        logged(
            "batch delivery report",
            transport::decode_batch_report_json(json),
        )
    }

    pub fn encode_recipient_report(
        &self,
        report: &RecipientDeliveryReport,
    ) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_recipient_report(report))
    }

    pub fn decode_recipient_report(
        &self,
        json: &str,
    ) -> Result<RecipientDeliveryReport, DecodingError> {
        logged(
            "recipient delivery report",
            transport::decode_recipient_report_json(json),
        )
    }

    /// Decode a request body XMS posted to your callback URL.
    pub fn decode_callback(&self, json: &str) -> Result<Callback, DecodingError> {
        logged("callback", transport::decode_callback_json(json))
    }

    pub fn encode_group_create(&self, group: &GroupCreate) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_group_create(group))
    }

    pub fn encode_group_update(&self, update: &GroupUpdate) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_group_update(update))
    }

    pub fn encode_group_result(&self, group: &GroupResult) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_group_result(group))
    }

    pub fn decode_group_result(&self, json: &str) -> Result<GroupResult, DecodingError> {
        logged("group", transport::decode_group_result_json(json))
    }

    /// Request body for `POST /batches/{id}/tags` and `POST /groups/{id}/tags`.
    pub fn encode_tags_update(&self, update: &TagsUpdate) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_tags_update(update))
    }

    pub fn decode_tags_update(&self, json: &str) -> Result<TagsUpdate, DecodingError> {
        logged("tags update", transport::decode_tags_update_json(json))
    }

    pub fn encode_tags(&self, tags: &Tags) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_tags(tags))
    }

    pub fn decode_tags(&self, json: &str) -> Result<Tags, DecodingError> {
        logged("tags", transport::decode_tags_json(json))
    }

    pub fn encode_delivery_feedback(
        &self,
        feedback: &DeliveryFeedback,
    ) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_delivery_feedback(feedback))
    }

    pub fn encode_parameter_values(
        &self,
        values: &ParameterValues,
    ) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_parameter_values(values))
    }

    pub fn decode_parameter_values(&self, json: &str) -> Result<ParameterValues, DecodingError> {
        logged(
            "parameter values",
            transport::decode_parameter_values_json(json),
        )
    }

    pub fn encode_batch_page(&self, page: &Page<BatchResult>) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_batch_page(page))
    }

    pub fn encode_inbound_page(&self, page: &Page<Inbound>) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_inbound_page(page))
    }

    pub fn encode_group_page(&self, page: &Page<GroupResult>) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_group_page(page))
    }

    pub fn encode_delivery_report_page(
        &self,
        page: &Page<RecipientDeliveryReport>,
    ) -> Result<String, serde_json::Error> {
        self.render(&transport::encode_delivery_report_page(page))
    }

    pub fn decode_batch_page(&self, json: &str) -> Result<Page<BatchResult>, DecodingError> {
        logged("batch page", transport::decode_batch_page_json(json))
    }

    pub fn decode_inbound_page(&self, json: &str) -> Result<Page<Inbound>, DecodingError> {
        logged("inbound page", transport::decode_inbound_page_json(json))
    }

    pub fn decode_group_page(&self, json: &str) -> Result<Page<GroupResult>, DecodingError> {
        logged("group page", transport::decode_group_page_json(json))
    }

    pub fn decode_delivery_report_page(
        &self,
        json: &str,
    ) -> Result<Page<RecipientDeliveryReport>, DecodingError> {
        logged(
            "delivery report page",
            transport::decode_delivery_report_page_json(json),
        )
    }

    /// Query parameters for `GET /batches`.
    pub fn batch_filter_query(&self, filter: &BatchFilter, page: u32) -> Vec<(String, String)> {
        transport::encode_batch_filter_query(filter, page)
    }

    /// Query parameters for `GET /groups`.
    pub fn group_filter_query(&self, filter: &GroupFilter, page: u32) -> Vec<(String, String)> {
        transport::encode_group_filter_query(filter, page)
    }

    /// Query parameters for `GET /inbounds`.
    pub fn inbounds_filter_query(
        &self,
        filter: &InboundsFilter,
        page: u32,
    ) -> Vec<(String, String)> {
        transport::encode_inbounds_filter_query(filter, page)
    }

    /// Query parameters for `GET /delivery_reports`.
    pub fn delivery_report_filter_query(
        &self,
        filter: &DeliveryReportFilter,
        page: u32,
    ) -> Vec<(String, String)> {
        transport::encode_delivery_report_filter_query(filter, page)
    }

    /// Query parameters for `GET /batches/{id}/delivery_report`.
    pub fn batch_delivery_report_query(
        &self,
        params: &BatchDeliveryReportParams,
    ) -> Vec<(String, String)> {
        transport::encode_batch_delivery_report_query(params)
    }

    fn render<T: Serialize>(&self, wire: &T) -> Result<String, serde_json::Error> {
        match self.style {
            JsonStyle::Compact => serde_json::to_string(wire),
            JsonStyle::Pretty => serde_json::to_string_pretty(wire),
        }
    }
}

/// Percent-encode query pairs into `key=value&...` form.
pub fn query_string(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn logged<T>(entity: &'static str, result: Result<T, DecodingError>) -> Result<T, DecodingError> {
    if let Err(err) = &result {
        tracing::debug!(entity, field = err.field(), error = %err, "failed to decode");
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::domain::{
        BatchOptions, BatchReportDetail, InboundMessage, KnownDeliveryStatus, MediaBody,
        MmsMessage, Msisdn, TextMessage,
    };

    use super::*;

    fn text_batch() -> BatchCreate {
        BatchCreate::text(
            Msisdn::list(["+46701234567"]).unwrap(),
            TextMessage::new("hi"),
            BatchOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn builder_defaults_to_compact() {
        assert_eq!(Codec::new(), Codec::builder().build());
        assert_eq!(Codec::default().style(), JsonStyle::Compact);

        let json = Codec::new().encode_batch_create(&text_batch()).unwrap();
        assert_eq!(json, r#"{"type":"mt_text","to":["+46701234567"],"body":"hi"}"#);
    }

    #[test]
    fn pretty_style_indents_and_still_decodes() {
        let codec = Codec::builder().style(JsonStyle::Pretty).build();
        let json = codec.encode_batch_create(&text_batch()).unwrap();
        assert!(json.contains("\n  \"type\": \"mt_text\""));
        assert_eq!(codec.decode_batch_create(&json).unwrap(), text_batch());
    }

    #[test]
    fn mms_batch_round_trips_through_codec() {
        let codec = Codec::new();
        let batch = BatchCreate::mms(
            Msisdn::list(["123"]).unwrap(),
            MmsMessage::new(MediaBody::new("https://example.com/a.png").unwrap()),
            BatchOptions::default(),
        )
        .unwrap();
        let json = codec.encode_batch_create(&batch).unwrap();
        assert_eq!(
            json,
            r#"{"type":"mt_media","to":["123"],"body":{"url":"https://example.com/a.png"}}"#
        );
        assert_eq!(codec.decode_batch_create(&json).unwrap(), batch);
    }

    #[test]
    fn decode_errors_surface_unchanged() {
        let err = Codec::new()
            .decode_batch_create(r#"{"type":"mt_text","to":["1"]}"#)
            .unwrap_err();
        assert_eq!(err.field(), Some("body"));
        assert_eq!(err.to_string(), "missing required field `body`");

        let err = Codec::new().decode_inbound("not json").unwrap_err();
        assert!(matches!(err, DecodingError::Json(_)));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn wrong_typed_fields_are_named() {
        let err = Codec::new()
            .decode_batch_create(r#"{"type":"mt_binary","to":["1"],"body":"00","udh":5}"#)
            .unwrap_err();
        assert_eq!(err.field(), Some("udh"));
        assert!(err.to_string().starts_with("field `udh` has the wrong type"));
    }

    #[test]
    fn pages_round_trip_through_codec() {
        let codec = Codec::builder().style(JsonStyle::Pretty).build();
        let page = Page {
            page: 0,
            page_size: 0,
            total_size: 0,
            content: Vec::<GroupResult>::new(),
        };
        let json = codec.encode_group_page(&page).unwrap();
        assert!(json.contains("\"groups\": []"));
        assert_eq!(codec.decode_group_page(&json).unwrap(), page);
    }

    #[test]
    fn callback_through_codec() {
        let callback = Codec::new()
            .decode_callback(
                r#"{"type":"mo_binary","id":"i","from":"1","to":"2","body":"0a","udh":"","received_at":"2024-06-01T11:00:00Z"}"#,
            )
            .unwrap();
        match callback {
            Callback::Inbound(inbound) => assert_eq!(
                inbound.message,
                InboundMessage::Binary {
                    body: vec![0x0A],
                    udh: Vec::new(),
                }
            ),
            other => panic!("unexpected callback: {other:?}"),
        }
    }

    #[test]
    fn queries_render_as_url_encoded_strings() {
        let codec = Codec::new();
        let filter = BatchFilter {
            tags: BTreeSet::from(["a b".to_owned(), "c&d".to_owned()]),
            ..Default::default()
        };
        assert_eq!(
            query_string(&codec.batch_filter_query(&filter, 0)),
            "page=0&tags=a+b%2Cc%26d"
        );

        let params = BatchDeliveryReportParams {
            detail: Some(BatchReportDetail::Summary),
            statuses: BTreeSet::from([KnownDeliveryStatus::Delivered.into()]),
            ..Default::default()
        };
        assert_eq!(
            query_string(&codec.batch_delivery_report_query(&params)),
            "type=summary&status=Delivered"
        );
    }
}
