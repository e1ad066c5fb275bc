//! Typed data model and JSON codec for the XMS batch SMS/MMS REST API.
//!
//! The crate is split into a domain layer of strong, validated types, a transport
//! layer that owns the wire format (property names, `type` discriminators, hex and
//! timestamp encodings), and a small [`Codec`] facade. It performs no network I/O:
//! it produces request bodies and query strings and consumes response and callback
//! bodies.
//!
//! ```rust
//! use xms::{BatchCreate, BatchOptions, Codec, Msisdn, ReportType, Sender, TextMessage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let batch = BatchCreate::text(
//!         Msisdn::list(["+46701234567"])?,
//!         TextMessage::new("hello"),
//!         BatchOptions {
//!             sender: Some(Sender::new("12345")?),
//!             delivery_report: Some(ReportType::Summary),
//!             ..Default::default()
//!         },
//!     )?;
//!
//!     let codec = Codec::new();
//!     let body = codec.encode_batch_create(&batch)?;
//!     assert_eq!(codec.decode_batch_create(&body)?, batch);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod codec;
pub mod domain;
mod transport;

pub use codec::{Codec, CodecBuilder, JsonStyle, query_string};
pub use domain::{
    AutoUpdate, BatchCreate, BatchDeliveryReport, BatchDeliveryReportParams, BatchFilter, BatchId,
    BatchMessage, BatchOptions, BatchReportDetail, BatchResult, BatchUpdate, BatchUpdateMessage,
    BatchUpdateOptions, BinaryMessage, BinaryUpdate, Callback, CallbackUrl, DeliveryFeedback,
    DeliveryReportFilter, DeliveryStatus, DryRunRecipient, DryRunResult, GroupCreate, GroupFilter,
    GroupId, GroupResult, GroupUpdate, Inbound, InboundId, InboundMessage, InboundsFilter,
    KeywordPair, KnownDeliveryStatus, MediaBody, MessageChannel, MmsMessage, MmsUpdate, Msisdn,
    Page, ParameterValues, Parameters, PhoneNumber, RecipientDeliveryReport, ReportType, Sender,
    StatusBucket, Tags, TagsUpdate, TextMessage, TextUpdate, Timestamp, ValidationError,
};
pub use transport::DecodingError;
