use std::collections::BTreeSet;

use crate::domain::request::{AutoUpdate, BatchMessage, BatchOptions};
use crate::domain::value::{
    BatchId, DeliveryStatus, GroupId, InboundId, Msisdn, Timestamp,
};

/// A batch as stored by XMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub id: BatchId,
    pub recipients: Vec<Msisdn>,
    pub message: BatchMessage,
    pub options: BatchOptions,
    pub created_at: Option<Timestamp>,
    pub modified_at: Option<Timestamp>,
    pub canceled: bool,
}

/// Payload of a mobile originated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Text {
        body: String,
        keyword: Option<String>,
    },
    Binary {
        body: Vec<u8>,
        udh: Vec<u8>,
    },
}

/// A mobile originated (MO) message received by one of your numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub id: InboundId,
    pub sender: Msisdn,
    pub recipient: Msisdn,
    pub received_at: Timestamp,
    pub sent_at: Option<Timestamp>,
    pub operator_id: Option<String>,
    pub client_reference: Option<String>,
    pub message: InboundMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageChannel {
    Sms,
    Mms,
}

/// Recipients sharing one delivery status within a batch report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBucket {
    pub code: i32,
    pub status: DeliveryStatus,
    pub count: u64,
    /// Only populated for `full` reports.
    pub recipients: Vec<Msisdn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDeliveryReport {
    pub channel: MessageChannel,
    pub batch_id: BatchId,
    pub total_message_count: u64,
    pub statuses: Vec<StatusBucket>,
    pub client_reference: Option<String>,
}

impl BatchDeliveryReport {
    /// Number of messages currently reported with `status`.
    pub fn count_for(&self, status: &DeliveryStatus) -> u64 {
        self.statuses
            .iter()
            .filter(|bucket| &bucket.status == status)
            .map(|bucket| bucket.count)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientDeliveryReport {
    pub channel: MessageChannel,
    pub batch_id: BatchId,
    pub recipient: Msisdn,
    pub code: i32,
    pub status: DeliveryStatus,
    /// When the status was recorded by XMS.
    pub at: Timestamp,
    pub status_message: Option<String>,
    pub operator: Option<String>,
    pub operator_status_at: Option<Timestamp>,
    pub client_reference: Option<String>,
    pub encoding: Option<String>,
    pub number_of_message_parts: Option<u32>,
}

/// Anything XMS posts to a callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Inbound(Inbound),
    BatchDeliveryReport(BatchDeliveryReport),
    RecipientDeliveryReport(RecipientDeliveryReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    pub id: GroupId,
    pub name: Option<String>,
    /// Number of members.
    pub size: u64,
    pub created_at: Option<Timestamp>,
    pub modified_at: Option<Timestamp>,
    pub child_groups: BTreeSet<GroupId>,
    pub auto_update: Option<AutoUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub tags: BTreeSet<String>,
}

/// Outcome of simulating a batch without sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunResult {
    pub number_of_recipients: u64,
    pub number_of_messages: u64,
    pub per_recipient: Vec<DryRunRecipient>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunRecipient {
    pub recipient: Msisdn,
    pub number_of_parts: u32,
    /// Body after parameter substitution.
    pub body: String,
    pub encoding: String,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Zero-based page index.
    pub page: u32,
    /// Number of entries on this page.
    pub page_size: u32,
    /// Number of entries across all pages.
    pub total_size: u64,
    pub content: Vec<T>,
}

impl<T> Page<T> {
    /// Whether entries remain after this page.
    pub fn has_next(&self, requested_page_size: u32) -> bool {
        let seen = (u64::from(self.page) + 1) * u64::from(requested_page_size);
        requested_page_size > 0 && seen < self.total_size
    }
}
