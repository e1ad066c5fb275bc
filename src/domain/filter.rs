use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::value::{DeliveryStatus, Msisdn, Sender, Timestamp};

/// Narrows a batch listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFilter {
    pub page_size: Option<u32>,
    pub senders: BTreeSet<Sender>,
    pub tags: BTreeSet<String>,
    /// Only batches created on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Only batches created before this date.
    pub end_date: Option<NaiveDate>,
    pub client_reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    pub page_size: Option<u32>,
    pub tags: BTreeSet<String>,
}

/// Narrows an inbound message listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundsFilter {
    pub page_size: Option<u32>,
    pub recipients: BTreeSet<Msisdn>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Narrows a recipient delivery report listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReportFilter {
    pub page_size: Option<u32>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub statuses: BTreeSet<DeliveryStatus>,
    pub codes: BTreeSet<i32>,
    pub client_reference: Option<String>,
}

/// Level of detail of a batch delivery report query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BatchReportDetail {
    #[default]
    Summary,
    /// Summary plus the recipients of every status bucket.
    Full,
}

impl BatchReportDetail {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Full => "full",
        }
    }
}

/// Query for the delivery report of a single batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeliveryReportParams {
    pub detail: Option<BatchReportDetail>,
    pub statuses: BTreeSet<DeliveryStatus>,
    pub codes: BTreeSet<i32>,
}
