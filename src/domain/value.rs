use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::domain::validation::ValidationError;

use phonenumber::country;

/// Point in time with the UTC offset it was expressed in (`send_at`, `received_at`, ...).
///
/// Equality compares instants; the offset is kept for rendering.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient or originator address: an MSISDN or a short code (`to`).
///
/// Invariant: must not be empty. The value is kept exactly as provided; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`Msisdn`].
pub struct Msisdn(String);

impl Msisdn {
    /// JSON property used for recipients (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) address.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Validate a whole list of addresses, failing on the first empty one.
    pub fn list<I, S>(values: I) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::new).collect()
    }

    /// Borrow the address as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Msisdn {
    fn from(value: PhoneNumber) -> Self {
        value.msisdn
    }
}

#[derive(Debug, Clone)]
/// Phone number parsed with `phonenumber`, used to normalize batch recipients and
/// inbound originators to the E.164 form XMS reports back (`+46701234567`).
///
/// Two numbers are equal when their E.164 forms are; ordering and hashing follow suit.
pub struct PhoneNumber {
    input: String,
    msisdn: Msisdn,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse a number, falling back to `default_region` when it has no country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input: String = input.into();
        let input = input.trim().to_owned();
        if input.is_empty() {
            return Err(ValidationError::Empty {
                field: Msisdn::FIELD,
            });
        }

        let parsed = match phonenumber::parse(default_region, &input) {
            Ok(parsed) => parsed,
            Err(_) => return Err(ValidationError::InvalidPhoneNumber { input }),
        };
        let e164 = parsed.format().mode(phonenumber::Mode::E164).to_string();

        Ok(Self {
            input,
            msisdn: Msisdn(e164),
            parsed,
        })
    }

    /// Normalize a recipient list for [`BatchCreate`](crate::BatchCreate) and friends.
    pub fn recipients<I, S>(
        default_region: Option<country::Id>,
        inputs: I,
    ) -> Result<Vec<Msisdn>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        inputs
            .into_iter()
            .map(|input| Self::parse(default_region, input).map(Msisdn::from))
            .collect()
    }

    /// Input as given, minus surrounding whitespace.
    pub fn raw(&self) -> &str {
        &self.input
    }

    pub fn e164(&self) -> &str {
        self.msisdn.as_str()
    }

    /// The recipient address this number is sent to.
    pub fn msisdn(&self) -> &Msisdn {
        &self.msisdn
    }

    /// Region the number belongs to, when `phonenumber` can tell.
    pub fn country(&self) -> Option<country::Id> {
        self.parsed.country().id()
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.msisdn == other.msisdn
    }
}

impl Eq for PhoneNumber {}

impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.msisdn.hash(state);
    }
}

impl PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.msisdn.cmp(&other.msisdn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Batch originator (`from`): an MSISDN, short code or alphanumeric sender.
///
/// Invariant: must not be empty.
pub struct Sender(String);

impl Sender {
    /// JSON property used by XMS (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`Sender`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the sender as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Server-assigned batch identifier.
///
/// Invariant: non-empty after trimming.
pub struct BatchId(String);

impl BatchId {
    /// JSON property used by XMS (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`BatchId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated batch id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Server-assigned group identifier.
///
/// Invariant: non-empty after trimming.
pub struct GroupId(String);

impl GroupId {
    /// JSON property used by XMS (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`GroupId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated group id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Server-assigned identifier of an inbound (MO) message.
///
/// Invariant: non-empty after trimming.
pub struct InboundId(String);

impl InboundId {
    /// JSON property used by XMS (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`InboundId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated inbound id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// URL the platform posts delivery reports and inbound messages to (`callback_url`).
///
/// Invariant: absolute `http` or `https` URL.
pub struct CallbackUrl(url::Url);

impl CallbackUrl {
    /// JSON property used by XMS (`callback_url`).
    pub const FIELD: &'static str = "callback_url";

    /// Parse and validate a callback URL.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        parse_http_url(Self::FIELD, value.into()).map(Self)
    }

    /// Serialized form of the URL.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The parsed URL.
    pub fn url(&self) -> &url::Url {
        &self.0
    }
}

pub(crate) fn parse_http_url(
    field: &'static str,
    value: String,
) -> Result<url::Url, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let invalid = || ValidationError::InvalidUrl {
        field,
        input: trimmed.to_owned(),
    };
    let parsed = url::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of delivery report requested for a batch (`delivery_report`).
pub enum ReportType {
    /// No delivery report callback.
    None,
    /// One callback per batch with per-status counts.
    Summary,
    /// Like [`ReportType::Summary`], also listing the recipients per status.
    Full,
    /// One callback per recipient and status change.
    PerRecipient,
    /// One callback per recipient, only for final statuses.
    PerRecipientFinal,
}

impl ReportType {
    /// JSON property used by XMS (`delivery_report`).
    pub const FIELD: &'static str = "delivery_report";

    /// Wire name of this report type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Summary => "summary",
            Self::Full => "full",
            Self::PerRecipient => "per_recipient",
            Self::PerRecipientFinal => "per_recipient_final",
        }
    }

    /// Look up a report type by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "none" => Self::None,
            "summary" => Self::Summary,
            "full" => Self::Full,
            "per_recipient" => Self::PerRecipient,
            "per_recipient_final" => Self::PerRecipientFinal,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Delivery status reported by XMS (`status`).
///
/// This value is preserved as-is even when the status is unknown to this crate.
pub struct DeliveryStatus(String);

impl DeliveryStatus {
    /// JSON property used by XMS (`status`).
    pub const FIELD: &'static str = "status";

    /// Construct a status from its wire name.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Wire name as provided by XMS.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this status to a known variant, if one exists.
    pub fn known_kind(&self) -> Option<KnownDeliveryStatus> {
        KnownDeliveryStatus::from_name(&self.0)
    }
}

impl From<KnownDeliveryStatus> for DeliveryStatus {
    fn from(value: KnownDeliveryStatus) -> Self {
        Self(value.as_str().to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Delivery statuses documented by XMS.
pub enum KnownDeliveryStatus {
    Queued,
    Dispatched,
    Aborted,
    Rejected,
    Delivered,
    Failed,
    Expired,
    Unknown,
}

impl KnownDeliveryStatus {
    /// Convert a wire status name into a known variant.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Queued" => Self::Queued,
            "Dispatched" => Self::Dispatched,
            "Aborted" => Self::Aborted,
            "Rejected" => Self::Rejected,
            "Delivered" => Self::Delivered,
            "Failed" => Self::Failed,
            "Expired" => Self::Expired,
            "Unknown" => Self::Unknown,
            _ => return None,
        })
    }

    /// Wire name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Dispatched => "Dispatched",
            Self::Aborted => "Aborted",
            Self::Rejected => "Rejected",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Expired => "Expired",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether the message is still on its way (no final outcome yet).
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Queued | Self::Dispatched)
    }
}
