use std::collections::{BTreeMap, BTreeSet};

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    CallbackUrl, GroupId, Msisdn, ReportType, Sender, Timestamp, parse_http_url,
};

/// Settings shared by every batch variant.
///
/// All fields are optional; `None` leaves the server default in place and is omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub sender: Option<Sender>,
    pub delivery_report: Option<ReportType>,
    /// Scheduled send time; `None` or a past time sends immediately.
    pub send_at: Option<Timestamp>,
    /// Messages not delivered by this time expire.
    pub expire_at: Option<Timestamp>,
    pub callback_url: Option<CallbackUrl>,
    pub feedback_enabled: Option<bool>,
    /// Echoed back in delivery reports and callbacks for this batch.
    pub client_reference: Option<String>,
}

/// Substitution values for one template parameter of a text or MMS batch.
///
/// Invariant: no substitution is keyed by the reserved name [`ParameterValues::DEFAULT_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterValues {
    substitutions: BTreeMap<String, String>,
    default_value: Option<String>,
}

impl ParameterValues {
    /// Wire key holding the fallback value.
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn new(
        substitutions: BTreeMap<String, String>,
        default_value: Option<String>,
    ) -> Result<Self, ValidationError> {
        if substitutions.contains_key(Self::DEFAULT_KEY) {
            return Err(ValidationError::ReservedKey {
                key: Self::DEFAULT_KEY,
            });
        }
        Ok(Self {
            substitutions,
            default_value,
        })
    }

    /// Parameter that resolves to `value` for every recipient.
    pub fn with_default(value: impl Into<String>) -> Self {
        Self {
            substitutions: BTreeMap::new(),
            default_value: Some(value.into()),
        }
    }

    /// Per-recipient substitutions, keyed by recipient address.
    pub fn substitutions(&self) -> &BTreeMap<String, String> {
        &self.substitutions
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Value the server substitutes for `recipient`.
    pub fn resolve(&self, recipient: &str) -> Option<&str> {
        self.substitutions
            .get(recipient)
            .map(String::as_str)
            .or(self.default_value.as_deref())
    }
}

/// Template parameters by name.
pub type Parameters = BTreeMap<String, ParameterValues>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    body: String,
    parameters: Parameters,
}

impl TextMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            parameters: Parameters::new(),
        }
    }

    /// Attach substitution values for the `${name}` placeholder in the body.
    pub fn with_parameter(mut self, name: impl Into<String>, values: ParameterValues) -> Self {
        self.parameters.insert(name.into(), values);
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Raw binary SMS payload.
///
/// Neither the body nor the UDH is inspected; the server validates their content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMessage {
    body: Vec<u8>,
    udh: Vec<u8>,
}

impl BinaryMessage {
    pub fn new(body: impl Into<Vec<u8>>, udh: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            udh: udh.into(),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// User Data Header bytes.
    pub fn udh(&self) -> &[u8] {
        &self.udh
    }
}

/// Media reference of an MMS batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBody {
    url: url::Url,
    message: Option<String>,
}

impl MediaBody {
    /// JSON property holding the media location (`url`).
    pub const FIELD: &'static str = "url";

    /// Reference media hosted at `url` (absolute `http`/`https`).
    pub fn new(url: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            url: parse_http_url(Self::FIELD, url.into())?,
            message: None,
        })
    }

    /// Text shown alongside the media.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmsMessage {
    body: MediaBody,
    parameters: Parameters,
    strict_validation: Option<bool>,
}

impl MmsMessage {
    pub fn new(body: MediaBody) -> Self {
        Self {
            body,
            parameters: Parameters::new(),
            strict_validation: None,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, values: ParameterValues) -> Self {
        self.parameters.insert(name.into(), values);
        self
    }

    /// Ask the server to reject media that fails its content checks.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = Some(strict);
        self
    }

    pub fn body(&self) -> &MediaBody {
        &self.body
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn strict_validation(&self) -> Option<bool> {
        self.strict_validation
    }
}

/// Payload of an outbound (MT) batch, one variant per `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchMessage {
    Text(TextMessage),
    Binary(BinaryMessage),
    Mms(MmsMessage),
}

/// A validated outbound batch.
///
/// Invariant: at least one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCreate {
    recipients: Vec<Msisdn>,
    message: BatchMessage,
    options: BatchOptions,
}

impl BatchCreate {
    pub fn new(
        recipients: Vec<Msisdn>,
        message: BatchMessage,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: Msisdn::FIELD,
            });
        }
        Ok(Self {
            recipients,
            message,
            options,
        })
    }

    pub fn text(
        recipients: Vec<Msisdn>,
        message: TextMessage,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        Self::new(recipients, BatchMessage::Text(message), options)
    }

    pub fn binary(
        recipients: Vec<Msisdn>,
        message: BinaryMessage,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        Self::new(recipients, BatchMessage::Binary(message), options)
    }

    pub fn mms(
        recipients: Vec<Msisdn>,
        message: MmsMessage,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        Self::new(recipients, BatchMessage::Mms(message), options)
    }

    pub fn recipients(&self) -> &[Msisdn] {
        &self.recipients
    }

    pub fn message(&self) -> &BatchMessage {
        &self.message
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }
}

/// Batch settings that can be changed after submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchUpdateOptions {
    pub sender: Option<Sender>,
    pub delivery_report: Option<ReportType>,
    pub send_at: Option<Timestamp>,
    pub expire_at: Option<Timestamp>,
    pub callback_url: Option<CallbackUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextUpdate {
    pub body: Option<String>,
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryUpdate {
    pub body: Option<Vec<u8>>,
    pub udh: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MmsUpdate {
    pub body: Option<MediaBody>,
    pub parameters: Option<Parameters>,
    pub strict_validation: Option<bool>,
}

/// Payload changes of a batch update; the variant must match the batch being updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchUpdateMessage {
    Text(TextUpdate),
    Binary(BinaryUpdate),
    Mms(MmsUpdate),
}

/// Changes to a batch that has not been sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchUpdate {
    recipient_insertions: Vec<Msisdn>,
    recipient_removals: Vec<Msisdn>,
    message: BatchUpdateMessage,
    options: BatchUpdateOptions,
}

impl BatchUpdate {
    pub fn new(message: BatchUpdateMessage, options: BatchUpdateOptions) -> Self {
        Self {
            recipient_insertions: Vec::new(),
            recipient_removals: Vec::new(),
            message,
            options,
        }
    }

    pub fn add_recipients(mut self, recipients: impl IntoIterator<Item = Msisdn>) -> Self {
        self.recipient_insertions.extend(recipients);
        self
    }

    pub fn remove_recipients(mut self, recipients: impl IntoIterator<Item = Msisdn>) -> Self {
        self.recipient_removals.extend(recipients);
        self
    }

    pub fn recipient_insertions(&self) -> &[Msisdn] {
        &self.recipient_insertions
    }

    pub fn recipient_removals(&self) -> &[Msisdn] {
        &self.recipient_removals
    }

    pub fn message(&self) -> &BatchUpdateMessage {
        &self.message
    }

    pub fn options(&self) -> &BatchUpdateOptions {
        &self.options
    }
}

/// Keyword trigger of an [`AutoUpdate`]. Either word may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordPair {
    pub first_word: Option<String>,
    pub second_word: Option<String>,
}

impl KeywordPair {
    pub fn new(first_word: impl Into<String>) -> Self {
        Self {
            first_word: Some(first_word.into()),
            second_word: None,
        }
    }

    pub fn with_second_word(mut self, word: impl Into<String>) -> Self {
        self.second_word = Some(word.into());
        self
    }
}

/// Lets end users join or leave a group by texting a keyword to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoUpdate {
    recipient: Msisdn,
    add: Option<KeywordPair>,
    remove: Option<KeywordPair>,
}

impl AutoUpdate {
    pub fn new(recipient: Msisdn) -> Self {
        Self {
            recipient,
            add: None,
            remove: None,
        }
    }

    pub fn on_add(mut self, keywords: KeywordPair) -> Self {
        self.add = Some(keywords);
        self
    }

    pub fn on_remove(mut self, keywords: KeywordPair) -> Self {
        self.remove = Some(keywords);
        self
    }

    /// MSISDN or short code that receives the trigger messages.
    pub fn recipient(&self) -> &Msisdn {
        &self.recipient
    }

    pub fn add(&self) -> Option<&KeywordPair> {
        self.add.as_ref()
    }

    pub fn remove(&self) -> Option<&KeywordPair> {
        self.remove.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCreate {
    pub name: Option<String>,
    pub members: BTreeSet<Msisdn>,
    pub child_groups: BTreeSet<GroupId>,
    pub auto_update: Option<AutoUpdate>,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub member_insertions: BTreeSet<Msisdn>,
    pub member_removals: BTreeSet<Msisdn>,
    /// Copy every member of this group into the updated group.
    pub add_from_group: Option<GroupId>,
    /// Drop every member of this group from the updated group.
    pub remove_from_group: Option<GroupId>,
    pub auto_update: Option<AutoUpdate>,
}

/// Tag changes for a batch or group.
///
/// Invariant: insertions and removals are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsUpdate {
    insertions: BTreeSet<String>,
    removals: BTreeSet<String>,
}

impl TagsUpdate {
    pub fn new(
        insertions: BTreeSet<String>,
        removals: BTreeSet<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(tag) = insertions.intersection(&removals).next() {
            return Err(ValidationError::OverlappingTags { tag: tag.clone() });
        }
        Ok(Self {
            insertions,
            removals,
        })
    }

    pub fn insertions(&self) -> &BTreeSet<String> {
        &self.insertions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }
}

/// Confirms successful delivery to the listed recipients of a batch sent with
/// `feedback_enabled`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryFeedback {
    recipients: Vec<Msisdn>,
}

impl DeliveryFeedback {
    pub fn new(recipients: Vec<Msisdn>) -> Self {
        Self { recipients }
    }

    pub fn recipients(&self) -> &[Msisdn] {
        &self.recipients
    }
}
