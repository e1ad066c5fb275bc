use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DecodingError;
use super::batch::msisdns_to_wire;
use super::wire::{format_timestamp, from_str, parse_optional_timestamp, required, validated};
use crate::domain::{
    AutoUpdate, DeliveryFeedback, GroupCreate, GroupId, GroupResult, GroupUpdate, KeywordPair,
    Msisdn, Tags, TagsUpdate,
};

const CHILD_GROUPS: &str = "child_groups";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireKeywordPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    second_word: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAutoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    add: Option<WireKeywordPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remove: Option<WireKeywordPair>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireGroupCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    members: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    child_groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_update: Option<WireAutoUpdate>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireGroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remove: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    add_from_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remove_from_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_update: Option<WireAutoUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireGroupResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    child_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_update: Option<WireAutoUpdate>,
}

/// Both arrays are always present, even when empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTagsUpdate {
    #[serde(default)]
    add: BTreeSet<String>,
    #[serde(default)]
    remove: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTags {
    #[serde(default)]
    tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireDeliveryFeedback {
    recipients: Vec<String>,
}

pub fn encode_group_create(group: &GroupCreate) -> WireGroupCreate {
    WireGroupCreate {
        name: group.name.clone(),
        members: group
            .members
            .iter()
            .map(|member| member.as_str().to_owned())
            .collect(),
        child_groups: group_ids_to_wire(&group.child_groups),
        auto_update: group.auto_update.as_ref().map(auto_update_to_wire),
        tags: group.tags.clone(),
    }
}

pub fn encode_group_update(update: &GroupUpdate) -> WireGroupUpdate {
    WireGroupUpdate {
        name: update.name.clone(),
        add: update
            .member_insertions
            .iter()
            .map(|member| member.as_str().to_owned())
            .collect(),
        remove: update
            .member_removals
            .iter()
            .map(|member| member.as_str().to_owned())
            .collect(),
        add_from_group: update
            .add_from_group
            .as_ref()
            .map(|id| id.as_str().to_owned()),
        remove_from_group: update
            .remove_from_group
            .as_ref()
            .map(|id| id.as_str().to_owned()),
        auto_update: update.auto_update.as_ref().map(auto_update_to_wire),
    }
}

pub fn encode_group_result(group: &GroupResult) -> WireGroupResult {
    WireGroupResult {
        id: Some(group.id.as_str().to_owned()),
        name: group.name.clone(),
        size: Some(group.size),
        created_at: group.created_at.as_ref().map(format_timestamp),
        modified_at: group.modified_at.as_ref().map(format_timestamp),
        child_groups: group_ids_to_wire(&group.child_groups),
        auto_update: group.auto_update.as_ref().map(auto_update_to_wire),
    }
}

pub fn decode_group_result_json(json: &str) -> Result<GroupResult, DecodingError> {
    let wire: WireGroupResult = from_str(json)?;
    group_result_from_wire(wire)
}

pub(crate) fn group_result_from_wire(wire: WireGroupResult) -> Result<GroupResult, DecodingError> {
    let id = required(GroupId::FIELD, wire.id)?;
    let child_groups = wire
        .child_groups
        .into_iter()
        .map(|id| validated(CHILD_GROUPS, GroupId::new(id)))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(GroupResult {
        id: validated(GroupId::FIELD, GroupId::new(id))?,
        name: wire.name,
        size: required("size", wire.size)?,
        created_at: parse_optional_timestamp("created_at", wire.created_at)?,
        modified_at: parse_optional_timestamp("modified_at", wire.modified_at)?,
        child_groups,
        auto_update: wire.auto_update.map(auto_update_from_wire).transpose()?,
    })
}

pub fn encode_tags_update(update: &TagsUpdate) -> WireTagsUpdate {
    WireTagsUpdate {
        add: update.insertions().clone(),
        remove: update.removals().clone(),
    }
}

pub fn decode_tags_update_json(json: &str) -> Result<TagsUpdate, DecodingError> {
    let wire: WireTagsUpdate = from_str(json)?;
    validated("add", TagsUpdate::new(wire.add, wire.remove))
}

pub fn encode_tags(tags: &Tags) -> WireTags {
    WireTags {
        tags: tags.tags.clone(),
    }
}

pub fn decode_tags_json(json: &str) -> Result<Tags, DecodingError> {
    let wire: WireTags = from_str(json)?;
    Ok(Tags { tags: wire.tags })
}

pub fn encode_delivery_feedback(feedback: &DeliveryFeedback) -> WireDeliveryFeedback {
    WireDeliveryFeedback {
        recipients: msisdns_to_wire(feedback.recipients()),
    }
}

fn group_ids_to_wire(ids: &BTreeSet<GroupId>) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_owned()).collect()
}

fn keyword_pair_to_wire(pair: &KeywordPair) -> WireKeywordPair {
    WireKeywordPair {
        first_word: pair.first_word.clone(),
        second_word: pair.second_word.clone(),
    }
}

fn auto_update_to_wire(auto_update: &AutoUpdate) -> WireAutoUpdate {
    WireAutoUpdate {
        to: Some(auto_update.recipient().as_str().to_owned()),
        add: auto_update.add().map(keyword_pair_to_wire),
        remove: auto_update.remove().map(keyword_pair_to_wire),
    }
}

fn auto_update_from_wire(wire: WireAutoUpdate) -> Result<AutoUpdate, DecodingError> {
    let to = required(Msisdn::FIELD, wire.to)?;
    let mut auto_update = AutoUpdate::new(validated(Msisdn::FIELD, Msisdn::new(to))?);
    if let Some(add) = wire.add {
        auto_update = auto_update.on_add(KeywordPair {
            first_word: add.first_word,
            second_word: add.second_word,
        });
    }
    if let Some(remove) = wire.remove {
        auto_update = auto_update.on_remove(KeywordPair {
            first_word: remove.first_word,
            second_word: remove.second_word,
        });
    }
    Ok(auto_update)
}
