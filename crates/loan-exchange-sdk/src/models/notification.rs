use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{checks, BalanceLogEvent, DealRef, Entity, EntityId, EntityResource, UserRef};
use crate::error::FieldError;

/// 用户通知
///
/// 两个 schema 版本的并集：旧版带 haveRead/message，新版带 type/associatedDeal。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub have_read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<BalanceLogEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_deal: Option<DealRef>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        !self.have_read.unwrap_or(false)
    }
}

impl Entity for Notification {
    const RESOURCE: EntityResource = EntityResource::Notification;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn new_draft() -> Self {
        Self {
            have_read: Some(false),
            ..Default::default()
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        checks::required(&mut errors, "date", &self.date);
        errors
    }
}
