use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{checks, Entity, EntityId, EntityResource, UserRef};
use crate::error::FieldError;

/// 还款周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentInterval {
    Day,
    Month,
    Year,
    /// 一次性还款
    OneTime,
    AllTime,
}

impl PaymentInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
            Self::OneTime => "ONE_TIME",
            Self::AllTime => "ALL_TIME",
        }
    }
}

/// Deal 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStatus {
    Pending,
    Active,
    Closed,
    Success,
}

impl DealStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
            Self::Success => "SUCCESS",
        }
    }
}

/// 借贷交易
///
/// `fine` 与三个布尔开关只存在于新版 schema，旧后端不返回时保持 None。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_open: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_become_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_every: Option<PaymentInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DealStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_payment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capitalization: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_payment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitter: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserRef>,
}

impl Entity for Deal {
    const RESOURCE: EntityResource = EntityResource::Deal;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        checks::required(&mut errors, "dateOpen", &self.date_open);
        checks::required(&mut errors, "endDate", &self.end_date);
        checks::number(&mut errors, "startBalance", self.start_balance, Some(0));
        checks::number(&mut errors, "percent", self.percent, Some(0));
        checks::number(&mut errors, "successRate", self.success_rate.map(f64::from), None);
        checks::number(&mut errors, "term", self.term.map(f64::from), Some(0));
        errors
    }
}
