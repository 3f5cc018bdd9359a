use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{checks, DealRef, Entity, EntityId, EntityResource, UserRef};
use crate::error::FieldError;

/// 余额变动事件类型（Notification 也复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceLogEvent {
    NewDealOpen,
    LoanTaken,
    PercentCharge,
    DealPayment,
    DealClosed,
}

impl BalanceLogEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewDealOpen => "NEW_DEAL_OPEN",
            Self::LoanTaken => "LOAN_TAKEN",
            Self::PercentCharge => "PERCENT_CHARGE",
            Self::DealPayment => "DEAL_PAYMENT",
            Self::DealClosed => "DEAL_CLOSED",
        }
    }
}

/// 账户余额变动记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_changed: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<BalanceLogEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<DealRef>,
}

impl BalanceLog {
    /// 变动后的余额
    pub fn new_value(&self) -> Option<f64> {
        Some(self.old_value? + self.amount_changed?)
    }
}

impl Entity for BalanceLog {
    const RESOURCE: EntityResource = EntityResource::BalanceLog;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        checks::required(&mut errors, "date", &self.date);
        checks::number(&mut errors, "oldValue", self.old_value, None);
        checks::number(&mut errors, "amountChanged", self.amount_changed, None);
        checks::required(&mut errors, "type", &self.event_type);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_log_type_field_is_renamed() {
        let log: BalanceLog = serde_json::from_str(
            r#"{"id":5,"date":"2020-03-01T00:00:00Z","oldValue":100.0,"amountChanged":-25.5,
                "type":"DEAL_PAYMENT","account":{"id":4},"deal":{"id":9}}"#,
        )
        .unwrap();
        assert_eq!(log.event_type, Some(BalanceLogEvent::DealPayment));
        assert_eq!(log.deal, Some(DealRef::new(9)));
        assert_eq!(log.new_value(), Some(74.5));

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["type"], "DEAL_PAYMENT");
        assert!(json.get("eventType").is_none());
    }

    #[test]
    fn balance_log_requires_all_scalars() {
        let errors = BalanceLog::default().validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["date", "oldValue", "amountChanged", "type"]);
    }
}
