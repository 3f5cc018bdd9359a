//! 各资源的列表过滤条件
//!
//! 参数名与后端列表接口的过滤参数一一对应，未设置的字段不会出现在查询串里。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query::QueryFilter;
use crate::models::{DealStatus, EntityId, PaymentInterval};

fn push<T: ToString>(query: &mut Vec<(String, String)>, name: &str, value: &Option<T>) {
    if let Some(value) = value {
        query.push((name.to_string(), value.to_string()));
    }
}

/// Deal 列表过滤
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealFilter {
    pub for_emitter: Option<EntityId>,
    pub for_recipient: Option<EntityId>,
    pub with_status: Option<DealStatus>,
    /// endDate 下界
    pub end_date_interval_start: Option<DateTime<Utc>>,
    /// endDate 上界
    pub end_date_interval_end: Option<DateTime<Utc>>,
    /// startBalance 下限
    pub with_start_balance: Option<i32>,
    /// successRate 下限
    pub success_rate: Option<i32>,
    pub deal_id: Option<EntityId>,
    pub payment_every: Option<PaymentInterval>,
    pub min_term: Option<i32>,
    /// 指定借款人可见的 Deal：接收人是该用户，或仍处于 PENDING
    pub only_available_to_debtor: Option<EntityId>,
}

impl QueryFilter for DealFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push(&mut query, "forEmitter", &self.for_emitter);
        push(&mut query, "forRecipient", &self.for_recipient);
        push(&mut query, "withStatus", &self.with_status.map(DealStatus::as_str));
        // 后端按毫秒时间戳解析
        push(
            &mut query,
            "endDateIntervalStart",
            &self.end_date_interval_start.map(|d| d.timestamp_millis()),
        );
        push(
            &mut query,
            "endDateIntervalEnd",
            &self.end_date_interval_end.map(|d| d.timestamp_millis()),
        );
        push(&mut query, "withStartBalance", &self.with_start_balance);
        push(&mut query, "successRate", &self.success_rate);
        push(&mut query, "dealId", &self.deal_id);
        push(&mut query, "paymentEvery", &self.payment_every.map(PaymentInterval::as_str));
        push(&mut query, "minTerm", &self.min_term);
        push(&mut query, "onlyAvailableToDebtor", &self.only_available_to_debtor);
        query
    }
}

/// BalanceLog 列表过滤
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLogFilter {
    pub for_user: Option<EntityId>,
    pub for_deal: Option<EntityId>,
    /// 该用户参与（发起或接收）的 Deal 的流水
    pub user_participating_in_deal: Option<EntityId>,
    pub start_days_ago: Option<i32>,
    pub end_days_ago: Option<i32>,
}

impl QueryFilter for BalanceLogFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push(&mut query, "forUser", &self.for_user);
        push(&mut query, "forDeal", &self.for_deal);
        push(&mut query, "userParticipatingInDeal", &self.user_participating_in_deal);
        push(&mut query, "startDaysAgo", &self.start_days_ago);
        push(&mut query, "endDaysAgo", &self.end_days_ago);
        query
    }
}

/// Notification 列表过滤
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFilter {
    pub for_user: Option<EntityId>,
    pub for_deal: Option<EntityId>,
}

impl QueryFilter for NotificationFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push(&mut query, "forUser", &self.for_user);
        push(&mut query, "forDeal", &self.for_deal);
        query
    }
}
