//! 实体模型 - Deal / BalanceLog / Notification
//!
//! 后端 JSON 为 camelCase、时间为 ISO-8601 UTC；关联实体只携带 id（不内嵌）。
//! 所有业务字段都是可选的：没有 id 的实体表示尚未持久化的草稿。

mod entity_resource;
mod deal;
mod balance_log;
mod notification;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::FieldError;

pub use entity_resource::EntityResource;
pub use deal::{Deal, DealStatus, PaymentInterval};
pub use balance_log::{BalanceLog, BalanceLogEvent};
pub use notification::Notification;

/// 实体 ID（后端为 Long）
pub type EntityId = i64;

/// 可同步实体
///
/// 每种资源实现一次，EntityStore / EntityClient 以此为泛型参数。
pub trait Entity:
    Clone + Default + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const RESOURCE: EntityResource;

    fn id(&self) -> Option<EntityId>;

    /// store 初始状态里的草稿（默认等同于空实体）
    fn new_draft() -> Self {
        Self::default()
    }

    /// 客户端提交前校验（必填、数字、最小值）
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

/// 用户引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl UserRef {
    pub fn new(id: EntityId) -> Self {
        Self { id: Some(id), login: None }
    }
}

/// Deal 引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRef {
    pub id: Option<EntityId>,
}

impl DealRef {
    pub fn new(id: EntityId) -> Self {
        Self { id: Some(id) }
    }
}

/// 校验辅助
pub(crate) mod checks {
    use crate::error::FieldError;

    pub fn required<T>(errors: &mut Vec<FieldError>, field: &'static str, value: &Option<T>) {
        if value.is_none() {
            errors.push(FieldError::Required { field });
        }
    }

    pub fn number(errors: &mut Vec<FieldError>, field: &'static str, value: Option<f64>, min: Option<i64>) {
        match value {
            None => errors.push(FieldError::Required { field }),
            Some(v) if !v.is_finite() => errors.push(FieldError::NotANumber { field }),
            Some(v) => {
                if let Some(min) = min {
                    if v < min as f64 {
                        errors.push(FieldError::BelowMinimum { field, min });
                    }
                }
            }
        }
    }
}
