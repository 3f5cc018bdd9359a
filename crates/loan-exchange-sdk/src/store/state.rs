use serde::Serialize;

use super::action::MutationKind;
use super::pagination::PaginationLinks;
use crate::error::ErrorPayload;
use crate::models::Entity;

/// Store 所处阶段
///
/// loading / updating 由阶段推导，二者不可能同时为 true。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StorePhase {
    #[default]
    Idle,
    /// 列表拉取中
    Listing,
    /// 单条拉取中
    FetchingOne,
    /// 创建 / 更新 / 删除中
    Mutating(MutationKind),
}

impl StorePhase {
    pub fn is_loading(self) -> bool {
        matches!(self, StorePhase::Listing | StorePhase::FetchingOne)
    }

    pub fn is_updating(self) -> bool {
        matches!(self, StorePhase::Mutating(_))
    }
}

/// 单个资源的状态快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState<E> {
    /// 跨页累积的实体（到达顺序，不去重）
    pub entities: Vec<E>,
    /// 最近一次拉取或变更的实体
    pub entity: E,
    pub links: PaginationLinks,
    /// 服务端报告的总条数（X-Total-Count）
    pub total_items: u64,
    pub phase: StorePhase,
    /// 变更成功后仅保持一次转换，下一个请求即清除
    pub update_success: bool,
    pub error_message: Option<ErrorPayload>,
}

impl<E: Entity> EntityState<E> {
    /// 初始状态
    pub fn initial() -> Self {
        Self {
            entities: Vec::new(),
            entity: E::new_draft(),
            links: PaginationLinks::default(),
            total_items: 0,
            phase: StorePhase::Idle,
            update_success: false,
            error_message: None,
        }
    }
}

impl<E> EntityState<E> {
    pub fn loading(&self) -> bool {
        self.phase.is_loading()
    }

    pub fn updating(&self) -> bool {
        self.phase.is_updating()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == StorePhase::Idle
    }
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self::initial()
    }
}
