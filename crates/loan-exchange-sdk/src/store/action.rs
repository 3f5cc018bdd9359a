use serde::Serialize;

use crate::error::ErrorPayload;
use crate::models::{Entity, EntityId};

/// 变更类操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// 五种 CRUD 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    FetchList,
    FetchOne,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchList => "fetch_list",
            Self::FetchOne => "fetch_one",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生命周期事件
///
/// Requested 变体携带的参数只用于日志与调试，HTTP 请求由 `EntityClient` 发出。
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<E> {
    ListRequested {
        page: u32,
        size: u32,
        sort: Option<String>,
    },
    ListSucceeded {
        items: Vec<E>,
        /// 原始 `Link` 响应头
        link_header: Option<String>,
        /// 原始 `X-Total-Count` 响应头
        total_count_header: Option<String>,
    },
    SingleRequested {
        id: EntityId,
    },
    SingleSucceeded(E),
    CreateRequested(E),
    CreateSucceeded(E),
    UpdateRequested(E),
    UpdateSucceeded(E),
    DeleteRequested {
        id: EntityId,
    },
    DeleteSucceeded,
    Failed {
        operation: OperationKind,
        error: ErrorPayload,
    },
    Reset,
}

impl<E: Entity> EntityAction<E> {
    /// 事件名，如 `deal/FETCH_LIST_REQUEST`
    pub fn name(&self) -> String {
        let suffix = match self {
            Self::ListRequested { .. } => "FETCH_LIST_REQUEST",
            Self::ListSucceeded { .. } => "FETCH_LIST_SUCCESS",
            Self::SingleRequested { .. } => "FETCH_REQUEST",
            Self::SingleSucceeded(_) => "FETCH_SUCCESS",
            Self::CreateRequested(_) => "CREATE_REQUEST",
            Self::CreateSucceeded(_) => "CREATE_SUCCESS",
            Self::UpdateRequested(_) => "UPDATE_REQUEST",
            Self::UpdateSucceeded(_) => "UPDATE_SUCCESS",
            Self::DeleteRequested { .. } => "DELETE_REQUEST",
            Self::DeleteSucceeded => "DELETE_SUCCESS",
            Self::Failed { .. } => "FAILURE",
            Self::Reset => "RESET",
        };
        format!("{}/{}", E::RESOURCE.as_str(), suffix)
    }

    /// 对应的操作（Reset 没有）
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::ListRequested { .. } | Self::ListSucceeded { .. } => Some(OperationKind::FetchList),
            Self::SingleRequested { .. } | Self::SingleSucceeded(_) => Some(OperationKind::FetchOne),
            Self::CreateRequested(_) | Self::CreateSucceeded(_) => Some(OperationKind::Create),
            Self::UpdateRequested(_) | Self::UpdateSucceeded(_) => Some(OperationKind::Update),
            Self::DeleteRequested { .. } | Self::DeleteSucceeded => Some(OperationKind::Delete),
            Self::Failed { operation, .. } => Some(*operation),
            Self::Reset => None,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Self::ListRequested { .. }
                | Self::SingleRequested { .. }
                | Self::CreateRequested(_)
                | Self::UpdateRequested(_)
                | Self::DeleteRequested { .. }
        )
    }
}
