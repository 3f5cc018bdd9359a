//! 实体同步 Store - 每种资源一个状态机
//!
//! 生命周期事件（Requested → Succeeded | Failed）经 `reduce` 纯函数推进状态；
//! `EntityStore` 是显式持有、注入使用的句柄，不存在全局单例。
//!
//! ## NOTE: Store 不做去重 / 取消 / 重试
//!
//! Overlapping requests of the same kind are neither deduplicated nor cancelled:
//! whichever response settles last wins. Callers serialize through the
//! `update_success` → reset protocol (see `crate::list`), not through the store.

mod action;
mod state;
mod reducer;
mod pagination;
mod entity_store;

pub use action::{EntityAction, MutationKind, OperationKind};
pub use state::{EntityState, StorePhase};
pub use reducer::reduce;
pub use pagination::{parse_link_header, parse_total_count, PaginationLinks};
pub use entity_store::EntityStore;
