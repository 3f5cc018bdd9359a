//! 状态转换函数 - (当前状态, 生命周期事件) → 下一状态
//!
//! 纯函数：不做 IO、不读时钟，整体替换状态。

use super::action::{EntityAction, MutationKind};
use super::pagination::parse_total_count;
use super::state::{EntityState, StorePhase};
use crate::models::Entity;
use tracing::warn;

pub fn reduce<E: Entity>(state: EntityState<E>, action: EntityAction<E>) -> EntityState<E> {
    match action {
        EntityAction::ListRequested { .. } => begin(state, StorePhase::Listing),
        EntityAction::SingleRequested { .. } => begin(state, StorePhase::FetchingOne),
        EntityAction::CreateRequested(_) => begin(state, StorePhase::Mutating(MutationKind::Create)),
        EntityAction::UpdateRequested(_) => begin(state, StorePhase::Mutating(MutationKind::Update)),
        EntityAction::DeleteRequested { .. } => begin(state, StorePhase::Mutating(MutationKind::Delete)),

        EntityAction::ListSucceeded {
            items,
            link_header,
            total_count_header,
        } => {
            let links = state.links.advance(link_header.as_deref());
            let total_items = match parse_total_count(total_count_header.as_deref()) {
                Some(total) => total,
                None => {
                    warn!(
                        "{} 列表响应缺少有效的 X-Total-Count: {:?}",
                        E::RESOURCE,
                        total_count_header
                    );
                    state.total_items
                }
            };
            // 无限滚动：新页追加在已有页之后
            let mut entities = state.entities;
            entities.extend(items);
            EntityState {
                entities,
                links,
                total_items,
                phase: finish_fetch(state.phase),
                ..state
            }
        }
        EntityAction::SingleSucceeded(item) => EntityState {
            entity: item,
            phase: finish_fetch(state.phase),
            ..state
        },
        EntityAction::CreateSucceeded(saved) | EntityAction::UpdateSucceeded(saved) => EntityState {
            entity: saved,
            phase: finish_mutation(state.phase),
            update_success: true,
            ..state
        },
        EntityAction::DeleteSucceeded => EntityState {
            entity: E::default(),
            phase: finish_mutation(state.phase),
            update_success: true,
            ..state
        },

        EntityAction::Failed { operation, error } => {
            warn!("{} {} 失败: {}", E::RESOURCE, operation, error);
            EntityState {
                phase: StorePhase::Idle,
                update_success: false,
                error_message: Some(error),
                ..state
            }
        }

        EntityAction::Reset => EntityState::initial(),
    }
}

/// 任意请求：清错误、清 update_success，进入对应阶段
fn begin<E>(state: EntityState<E>, phase: StorePhase) -> EntityState<E> {
    EntityState {
        phase,
        update_success: false,
        error_message: None,
        ..state
    }
}

/// 拉取成功只结束拉取阶段；期间若已发起变更，保持变更阶段
fn finish_fetch(phase: StorePhase) -> StorePhase {
    if phase.is_loading() {
        StorePhase::Idle
    } else {
        phase
    }
}

fn finish_mutation(phase: StorePhase) -> StorePhase {
    if phase.is_updating() {
        StorePhase::Idle
    } else {
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorPayload;
    use crate::store::OperationKind;
    use crate::models::{Deal, EntityId, Notification};

    fn deal(id: EntityId) -> Deal {
        Deal {
            id: Some(id),
            ..Default::default()
        }
    }

    fn list_requested(page: u32) -> EntityAction<Deal> {
        EntityAction::ListRequested {
            page,
            size: 2,
            sort: Some("id,asc".to_string()),
        }
    }

    fn list_succeeded(ids: &[EntityId], next_page: Option<u32>, total: &str) -> EntityAction<Deal> {
        EntityAction::ListSucceeded {
            items: ids.iter().copied().map(deal).collect(),
            link_header: next_page
                .map(|p| format!(r#"</api/deals?page={}&size=2&sort=id,asc>; rel="next""#, p)),
            total_count_header: Some(total.to_string()),
        }
    }

    fn phase_for(operation: OperationKind) -> StorePhase {
        match operation {
            OperationKind::FetchList => StorePhase::Listing,
            OperationKind::FetchOne => StorePhase::FetchingOne,
            OperationKind::Create => StorePhase::Mutating(MutationKind::Create),
            OperationKind::Update => StorePhase::Mutating(MutationKind::Update),
            OperationKind::Delete => StorePhase::Mutating(MutationKind::Delete),
        }
    }

    fn apply(state: EntityState<Deal>, actions: Vec<EntityAction<Deal>>) -> EntityState<Deal> {
        actions.into_iter().fold(state, reduce)
    }

    fn ids(state: &EntityState<Deal>) -> Vec<Option<EntityId>> {
        state.entities.iter().map(|d| d.id).collect()
    }

    #[test]
    fn list_success_scenario() {
        let state = apply(
            EntityState::initial(),
            vec![list_requested(0), list_succeeded(&[1, 2], Some(1), "2")],
        );
        assert_eq!(ids(&state), vec![Some(1), Some(2)]);
        assert_eq!(state.total_items, 2);
        assert!(!state.loading());
        assert_eq!(state.links.next, 1);
    }

    #[test]
    fn pages_are_concatenated_in_arrival_order_without_dedup() {
        let state = apply(
            EntityState::initial(),
            vec![
                list_requested(0),
                list_succeeded(&[1, 2], Some(1), "5"),
                list_requested(1),
                list_succeeded(&[3, 2], Some(2), "5"),
                list_requested(2),
                list_succeeded(&[5], None, "5"),
            ],
        );
        assert_eq!(ids(&state), vec![Some(1), Some(2), Some(3), Some(2), Some(5)]);
        // 最后一页没有 next，游标停在 2
        assert_eq!(state.links.next, 2);
        assert_eq!(state.total_items, 5);
    }

    #[test]
    fn missing_total_count_keeps_previous_value() {
        let state = apply(
            EntityState::initial(),
            vec![
                list_requested(0),
                list_succeeded(&[1], Some(1), "9"),
                list_requested(1),
                EntityAction::ListSucceeded {
                    items: vec![deal(2)],
                    link_header: None,
                    total_count_header: None,
                },
            ],
        );
        assert_eq!(state.total_items, 9);
        assert_eq!(state.links.next, 1);
    }

    #[test]
    fn reset_returns_literal_initial_state() {
        let busy = apply(
            EntityState::initial(),
            vec![
                list_requested(0),
                list_succeeded(&[1, 2], Some(1), "2"),
                EntityAction::UpdateRequested(deal(1)),
                EntityAction::UpdateSucceeded(deal(1)),
                EntityAction::Failed {
                    operation: OperationKind::FetchOne,
                    error: ErrorPayload::new(Some(404), "Not Found"),
                },
            ],
        );
        let reset = reduce(busy, EntityAction::Reset);
        assert_eq!(reset, EntityState::initial());
        // 幂等
        assert_eq!(reduce(reset, EntityAction::Reset), EntityState::<Deal>::initial());
    }

    #[test]
    fn reset_uses_resource_draft() {
        let state = reduce(EntityState::<Notification>::initial(), EntityAction::Reset);
        assert_eq!(state.entity.have_read, Some(false));
    }

    #[test]
    fn every_request_sets_exactly_one_busy_flag() {
        let requests: Vec<EntityAction<Deal>> = vec![
            list_requested(0),
            EntityAction::SingleRequested { id: 1 },
            EntityAction::CreateRequested(Deal::default()),
            EntityAction::UpdateRequested(deal(1)),
            EntityAction::DeleteRequested { id: 1 },
        ];
        for request in requests {
            let operation = request.operation().unwrap();
            let state = reduce(EntityState::initial(), request);
            assert!(state.loading() ^ state.updating(), "{:?}", operation);
            assert_eq!(state.phase, phase_for(operation));
        }
    }

    #[test]
    fn update_success_is_single_shot() {
        let state = apply(
            EntityState::initial(),
            vec![EntityAction::CreateRequested(Deal::default()), EntityAction::CreateSucceeded(deal(10))],
        );
        assert!(state.update_success);
        assert!(!state.updating());
        assert_eq!(state.entity.id, Some(10));

        // 下一个任意请求立即清除
        let requests: Vec<EntityAction<Deal>> = vec![
            list_requested(0),
            EntityAction::SingleRequested { id: 10 },
            EntityAction::CreateRequested(Deal::default()),
            EntityAction::UpdateRequested(deal(10)),
            EntityAction::DeleteRequested { id: 10 },
        ];
        for request in requests {
            let operation = request.operation().unwrap();
            let cleared = reduce(state.clone(), request);
            assert!(!cleared.update_success, "{:?}", operation);
        }
    }

    #[test]
    fn create_failure_scenario_keeps_entity() {
        let before = reduce(EntityState::initial(), EntityAction::SingleSucceeded(deal(3)));
        let draft = Deal {
            start_balance: Some(5.0),
            ..Default::default()
        };
        let state = apply(
            before.clone(),
            vec![
                EntityAction::CreateRequested(draft),
                EntityAction::Failed {
                    operation: OperationKind::Create,
                    error: ErrorPayload::new(Some(500), "Internal Error"),
                },
            ],
        );
        assert!(!state.updating());
        assert!(!state.update_success);
        assert_eq!(state.error_message.as_ref().unwrap().to_string(), "500 Internal Error");
        assert_eq!(state.entity, before.entity);
        assert_eq!(state.entities, before.entities);
    }

    #[test]
    fn failure_never_touches_entities() {
        let loaded = apply(
            EntityState::initial(),
            vec![list_requested(0), list_succeeded(&[1, 2], Some(1), "4")],
        );
        let state = apply(
            loaded.clone(),
            vec![
                list_requested(1),
                EntityAction::Failed {
                    operation: OperationKind::FetchList,
                    error: ErrorPayload::new(None, "connection reset"),
                },
            ],
        );
        assert_eq!(state.entities, loaded.entities);
        assert_eq!(state.entity, loaded.entity);
        assert_eq!(state.links, loaded.links);
        assert!(state.is_idle());
        assert_eq!(state.error_message.unwrap().to_string(), "connection reset");
    }

    #[test]
    fn delete_scenario_clears_entity() {
        let state = apply(
            reduce(EntityState::initial(), EntityAction::SingleSucceeded(deal(7))),
            vec![EntityAction::DeleteRequested { id: 7 }, EntityAction::DeleteSucceeded],
        );
        assert_eq!(state.entity, Deal::default());
        assert!(!state.updating());
        assert!(state.update_success);
    }

    #[test]
    fn request_clears_previous_error() {
        let failed = reduce(
            EntityState::<Deal>::initial(),
            EntityAction::Failed {
                operation: OperationKind::Delete,
                error: ErrorPayload::new(Some(400), "Bad Request"),
            },
        );
        let state = reduce(failed, list_requested(0));
        assert!(state.error_message.is_none());
        assert!(state.loading());
    }

    #[test]
    fn late_fetch_success_does_not_end_pending_mutation() {
        // 列表请求未返回时发起了删除：列表结果到达后仍处于删除中
        let state = apply(
            EntityState::initial(),
            vec![
                list_requested(0),
                EntityAction::DeleteRequested { id: 1 },
                list_succeeded(&[1], None, "1"),
            ],
        );
        assert!(state.updating());
        assert!(!state.loading());
        assert_eq!(ids(&state), vec![Some(1)]);

        let state = reduce(state, EntityAction::DeleteSucceeded);
        assert!(state.is_idle());
        assert!(state.update_success);
    }

    #[test]
    fn action_names_are_namespaced() {
        assert_eq!(list_requested(0).name(), "deal/FETCH_LIST_REQUEST");
        assert_eq!(EntityAction::<Notification>::Reset.name(), "notification/RESET");
        assert!(list_requested(0).is_request());
        assert!(!EntityAction::<Deal>::DeleteSucceeded.is_request());
    }
}
