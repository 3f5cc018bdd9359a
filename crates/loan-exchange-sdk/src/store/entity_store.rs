use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tracing::debug;

use super::action::EntityAction;
use super::reducer::reduce;
use super::state::EntityState;
use crate::events::{event_builders, now_millis, EventFilter, EventManager, FilteredEventReceiver, SDKEvent};
use crate::models::Entity;

/// 单个资源的 Store 句柄
///
/// 状态只由 `dispatch` 写入：写锁内完成一次 `reduce` 并整体替换，
/// 读者只能拿到完整快照，看不到中间态。
///
/// 转换与事件发布在 `order` 锁内串行进行，事件顺序与转换顺序一致。
/// `order` 可重入：监听器里再次 dispatch 不会死锁，其事件嵌套在外层事件之间。
pub struct EntityStore<E: Entity> {
    state: RwLock<EntityState<E>>,
    order: ReentrantMutex<()>,
    events: Arc<EventManager>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new(events: Arc<EventManager>) -> Self {
        Self {
            state: RwLock::new(EntityState::initial()),
            order: ReentrantMutex::new(()),
            events,
        }
    }

    /// 应用一个生命周期事件，返回转换后的快照
    pub fn dispatch(&self, action: EntityAction<E>) -> EntityState<E> {
        let name = action.name();
        let operation = action.operation();
        let follow_up = match &action {
            EntityAction::CreateSucceeded(saved) | EntityAction::UpdateSucceeded(saved) => {
                operation.map(|op| event_builders::mutation_succeeded(E::RESOURCE, op, saved.id()))
            }
            EntityAction::DeleteSucceeded => {
                operation.map(|op| event_builders::mutation_succeeded(E::RESOURCE, op, None))
            }
            EntityAction::Failed { operation, error } => Some(event_builders::operation_failed(
                E::RESOURCE,
                *operation,
                error.clone(),
            )),
            EntityAction::Reset => Some(event_builders::store_reset(E::RESOURCE)),
            _ => None,
        };

        let _order = self.order.lock();
        let snapshot = {
            let mut guard = self.state.write();
            let current = std::mem::replace(&mut *guard, EntityState::initial());
            let next = reduce(current, action);
            *guard = next.clone();
            next
        };

        debug!(
            "{} → loading={} updating={} update_success={} entities={}",
            name,
            snapshot.loading(),
            snapshot.updating(),
            snapshot.update_success,
            snapshot.entities.len()
        );

        self.events.emit(SDKEvent::StateChanged {
            resource: E::RESOURCE,
            action: name,
            loading: snapshot.loading(),
            updating: snapshot.updating(),
            update_success: snapshot.update_success,
            entity_count: snapshot.entities.len(),
            total_items: snapshot.total_items,
            timestamp: now_millis(),
        });
        if let Some(event) = follow_up {
            self.events.emit(event);
        }

        snapshot
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> EntityState<E> {
        self.state.read().clone()
    }

    /// 不克隆整个状态，只读取一部分
    pub fn read<R>(&self, f: impl FnOnce(&EntityState<E>) -> R) -> R {
        f(&self.state.read())
    }

    pub fn reset(&self) -> EntityState<E> {
        self.dispatch(EntityAction::Reset)
    }

    /// 订阅本资源的全部事件
    pub fn subscribe(&self) -> FilteredEventReceiver {
        self.events
            .subscribe_filtered(EventFilter::new().with_resources(vec![E::RESOURCE]))
    }

    pub fn event_manager(&self) -> &Arc<EventManager> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorPayload;
    use crate::models::{BalanceLog, Deal, EntityResource};
    use crate::store::OperationKind;

    fn store() -> EntityStore<Deal> {
        EntityStore::new(Arc::new(EventManager::new(64)))
    }

    #[test]
    fn dispatch_replaces_state_and_returns_snapshot() {
        let store = store();
        let snapshot = store.dispatch(EntityAction::SingleRequested { id: 4 });
        assert!(snapshot.loading());
        assert_eq!(store.snapshot(), snapshot);

        let saved = Deal {
            id: Some(4),
            term: Some(12),
            ..Default::default()
        };
        store.dispatch(EntityAction::SingleSucceeded(saved.clone()));
        assert_eq!(store.read(|s| s.entity.clone()), saved);
        assert!(store.read(|s| s.is_idle()));
    }

    #[tokio::test]
    async fn dispatch_publishes_state_and_mutation_events() {
        let store = store();
        let mut events = store.subscribe();

        store.dispatch(EntityAction::CreateRequested(Deal::default()));
        store.dispatch(EntityAction::CreateSucceeded(Deal {
            id: Some(11),
            ..Default::default()
        }));

        let first = events.recv().await.unwrap();
        assert!(matches!(
            first,
            SDKEvent::StateChanged { updating: true, update_success: false, .. }
        ));
        let second = events.recv().await.unwrap();
        assert!(matches!(
            second,
            SDKEvent::StateChanged { updating: false, update_success: true, .. }
        ));
        match events.recv().await.unwrap() {
            SDKEvent::MutationSucceeded { resource, operation, entity_id, .. } => {
                assert_eq!(resource, EntityResource::Deal);
                assert_eq!(operation, OperationKind::Create);
                assert_eq!(entity_id, Some(11));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn failure_and_reset_events() {
        let events = Arc::new(EventManager::new(64));
        let deals: EntityStore<Deal> = EntityStore::new(events.clone());
        let logs: EntityStore<BalanceLog> = EntityStore::new(events.clone());
        let mut deal_events = deals.subscribe();

        // 其他资源的事件不会进入 deal 订阅
        logs.reset();
        deals.dispatch(EntityAction::Failed {
            operation: OperationKind::FetchList,
            error: ErrorPayload::new(Some(502), "Bad Gateway"),
        });
        deals.reset();

        let mut kinds = Vec::new();
        for _ in 0..4 {
            kinds.push(deal_events.recv().await.unwrap().event_type());
        }
        assert_eq!(kinds, vec!["state_changed", "operation_failed", "state_changed", "store_reset"]);
        assert_eq!(events.get_stats().total_events, 6);
    }

    #[test]
    fn events_follow_transition_order_across_threads() {
        let store = Arc::new(store());
        let mismatches = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            // 监听器看到的事件必须与此刻的快照一致
            let observer = Arc::downgrade(&store);
            let mismatches = mismatches.clone();
            store.event_manager().add_listener("state_changed", move |event| {
                if let (Some(store), SDKEvent::StateChanged { loading, updating, .. }) =
                    (observer.upgrade(), event)
                {
                    let state = store.snapshot();
                    if state.loading() != *loading || state.updating() != *updating {
                        mismatches.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                }
            });
        }

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..200 {
                        let action = match (i + n) % 3 {
                            0 => EntityAction::ListRequested { page: 0, size: 20, sort: None },
                            1 => EntityAction::DeleteRequested { id: n as i64 },
                            _ => EntityAction::Failed {
                                operation: OperationKind::FetchList,
                                error: ErrorPayload::new(None, "boom"),
                            },
                        };
                        store.dispatch(action);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(mismatches.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(store.event_manager().get_stats().events_by_type.get("state_changed"), Some(&800));
    }
}
