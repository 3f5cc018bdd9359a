//! 分页列表控制器 - 列表视图的重置协议
//!
//! 挂载时、排序变化时、以及观察到 `update_success` 时：先 reset store，
//! 回到第 1 页再拉取。无限滚动每次加载下一页并追加。

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::EventFilter;
use crate::models::Entity;
use crate::resource::{EntityClient, ListRequest, SortSpec};
use crate::store::EntityState;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListView {
    /// 1 起始
    active_page: u32,
    items_per_page: u32,
    sort: SortSpec,
    filter: Vec<(String, String)>,
    /// 上一次观察到的 update_success
    last_update_success: bool,
}

/// 单个列表视图的分页状态
pub struct PaginatedList<E: Entity> {
    client: EntityClient<E>,
    view: Mutex<ListView>,
}

impl<E: Entity> PaginatedList<E> {
    /// 默认按 `id,asc` 排序
    pub fn new(client: EntityClient<E>, items_per_page: u32) -> Self {
        Self {
            client,
            view: Mutex::new(ListView {
                active_page: 1,
                items_per_page,
                sort: SortSpec::asc("id"),
                filter: Vec::new(),
                last_update_success: false,
            }),
        }
    }

    pub fn with_sort(self, sort: SortSpec) -> Self {
        self.view.lock().sort = sort;
        self
    }

    pub fn with_filter(self, filter: Vec<(String, String)>) -> Self {
        self.view.lock().filter = filter;
        self
    }

    pub fn client(&self) -> &EntityClient<E> {
        &self.client
    }

    pub fn active_page(&self) -> u32 {
        self.view.lock().active_page
    }

    pub fn items_per_page(&self) -> u32 {
        self.view.lock().items_per_page
    }

    pub fn sort(&self) -> SortSpec {
        self.view.lock().sort.clone()
    }

    /// 视图挂载
    pub async fn on_mount(&self) -> EntityState<E> {
        self.refresh().await
    }

    /// reset store → 回到第 1 页 → 拉取第 0 页
    pub async fn refresh(&self) -> EntityState<E> {
        self.client.reset();
        let request = {
            let mut view = self.view.lock();
            view.active_page = 1;
            Self::request_for(&view)
        };
        self.client.get_entities(request).await
    }

    /// 还有下一页时加载并追加；没有时返回 None
    pub async fn load_more(&self) -> Option<EntityState<E>> {
        let state = self.client.state();
        let request = {
            let mut view = self.view.lock();
            if !Self::has_more_for(&view, &state) {
                debug!("{} 没有更多数据 (page {})", E::RESOURCE, view.active_page);
                return None;
            }
            view.active_page += 1;
            Self::request_for(&view)
        };
        Some(self.client.get_entities(request).await)
    }

    /// 点击列头：切换方向、换排序字段、重置
    pub async fn sort_by(&self, field: &str) -> EntityState<E> {
        {
            let mut view = self.view.lock();
            let order = view.sort.order.reversed();
            view.sort = SortSpec::new(field, order);
        }
        self.refresh().await
    }

    /// 视图每次观察到新快照时调用
    ///
    /// 只在 `update_success` 由 false 变为 true 时重新加载；同一快照重复传入不会再次刷新。
    /// 调用方需要把每个快照都传进来，否则两次变更之间的 false 会被漏掉。
    pub async fn on_state_observed(&self, state: &EntityState<E>) -> Option<EntityState<E>> {
        let rising = {
            let mut view = self.view.lock();
            let previous = std::mem::replace(&mut view.last_update_success, state.update_success);
            state.update_success && !previous
        };
        if rising {
            Some(self.refresh().await)
        } else {
            None
        }
    }

    pub fn has_more(&self, state: &EntityState<E>) -> bool {
        Self::has_more_for(&self.view.lock(), state)
    }

    fn has_more_for(view: &ListView, state: &EntityState<E>) -> bool {
        view.active_page - 1 < state.links.next
    }

    fn request_for(view: &ListView) -> ListRequest {
        ListRequest {
            page: view.active_page - 1,
            size: view.items_per_page,
            sort: Some(view.sort.clone()),
            filter: view.filter.clone(),
        }
    }
}

/// 后台任务：store 报告变更成功后自动执行重置协议
///
/// 订阅在返回前建立，调用之后发生的变更都不会漏掉。任务只持有列表的弱引用：
/// 列表被释放后，下一个事件到达（或事件总线关闭）时任务结束。
pub fn spawn_auto_refresh<E: Entity>(list: Arc<PaginatedList<E>>) -> JoinHandle<()> {
    let mut receiver = list
        .client
        .store()
        .event_manager()
        .subscribe_filtered(EventFilter::mutations_of(E::RESOURCE));
    let list: Weak<PaginatedList<E>> = Arc::downgrade(&list);

    tokio::spawn(async move {
        info!("🔄 {} 列表自动刷新已启动", E::RESOURCE);
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    debug!("{} 收到变更事件: {:?}", E::RESOURCE, event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("{} 自动刷新落后 {} 个事件", E::RESOURCE, skipped);
                }
                Err(RecvError::Closed) => break,
            }
            let Some(list) = list.upgrade() else {
                break;
            };
            list.refresh().await;
        }
        info!("{} 列表自动刷新已停止", E::RESOURCE);
    })
}
