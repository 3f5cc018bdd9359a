//! 事件系统模块 - 广播 Store 状态变化
//!
//! 功能包括：
//! - 每次状态转换的 StateChanged 事件
//! - 变更成功（update_success 置位）事件，列表视图据此刷新
//! - 操作失败事件
//! - 事件广播、过滤订阅和命名监听器

use crate::error::ErrorPayload;
use crate::models::{EntityId, EntityResource};
use crate::store::OperationKind;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// SDK 事件类型
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SDKEvent {
    /// Store 完成一次状态转换
    StateChanged {
        resource: EntityResource,
        action: String,
        loading: bool,
        updating: bool,
        update_success: bool,
        entity_count: usize,
        total_items: u64,
        timestamp: u64,
    },
    /// 创建 / 更新 / 删除成功
    MutationSucceeded {
        resource: EntityResource,
        operation: OperationKind,
        entity_id: Option<EntityId>,
        timestamp: u64,
    },
    /// 操作失败
    OperationFailed {
        resource: EntityResource,
        operation: OperationKind,
        error: ErrorPayload,
        timestamp: u64,
    },
    /// Store 被重置为初始状态
    StoreReset {
        resource: EntityResource,
        timestamp: u64,
    },
}

impl SDKEvent {
    /// 获取事件类型字符串
    pub fn event_type(&self) -> &'static str {
        match self {
            SDKEvent::StateChanged { .. } => "state_changed",
            SDKEvent::MutationSucceeded { .. } => "mutation_succeeded",
            SDKEvent::OperationFailed { .. } => "operation_failed",
            SDKEvent::StoreReset { .. } => "store_reset",
        }
    }

    pub fn resource(&self) -> EntityResource {
        match self {
            SDKEvent::StateChanged { resource, .. }
            | SDKEvent::MutationSucceeded { resource, .. }
            | SDKEvent::OperationFailed { resource, .. }
            | SDKEvent::StoreReset { resource, .. } => *resource,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            SDKEvent::StateChanged { timestamp, .. }
            | SDKEvent::MutationSucceeded { timestamp, .. }
            | SDKEvent::OperationFailed { timestamp, .. }
            | SDKEvent::StoreReset { timestamp, .. } => *timestamp,
        }
    }
}

/// 事件过滤器
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// 事件类型过滤（为空表示不过滤）
    pub event_types: Vec<String>,
    /// 资源过滤（为空表示不过滤）
    pub resources: Vec<EntityResource>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_types(mut self, event_types: Vec<String>) -> Self {
        self.event_types = event_types;
        self
    }

    pub fn with_resources(mut self, resources: Vec<EntityResource>) -> Self {
        self.resources = resources;
        self
    }

    /// 只关心某个资源的变更成功事件（列表自动刷新用）
    pub fn mutations_of(resource: EntityResource) -> Self {
        Self::new()
            .with_event_types(vec!["mutation_succeeded".to_string()])
            .with_resources(vec![resource])
    }

    pub fn matches(&self, event: &SDKEvent) -> bool {
        if !self.event_types.is_empty() && !self.event_types.iter().any(|t| t == event.event_type()) {
            return false;
        }
        if !self.resources.is_empty() && !self.resources.contains(&event.resource()) {
            return false;
        }
        true
    }
}

/// 事件监听器类型
pub type EventListener = Box<dyn Fn(&SDKEvent) + Send + Sync>;

/// 事件统计信息
#[derive(Debug, Clone, Default)]
pub struct EventStats {
    pub total_events: u64,
    pub events_by_type: HashMap<String, u64>,
    pub listener_count: usize,
    pub last_event_time: Option<u64>,
}

/// 事件管理器
///
/// emit 是同步的：Store 在一次转换内直接发布，不跨 await。
pub struct EventManager {
    sender: broadcast::Sender<SDKEvent>,
    listeners: Arc<RwLock<HashMap<String, Vec<EventListener>>>>,
    stats: Arc<RwLock<EventStats>>,
}

impl EventManager {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));

        Self {
            sender,
            listeners: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(EventStats::default())),
        }
    }

    /// 发布事件
    pub fn emit(&self, event: SDKEvent) {
        debug!("Emitting event: {} ({})", event.event_type(), event.resource());

        {
            let mut stats = self.stats.write();
            stats.total_events += 1;
            *stats.events_by_type.entry(event.event_type().to_string()).or_insert(0) += 1;
            stats.last_event_time = Some(event.timestamp());
        }

        // 无订阅者时 send 会失败，属正常场景（无 UI 的调用方），仅打 debug
        if let Err(e) = self.sender.send(event.clone()) {
            debug!("Failed to broadcast event (no active receivers): {}", e);
        }

        let listeners = self.listeners.read();
        if let Some(event_listeners) = listeners.get(event.event_type()) {
            for listener in event_listeners {
                listener(&event);
            }
        }
        if let Some(general_listeners) = listeners.get("*") {
            for listener in general_listeners {
                listener(&event);
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SDKEvent> {
        self.sender.subscribe()
    }

    pub fn subscribe_filtered(&self, filter: EventFilter) -> FilteredEventReceiver {
        FilteredEventReceiver::new(self.sender.subscribe(), filter)
    }

    /// 添加事件监听器（`"*"` 监听全部事件）
    pub fn add_listener<F>(&self, event_type: &str, listener: F)
    where
        F: Fn(&SDKEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write();
        listeners
            .entry(event_type.to_string())
            .or_insert_with(Vec::new)
            .push(Box::new(listener));

        self.stats.write().listener_count = listeners.values().map(|v| v.len()).sum();

        info!("Added listener for event type: {}", event_type);
    }

    pub fn clear_listeners(&self) {
        self.listeners.write().clear();
        self.stats.write().listener_count = 0;
        info!("Cleared all event listeners");
    }

    pub fn get_stats(&self) -> EventStats {
        self.stats.read().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// 带过滤的事件接收器
pub struct FilteredEventReceiver {
    receiver: broadcast::Receiver<SDKEvent>,
    filter: EventFilter,
}

impl FilteredEventReceiver {
    pub fn new(receiver: broadcast::Receiver<SDKEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// 等待下一个匹配的事件
    pub async fn recv(&mut self) -> Result<SDKEvent, broadcast::error::RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.filter.matches(&event) {
                return Ok(event);
            }
        }
    }

    pub fn try_recv(&mut self) -> Result<SDKEvent, broadcast::error::TryRecvError> {
        loop {
            let event = self.receiver.try_recv()?;
            if self.filter.matches(&event) {
                return Ok(event);
            }
        }
    }
}

/// 当前 UNIX 毫秒时间戳
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 事件构建器
pub mod event_builders {
    use super::*;

    pub fn mutation_succeeded(
        resource: EntityResource,
        operation: OperationKind,
        entity_id: Option<EntityId>,
    ) -> SDKEvent {
        SDKEvent::MutationSucceeded {
            resource,
            operation,
            entity_id,
            timestamp: now_millis(),
        }
    }

    pub fn operation_failed(resource: EntityResource, operation: OperationKind, error: ErrorPayload) -> SDKEvent {
        SDKEvent::OperationFailed {
            resource,
            operation,
            error,
            timestamp: now_millis(),
        }
    }

    pub fn store_reset(resource: EntityResource) -> SDKEvent {
        SDKEvent::StoreReset {
            resource,
            timestamp: now_millis(),
        }
    }
}
