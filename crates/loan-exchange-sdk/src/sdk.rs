//! SDK 主接口
//!
//! 组装顺序：配置校验 → 事件管理器 → 传输层 → 三个资源的 Store + 客户端。
//! 所有组件由 `LoanExchangeSDK` 显式持有并注入，没有全局单例。

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::LoanExchangeConfig;
use crate::error::Result;
use crate::events::EventManager;
use crate::list::PaginatedList;
use crate::models::{BalanceLog, Deal, Entity, Notification};
use crate::resource::EntityClient;
use crate::store::EntityStore;
use crate::transport::{CacheBuster, EntityTransport, ReqwestTransport};
use crate::utils::time::{DateTimeFormatter, TimezoneConfig};
use crate::version;

/// 统一 SDK 主接口
///
/// 分层：
/// - 资源客户端层：EntityClient（每种资源一个）
/// - 状态层：EntityStore
/// - 传输层：EntityTransport
/// - 事件系统层：EventManager
pub struct LoanExchangeSDK {
    config: LoanExchangeConfig,
    event_manager: Arc<EventManager>,
    formatter: DateTimeFormatter,
    deals: EntityClient<Deal>,
    balance_logs: EntityClient<BalanceLog>,
    notifications: EntityClient<Notification>,
}

impl LoanExchangeSDK {
    /// 使用默认 reqwest 传输初始化（配置校验在 `with_transport` 中进行）
    pub fn initialize(config: LoanExchangeConfig) -> Result<Arc<Self>> {
        let transport = ReqwestTransport::new(&config.http_client_config, config.api_base_url.clone())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// 注入自定义传输（测试、或宿主应用已有的 HTTP 栈）
    pub fn with_transport(config: LoanExchangeConfig, transport: Arc<dyn EntityTransport>) -> Result<Arc<Self>> {
        config.validate()?;
        info!(
            "🚀 初始化 LoanExchangeSDK {} ({}), base_url: {}",
            version::SDK_VERSION,
            version::GIT_SHA,
            config.api_base_url
        );
        if config.debug_mode {
            debug!("SDK 配置: {:?}", config);
        }

        let event_manager = Arc::new(EventManager::new(config.event_config.buffer_size));
        let formatter = DateTimeFormatter::new(TimezoneConfig::from_config(config.timezone_offset_seconds))?;
        let cache_buster = Arc::new(CacheBuster::new());

        let deals = Self::client_for::<Deal>(&config, &event_manager, &transport, &cache_buster);
        let balance_logs = Self::client_for::<BalanceLog>(&config, &event_manager, &transport, &cache_buster);
        let notifications = Self::client_for::<Notification>(&config, &event_manager, &transport, &cache_buster);

        info!("✅ LoanExchangeSDK 初始化完成");
        Ok(Arc::new(Self {
            config,
            event_manager,
            formatter,
            deals,
            balance_logs,
            notifications,
        }))
    }

    fn client_for<E: Entity>(
        config: &LoanExchangeConfig,
        event_manager: &Arc<EventManager>,
        transport: &Arc<dyn EntityTransport>,
        cache_buster: &Arc<CacheBuster>,
    ) -> EntityClient<E> {
        let store = Arc::new(EntityStore::<E>::new(event_manager.clone()));
        EntityClient::new(
            store,
            transport.clone(),
            config.resource_path(E::RESOURCE.api_path()),
            cache_buster.clone(),
        )
    }

    pub fn deals(&self) -> &EntityClient<Deal> {
        &self.deals
    }

    pub fn balance_logs(&self) -> &EntityClient<BalanceLog> {
        &self.balance_logs
    }

    pub fn notifications(&self) -> &EntityClient<Notification> {
        &self.notifications
    }

    pub fn event_manager(&self) -> &Arc<EventManager> {
        &self.event_manager
    }

    pub fn config(&self) -> &LoanExchangeConfig {
        &self.config
    }

    /// 按配置时区格式化日期
    pub fn formatter(&self) -> &DateTimeFormatter {
        &self.formatter
    }

    /// 为列表视图创建分页控制器（页大小取自配置）
    pub fn paginated<E: Entity>(&self, client: &EntityClient<E>) -> PaginatedList<E> {
        PaginatedList::new(client.clone(), self.config.items_per_page)
    }

    /// 重置三个 Store（例如登出时）
    pub fn reset_all(&self) {
        self.deals.reset();
        self.balance_logs.reset();
        self.notifications.reset();
        info!("三个资源 Store 已重置");
    }
}
