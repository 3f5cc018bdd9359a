//! Loan Exchange SDK - 借贷交易管理端的状态与传输层
//!
//! 本 SDK 提供：
//! - 📄 Deal / BalanceLog / Notification 类型化实体
//! - 🧠 每种资源一个实体同步 Store（列表、单个、创建、更新、删除的生命周期）
//! - 📡 基于 reqwest 的 REST 传输，分页 Link / X-Total-Count 头解析
//! - 📜 无限滚动分页控制器，变更成功后自动刷新
//! - ⚙️ 事件系统：每次状态转换广播给订阅者
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use loan_exchange_sdk::{LoanExchangeConfig, LoanExchangeSDK, ListRequest, SortSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoanExchangeConfig::builder()
//!         .api_base_url("http://localhost:8080")
//!         .default_header("Authorization", "Bearer <token>")
//!         .build();
//!
//!     let sdk = LoanExchangeSDK::initialize(config)?;
//!
//!     let state = sdk
//!         .deals()
//!         .get_entities(ListRequest::page(0, 20).sorted_by(SortSpec::asc("id")))
//!         .await;
//!     println!("{} / {} deals", state.entities.len(), state.total_items);
//!
//!     if let Some(error) = &state.error_message {
//!         eprintln!("加载失败: {}", error);
//!     }
//!
//!     Ok(())
//! }
//! ```

// 导出核心模块
pub mod error;
pub mod version;
pub mod config;
pub mod models;
pub mod store;
pub mod events;
pub mod transport;
pub mod resource;
pub mod list;
pub mod sdk;
pub mod utils;

// 重新导出核心类型，方便使用
pub use error::{ErrorPayload, FieldError, LoanExchangeSDKError, Result};
pub use config::{EventConfig, HttpClientConfig, LoanExchangeConfig, LoanExchangeConfigBuilder, ITEMS_PER_PAGE};
pub use models::{
    BalanceLog, BalanceLogEvent, Deal, DealRef, DealStatus, Entity, EntityId, EntityResource, Notification,
    PaymentInterval, UserRef,
};
pub use store::{EntityAction, EntityState, EntityStore, MutationKind, OperationKind, PaginationLinks, StorePhase};
pub use events::{EventFilter, EventManager, FilteredEventReceiver, SDKEvent};
pub use transport::{ApiRequest, ApiResponse, EntityTransport, HttpMethod, ReqwestTransport};
pub use resource::{
    BalanceLogFilter, DealFilter, EntityClient, ListRequest, NotificationFilter, QueryFilter, SortOrder, SortSpec,
};
pub use list::{spawn_auto_refresh, PaginatedList};
pub use sdk::LoanExchangeSDK;
pub use utils::{DateTimeFormatter, TimezoneConfig};
