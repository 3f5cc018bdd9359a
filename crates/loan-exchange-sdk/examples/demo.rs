//! 管理端列表页的最小演示
//!
//! 需要本地运行的后端：`cargo run --example demo -- http://localhost:8080 <token>`

use std::sync::Arc;

use loan_exchange_sdk::{
    spawn_auto_refresh, BalanceLogFilter, Entity, ListRequest, LoanExchangeConfig, LoanExchangeSDK, Notification,
    QueryFilter, SDKEvent,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let base_url = args.next().unwrap_or_else(|| "http://localhost:8080".to_string());
    let mut builder = LoanExchangeConfig::builder().api_base_url(base_url).debug_mode(true);
    if let Some(token) = args.next() {
        builder = builder.default_header("Authorization", format!("Bearer {}", token));
    }

    let sdk = LoanExchangeSDK::initialize(builder.build())?;

    sdk.event_manager().add_listener("operation_failed", |event| {
        if let SDKEvent::OperationFailed { resource, operation, error, .. } = event {
            warn!("{} {} 失败: {}", resource, operation, error);
        }
    });

    // ========== Deal 列表：挂载 + 无限滚动 ==========
    let deals = Arc::new(sdk.paginated(sdk.deals()));
    let refresher = spawn_auto_refresh(deals.clone());

    let mut state = deals.on_mount().await;
    info!("📄 第 1 页: {} / {} deals", state.entities.len(), state.total_items);
    while let Some(next) = deals.load_more().await {
        state = next;
        info!("📄 第 {} 页: 累计 {} deals", deals.active_page(), state.entities.len());
    }
    for deal in &state.entities {
        info!(
            "  #{:?} {:?} 开始于 {}",
            deal.id,
            deal.status,
            sdk.formatter().format_display(deal.date_open.as_ref())
        );
    }

    // ========== 过滤后的余额流水 ==========
    if let Some(first) = state.entities.first().and_then(|d| d.id) {
        let filter = BalanceLogFilter {
            for_deal: Some(first),
            ..Default::default()
        };
        let logs = sdk
            .balance_logs()
            .get_entities(ListRequest::default().with_filter(&filter))
            .await;
        info!("💰 Deal {} 的流水 {} 条 (filter: {:?})", first, logs.entities.len(), filter.to_query());
    }

    // ========== 创建通知：缺少 date，校验失败不会发请求 ==========
    let draft = Notification {
        message: Some("demo".to_string()),
        ..Notification::new_draft()
    };
    match sdk.notifications().create_entity(draft).await {
        Ok(state) if state.update_success => info!("✅ 通知已创建: {:?}", state.entity.id),
        Ok(state) => error!("创建通知失败: {:?}", state.error_message),
        Err(e) => warn!("客户端校验未通过: {}", e),
    }

    refresher.abort();
    sdk.reset_all();
    Ok(())
}
