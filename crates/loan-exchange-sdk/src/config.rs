//! SDK 配置
//!
//! 与后端相关的全部参数都在这里，由宿主应用构建后传给 `LoanExchangeSDK::initialize`。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LoanExchangeSDKError, Result};
use crate::version;

/// 列表每页条数（与管理端 ITEMS_PER_PAGE 一致）
pub const ITEMS_PER_PAGE: u32 = 20;

/// HTTP 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// 连接超时（秒）
    pub connect_timeout_secs: Option<u64>,
    /// 请求超时（秒）
    pub request_timeout_secs: Option<u64>,
    /// User-Agent，None 时使用 `loan-exchange-sdk/<version>`
    pub user_agent: Option<String>,
    /// 每个请求都带上的头（例如宿主应用提供的 Authorization）
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Some(10),
            request_timeout_secs: Some(30),
            user_agent: None,
            default_headers: BTreeMap::new(),
        }
    }
}

impl HttpClientConfig {
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(version::default_user_agent)
    }
}

/// 事件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// 事件缓冲区大小
    pub buffer_size: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { buffer_size: 1000 }
    }
}

/// Loan Exchange SDK 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanExchangeConfig {
    /// 后端地址，例如 `http://localhost:8080`
    pub api_base_url: String,
    /// REST 前缀，资源路径为 `{api_prefix}/{resource}`
    pub api_prefix: String,
    /// 列表默认页大小
    pub items_per_page: u32,
    /// HTTP 客户端配置
    pub http_client_config: HttpClientConfig,
    /// 事件配置
    pub event_config: EventConfig,
    /// 时区偏移（秒），None 表示系统本地时区
    pub timezone_offset_seconds: Option<i32>,
    /// 是否启用调试模式
    pub debug_mode: bool,
}

impl Default for LoanExchangeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            api_prefix: "api".to_string(),
            items_per_page: ITEMS_PER_PAGE,
            http_client_config: HttpClientConfig::default(),
            event_config: EventConfig::default(),
            timezone_offset_seconds: None,
            debug_mode: false,
        }
    }
}

impl LoanExchangeConfig {
    pub fn builder() -> LoanExchangeConfigBuilder {
        LoanExchangeConfigBuilder::new()
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(LoanExchangeSDKError::Config("后端地址不能为空".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(LoanExchangeSDKError::Config(format!(
                "不支持的后端地址（需要 http:// 或 https://）: {}",
                url
            )));
        }
        if self.items_per_page == 0 {
            return Err(LoanExchangeSDKError::Config("每页条数不能为0".to_string()));
        }
        Ok(())
    }

    /// 资源集合路径，例如 `api/deals`
    pub fn resource_path(&self, api_path: &str) -> String {
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            api_path.to_string()
        } else {
            format!("{}/{}", prefix, api_path)
        }
    }
}

/// 配置构建器
pub struct LoanExchangeConfigBuilder {
    config: LoanExchangeConfig,
}

impl LoanExchangeConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: LoanExchangeConfig::default(),
        }
    }

    pub fn api_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn api_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    pub fn items_per_page(mut self, size: u32) -> Self {
        self.config.items_per_page = size;
        self
    }

    pub fn http_client_config(mut self, config: HttpClientConfig) -> Self {
        self.config.http_client_config = config;
        self
    }

    /// 追加一个默认请求头
    pub fn default_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.config
            .http_client_config
            .default_headers
            .insert(name.into(), value.into());
        self
    }

    pub fn event_config(mut self, config: EventConfig) -> Self {
        self.config.event_config = config;
        self
    }

    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.config.debug_mode = enabled;
        self
    }

    /// 设置时区偏移（从小时）
    ///
    /// # 参数
    ///
    /// * `hours` - 时区小时偏移，例如：+8, -5
    pub fn timezone_hours(mut self, hours: i32) -> Self {
        self.config.timezone_offset_seconds = Some(hours * 3600);
        self
    }

    pub fn timezone_seconds(mut self, seconds: i32) -> Self {
        self.config.timezone_offset_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> LoanExchangeConfig {
        self.config
    }
}

impl Default for LoanExchangeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
