//! 传输层 - REST 资源的 HTTP 访问
//!
//! `EntityTransport` 是 Store 之外唯一做 IO 的接缝：默认实现基于 reqwest，
//! 测试或宿主应用可注入自己的实现。

mod request;
mod cache_buster;
mod reqwest_transport;

use async_trait::async_trait;

use crate::error::Result;

pub use request::{clean_entity, list_query, ApiRequest, ApiResponse, HttpMethod};
pub use cache_buster::CacheBuster;
pub use reqwest_transport::ReqwestTransport;

/// HTTP 传输接口
///
/// 实现方对非 2xx 响应返回 `LoanExchangeSDKError::Http`，不做重试。
#[async_trait]
pub trait EntityTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}


#[cfg(test)]
pub use test_helpers::MockTransport;
