use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{ApiRequest, ApiResponse, EntityTransport, HttpMethod};
use crate::config::HttpClientConfig;
use crate::error::{LoanExchangeSDKError, Result};

/// 基于 reqwest 的默认传输实现
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// 创建新的 HTTP 传输
    pub fn new(config: &HttpClientConfig, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder = Client::builder().user_agent(config.effective_user_agent());

        if let Some(timeout) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(timeout));
        }

        if let Some(timeout) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if !config.default_headers.is_empty() {
            let mut headers = HeaderMap::new();
            for (name, value) in &config.default_headers {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| LoanExchangeSDKError::Config(format!("无效的请求头名 {}: {}", name, e)))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| LoanExchangeSDKError::Config(format!("无效的请求头值 {}: {}", name, e)))?;
                headers.insert(name, value);
            }
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| LoanExchangeSDKError::Other(format!("创建 HTTP 客户端失败: {}", e)))?;

        info!("✅ HTTP 客户端已创建 (base_url: {})", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl EntityTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        debug!("📤 {} {}", request.method, url);

        let mut builder = self.client.request(to_method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("{} {} 请求失败: {}", request.method, url, e);
            LoanExchangeSDKError::Transport(format!("{} {}: {}", request.method, url, e))
        })?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let text = response.text().await?;

        if !status.is_success() {
            error!("{} {} 返回错误状态: {} {}", request.method, url, status.as_u16(), text);
            return Err(LoanExchangeSDKError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(&text)?)
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
