use std::fmt;

use serde::{Deserialize, Serialize};

/// 客户端字段校验失败（提交前拦截，不会发出请求）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("字段必填: {field}")]
    Required { field: &'static str },
    #[error("字段必须是数字: {field}")]
    NotANumber { field: &'static str },
    #[error("字段不能小于 {min}: {field}")]
    BelowMinimum { field: &'static str, min: i64 },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required { field }
            | FieldError::NotANumber { field }
            | FieldError::BelowMinimum { field, .. } => field,
        }
    }
}

#[derive(Debug)]
pub enum LoanExchangeSDKError {
    Transport(String),  // 网络层错误（连接失败、超时等）
    Http {
        status: u16,
        body: String,
    },
    Serialization(String),
    InvalidArgument(String),
    Validation(Vec<FieldError>),
    Config(String),
    NotFound(String),
    IO(String),
    Other(String),
}

impl fmt::Display for LoanExchangeSDKError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanExchangeSDKError::Transport(e) => write!(f, "Transport error: {}", e),
            LoanExchangeSDKError::Http { status, body } => {
                write!(f, "HTTP error [{}]: {}", status, body)
            }
            LoanExchangeSDKError::Serialization(e) => write!(f, "Serialization error: {}", e),
            LoanExchangeSDKError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            LoanExchangeSDKError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
                write!(f, "Validation failed: {}", fields.join(", "))
            }
            LoanExchangeSDKError::Config(e) => write!(f, "Config error: {}", e),
            LoanExchangeSDKError::NotFound(e) => write!(f, "Not found: {}", e),
            LoanExchangeSDKError::IO(e) => write!(f, "IO error: {}", e),
            LoanExchangeSDKError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl std::error::Error for LoanExchangeSDKError {}

impl From<serde_json::Error> for LoanExchangeSDKError {
    fn from(error: serde_json::Error) -> Self {
        LoanExchangeSDKError::Serialization(error.to_string())
    }
}

impl From<std::io::Error> for LoanExchangeSDKError {
    fn from(error: std::io::Error) -> Self {
        LoanExchangeSDKError::IO(error.to_string())
    }
}

impl From<reqwest::Error> for LoanExchangeSDKError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => LoanExchangeSDKError::Http {
                status: status.as_u16(),
                body: error.to_string(),
            },
            None => LoanExchangeSDKError::Transport(error.to_string()),
        }
    }
}

impl LoanExchangeSDKError {
    /// HTTP 状态码（仅 Http 错误有）
    pub fn status(&self) -> Option<u16> {
        match self {
            LoanExchangeSDKError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoanExchangeSDKError::NotFound(_))
            || self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, LoanExchangeSDKError>;

/// 失败载荷 - 原样写入 store 的 error_message
///
/// 对调用方是不透明的：状态码 + 消息 + 原始响应体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// HTTP 状态码，网络层失败时为空
    pub status: Option<u16>,
    pub message: String,
    /// 服务端返回的原始响应体
    pub body: Option<String>,
}

impl ErrorPayload {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<&LoanExchangeSDKError> for ErrorPayload {
    fn from(error: &LoanExchangeSDKError) -> Self {
        match error {
            LoanExchangeSDKError::Http { status, body } => {
                let reason = reqwest::StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("HTTP Error");
                ErrorPayload::new(Some(*status), reason).with_body(body.clone())
            }
            other => ErrorPayload::new(None, other.to_string()),
        }
    }
}

impl From<LoanExchangeSDKError> for ErrorPayload {
    fn from(error: LoanExchangeSDKError) -> Self {
        ErrorPayload::from(&error)
    }
}
