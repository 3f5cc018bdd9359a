use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ITEMS_PER_PAGE;
use crate::error::LoanExchangeSDKError;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// 排序条件，渲染为 `field,asc`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// 同字段，反向
    pub fn toggled(&self) -> Self {
        Self::new(self.field.clone(), self.order.reversed())
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.order.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = LoanExchangeSDKError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = s.split_once(',').unwrap_or((s, "asc"));
        let field = field.trim();
        if field.is_empty() {
            return Err(LoanExchangeSDKError::InvalidArgument(format!("无效的排序: {}", s)));
        }
        let order = match order.trim().to_ascii_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            other => {
                return Err(LoanExchangeSDKError::InvalidArgument(format!(
                    "无效的排序方向: {}",
                    other
                )))
            }
        };
        Ok(Self::new(field, order))
    }
}

/// 列表查询过滤条件（对应后端列表接口的过滤参数）
pub trait QueryFilter {
    fn to_query(&self) -> Vec<(String, String)>;
}

impl QueryFilter for Vec<(String, String)> {
    fn to_query(&self) -> Vec<(String, String)> {
        self.clone()
    }
}

/// 一次列表请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// 0 起始页号
    pub page: u32,
    pub size: u32,
    pub sort: Option<SortSpec>,
    pub filter: Vec<(String, String)>,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: ITEMS_PER_PAGE,
            sort: None,
            filter: Vec::new(),
        }
    }
}

impl ListRequest {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_filter(mut self, filter: &impl QueryFilter) -> Self {
        self.filter = filter.to_query();
        self
    }
}
