//! 资源类型枚举 - 受控枚举
//!
//! 新增资源需 SDK 与后端 REST 接口同步升级。

use std::str::FromStr;

/// 资源类型（与后端 /api/{resource} 一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityResource {
    Deal,
    BalanceLog,
    Notification,
}

impl EntityResource {
    pub const ALL: [EntityResource; 3] = [Self::Deal, Self::BalanceLog, Self::Notification];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deal => "deal",
            Self::BalanceLog => "balance_log",
            Self::Notification => "notification",
        }
    }

    /// REST 集合路径段（/api/{api_path}）
    pub fn api_path(self) -> &'static str {
        match self {
            Self::Deal => "deals",
            Self::BalanceLog => "balance-logs",
            Self::Notification => "notifications",
        }
    }
}

impl FromStr for EntityResource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deal" | "deals" => Ok(Self::Deal),
            "balance_log" | "balance-logs" => Ok(Self::BalanceLog),
            "notification" | "notifications" => Ok(Self::Notification),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for EntityResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
