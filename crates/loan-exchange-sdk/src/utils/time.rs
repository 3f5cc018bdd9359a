//! 时间处理工具模块
//!
//! 后端只收发 UTC（ISO-8601）；表单与列表展示使用配置的时区。
//! 时区是显式传入的值，没有全局状态。

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::{LoanExchangeSDKError, Result};

/// 表单 datetime-local 输入格式
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// 列表展示格式（DD/MM/YY HH:mm）
pub const DISPLAY_FORMAT: &str = "%d/%m/%y %H:%M";

/// 时区配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneConfig {
    /// 时区偏移（秒），例如：+08:00 = 28800, -05:00 = -18000
    pub offset_seconds: i32,
}

impl TimezoneConfig {
    /// 创建时区配置（从小时偏移）
    ///
    /// # 参数
    ///
    /// * `hours` - 时区小时偏移，例如：+8, -5
    pub fn from_hours(hours: i32) -> Self {
        Self {
            offset_seconds: hours * 3600,
        }
    }

    pub fn from_seconds(offset_seconds: i32) -> Self {
        Self { offset_seconds }
    }

    /// 使用系统本地时区
    pub fn local() -> Self {
        Self {
            offset_seconds: Local::now().offset().local_minus_utc(),
        }
    }

    /// 配置里的偏移，None 表示系统本地时区
    pub fn from_config(offset_seconds: Option<i32>) -> Self {
        offset_seconds.map(Self::from_seconds).unwrap_or_else(Self::local)
    }

    pub fn to_fixed_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.offset_seconds)
    }
}

/// 日期时间格式化
#[derive(Debug, Clone, Copy)]
pub struct DateTimeFormatter {
    offset: FixedOffset,
}

impl DateTimeFormatter {
    pub fn new(config: TimezoneConfig) -> Result<Self> {
        let offset = config.to_fixed_offset().ok_or_else(|| {
            LoanExchangeSDKError::Config(format!("无效的时区偏移: {}", config.offset_seconds))
        })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 服务端时间 → 表单输入值，空值得到空字符串
    pub fn to_datetime_local(&self, value: Option<&DateTime<Utc>>) -> String {
        value
            .map(|dt| dt.with_timezone(&self.offset).format(DATETIME_LOCAL_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// 表单输入值 → 服务端时间，空输入得到 None
    pub fn from_datetime_local(&self, input: &str) -> Result<Option<DateTime<Utc>>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        let naive = NaiveDateTime::parse_from_str(input, DATETIME_LOCAL_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|e| LoanExchangeSDKError::InvalidArgument(format!("无效的日期时间 {}: {}", input, e)))?;
        let local = self.offset.from_local_datetime(&naive).single().ok_or_else(|| {
            LoanExchangeSDKError::InvalidArgument(format!("无法换算的本地时间: {}", input))
        })?;
        Ok(Some(local.with_timezone(&Utc)))
    }

    /// 列表展示，空值得到空字符串
    pub fn format_display(&self, value: Option<&DateTime<Utc>>) -> String {
        value
            .map(|dt| dt.with_timezone(&self.offset).format(DISPLAY_FORMAT).to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(hours: i32) -> DateTimeFormatter {
        DateTimeFormatter::new(TimezoneConfig::from_hours(hours)).unwrap()
    }

    #[test]
    fn test_timezone_config() {
        assert_eq!(TimezoneConfig::from_hours(8).offset_seconds, 28800);
        assert_eq!(TimezoneConfig::from_hours(-5).offset_seconds, -18000);
        assert_eq!(TimezoneConfig::from_config(Some(3600)).offset_seconds, 3600);
        assert!(TimezoneConfig::from_seconds(200_000).to_fixed_offset().is_none());
        assert!(DateTimeFormatter::new(TimezoneConfig::from_seconds(200_000)).is_err());
    }

    #[test]
    fn datetime_local_round_trip_in_configured_zone() {
        let f = formatter(3);
        let utc = Utc.with_ymd_and_hms(2020, 5, 1, 21, 30, 0).unwrap();
        assert_eq!(f.to_datetime_local(Some(&utc)), "2020-05-02T00:30");
        assert_eq!(f.from_datetime_local("2020-05-02T00:30").unwrap(), Some(utc));
    }

    #[test]
    fn empty_values() {
        let f = formatter(0);
        assert_eq!(f.to_datetime_local(None), "");
        assert_eq!(f.format_display(None), "");
        assert_eq!(f.from_datetime_local("  ").unwrap(), None);
        assert!(f.from_datetime_local("yesterday").is_err());
    }

    #[test]
    fn display_format() {
        let f = formatter(-5);
        let utc = Utc.with_ymd_and_hms(2021, 1, 1, 3, 7, 0).unwrap();
        assert_eq!(f.format_display(Some(&utc)), "31/12/20 22:07");
    }
}
