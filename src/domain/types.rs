// ==========================================
// 产线生产看板 - 领域类型定义
// ==========================================
// 职责: 操作员状态、时间编码等枚举类型
// 序列化格式: 与 JSON 数据文件保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 操作员状态 (Operator Status)
// ==========================================
// 序列化格式: 小写 (active / break / off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorStatus {
    #[default]
    Active, // 在岗
    Break,  // 休息
    Off,    // 离岗
}

impl fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorStatus::Active => write!(f, "active"),
            OperatorStatus::Break => write!(f, "break"),
            OperatorStatus::Off => write!(f, "off"),
        }
    }
}

impl OperatorStatus {
    /// 从字符串解析状态，无法识别时返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(OperatorStatus::Active),
            "break" => Some(OperatorStatus::Break),
            "off" => Some(OperatorStatus::Off),
            _ => None,
        }
    }
}

// ==========================================
// 时间编码 (Time Encoding)
// ==========================================
// 用于"当前小时段"匹配时的时间比较
// - Base100: hour + minute/100（历史数据兼容口径，默认）
// - Minutes: 一天中的分钟数（真实时间比较）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeEncoding {
    #[default]
    Base100,
    Minutes,
}

impl fmt::Display for TimeEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_config_str())
    }
}

impl TimeEncoding {
    /// 从配置字符串解析编码，无法识别时返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BASE100" => Some(TimeEncoding::Base100),
            "MINUTES" => Some(TimeEncoding::Minutes),
            _ => None,
        }
    }

    /// 转换为配置文件中的字符串
    pub fn to_config_str(&self) -> &'static str {
        match self {
            TimeEncoding::Base100 => "BASE100",
            TimeEncoding::Minutes => "MINUTES",
        }
    }
}
