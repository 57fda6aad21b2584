// ==========================================
// 产线生产看板 - 小时段领域模型
// ==========================================
// 职责: 单个工作小时段的目标/产出/不良/抽检数据
// 标签格式: "HH:MM - HH:MM"（24 小时制）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::types::TimeEncoding;

// ==========================================
// HourSlot - 小时段
// ==========================================
// cumulative_target / difference 为派生字段，由 Aggregator 统一重算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSlot {
    pub label: String,             // 时段标签，如 "07:00 - 08:00"
    #[serde(default)]
    pub manual_target: i64,        // 本小时目标
    #[serde(default)]
    pub output: i64,               // 本小时产出
    #[serde(default)]
    pub defect: i64,               // 本小时不良数
    #[serde(default)]
    pub qc_checked: i64,           // 本小时抽检数
    #[serde(default)]
    pub cumulative_target: i64,    // 累计目标（派生）
    #[serde(default)]
    pub difference: i64,           // 产出 - 目标（派生）
}

impl HourSlot {
    /// 创建计数为零的小时段
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            manual_target: 0,
            output: 0,
            defect: 0,
            qc_checked: 0,
            cumulative_target: 0,
            difference: 0,
        }
    }

    /// 清零计数字段（目标保留）
    pub fn clear_counters(&mut self) {
        self.output = 0;
        self.defect = 0;
        self.qc_checked = 0;
        self.cumulative_target = 0;
        self.difference = 0;
    }

    /// 解析标签的起止时间
    pub fn bounds(&self) -> Option<(ClockTime, ClockTime)> {
        parse_label(&self.label)
    }
}

// ==========================================
// ClockTime - 时刻（时:分）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// 解析 "HH:MM"（24:00 表示当日结束，24 点只允许 00 分）
    pub fn parse(raw: &str) -> Option<Self> {
        let (h, m) = raw.trim().split_once(':')?;
        let hour = h.trim().parse::<u32>().ok()?;
        let minute = m.trim().parse::<u32>().ok()?;
        if hour > 24 || minute > 59 || (hour == 24 && minute > 0) {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// 按指定编码转换为可比较的数值
    ///
    /// - Base100: hour + minute/100（历史口径，并非真实小时小数）
    /// - Minutes: hour*60 + minute
    pub fn encode(&self, encoding: TimeEncoding) -> f64 {
        match encoding {
            TimeEncoding::Base100 => self.hour as f64 + self.minute as f64 / 100.0,
            TimeEncoding::Minutes => (self.hour * 60 + self.minute) as f64,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// 解析时段标签 "HH:MM - HH:MM"
///
/// 先按 " - " 切分，再按 ":" 切分；格式不符返回 None
pub fn parse_label(label: &str) -> Option<(ClockTime, ClockTime)> {
    let (start, end) = label.split_once(" - ")?;
    Some((ClockTime::parse(start)?, ClockTime::parse(end)?))
}
