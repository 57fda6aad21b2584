// ==========================================
// 产线生产看板 - 小时段目录
// ==========================================
// 职责: 固定有序的工作时段标签 + 午休时段（不参与目标分配）
// 参考配置: 9 个时段 / 8 个可分配工时
// 红线: 标签格式与时段表是持久化数据的契约，不可随意修改
// ==========================================

use crate::domain::hour_slot::{parse_label, HourSlot};
use crate::engine::error::{EngineError, EngineResult};

/// 参考时段表
pub const DEFAULT_SLOT_LABELS: [&str; 9] = [
    "07:00 - 08:00",
    "08:00 - 09:00",
    "09:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
    "13:00 - 14:00",
    "14:00 - 15:00",
    "15:00 - 16:00",
];

/// 午休时段标签
pub const DEFAULT_LUNCH_LABEL: &str = "12:00 - 13:00";

/// 可分配工时数（午休不计）
pub const DEFAULT_ALLOCATABLE_HOURS: i64 = 8;

// ==========================================
// HourSchedule - 小时段目录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSchedule {
    labels: Vec<String>,
    lunch_label: String,
    allocatable_hours: i64,
}

impl Default for HourSchedule {
    fn default() -> Self {
        Self {
            labels: DEFAULT_SLOT_LABELS.iter().map(|s| s.to_string()).collect(),
            lunch_label: DEFAULT_LUNCH_LABEL.to_string(),
            allocatable_hours: DEFAULT_ALLOCATABLE_HOURS,
        }
    }
}

impl HourSchedule {
    /// 创建自定义时段目录
    ///
    /// # 校验
    /// - 标签非空且均可解析
    /// - 标签不重复
    /// - 可分配工时 > 0
    pub fn new(
        labels: Vec<String>,
        lunch_label: impl Into<String>,
        allocatable_hours: i64,
    ) -> EngineResult<Self> {
        if labels.is_empty() {
            return Err(EngineError::InvalidSchedule("时段表不能为空".to_string()));
        }
        if allocatable_hours <= 0 {
            return Err(EngineError::InvalidSchedule(format!(
                "可分配工时必须大于 0: {}",
                allocatable_hours
            )));
        }
        for (i, label) in labels.iter().enumerate() {
            if parse_label(label).is_none() {
                return Err(EngineError::InvalidSlotLabel(label.clone()));
            }
            if labels[..i].contains(label) {
                return Err(EngineError::InvalidSchedule(format!("时段标签重复: {}", label)));
            }
        }

        Ok(Self {
            labels,
            lunch_label: lunch_label.into(),
            allocatable_hours,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn lunch_label(&self) -> &str {
        &self.lunch_label
    }

    pub fn allocatable_hours(&self) -> i64 {
        self.allocatable_hours
    }

    /// 该时段是否参与每小时目标分配（午休时段除外）
    pub fn is_allocatable(&self, slot: &HourSlot) -> bool {
        slot.label.trim() != self.lunch_label
    }

    /// 按目录顺序生成计数为零的时段序列
    pub fn new_slots(&self) -> Vec<HourSlot> {
        self.labels.iter().map(HourSlot::new).collect()
    }
}
