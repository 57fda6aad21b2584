// ==========================================
// 产线生产看板 - 生产型号领域模型
// ==========================================
// 职责: 单个型号的当日快照（目标、小时段、汇总、操作员）
// 不变量: daily_target == Σ hourly.manual_target（目标类变更之后）
// 不变量: defect_rate_percentage == round2(100 * actual_defect / qc_checking)，qc 为 0 时为 0
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::hour_slot::HourSlot;
use crate::domain::operator::Operator;

// ==========================================
// ProductionModel - 生产型号
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionModel {
    // ===== 主数据（日切保留）=====
    pub model_name: String,
    #[serde(default)]
    pub label_week: String,
    #[serde(default)]
    pub daily_target: i64,
    #[serde(default)]
    pub target_per_hour: i64,      // 仅供展示

    // ===== 日期 =====
    #[serde(default)]
    pub date: String,              // YYYY-MM-DD

    // ===== 当日汇总（派生）=====
    #[serde(default)]
    pub output_day: i64,
    #[serde(default)]
    pub qc_checking: i64,
    #[serde(default)]
    pub actual_defect: i64,
    #[serde(default)]
    pub defect_rate_percentage: f64,
    #[serde(default)]
    pub achievement_percentage: f64,

    // ===== 明细 =====
    #[serde(default)]
    pub hourly: Vec<HourSlot>,
    #[serde(default)]
    pub operators: Vec<Operator>,
}

impl ProductionModel {
    /// 创建计数为零的型号（目标分配由调用方完成）
    pub fn new(
        model_name: impl Into<String>,
        label_week: impl Into<String>,
        date: impl Into<String>,
        hourly: Vec<HourSlot>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            label_week: label_week.into(),
            daily_target: 0,
            target_per_hour: 0,
            date: date.into(),
            output_day: 0,
            qc_checking: 0,
            actual_defect: 0,
            defect_rate_percentage: 0.0,
            achievement_percentage: 0.0,
            hourly,
            operators: Vec::new(),
        }
    }

    /// 查找操作员
    pub fn operator_mut(&mut self, operator_id: &str) -> Option<&mut Operator> {
        self.operators.iter_mut().find(|op| op.id == operator_id)
    }

    /// 第一个为负数的录入字段（字段路径, 值），全部非负时为 None
    ///
    /// 只检查录入字段；汇总字段由 Aggregator 重算
    pub fn first_negative_field(&self) -> Option<(String, i64)> {
        if self.daily_target < 0 {
            return Some(("dailyTarget".to_string(), self.daily_target));
        }
        for (i, slot) in self.hourly.iter().enumerate() {
            let fields = [
                ("manualTarget", slot.manual_target),
                ("output", slot.output),
                ("defect", slot.defect),
                ("qcChecked", slot.qc_checked),
            ];
            if let Some((name, value)) = fields.into_iter().find(|(_, v)| *v < 0) {
                return Some((format!("hourly[{}].{}", i, name), value));
            }
        }
        for op in &self.operators {
            let fields = [("target", op.target), ("output", op.output), ("defect", op.defect)];
            if let Some((name, value)) = fields.into_iter().find(|(_, v)| *v < 0) {
                return Some((format!("operators[{}].{}", op.id, name), value));
            }
        }
        None
    }

    /// 所有计数是否为零（日切后校验用）
    pub fn counters_are_zero(&self) -> bool {
        self.output_day == 0
            && self.qc_checking == 0
            && self.actual_defect == 0
            && self.defect_rate_percentage == 0.0
            && self
                .hourly
                .iter()
                .all(|s| s.output == 0 && s.defect == 0 && s.qc_checked == 0)
            && self
                .operators
                .iter()
                .all(|op| op.output == 0 && op.defect == 0 && op.efficiency == 0.0)
    }
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
