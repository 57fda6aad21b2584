// ==========================================
// 产线生产看板 - 汇总引擎
// ==========================================
// 职责: 由小时段重算型号的全部派生数据
// - output_day / actual_defect / qc_checking / daily_target 求和
// - defect_rate_percentage = round2(100 * defect / qc)，qc 为 0 时为 0
// - achievement_percentage = round2(100 * output / target)，target 为 0 时为 0
// - 每个时段的 cumulative_target（manual_target 前缀和）与 difference
// - 每个操作员的 efficiency
// 红线: 派生数据只在此处计算，所有变更路径必须经过此引擎
// ==========================================

use crate::domain::operator::Operator;
use crate::domain::production::{round2, ProductionModel};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::target_allocator::TargetAllocator;

// ==========================================
// Aggregator - 汇总引擎
// ==========================================
/// 无状态引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// 全量重算（日目标 = Σ 小时目标）
    ///
    /// 重算前若发现日目标与小时目标之和不一致，记录一致性告警
    /// 任一累加超出 i64 → Overflow，型号保持原状
    pub fn recompute(&self, model: &mut ProductionModel) -> EngineResult<()> {
        let slot_sum = TargetAllocator::recompute_daily_target(&model.hourly)?;
        if slot_sum != model.daily_target {
            tracing::warn!(
                model = %model.model_name,
                stored = model.daily_target,
                slot_sum,
                "ConsistencyWarning: 日目标与小时目标之和不一致，按小时目标重算"
            );
        }
        let totals = Totals::collect(model)?;
        model.daily_target = slot_sum;
        self.apply(model, totals);
        Ok(())
    }

    /// 重算派生数据，保留已存储的日目标
    ///
    /// 用于日切：主数据中的日目标原样保留，不受分配取整影响
    pub fn recompute_keeping_target(&self, model: &mut ProductionModel) -> EngineResult<()> {
        let totals = Totals::collect(model)?;
        if totals.slot_target != model.daily_target {
            tracing::debug!(
                model = %model.model_name,
                stored = model.daily_target,
                slot_sum = totals.slot_target,
                "日目标保留，小时目标之和存在取整差异"
            );
        }
        self.apply(model, totals);
        Ok(())
    }

    fn apply(&self, model: &mut ProductionModel, totals: Totals) {
        for ((slot, cumulative), difference) in model
            .hourly
            .iter_mut()
            .zip(totals.cumulative)
            .zip(totals.difference)
        {
            slot.cumulative_target = cumulative;
            slot.difference = difference;
        }

        model.output_day = totals.output;
        model.actual_defect = totals.defect;
        model.qc_checking = totals.qc_checked;
        model.defect_rate_percentage = Self::defect_rate(totals.defect, totals.qc_checked);
        model.achievement_percentage = Self::percentage(totals.output, model.daily_target);

        for op in model.operators.iter_mut() {
            op.efficiency = Self::efficiency(op);
        }
    }

    /// 不良率（%），两位小数
    pub fn defect_rate(actual_defect: i64, qc_checking: i64) -> f64 {
        Self::percentage(actual_defect, qc_checking)
    }

    /// 操作员效率（%），两位小数；目标为 0 时为 0，不设上限
    pub fn efficiency(op: &Operator) -> f64 {
        Self::percentage(op.output, op.target)
    }

    fn percentage(numerator: i64, denominator: i64) -> f64 {
        if denominator <= 0 {
            return 0.0;
        }
        round2(100.0 * numerator as f64 / denominator as f64)
    }
}

// ==========================================
// Totals - 一次重算的累加结果（全部成功后才写回型号）
// ==========================================
struct Totals {
    output: i64,
    defect: i64,
    qc_checked: i64,
    slot_target: i64,
    cumulative: Vec<i64>,
    difference: Vec<i64>,
}

impl Totals {
    fn collect(model: &ProductionModel) -> EngineResult<Self> {
        let mut totals = Totals {
            output: 0,
            defect: 0,
            qc_checked: 0,
            slot_target: 0,
            cumulative: Vec::with_capacity(model.hourly.len()),
            difference: Vec::with_capacity(model.hourly.len()),
        };

        for slot in &model.hourly {
            totals.output = checked_add(totals.output, slot.output, "output_day")?;
            totals.defect = checked_add(totals.defect, slot.defect, "actual_defect")?;
            totals.qc_checked = checked_add(totals.qc_checked, slot.qc_checked, "qc_checking")?;
            totals.slot_target =
                checked_add(totals.slot_target, slot.manual_target, "cumulative_target")?;
            totals.cumulative.push(totals.slot_target);
            totals.difference.push(
                slot.output
                    .checked_sub(slot.manual_target)
                    .ok_or_else(|| EngineError::Overflow("difference".to_string()))?,
            );
        }
        Ok(totals)
    }
}

fn checked_add(acc: i64, value: i64, field: &str) -> EngineResult<i64> {
    acc.checked_add(value)
        .ok_or_else(|| EngineError::Overflow(field.to_string()))
}
