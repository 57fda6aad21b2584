// ==========================================
// 产线生产看板 - 日切引擎
// ==========================================
// 职责: 型号存储日期 != 今天 时清零当日数据
// 保留: model_name / label_week / daily_target / 操作员身份 (id/name/position/target/status)
// 清零: 汇总、小时段计数、操作员绩效
// 重建: 按保留的日目标重新分配小时目标，再经 Aggregator 重算派生数据
// 红线: 同日重复调用为空操作；批量日切单个型号失败不影响其他型号
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::line::ProductionState;
use crate::domain::production::ProductionModel;
use crate::engine::aggregator::Aggregator;
use crate::engine::error::EngineResult;
use crate::engine::target_allocator::TargetAllocator;

/// 存储日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// RolloverReport - 批量日切结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RolloverReport {
    pub today: String,
    pub models_checked: usize,
    pub models_reset: usize,
    pub failures: Vec<RolloverFailure>,
}

impl RolloverReport {
    /// 是否有型号被重置（调用方据此决定是否持久化）
    pub fn has_changes(&self) -> bool {
        self.models_reset > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverFailure {
    pub line: String,
    pub model: String,
    pub reason: String,
}

// ==========================================
// RolloverEngine - 日切引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RolloverEngine {
    allocator: TargetAllocator,
    aggregator: Aggregator,
}

impl RolloverEngine {
    pub fn new(allocator: TargetAllocator) -> Self {
        Self {
            allocator,
            aggregator: Aggregator::new(),
        }
    }

    /// 存储日期是否为今天
    pub fn is_current(model: &ProductionModel, today: NaiveDate) -> bool {
        NaiveDate::parse_from_str(model.date.trim(), DATE_FORMAT)
            .map(|d| d == today)
            .unwrap_or(false)
    }

    /// 检查并重置单个型号
    ///
    /// # 返回
    /// - Ok(true): 已重置
    /// - Ok(false): 日期为今天，无变化
    /// - Err: 重置失败，型号保持原状
    pub fn check_and_reset(
        &self,
        model: &mut ProductionModel,
        today: NaiveDate,
    ) -> EngineResult<bool> {
        if Self::is_current(model, today) {
            return Ok(false);
        }

        // 在副本上完成重置，成功后整体替换
        let mut next = model.clone();

        next.output_day = 0;
        next.qc_checking = 0;
        next.actual_defect = 0;
        next.defect_rate_percentage = 0.0;
        next.achievement_percentage = 0.0;

        for slot in next.hourly.iter_mut() {
            slot.clear_counters();
        }
        for op in next.operators.iter_mut() {
            op.reset_performance();
        }

        next.target_per_hour = self.allocator.allocate(next.daily_target, &mut next.hourly)?;
        self.aggregator.recompute_keeping_target(&mut next)?;
        next.date = today.format(DATE_FORMAT).to_string();

        tracing::info!(
            model = %next.model_name,
            from = %model.date,
            to = %next.date,
            daily_target = next.daily_target,
            "型号日切完成"
        );

        *model = next;
        Ok(true)
    }

    /// 批量日切：遍历所有产线的所有型号
    #[instrument(skip(self, state), fields(models = state.model_count()))]
    pub fn run_batch(&self, state: &mut ProductionState, today: NaiveDate) -> RolloverReport {
        let mut report = RolloverReport {
            today: today.format(DATE_FORMAT).to_string(),
            ..RolloverReport::default()
        };

        for (line_name, line) in state.lines.iter_mut() {
            for model in line.models.iter_mut() {
                report.models_checked += 1;
                match self.check_and_reset(model, today) {
                    Ok(true) => report.models_reset += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(
                            line = %line_name,
                            model = %model.model_name,
                            error = %e,
                            "型号日切失败，已跳过"
                        );
                        report.failures.push(RolloverFailure {
                            line: line_name.clone(),
                            model: model.model_name.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if report.has_changes() || !report.failures.is_empty() {
            tracing::info!(
                checked = report.models_checked,
                reset = report.models_reset,
                failed = report.failures.len(),
                "批量日切完成"
            );
        } else {
            tracing::debug!(checked = report.models_checked, "批量日切: 无需重置");
        }

        report
    }
}
