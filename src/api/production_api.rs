// ==========================================
// 产线生产看板 - 生产数据 API
// ==========================================
// 职责: 供路由层调用的业务操作
// - 小时数据录入 / 日目标修改 / 批量日切 / 当前累计目标查询
// - 产线、型号、操作员维护
// 约定: 每个操作是一次完整的读-改-写（数据文件锁内完成）
// 顺序: 读取 → 目标型号日切检查 → 变更 → Aggregator 重算 → 写回
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_count, parse_optional_count, validate_name, validate_non_negative};
use crate::clock::Clock;
use crate::domain::line::{Line, ProductionState};
use crate::domain::operator::Operator;
use crate::domain::production::ProductionModel;
use crate::domain::types::{OperatorStatus, TimeEncoding};
use crate::engine::{
    current_cumulative_target, current_slot_index, Aggregator, HourSchedule, RolloverEngine,
    RolloverReport, TargetAllocator, DATE_FORMAT,
};
use crate::repository::state_store::StateRepository;

// ==========================================
// 请求/响应结构
// ==========================================

/// 小时数据录入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyUpdate {
    pub output: i64,
    pub defect: i64,
    pub qc_checked: i64,
    #[serde(default)]
    pub manual_target: Option<i64>,
}

impl HourlyUpdate {
    /// 从表单 JSON 解析（数值可为数字或数字字符串）
    pub fn from_json(value: &Value) -> ApiResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ApiError::ValidationError("小时数据应为 JSON 对象".to_string()))?;

        let field = |name: &str| -> ApiResult<i64> {
            let v = obj
                .get(name)
                .ok_or_else(|| ApiError::ValidationError(format!("缺少字段: {}", name)))?;
            parse_count(name, v)
        };

        Ok(Self {
            output: field("output")?,
            defect: field("defect")?,
            qc_checked: field("qcChecked")?,
            manual_target: parse_optional_count("manualTarget", obj.get("manualTarget"))?,
        })
    }

    /// 校验全部字段非负
    pub fn validate(&self) -> ApiResult<()> {
        validate_non_negative("output", self.output)?;
        validate_non_negative("defect", self.defect)?;
        validate_non_negative("qcChecked", self.qc_checked)?;
        if let Some(target) = self.manual_target {
            validate_non_negative("manualTarget", target)?;
        }
        Ok(())
    }
}

/// 新建型号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewModelRequest {
    pub model_name: String,
    #[serde(default)]
    pub label_week: String,
    pub daily_target: i64,
}

/// 新增/修改操作员
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub target: i64,
    #[serde(default)]
    pub status: Option<OperatorStatus>,
}

/// 当前累计目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTarget {
    pub line: String,
    pub model: String,
    pub time: String,
    pub slot_index: Option<usize>,
    pub slot_label: Option<String>,
    pub cumulative_target: i64,
    pub output_day: i64,
    pub gap: i64,                  // output_day - cumulative_target
}

// ==========================================
// ProductionApi
// ==========================================
pub struct ProductionApi {
    repo: Arc<StateRepository>,
    clock: Arc<dyn Clock>,
    schedule: HourSchedule,
    allocator: TargetAllocator,
    rollover: RolloverEngine,
    aggregator: Aggregator,
    time_encoding: TimeEncoding,
}

impl ProductionApi {
    pub fn new(
        repo: Arc<StateRepository>,
        clock: Arc<dyn Clock>,
        schedule: HourSchedule,
        time_encoding: TimeEncoding,
    ) -> Self {
        let allocator = TargetAllocator::new(schedule.clone());
        Self {
            repo,
            clock,
            rollover: RolloverEngine::new(allocator.clone()),
            allocator,
            schedule,
            aggregator: Aggregator::new(),
            time_encoding,
        }
    }

    pub fn time_encoding(&self) -> TimeEncoding {
        self.time_encoding
    }

    /// 在数据文件锁内执行一次读-改-写
    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut ProductionState) -> ApiResult<T>,
    ) -> ApiResult<T> {
        self.repo.transaction(f)
    }

    // ==========================================
    // 定位辅助
    // ==========================================

    fn line_mut<'a>(state: &'a mut ProductionState, line: &str) -> ApiResult<&'a mut Line> {
        state
            .line_mut(line)
            .ok_or_else(|| ApiError::NotFound(format!("产线不存在: {}", line)))
    }

    fn model_mut<'a>(
        state: &'a mut ProductionState,
        line: &str,
        model: &str,
    ) -> ApiResult<&'a mut ProductionModel> {
        Self::line_mut(state, line)?
            .model_mut(model)
            .ok_or_else(|| ApiError::NotFound(format!("型号不存在: {}/{}", line, model)))
    }

    /// 定位型号并执行日切检查
    fn current_model_mut<'a>(
        &self,
        state: &'a mut ProductionState,
        line: &str,
        model: &str,
    ) -> ApiResult<&'a mut ProductionModel> {
        let today = self.clock.today();
        let target = Self::model_mut(state, line, model)?;
        self.rollover.check_and_reset(target, today)?;
        Ok(target)
    }

    // ==========================================
    // 产线 / 型号维护
    // ==========================================

    /// 新建产线
    pub fn create_line(&self, line: &str) -> ApiResult<Line> {
        let name = validate_name("产线名称", line)?;
        self.with_state(|state| {
            if state.lines.contains_key(&name) {
                return Err(ApiError::ValidationError(format!("产线已存在: {}", name)));
            }
            let created = Line::new(name.clone());
            state.lines.insert(name.clone(), created.clone());
            tracing::info!(line = %name, "产线已创建");
            Ok(created)
        })
    }

    /// 产线名称列表
    pub fn list_lines(&self) -> ApiResult<Vec<String>> {
        Ok(self.repo.snapshot()?.lines.keys().cloned().collect())
    }

    /// 读取产线（先对其所有型号做日切检查）
    ///
    /// 单个型号日切失败只记告警并保持原样，不影响其他型号
    pub fn get_line(&self, line: &str) -> ApiResult<Line> {
        let today = self.clock.today();
        self.with_state(|state| {
            let target = Self::line_mut(state, line)?;
            for model in target.models.iter_mut() {
                if let Err(e) = self.rollover.check_and_reset(model, today) {
                    tracing::warn!(
                        line,
                        model = %model.model_name,
                        error = %e,
                        "型号日切失败，保持原状"
                    );
                }
            }
            Ok(target.clone())
        })
    }

    /// 新建型号：计数为零、按日目标分配小时目标、日期为今天，并设为激活型号
    pub fn create_model(&self, line: &str, request: NewModelRequest) -> ApiResult<ProductionModel> {
        let model_name = validate_name("型号名称", &request.model_name)?;
        validate_non_negative("dailyTarget", request.daily_target)?;
        let today = self.clock.today().format(DATE_FORMAT).to_string();

        self.with_state(|state| {
            let target_line = Self::line_mut(state, line)?;
            if target_line.model(&model_name).is_some() {
                return Err(ApiError::ValidationError(format!(
                    "型号已存在: {}/{}",
                    line, model_name
                )));
            }

            let mut model = ProductionModel::new(
                model_name.clone(),
                request.label_week.trim(),
                today.clone(),
                self.schedule.new_slots(),
            );
            model.daily_target = request.daily_target;
            model.target_per_hour = self.allocator.allocate(request.daily_target, &mut model.hourly)?;
            self.aggregator.recompute(&mut model)?;

            target_line.models.push(model.clone());
            target_line.active_model = Some(model_name.clone());
            tracing::info!(
                line,
                model = %model_name,
                daily_target = model.daily_target,
                "型号已创建"
            );
            Ok(model)
        })
    }

    /// 切换激活型号
    pub fn set_active_model(&self, line: &str, model: &str) -> ApiResult<()> {
        self.with_state(|state| {
            let target_line = Self::line_mut(state, line)?;
            if target_line.model(model).is_none() {
                return Err(ApiError::NotFound(format!("型号不存在: {}/{}", line, model)));
            }
            target_line.active_model = Some(model.to_string());
            tracing::info!(line, model, "激活型号已切换");
            Ok(())
        })
    }

    /// 读取型号（日切检查后返回）
    pub fn get_model(&self, line: &str, model: &str) -> ApiResult<ProductionModel> {
        self.with_state(|state| Ok(self.current_model_mut(state, line, model)?.clone()))
    }

    /// 读取产线的激活型号
    pub fn get_active_model(&self, line: &str) -> ApiResult<ProductionModel> {
        let name = {
            let state = self.repo.snapshot()?;
            let target_line = state
                .line(line)
                .ok_or_else(|| ApiError::NotFound(format!("产线不存在: {}", line)))?;
            target_line
                .active_model_name()
                .map(|s| s.to_string())
                .ok_or_else(|| ApiError::NotFound(format!("产线无型号: {}", line)))?
        };
        self.get_model(line, &name)
    }

    // ==========================================
    // 核心操作
    // ==========================================

    /// 录入小时数据
    ///
    /// # 规则
    /// - 负数 → ValidationError，状态不变
    /// - 小时段下标越界 → NotFound
    /// - 午休时段不允许设置非零目标
    /// - 录入后经 Aggregator 重算（日目标 = Σ 小时目标）
    pub fn apply_hourly_update(
        &self,
        line: &str,
        model: &str,
        hour_index: usize,
        update: HourlyUpdate,
    ) -> ApiResult<ProductionModel> {
        update.validate()?;

        self.with_state(|state| {
            let target = self.current_model_mut(state, line, model)?;
            let slot_count = target.hourly.len();
            let slot = target.hourly.get_mut(hour_index).ok_or_else(|| {
                ApiError::NotFound(format!(
                    "小时段不存在: {}/{} index={} (共{}段)",
                    line, model, hour_index, slot_count
                ))
            })?;

            if let Some(manual_target) = update.manual_target {
                if manual_target > 0 && !self.schedule.is_allocatable(slot) {
                    return Err(ApiError::ValidationError(format!(
                        "午休时段 {} 的目标必须为 0",
                        slot.label
                    )));
                }
                slot.manual_target = manual_target;
            }
            slot.output = update.output;
            slot.defect = update.defect;
            slot.qc_checked = update.qc_checked;
            let label = slot.label.clone();

            // 改了单时段目标：日目标随之取小时目标之和
            if update.manual_target.is_some() {
                target.daily_target = TargetAllocator::recompute_daily_target(&target.hourly)?;
            }
            self.aggregator.recompute(target)?;
            tracing::info!(
                line,
                model,
                slot = %label,
                output = update.output,
                defect = update.defect,
                qc_checked = update.qc_checked,
                "小时数据已录入"
            );
            Ok(target.clone())
        })
    }

    /// 修改日目标：重新分配小时目标后重算
    pub fn apply_target_edit(
        &self,
        line: &str,
        model: &str,
        new_daily_target: i64,
    ) -> ApiResult<ProductionModel> {
        validate_non_negative("dailyTarget", new_daily_target)?;

        self.with_state(|state| {
            let target = self.current_model_mut(state, line, model)?;
            target.target_per_hour = self.allocator.allocate(new_daily_target, &mut target.hourly)?;
            target.daily_target = TargetAllocator::recompute_daily_target(&target.hourly)?;
            self.aggregator.recompute(target)?;

            tracing::info!(
                line,
                model,
                requested = new_daily_target,
                per_hour = target.target_per_hour,
                daily_target = target.daily_target,
                "日目标已修改"
            );
            Ok(target.clone())
        })
    }

    /// 批量日切扫描（所有产线、所有型号）
    ///
    /// 仅当有型号被重置时写回
    pub fn run_rollover_scan(&self) -> ApiResult<RolloverReport> {
        let today = self.clock.today();
        self.with_state(|state| Ok(self.rollover.run_batch(state, today)))
    }

    /// 查询当前累计目标（不持久化派生结果）
    pub fn query_current_target(&self, line: &str, model: &str) -> ApiResult<CurrentTarget> {
        let current = self.get_model(line, model)?;
        let now = self.clock.time();

        let slot_index = current_slot_index(&current.hourly, now, self.time_encoding);
        let cumulative_target =
            current_cumulative_target(&current.hourly, now, self.time_encoding);

        Ok(CurrentTarget {
            line: line.to_string(),
            model: model.to_string(),
            time: now.format("%H:%M").to_string(),
            slot_index,
            slot_label: slot_index.map(|i| current.hourly[i].label.clone()),
            cumulative_target,
            output_day: current.output_day,
            gap: current.output_day - cumulative_target,
        })
    }

    // ==========================================
    // 操作员维护
    // ==========================================

    /// 新增或修改操作员（按 id 匹配，修改时保留当日绩效）
    pub fn upsert_operator(
        &self,
        line: &str,
        model: &str,
        input: OperatorInput,
    ) -> ApiResult<Operator> {
        let name = validate_name("操作员姓名", &input.name)?;
        validate_non_negative("target", input.target)?;

        self.with_state(|state| {
            let target = self.current_model_mut(state, line, model)?;

            let id = input.id.as_deref().map(str::trim).filter(|id| !id.is_empty());
            let index = match id {
                Some(id) => match target.operators.iter().position(|op| op.id == id) {
                    Some(idx) => idx,
                    None => {
                        return Err(ApiError::NotFound(format!("操作员不存在: {}", id)));
                    }
                },
                None => {
                    target
                        .operators
                        .push(Operator::new(name.clone(), input.position.trim(), input.target));
                    target.operators.len() - 1
                }
            };

            let op = &mut target.operators[index];
            op.name = name.clone();
            op.position = input.position.trim().to_string();
            op.target = input.target;
            if let Some(status) = input.status {
                op.status = status;
            }
            let op_id = op.id.clone();

            self.aggregator.recompute(target)?;
            tracing::info!(line, model, operator = %op_id, "操作员已保存");
            Ok(target.operators[index].clone())
        })
    }

    /// 录入操作员当日绩效
    pub fn update_operator_performance(
        &self,
        line: &str,
        model: &str,
        operator_id: &str,
        output: i64,
        defect: i64,
    ) -> ApiResult<Operator> {
        validate_non_negative("output", output)?;
        validate_non_negative("defect", defect)?;

        self.with_state(|state| {
            let target = self.current_model_mut(state, line, model)?;
            let op = target
                .operator_mut(operator_id)
                .ok_or_else(|| ApiError::NotFound(format!("操作员不存在: {}", operator_id)))?;
            op.output = output;
            op.defect = defect;

            self.aggregator.recompute(target)?;
            target
                .operators
                .iter()
                .find(|op| op.id == operator_id)
                .cloned()
                .ok_or_else(|| ApiError::InternalError("操作员重算后丢失".to_string()))
        })
    }

    /// 修改操作员状态
    pub fn set_operator_status(
        &self,
        line: &str,
        model: &str,
        operator_id: &str,
        status: OperatorStatus,
    ) -> ApiResult<Operator> {
        self.with_state(|state| {
            let target = self.current_model_mut(state, line, model)?;
            let op = target
                .operator_mut(operator_id)
                .ok_or_else(|| ApiError::NotFound(format!("操作员不存在: {}", operator_id)))?;
            op.status = status;
            tracing::info!(line, model, operator = operator_id, %status, "操作员状态已修改");
            Ok(op.clone())
        })
    }

    /// 移除操作员
    pub fn remove_operator(&self, line: &str, model: &str, operator_id: &str) -> ApiResult<()> {
        self.with_state(|state| {
            let target = self.current_model_mut(state, line, model)?;
            let before = target.operators.len();
            target.operators.retain(|op| op.id != operator_id);
            if target.operators.len() == before {
                return Err(ApiError::NotFound(format!("操作员不存在: {}", operator_id)));
            }
            self.aggregator.recompute(target)?;
            tracing::info!(line, model, operator = operator_id, "操作员已移除");
            Ok(())
        })
    }
}
