// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use production_tracker::domain::{Line, Operator, OperatorStatus, ProductionModel, ProductionState};
use production_tracker::engine::{Aggregator, HourSchedule, TargetAllocator};

// ==========================================
// ProductionModel 构建器
// ==========================================

pub struct ModelBuilder {
    model_name: String,
    label_week: String,
    date: String,
    daily_target: i64,
    schedule: HourSchedule,
    hours: Vec<(usize, i64, i64, i64)>,
    operators: Vec<Operator>,
}

impl ModelBuilder {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            label_week: "W42".to_string(),
            date: "2026-10-16".to_string(),
            daily_target: 160,
            schedule: HourSchedule::default(),
            hours: Vec::new(),
            operators: Vec::new(),
        }
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn label_week(mut self, week: &str) -> Self {
        self.label_week = week.to_string();
        self
    }

    pub fn daily_target(mut self, target: i64) -> Self {
        self.daily_target = target;
        self
    }

    pub fn schedule(mut self, schedule: HourSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// 录入小时计数（下标, 产量, 不良, 检验数）
    pub fn hour(mut self, index: usize, output: i64, defect: i64, qc_checked: i64) -> Self {
        self.hours.push((index, output, defect, qc_checked));
        self
    }

    pub fn operator(mut self, name: &str, target: i64, output: i64, defect: i64) -> Self {
        let mut op = Operator::new(name, "Sewing", target);
        op.output = output;
        op.defect = defect;
        self.operators.push(op);
        self
    }

    pub fn operator_on_break(mut self, name: &str, target: i64) -> Self {
        let mut op = Operator::new(name, "QC", target);
        op.status = OperatorStatus::Break;
        self.operators.push(op);
        self
    }

    pub fn build(self) -> ProductionModel {
        let allocator = TargetAllocator::new(self.schedule.clone());
        let mut slots = self.schedule.new_slots();
        let per_hour = allocator
            .allocate(self.daily_target, &mut slots)
            .expect("测试日目标必须非负");

        let mut model = ProductionModel::new(self.model_name, self.label_week, self.date, slots);
        model.target_per_hour = per_hour;
        for (index, output, defect, qc_checked) in self.hours {
            let slot = &mut model.hourly[index];
            slot.output = output;
            slot.defect = defect;
            slot.qc_checked = qc_checked;
        }
        model.operators = self.operators;
        Aggregator::new()
            .recompute(&mut model)
            .expect("测试数据汇总失败");
        model
    }
}

// ==========================================
// ProductionState 构建器
// ==========================================

pub struct StateBuilder {
    state: ProductionState,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            state: ProductionState::default(),
        }
    }

    /// 添加产线及其型号（第一个型号为激活型号）
    pub fn line(mut self, name: &str, models: Vec<ProductionModel>) -> Self {
        let mut line = Line::new(name);
        line.active_model = models.first().map(|m| m.model_name.clone());
        line.models = models;
        self.state.lines.insert(name.to_string(), line);
        self
    }

    pub fn build(self) -> ProductionState {
        self.state
    }
}
