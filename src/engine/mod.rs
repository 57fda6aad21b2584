// ==========================================
// 产线生产看板 - 引擎层
// ==========================================
// 职责: 日切与累计目标核算规则
// 红线: Engine 不做文件 I/O, 派生数据统一经 Aggregator 计算
// ==========================================

pub mod aggregator;
pub mod cumulative_target;
pub mod error;
pub mod hour_schedule;
pub mod rollover;
pub mod target_allocator;

// 重导出核心引擎
pub use aggregator::Aggregator;
pub use cumulative_target::{current_cumulative_target, current_slot_index};
pub use error::{EngineError, EngineResult};
pub use hour_schedule::HourSchedule;
pub use rollover::{RolloverEngine, RolloverFailure, RolloverReport, DATE_FORMAT};
pub use target_allocator::TargetAllocator;
