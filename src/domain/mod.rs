// ==========================================
// 产线生产看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod hour_slot;
pub mod line;
pub mod operator;
pub mod production;
pub mod types;

// 重导出核心类型
pub use hour_slot::{parse_label, ClockTime, HourSlot};
pub use line::{Line, ProductionState};
pub use operator::Operator;
pub use production::{round2, ProductionModel};
pub use types::{OperatorStatus, TimeEncoding};
