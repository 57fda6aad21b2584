// ==========================================
// 产线生产看板 - 应用层
// ==========================================
// 职责: 组装仓储/API，运行定时任务
// ==========================================

pub mod scheduler;
pub mod state;

// 重导出
pub use scheduler::{MaintenanceOutcome, MaintenanceScheduler};
pub use state::{get_default_data_dir, AppState};
