// ==========================================
// 产线生产看板 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供路由层/定时任务调用
// ==========================================

pub mod error;
pub mod export_api;
pub mod production_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export_api::{write_hourly_report, write_operator_report, ExportApi};
pub use production_api::{
    CurrentTarget, HourlyUpdate, NewModelRequest, OperatorInput, ProductionApi,
};
