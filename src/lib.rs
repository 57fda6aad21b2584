// ==========================================
// 产线生产看板 - 核心库
// ==========================================
// 职责: 小时段目标分配、当前累计目标、日切重置、派生指标汇总
// 存储: 单个 JSON 数据文件（整份读写）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 数据仓储层 - 数据文件与备份
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 时钟
pub mod clock;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装与定时任务
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    HourSlot, Line, Operator, OperatorStatus, ProductionModel, ProductionState, TimeEncoding,
};

// 引擎
pub use engine::{Aggregator, HourSchedule, RolloverEngine, RolloverReport, TargetAllocator};

// API
pub use api::{ApiError, ApiResult, ExportApi, ProductionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产线生产看板";
