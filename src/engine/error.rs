// ==========================================
// 产线生产看板 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("数值不能为负数 (field={field}): {value}")]
    NegativeValue { field: String, value: i64 },

    #[error("时段标签格式错误（应为 HH:MM - HH:MM）: {0}")]
    InvalidSlotLabel(String),

    #[error("小时段配置无效: {0}")]
    InvalidSchedule(String),

    /// 计数或目标累加超出 i64 范围
    #[error("数值超出范围 (field={0})")]
    Overflow(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
