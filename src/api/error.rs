// ==========================================
// 产线生产看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/Engine错误为调用方可读的错误消息
// 约定: ValidationError / NotFound 发生时不写回任何状态
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与资源错误
    // ==========================================
    /// 负数、非数字等输入
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 产线/型号/小时段/操作员不存在
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 持久化错误
    // ==========================================
    #[error("数据持久化失败: {0}")]
    PersistenceError(String),

    #[error("数据文件锁获取失败: {0}")]
    LockError(String),

    // ==========================================
    // 配置与导出错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("报表导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => ApiError::LockError(msg),
            RepositoryError::Io { .. }
            | RepositoryError::Serialization(_)
            | RepositoryError::InvalidData { .. } => {
                ApiError::PersistenceError(err.to_string())
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NegativeValue { .. } | EngineError::Overflow(_) => {
                ApiError::ValidationError(err.to_string())
            }
            EngineError::InvalidSlotLabel(_) | EngineError::InvalidSchedule(_) => {
                ApiError::ConfigError(err.to_string())
            }
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
