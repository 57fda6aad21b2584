// ==========================================
// 产线生产看板 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仓储层不做重试，错误原样上报调用方
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 文件错误 =====
    #[error("文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    // ===== 并发控制错误 =====
    #[error("数据文件锁获取失败: {0}")]
    LockError(String),

    // ===== 数据错误 =====
    #[error("数据文件内容非法 ({path}): {reason}")]
    InvalidData { path: String, reason: String },

    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        RepositoryError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
