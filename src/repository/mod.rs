// ==========================================
// 产线生产看板 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 整份 JSON 文档读写、每日备份
// 约束: 读-改-写在数据文件锁内完成；写入采用临时文件 + rename
// ==========================================

pub mod backup;
pub mod error;
pub mod state_store;

// 重导出核心仓储
pub use backup::BackupManager;
pub use error::{RepositoryError, RepositoryResult};
pub use state_store::{JsonStateStore, MemoryStateStore, StateRepository, StateStore};
