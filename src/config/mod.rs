// ==========================================
// 产线生产看板 - 配置层
// ==========================================
// 职责: 系统配置管理,支持环境变量覆写
// 存储: config.json
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, ENV_PREFIX};
