// ==========================================
// 产线生产看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 目录: <data_dir>/config.json, <data_dir>/production_data.json, <data_dir>/backups/
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{ExportApi, ProductionApi};
use crate::clock::{Clock, SystemClock};
use crate::config::ConfigManager;
use crate::repository::{BackupManager, JsonStateStore, StateRepository};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 备份子目录名
pub const BACKUP_DIR_NAME: &str = "backups";

/// 应用状态
///
/// 包含所有API实例和共享资源，由主程序与定时任务共用
pub struct AppState {
    /// 数据目录
    pub data_dir: PathBuf,

    /// 配置（启动时加载）
    pub config: ConfigManager,

    /// 时钟
    pub clock: Arc<dyn Clock>,

    /// 生产数据仓储（带锁读-改-写）
    pub repo: Arc<StateRepository>,

    /// 生产数据API
    pub production_api: Arc<ProductionApi>,

    /// 报表导出API
    pub export_api: Arc<ExportApi>,

    /// 每日备份
    pub backup_manager: Arc<BackupManager>,
}

impl AppState {
    /// 使用系统时钟创建AppState
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, String> {
        Self::with_clock(data_dir, Arc::new(SystemClock))
    }

    /// 使用指定时钟创建AppState
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 加载配置并校验小时段配置
    /// 2. 初始化数据文件仓储与备份目录
    /// 3. 创建所有API实例
    pub fn with_clock(data_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self, String> {
        let data_dir = data_dir.into();
        tracing::info!("初始化AppState，数据目录: {}", data_dir.display());

        std::fs::create_dir_all(&data_dir)
            .map_err(|e| format!("无法创建数据目录 {}: {}", data_dir.display(), e))?;

        // ==========================================
        // 配置
        // ==========================================
        let config = ConfigManager::load(data_dir.join(CONFIG_FILE_NAME))
            .map_err(|e| format!("无法加载配置: {}", e))?;
        let schedule = config
            .hour_schedule()
            .map_err(|e| format!("小时段配置无效: {}", e))?;
        let time_encoding = config.time_encoding();

        // ==========================================
        // 仓储
        // ==========================================
        let data_file = data_dir.join(config.data_file_name());
        let store = Arc::new(JsonStateStore::new(&data_file));
        let repo = Arc::new(StateRepository::new(store));
        let backup_manager = Arc::new(BackupManager::new(
            data_dir.join(BACKUP_DIR_NAME),
            config.backup_retention(),
        ));

        // ==========================================
        // API
        // ==========================================
        let production_api = Arc::new(ProductionApi::new(
            repo.clone(),
            clock.clone(),
            schedule,
            time_encoding,
        ));
        let export_api = Arc::new(ExportApi::new(production_api.clone()));

        tracing::info!(
            data_file = %data_file.display(),
            time_encoding = %time_encoding.to_config_str(),
            "AppState初始化完成"
        );

        Ok(Self {
            data_dir,
            config,
            clock,
            repo,
            production_api,
            export_api,
            backup_manager,
        })
    }

    /// 获取数据目录
    pub fn get_data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// ==========================================
// 默认数据目录辅助函数
// ==========================================

/// 获取默认数据目录
///
/// # 返回
/// - 环境变量 PRODUCTION_TRACKER_DATA_DIR（非空时）
/// - 开发环境: 用户数据目录/production-tracker-dev
/// - 生产环境: 用户数据目录/production-tracker
pub fn get_default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("PRODUCTION_TRACKER_DATA_DIR") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let mut path = PathBuf::from("./data");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("production-tracker-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("production-tracker");
        }
    }

    path
}
