// ==========================================
// 产线生产看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config.json（key-value，值均为字符串）
// 覆写: 环境变量 PRODUCTION_TRACKER_<KEY> 优先于文件
// ==========================================

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::types::TimeEncoding;
use crate::engine::error::EngineResult;
use crate::engine::hour_schedule::{
    HourSchedule, DEFAULT_ALLOCATABLE_HOURS, DEFAULT_LUNCH_LABEL, DEFAULT_SLOT_LABELS,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::state_store::write_json_atomic;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PRODUCTION_TRACKER_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 从配置文件加载（文件不存在时使用默认值），并应用环境变量覆写
    pub fn load(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let path = path.into();
        let mut values = Self::read_file(&path)?;

        for key in config_keys::ALL {
            let env_key = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Ok(value) = std::env::var(&env_key) {
                tracing::debug!(key, env = %env_key, "配置项由环境变量覆写");
                values.insert(key.to_string(), value);
            }
        }

        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// 从内存键值创建（不读文件、不读环境变量）
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { path: None, values }
    }

    fn read_file(path: &Path) -> RepositoryResult<BTreeMap<String, String>> {
        match fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => {
                // 允许数字/数组等非字符串值，统一转成字符串存储
                let parsed: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)?;
                Ok(parsed
                    .into_iter()
                    .map(|(k, v)| match v {
                        serde_json::Value::String(s) => (k, s),
                        other => (k, other.to_string()),
                    })
                    .collect())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(RepositoryError::io(path, e)),
        }
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    fn get_parsed_or<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get_config_value(key) {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!(key, value = raw, "配置值无法解析，使用默认值");
                    default
                }
            },
            None => default,
        }
    }

    /// 写入配置值并持久化（若由文件加载）
    pub fn set_config_value(&mut self, key: &str, value: &str) -> RepositoryResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(path) = &self.path {
            write_json_atomic(path, &self.values)?;
        }
        Ok(())
    }

    /// 全部配置快照
    pub fn get_config_snapshot(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }

    // ===== 小时段配置 =====

    /// 构建小时段目录
    ///
    /// 时段标签配置格式: JSON 数组，如 ["07:00 - 08:00", ...]
    pub fn hour_schedule(&self) -> EngineResult<HourSchedule> {
        let labels = match self.get_config_value(config_keys::HOUR_SLOT_LABELS) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(labels) => labels,
                Err(e) => {
                    tracing::warn!(error = %e, "时段标签配置无法解析，使用参考时段表");
                    Self::default_labels()
                }
            },
            None => Self::default_labels(),
        };
        let lunch = self
            .get_config_value(config_keys::LUNCH_SLOT_LABEL)
            .unwrap_or(DEFAULT_LUNCH_LABEL)
            .trim()
            .to_string();
        let hours = self.get_parsed_or(config_keys::ALLOCATABLE_HOURS, DEFAULT_ALLOCATABLE_HOURS);

        HourSchedule::new(labels, lunch, hours)
    }

    fn default_labels() -> Vec<String> {
        DEFAULT_SLOT_LABELS.iter().map(|s| s.to_string()).collect()
    }

    // ===== 时间比较口径 =====

    pub fn time_encoding(&self) -> TimeEncoding {
        match self.get_config_value(config_keys::TIME_ENCODING) {
            Some(raw) => TimeEncoding::parse(raw).unwrap_or_else(|| {
                tracing::warn!(value = raw, "未知的时间编码，使用 BASE100");
                TimeEncoding::Base100
            }),
            None => TimeEncoding::Base100,
        }
    }

    // ===== 备份与定时任务 =====

    pub fn backup_interval_secs(&self) -> u64 {
        self.get_parsed_or(config_keys::BACKUP_INTERVAL_SECS, 3600u64).max(1)
    }

    pub fn backup_retention(&self) -> usize {
        self.get_parsed_or(config_keys::BACKUP_RETENTION, 14usize)
    }

    // ===== 文件路径 =====

    pub fn data_file_name(&self) -> String {
        self.get_config_value(config_keys::DATA_FILE_NAME)
            .unwrap_or("production_data.json")
            .to_string()
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 小时段
    pub const HOUR_SLOT_LABELS: &str = "hour_slot_labels";
    pub const LUNCH_SLOT_LABEL: &str = "lunch_slot_label";
    pub const ALLOCATABLE_HOURS: &str = "allocatable_hours";

    // 当前时段匹配口径
    pub const TIME_ENCODING: &str = "time_encoding";

    // 备份
    pub const BACKUP_INTERVAL_SECS: &str = "backup_interval_secs";
    pub const BACKUP_RETENTION: &str = "backup_retention";

    // 数据文件
    pub const DATA_FILE_NAME: &str = "data_file_name";

    pub const ALL: [&str; 7] = [
        HOUR_SLOT_LABELS,
        LUNCH_SLOT_LABEL,
        ALLOCATABLE_HOURS,
        TIME_ENCODING,
        BACKUP_INTERVAL_SECS,
        BACKUP_RETENTION,
        DATA_FILE_NAME,
    ];
}
