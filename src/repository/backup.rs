// ==========================================
// 产线生产看板 - 每日备份
// ==========================================
// 职责: 将整份生产数据写入按日期命名的备份文件，并按保留份数清理
// 命名: production_data_YYYY-MM-DD.json（同日覆盖）
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::line::ProductionState;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::state_store::{parse_state, write_json_atomic};

const BACKUP_PREFIX: &str = "production_data_";
const BACKUP_SUFFIX: &str = ".json";

// ==========================================
// BackupManager - 备份管理
// ==========================================
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: usize,
}

impl BackupManager {
    /// # 参数
    /// - backup_dir: 备份目录
    /// - retention: 保留的备份份数（0 表示不清理）
    pub fn new(backup_dir: impl Into<PathBuf>, retention: usize) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            retention,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn backup_path(&self, date: NaiveDate) -> PathBuf {
        self.backup_dir
            .join(format!("{}{}{}", BACKUP_PREFIX, date.format("%Y-%m-%d"), BACKUP_SUFFIX))
    }

    /// 写入当日备份并清理过期备份
    pub fn backup(&self, state: &ProductionState, date: NaiveDate) -> RepositoryResult<PathBuf> {
        let path = self.backup_path(date);
        write_json_atomic(&path, state)?;
        tracing::info!(path = %path.display(), "生产数据备份完成");

        let removed = self.prune()?;
        if removed > 0 {
            tracing::info!(removed, "已清理过期备份");
        }
        Ok(path)
    }

    /// 列出备份日期（升序）
    pub fn list_backups(&self) -> RepositoryResult<Vec<NaiveDate>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::io(&self.backup_dir, e)),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RepositoryError::io(&self.backup_dir, e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            let date = name
                .strip_prefix(BACKUP_PREFIX)
                .and_then(|rest| rest.strip_suffix(BACKUP_SUFFIX))
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            if let Some(date) = date {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }

    /// 读取指定日期的备份
    pub fn load_backup(&self, date: NaiveDate) -> RepositoryResult<ProductionState> {
        let path = self.backup_path(date);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound {
                    entity: "Backup".to_string(),
                    id: date.to_string(),
                })
            }
            Err(e) => return Err(RepositoryError::io(&path, e)),
        };
        parse_state(&path, &raw)
    }

    /// 清理超出保留份数的旧备份，返回删除数量
    fn prune(&self) -> RepositoryResult<usize> {
        if self.retention == 0 {
            return Ok(0);
        }
        let dates = self.list_backups()?;
        if dates.len() <= self.retention {
            return Ok(0);
        }

        let excess = dates.len() - self.retention;
        for date in &dates[..excess] {
            let path = self.backup_path(*date);
            fs::remove_file(&path).map_err(|e| RepositoryError::io(&path, e))?;
        }
        Ok(excess)
    }
}
