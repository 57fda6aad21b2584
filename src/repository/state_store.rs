// ==========================================
// 产线生产看板 - 生产数据仓储
// ==========================================
// 职责: 整份文档读写（不做局部更新）
// 写入: 先写临时文件再 rename，避免半截文件
// 并发: StateRepository 持有数据文件互斥锁，读-改-写在同一把锁内完成
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::line::ProductionState;
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// Trait: StateStore
// ==========================================
// 实现者: JsonStateStore（文件）/ MemoryStateStore（测试、演示）
pub trait StateStore: Send + Sync {
    /// 读取整份状态
    fn load_state(&self) -> RepositoryResult<ProductionState>;

    /// 写入整份状态
    fn save_state(&self, state: &ProductionState) -> RepositoryResult<()>;
}

// ==========================================
// JsonStateStore - JSON 文件存储
// ==========================================
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load_state(&self) -> RepositoryResult<ProductionState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "数据文件不存在，使用空状态");
                return Ok(ProductionState::default());
            }
            Err(e) => return Err(RepositoryError::io(&self.path, e)),
        };

        if raw.trim().is_empty() {
            return Ok(ProductionState::default());
        }

        parse_state(&self.path, &raw)
    }

    fn save_state(&self, state: &ProductionState) -> RepositoryResult<()> {
        write_json_atomic(&self.path, state)
    }
}

/// 解析并校验整份状态（录入字段为负 → InvalidData）
pub(crate) fn parse_state(path: &Path, raw: &str) -> RepositoryResult<ProductionState> {
    let state: ProductionState = serde_json::from_str(raw)?;
    state.validate().map_err(|reason| RepositoryError::InvalidData {
        path: path.display().to_string(),
        reason,
    })?;
    Ok(state)
}

/// 原子写入 JSON：写 `<file>.tmp` 后 rename 覆盖
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> RepositoryResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RepositoryError::io(parent, e))?;
    }

    let bytes = serde_json::to_vec_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(|e| RepositoryError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| RepositoryError::io(path, e))?;
    Ok(())
}

// ==========================================
// MemoryStateStore - 内存存储
// ==========================================
#[derive(Default)]
pub struct MemoryStateStore {
    state: Mutex<ProductionState>,
}

impl MemoryStateStore {
    pub fn new(state: ProductionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load_state(&self) -> RepositoryResult<ProductionState> {
        let guard = self
            .state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save_state(&self, state: &ProductionState) -> RepositoryResult<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = state.clone();
        Ok(())
    }
}

// ==========================================
// StateRepository - 带锁的读-改-写
// ==========================================
pub struct StateRepository {
    store: Arc<dyn StateStore>,
    lock: Mutex<()>,
}

impl StateRepository {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// 获取数据文件锁
    ///
    /// 锁只保护 `()`，数据在存储里；持锁线程 panic 后照常取回锁
    fn get_lock(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        Ok(self.lock.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("数据文件锁曾被 panic 线程持有，已恢复");
            PoisonError::into_inner(poisoned)
        }))
    }

    /// 读取当前状态快照
    pub fn snapshot(&self) -> RepositoryResult<ProductionState> {
        let _guard = self.get_lock()?;
        self.store.load_state()
    }

    /// 在数据文件锁内执行一次读-改-写
    ///
    /// # 规则
    /// - 闭包返回 Err: 不写回，状态保持不变
    /// - 闭包返回 Ok 且状态有变化: 整份写回
    /// - 闭包返回 Ok 且状态无变化: 不写回
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ProductionState) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let _guard = self.get_lock()?;
        let original = self.store.load_state()?;
        let mut state = original.clone();

        let out = f(&mut state)?;

        if state != original {
            self.store.save_state(&state)?;
            tracing::debug!(models = state.model_count(), "生产数据已写回");
        }
        Ok(out)
    }
}
