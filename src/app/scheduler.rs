// ==========================================
// 产线生产看板 - 定时任务
// ==========================================
// 职责: 按固定间隔执行 日切扫描 → 数据备份
// 规则: 每一步各自是一次加锁的完整读写；单步失败只记日志，不中断定时器
// 停止: watch 通道收到 true 或发送端关闭
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::instrument;

use crate::api::{ApiResult, ProductionApi};
use crate::app::state::AppState;
use crate::clock::Clock;
use crate::engine::RolloverReport;
use crate::repository::{BackupManager, StateRepository};

/// 单次维护结果
#[derive(Debug, Clone)]
pub struct MaintenanceOutcome {
    pub rollover: RolloverReport,
    pub backup_path: std::path::PathBuf,
}

// ==========================================
// MaintenanceScheduler
// ==========================================
pub struct MaintenanceScheduler {
    production_api: Arc<ProductionApi>,
    repo: Arc<StateRepository>,
    backup_manager: Arc<BackupManager>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl MaintenanceScheduler {
    pub fn new(
        production_api: Arc<ProductionApi>,
        repo: Arc<StateRepository>,
        backup_manager: Arc<BackupManager>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            production_api,
            repo,
            backup_manager,
            clock,
            interval,
        }
    }

    /// 由应用状态构建（间隔取配置 backup_interval_secs）
    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.production_api.clone(),
            state.repo.clone(),
            state.backup_manager.clone(),
            state.clock.clone(),
            Duration::from_secs(state.config.backup_interval_secs()),
        )
    }

    /// 执行一次维护：日切扫描后备份
    #[instrument(skip(self))]
    pub fn run_once(&self) -> ApiResult<MaintenanceOutcome> {
        let rollover = self.production_api.run_rollover_scan()?;
        if rollover.has_changes() {
            tracing::info!(
                models_reset = rollover.models_reset,
                failures = rollover.failures.len(),
                "定时日切完成"
            );
        }

        let snapshot = self.repo.snapshot()?;
        let backup_path = self.backup_manager.backup(&snapshot, self.clock.today())?;

        Ok(MaintenanceOutcome {
            rollover,
            backup_path,
        })
    }

    /// 运行定时循环，直到收到停止信号
    ///
    /// 首次 tick 立即触发；文件读写在阻塞线程池执行，不占用异步工作线程
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.interval;
        let this = Arc::new(self);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = interval.as_secs(), "定时任务已启动");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let worker = Arc::clone(&this);
                    match tokio::task::spawn_blocking(move || worker.run_once()).await {
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => {
                            tracing::warn!(error = %e, "定时维护失败，等待下次执行");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "定时维护任务异常退出，等待下次执行");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("定时任务已停止");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HourlyUpdate, NewModelRequest};
    use crate::clock::FixedClock;
    use chrono::{Duration as ChronoDuration, NaiveDate};

    fn setup(dir: &std::path::Path) -> (AppState, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at(
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            9,
            30,
        ));
        let state = AppState::with_clock(dir, clock.clone()).unwrap();
        state.production_api.create_line("LINE-1").unwrap();
        state
            .production_api
            .create_model(
                "LINE-1",
                NewModelRequest {
                    model_name: "GX-200".to_string(),
                    label_week: "W42".to_string(),
                    daily_target: 160,
                },
            )
            .unwrap();
        state
            .production_api
            .apply_hourly_update(
                "LINE-1",
                "GX-200",
                0,
                HourlyUpdate {
                    output: 18,
                    defect: 1,
                    qc_checked: 10,
                    manual_target: None,
                },
            )
            .unwrap();
        (state, clock)
    }

    #[test]
    fn test_run_once_rolls_over_then_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let (state, clock) = setup(dir.path());
        clock.advance(ChronoDuration::days(1));

        let scheduler = MaintenanceScheduler::from_state(&state);
        let outcome = scheduler.run_once().unwrap();

        assert_eq!(outcome.rollover.models_reset, 1);
        assert!(outcome.backup_path.ends_with("production_data_2026-10-17.json"));

        let backup = state
            .backup_manager
            .load_backup(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
            .unwrap();
        let model = backup.line("LINE-1").unwrap().model("GX-200").unwrap();
        assert_eq!(model.date, "2026-10-17");
        assert_eq!(model.output_day, 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_run_keeps_runtime_responsive_on_single_thread() {
        let dir = tempfile::tempdir().unwrap();
        let (state, clock) = setup(dir.path());
        clock.advance(ChronoDuration::days(1));
        let scheduler = MaintenanceScheduler::from_state(&state);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(rx));

        // 单线程运行时上其他任务仍能推进
        let heartbeat = tokio::spawn(async { 7 });
        assert_eq!(heartbeat.await.unwrap(), 7);

        for _ in 0..200 {
            if !state.backup_manager.list_backups().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tx.send(true).unwrap();
        handle.await.unwrap();

        let model = state.production_api.get_model("LINE-1", "GX-200").unwrap();
        assert_eq!(model.date, "2026-10-17");
        assert_eq!(
            state.backup_manager.list_backups().unwrap(),
            vec![NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _clock) = setup(dir.path());
        let scheduler = MaintenanceScheduler::from_state(&state);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.run(rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let dates = state.backup_manager.list_backups().unwrap();
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()]);
    }
}
