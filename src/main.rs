// ==========================================
// 产线生产看板 - 主入口
// ==========================================
// 启动: 加载配置 → 启动日切扫描 → 定时任务（日切 + 备份）
// 停止: Ctrl-C
// ==========================================

use production_tracker::app::{get_default_data_dir, AppState, MaintenanceScheduler};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    production_tracker::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", production_tracker::APP_NAME);
    tracing::info!("系统版本: {}", production_tracker::VERSION);
    tracing::info!("==================================================");

    // 数据目录：命令行参数优先
    let data_dir = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(std::path::PathBuf::from)
        .unwrap_or_else(get_default_data_dir);
    tracing::info!("使用数据目录: {}", data_dir.display());

    let app_state = AppState::new(data_dir).map_err(anyhow::Error::msg)?;

    // 启动时先做一次日切，避免读取到前一天的计数
    match app_state.production_api.run_rollover_scan() {
        Ok(report) => tracing::info!(
            models_checked = report.models_checked,
            models_reset = report.models_reset,
            failures = report.failures.len(),
            "启动日切扫描完成"
        ),
        Err(e) => tracing::warn!(error = %e, "启动日切扫描失败"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = MaintenanceScheduler::from_state(&app_state);
    let handle = tokio::spawn(scheduler.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("收到停止信号，正在退出...");
    let _ = shutdown_tx.send(true);
    handle.await?;

    Ok(())
}
