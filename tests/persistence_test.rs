// ==========================================
// 数据文件/配置/备份 集成测试
// ==========================================
// 测试范围:
// 1. 数据跨实例保留，写入不残留临时文件
// 2. config.json 自定义时段表与时间编码
// 3. 定时维护（日切 + 备份）与备份保留份数
// 4. 并发录入不丢失更新
// 5. 数据文件含负数计数时拒绝载入
// ==========================================


use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use production_tracker::api::{ApiError, HourlyUpdate};
use production_tracker::app::{AppState, MaintenanceScheduler};
use production_tracker::domain::TimeEncoding;
use test_helpers::{test_date, TestEnv, LINE, MODEL};

fn write_config(dir: &std::path::Path, json: &str) {
    std::fs::write(dir.join("config.json"), json).unwrap();
}

#[test]
fn test_state_survives_restart() {
    let env = TestEnv::new().with_default_model();
    env.app
        .production_api
        .apply_hourly_update(
            LINE,
            MODEL,
            0,
            HourlyUpdate {
                output: 18,
                defect: 0,
                qc_checked: 18,
                manual_target: None,
            },
        )
        .unwrap();
    assert!(!env.temp_dir.path().join("production_data.json.tmp").exists());

    let reopened = AppState::with_clock(env.temp_dir.path(), env.clock.clone()).unwrap();
    let model = reopened.production_api.get_model(LINE, MODEL).unwrap();
    assert_eq!(model.output_day, 18);
    assert_eq!(model.hourly[0].output, 18);

    let raw = std::fs::read_to_string(env.data_file()).unwrap();
    assert!(raw.contains("\"dailyTarget\""));
    assert!(raw.contains("\"qcChecked\""));
}

#[test]
fn test_negative_counter_in_data_file_rejected() {
    let env = TestEnv::new().with_default_model();
    let raw = std::fs::read_to_string(env.data_file()).unwrap();
    let mut doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    doc["lines"][LINE]["models"][0]["hourly"][0]["qcChecked"] = serde_json::json!(-4);
    std::fs::write(env.data_file(), serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let api = &env.app.production_api;
    assert!(matches!(
        api.get_model(LINE, MODEL),
        Err(ApiError::PersistenceError(_))
    ));
    assert!(matches!(
        api.apply_hourly_update(
            LINE,
            MODEL,
            0,
            HourlyUpdate {
                output: 1,
                defect: 0,
                qc_checked: 1,
                manual_target: None,
            },
        ),
        Err(ApiError::PersistenceError(_))
    ));

    // 文件原样保留，等待人工修复
    let after: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(env.data_file()).unwrap()).unwrap();
    assert_eq!(after, doc);
}

#[test]
fn test_custom_schedule_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"{
            "hour_slot_labels": ["08:00 - 09:00", "09:00 - 10:00", "10:00 - 11:00", "11:00 - 12:00"],
            "lunch_slot_label": "10:00 - 11:00",
            "allocatable_hours": 3,
            "time_encoding": "MINUTES"
        }"#,
    );
    let env = TestEnv::in_dir(dir, test_date(), 9, 30);
    assert_eq!(env.app.production_api.time_encoding(), TimeEncoding::Minutes);

    env.create_model(LINE, MODEL, 90);
    let model = env.app.production_api.get_model(LINE, MODEL).unwrap();
    let targets: Vec<i64> = model.hourly.iter().map(|s| s.manual_target).collect();
    assert_eq!(targets, vec![30, 30, 0, 30]);
    assert_eq!(model.daily_target, 90);

    let current = env.app.production_api.query_current_target(LINE, MODEL).unwrap();
    assert_eq!(current.slot_index, Some(1));
    assert_eq!(current.cumulative_target, 60);
}

#[test]
fn test_invalid_schedule_config_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"{"hour_slot_labels": ["7-8", "8-9"], "lunch_slot_label": "8-9", "allocatable_hours": 1}"#,
    );
    assert!(AppState::new(dir.path()).is_err());
}

#[test]
fn test_maintenance_backups_and_retention() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), r#"{"backup_retention": 2}"#);
    let env = TestEnv::in_dir(dir, test_date(), 9, 0).with_default_model();
    let scheduler = MaintenanceScheduler::from_state(&env.app);

    for _ in 0..3 {
        scheduler.run_once().unwrap();
        env.clock.advance(Duration::days(1));
    }

    let dates = env.app.backup_manager.list_backups().unwrap();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        ]
    );

    let restored = env.app.backup_manager.load_backup(dates[1]).unwrap();
    let model = restored.line(LINE).unwrap().model(MODEL).unwrap();
    assert_eq!(model.date, "2026-10-18");
}

#[test]
fn test_concurrent_hourly_updates_are_serialized() {
    let env = TestEnv::new().with_default_model();
    let api = Arc::clone(&env.app.production_api);

    std::thread::scope(|scope| {
        for index in [0usize, 1, 2, 3, 4, 6, 7, 8] {
            let api = Arc::clone(&api);
            scope.spawn(move || {
                api.apply_hourly_update(
                    LINE,
                    MODEL,
                    index,
                    HourlyUpdate {
                        output: 10,
                        defect: 1,
                        qc_checked: 10,
                        manual_target: None,
                    },
                )
                .unwrap();
            });
        }
    });

    let model = api.get_model(LINE, MODEL).unwrap();
    assert_eq!(model.output_day, 80);
    assert_eq!(model.actual_defect, 8);
    assert_eq!(model.defect_rate_percentage, 10.00);
    assert_eq!(model.achievement_percentage, 50.00);
}
