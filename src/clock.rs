// ==========================================
// 产线生产看板 - 时钟
// ==========================================
// 职责: 提供当前时刻与当前日期（可注入，便于测试）
// ==========================================

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

// ==========================================
// Trait: Clock
// ==========================================
pub trait Clock: Send + Sync {
    /// 当前本地时刻
    fn now(&self) -> NaiveDateTime;

    /// 当前日期
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// 当前时刻（时:分:秒）
    fn time(&self) -> NaiveTime {
        self.now().time()
    }
}

/// 系统本地时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定时钟（可手动推进）
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 由日期与时分构造
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        Self::new(date.and_time(time))
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
