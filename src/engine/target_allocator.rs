// ==========================================
// 产线生产看板 - 目标分配引擎
// ==========================================
// 职责: 日目标 → 每小时目标；每小时目标 → 日目标
// 规则: per_hour = round(daily_target / 可分配工时)，四舍五入（0.5 远离零）
// 说明: 分配后日目标按小时目标重新求和，可能与输入不同（180 → 23×8 = 184）
// ==========================================

use crate::domain::hour_slot::HourSlot;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::hour_schedule::HourSchedule;

// ==========================================
// TargetAllocator - 目标分配引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TargetAllocator {
    schedule: HourSchedule,
}

impl TargetAllocator {
    pub fn new(schedule: HourSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &HourSchedule {
        &self.schedule
    }

    /// 计算每小时目标
    ///
    /// # 规则
    /// - 负数目标 → NegativeValue（不做截断）
    /// - 0.5 进位（整数运算，避免浮点误差）
    /// - 商 + 余数比较，任意非负 i64 不溢出
    pub fn per_hour(&self, daily_target: i64) -> EngineResult<i64> {
        if daily_target < 0 {
            return Err(EngineError::NegativeValue {
                field: "daily_target".to_string(),
                value: daily_target,
            });
        }
        let hours = self.schedule.allocatable_hours();
        let quotient = daily_target / hours;
        let remainder = daily_target % hours;
        // remainder >= hours / 2（0.5 进位）
        let round_up = remainder >= hours - remainder;
        Ok(quotient + i64::from(round_up))
    }

    /// 将日目标分配到各小时段
    ///
    /// 可分配时段写入 per_hour，午休时段写 0，其他字段不变
    ///
    /// # 返回
    /// 每小时目标
    pub fn allocate(&self, daily_target: i64, slots: &mut [HourSlot]) -> EngineResult<i64> {
        let per_hour = self.per_hour(daily_target)?;

        for slot in slots.iter_mut() {
            slot.manual_target = if self.schedule.is_allocatable(slot) {
                per_hour
            } else {
                0
            };
        }

        Ok(per_hour)
    }

    /// 按小时目标重新计算日目标
    ///
    /// 之和超出 i64 → Overflow
    pub fn recompute_daily_target(slots: &[HourSlot]) -> EngineResult<i64> {
        slots.iter().try_fold(0i64, |acc, s| {
            acc.checked_add(s.manual_target)
                .ok_or_else(|| EngineError::Overflow("daily_target".to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<HourSlot> {
        HourSchedule::default().new_slots()
    }

    #[test]
    fn test_allocate_180_drifts_to_184() {
        let allocator = TargetAllocator::default();
        let mut slots = slots();

        let per_hour = allocator.allocate(180, &mut slots).unwrap();

        assert_eq!(per_hour, 23);
        assert_eq!(slots[5].manual_target, 0); // 午休
        assert_eq!(
            slots.iter().filter(|s| s.manual_target == 23).count(),
            8
        );
        assert_eq!(TargetAllocator::recompute_daily_target(&slots).unwrap(), 184);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let allocator = TargetAllocator::default();
        assert_eq!(allocator.per_hour(0).unwrap(), 0);
        assert_eq!(allocator.per_hour(3).unwrap(), 0); // 0.375
        assert_eq!(allocator.per_hour(4).unwrap(), 1); // 0.5
        assert_eq!(allocator.per_hour(12).unwrap(), 2); // 1.5
        assert_eq!(allocator.per_hour(20).unwrap(), 3); // 2.5
        assert_eq!(allocator.per_hour(179).unwrap(), 22); // 22.375
        assert_eq!(allocator.per_hour(160).unwrap(), 20);
    }

    #[test]
    fn test_allocate_leaves_counters_untouched() {
        let allocator = TargetAllocator::default();
        let mut slots = slots();
        slots[0].output = 17;
        slots[0].defect = 1;
        slots[5].manual_target = 9;

        allocator.allocate(80, &mut slots).unwrap();

        assert_eq!(slots[0].manual_target, 10);
        assert_eq!(slots[0].output, 17);
        assert_eq!(slots[0].defect, 1);
        assert_eq!(slots[5].manual_target, 0);
    }

    #[test]
    fn test_negative_target_rejected_without_mutation() {
        let allocator = TargetAllocator::default();
        let mut slots = slots();
        allocator.allocate(80, &mut slots).unwrap();

        let err = allocator.allocate(-5, &mut slots).unwrap_err();

        assert_eq!(
            err,
            EngineError::NegativeValue {
                field: "daily_target".to_string(),
                value: -5
            }
        );
        assert_eq!(TargetAllocator::recompute_daily_target(&slots).unwrap(), 80);
    }

    #[test]
    fn test_allocation_sum_matches_recompute_for_many_targets() {
        let allocator = TargetAllocator::default();
        for target in (0..=400).step_by(7) {
            let mut slots = slots();
            let per_hour = allocator.allocate(target, &mut slots).unwrap();
            let expected = (target as f64 / 8.0).round() as i64;
            assert_eq!(per_hour, expected, "target={}", target);
            assert_eq!(TargetAllocator::recompute_daily_target(&slots).unwrap(), per_hour * 8);
        }
    }

    #[test]
    fn test_per_hour_at_i64_limits() {
        let allocator = TargetAllocator::default();
        assert_eq!(allocator.per_hour(i64::MAX / 2 + 1).unwrap(), 576460752303423488);
        assert_eq!(allocator.per_hour(i64::MAX).unwrap(), 1152921504606846976);

        let single = TargetAllocator::new(
            HourSchedule::new(vec!["07:00 - 08:00".to_string()], "", 1).unwrap(),
        );
        assert_eq!(single.per_hour(i64::MAX).unwrap(), i64::MAX);
    }

    #[test]
    fn test_recompute_daily_target_overflow() {
        let allocator = TargetAllocator::default();
        let mut slots = slots();
        allocator.allocate(i64::MAX, &mut slots).unwrap();

        assert_eq!(
            TargetAllocator::recompute_daily_target(&slots),
            Err(EngineError::Overflow("daily_target".to_string()))
        );
    }
}
