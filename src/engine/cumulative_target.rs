// ==========================================
// 产线生产看板 - 当前累计目标解析
// ==========================================
// 职责: 根据当前时刻匹配所在时段，返回该时段的累计目标
// 规则:
// - 查询时刻与标签起止按 TimeEncoding 编码后比较（默认 Base100: hour + minute/100）
// - 按顺序返回第一个 start <= t < end 的时段
// - 无匹配（早于首段或晚于末段）→ 末段累计目标；空序列 → 0
// 红线: 纯函数，每次查询重新计算，不缓存
// ==========================================

use chrono::{NaiveTime, Timelike};

use crate::domain::hour_slot::{ClockTime, HourSlot};
use crate::domain::types::TimeEncoding;

/// 查找当前时刻所在时段的下标
///
/// 标签无法解析的时段跳过
pub fn current_slot_index(
    slots: &[HourSlot],
    now: NaiveTime,
    encoding: TimeEncoding,
) -> Option<usize> {
    let t = ClockTime::new(now.hour(), now.minute()).encode(encoding);

    slots.iter().position(|slot| match slot.bounds() {
        Some((start, end)) => start.encode(encoding) <= t && t < end.encode(encoding),
        None => false,
    })
}

/// 当前累计目标
pub fn current_cumulative_target(
    slots: &[HourSlot],
    now: NaiveTime,
    encoding: TimeEncoding,
) -> i64 {
    match current_slot_index(slots, now, encoding) {
        Some(idx) => slots[idx].cumulative_target,
        None => slots.last().map(|s| s.cumulative_target).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(label: &str, cum: i64) -> HourSlot {
        let mut s = HourSlot::new(label);
        s.cumulative_target = cum;
        s
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_two_slot_example() {
        let slots = vec![slot("07:00 - 08:00", 20), slot("08:00 - 09:00", 40)];
        let enc = TimeEncoding::Base100;

        assert_eq!(current_cumulative_target(&slots, at(7, 30), enc), 20);
        assert_eq!(current_cumulative_target(&slots, at(8, 45), enc), 40);
        assert_eq!(current_cumulative_target(&slots, at(23, 0), enc), 40);
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let slots = vec![slot("07:00 - 08:00", 20), slot("08:00 - 09:00", 40)];
        let enc = TimeEncoding::Base100;

        assert_eq!(current_slot_index(&slots, at(7, 0), enc), Some(0));
        assert_eq!(current_slot_index(&slots, at(8, 0), enc), Some(1));
        assert_eq!(current_slot_index(&slots, at(9, 0), enc), None);
        // 早于首段 → 末段
        assert_eq!(current_cumulative_target(&slots, at(6, 59), enc), 40);
    }

    #[test]
    fn test_empty_slots_yield_zero() {
        assert_eq!(
            current_cumulative_target(&[], at(10, 0), TimeEncoding::Base100),
            0
        );
    }

    #[test]
    fn test_base100_orders_like_minutes_for_valid_labels() {
        // 分钟 < 60 时 Base100 与真实分钟比较结果一致
        let slots = vec![slot("07:30 - 08:10", 15), slot("08:10 - 09:00", 30)];
        for (h, m) in [(7, 29), (7, 30), (7, 45), (8, 5), (8, 10), (8, 59), (9, 0)] {
            assert_eq!(
                current_slot_index(&slots, at(h, m), TimeEncoding::Base100),
                current_slot_index(&slots, at(h, m), TimeEncoding::Minutes),
                "{:02}:{:02}",
                h,
                m
            );
        }
    }

    #[test]
    fn test_unparseable_labels_are_skipped() {
        let slots = vec![slot("07:00 - 07:60", 10), slot("08:00 - 09:00", 25)];
        assert_eq!(current_slot_index(&slots, at(7, 59), TimeEncoding::Base100), None);
        assert_eq!(current_cumulative_target(&slots, at(7, 59), TimeEncoding::Base100), 25);
        assert_eq!(current_slot_index(&slots, at(8, 30), TimeEncoding::Base100), Some(1));
    }

    #[test]
    fn test_minutes_encoding_matches_same_slots() {
        let slots = vec![slot("07:00 - 08:00", 20), slot("08:00 - 09:00", 40)];
        let enc = TimeEncoding::Minutes;
        assert_eq!(current_cumulative_target(&slots, at(7, 59), enc), 20);
        assert_eq!(current_cumulative_target(&slots, at(8, 0), enc), 40);
    }
}
