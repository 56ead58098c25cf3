//! 时间工具函数
//!
//! 日期和时刻解析统一放在这里，repository 层只接收解析好的值。

use chrono::{NaiveDate, NaiveTime, Timelike, Utc};

/// 当前 Unix 时间戳 (毫秒)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// 解析时刻字符串 (HH:MM) → 当天零点起的分钟数
pub fn parse_hhmm(time: &str) -> Option<i64> {
    let t = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some(t.hour() as i64 * 60 + t.minute() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("14:00"), Some(840));
        assert_eq!(parse_hhmm("19:30"), Some(1170));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("siete"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-01"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_date("01/06/2024"), None);
    }
}
