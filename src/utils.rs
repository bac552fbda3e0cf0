use chrono::DateTime;

/// 将毫秒时间戳格式化为 UTC 时间 HH:MM:SS.mmm
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(time) => time.format("%H:%M:%S%.3f").to_string(),
        None => format!("Invalid timestamp: {}", timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_time_of_day() {
        assert_eq!(format_timestamp(1_700_000_000_123), "22:13:20.123");
        assert_eq!(format_timestamp(0), "00:00:00.000");
    }

    #[test]
    fn out_of_range_is_reported() {
        assert_eq!(format_timestamp(i64::MAX), format!("Invalid timestamp: {}", i64::MAX));
    }
}
