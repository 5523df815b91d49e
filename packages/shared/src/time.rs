//! Local-time helpers used for banners and log context.

use chrono::{DateTime, Local, TimeZone};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time formatted as `YYYY-MM-DD HH:MM:SS`.
pub fn local_timestamp() -> String {
    format_local(&Local::now())
}

/// Format any zoned time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_local<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_local_uses_display_format() {
        // テスト項目: 日時が `YYYY-MM-DD HH:MM:SS` 形式で整形される
        // given (前提条件):
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let time = offset.with_ymd_and_hms(2023, 1, 1, 7, 5, 9).unwrap();

        // when (操作):
        let result = format_local(&time);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01 07:05:09");
    }

    #[test]
    fn test_local_timestamp_has_fixed_width() {
        // テスト項目: 現在時刻の文字列が固定長 (19 文字) である
        // given (前提条件):

        // when (操作):
        let result = local_timestamp();

        // then (期待する結果):
        assert_eq!(result.len(), 19);
        assert_eq!(&result[4..5], "-");
        assert_eq!(&result[10..11], " ");
    }
}
