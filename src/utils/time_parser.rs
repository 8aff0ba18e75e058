use chrono::{DateTime, Duration, Utc};

pub struct TimeParser;

impl TimeParser {
    /// 解析过期时间字符串，支持多种格式：
    /// - RFC3339 格式：2023-10-01T12:00:00Z
    /// - 相对时间：1d, 2w, 1M, 1y, 1h30m, 2d12h
    pub fn parse_expire_time(input: &str) -> Result<DateTime<Utc>, String> {
        let input = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        let duration = Self::parse_duration(input)?;
        Utc::now()
            .checked_add_signed(duration)
            .ok_or_else(|| "expiration time is out of range".to_string())
    }

    /// 解析相对时间，返回总时长
    pub fn parse_duration(input: &str) -> Result<Duration, String> {
        let mut total = Duration::zero();
        let mut remaining = input;

        while !remaining.is_empty() {
            let digits = remaining
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(remaining.len());
            if digits == 0 {
                return Err(format!("invalid time format: '{}'", input));
            }
            let num: i64 = remaining[..digits]
                .parse()
                .map_err(|_| format!("invalid number: '{}'", &remaining[..digits]))?;
            remaining = &remaining[digits..];

            let unit_len = remaining
                .find(|c: char| !c.is_alphabetic())
                .unwrap_or(remaining.len());
            if unit_len == 0 {
                return Err(format!("missing time unit after '{}'", num));
            }
            let unit = &remaining[..unit_len];
            remaining = &remaining[unit_len..];

            // "M" 表示月，必须在转小写之前判断
            let step = if unit == "M" {
                Duration::days(num * 30)
            } else {
                match unit.to_lowercase().as_str() {
                    "s" | "sec" | "second" | "seconds" => Duration::seconds(num),
                    "m" | "min" | "minute" | "minutes" => Duration::minutes(num),
                    "h" | "hour" | "hours" => Duration::hours(num),
                    "d" | "day" | "days" => Duration::days(num),
                    "w" | "week" | "weeks" => Duration::weeks(num),
                    "month" | "months" => Duration::days(num * 30),
                    "y" | "year" | "years" => Duration::days(num * 365),
                    _ => return Err(format!("unsupported time unit: '{}'", unit)),
                }
            };
            total += step;
        }

        if total == Duration::zero() {
            return Err("duration must not be zero".to_string());
        }

        Ok(total)
    }
}
