use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// 解析到期日，只取日期部分
pub fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }

    None
}

/// 距到期的整天数，已过期记为 0；无法解析时返回 `None`
pub fn remaining_days(expiry_date: &str, today: NaiveDate) -> Option<i64> {
    let expiry = parse_expiry_date(expiry_date)?;
    Some((expiry - today).num_days().max(0))
}

/// 指定时区下的当前日期
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
