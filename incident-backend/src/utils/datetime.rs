// src/utils/datetime.rs

//! フォームから送られる日付・時刻文字列の解析

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// 時刻を解析する
///
/// `HH:MM`、`HH:MM:SS`、小数秒付き、またはタイムスタンプ全体（時刻部分のみ採用）を受け付ける。
pub fn parse_incident_time(raw: &str) -> Option<NaiveTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
    {
        return Some(time);
    }

    parse_timestamp(value).map(|dt| dt.time())
}

/// 日付を解析する（`YYYY-MM-DD` またはタイムスタンプ）
pub fn parse_incident_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|dt| dt.date()))
}

/// 目標日は `YYYY-MM-DD` のみ
pub fn parse_target_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
