use crate::domain::model::ServiceDay;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};

pub fn service_day_for(weekday: Weekday) -> Option<ServiceDay> {
    match weekday {
        Weekday::Mon => Some(ServiceDay::Monday),
        Weekday::Tue => Some(ServiceDay::Tuesday),
        Weekday::Wed => Some(ServiceDay::Wednesday),
        Weekday::Thu => Some(ServiceDay::Thursday),
        Weekday::Fri => Some(ServiceDay::Friday),
        Weekday::Sat | Weekday::Sun => None,
    }
}

/// 依 depot 所在時區取得今天日期；未設定時區則使用本機時間
///
/// 固定偏移不會跟著日光節約時間調整。depot 有夏令時間時，換日前後一小時內
/// 可能算成前一天或後一天；這種情況請不要設定偏移，改用本機時區。
pub fn depot_today(utc_offset: Option<FixedOffset>) -> NaiveDate {
    match utc_offset {
        Some(offset) => date_at(Utc::now(), offset),
        None => chrono::Local::now().date_naive(),
    }
}

pub fn date_at(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
}

pub fn service_day_on(date: NaiveDate) -> Option<ServiceDay> {
    service_day_for(date.weekday())
}
