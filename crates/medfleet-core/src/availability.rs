//! Weekly availability matching for dispatch batches.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::models::{Dispatch, Drone, WeeklyWindow};

/// Ids of drones able to carry every dispatch in the batch, by capacity,
/// temperature envelope, and weekly availability window.
pub fn find_available_drones(dispatches: &[Dispatch], drones: &[Drone]) -> Vec<String> {
    drones
        .iter()
        .filter(|drone| dispatches.iter().all(|rec| can_handle(rec, drone)))
        .map(|drone| drone.id.clone())
        .collect()
}

fn can_handle(dispatch: &Dispatch, drone: &Drone) -> bool {
    let Some(cap) = drone.capability.as_ref() else {
        return false;
    };
    if !cap.supports_capacity(dispatch.required_capacity()) {
        return false;
    }
    if !cap.supports_temperature(dispatch.need_cooling(), dispatch.need_heating()) {
        return false;
    }

    let Some(date) = dispatch.date.as_deref().and_then(parse_date) else {
        return false;
    };
    let Some(time) = dispatch.time.as_deref().and_then(parse_time) else {
        return false;
    };
    matches_weekly(&drone.weekly_availabilities, date.weekday(), time)
}

/// Drones with no declared windows are always available.
fn matches_weekly(windows: &[WeeklyWindow], day: Weekday, time: NaiveTime) -> bool {
    if windows.is_empty() {
        return true;
    }
    windows.iter().any(|window| {
        parse_weekday(&window.day) == Some(day)
            && matches!(
                (parse_time(&window.from), parse_time(&window.to)),
                (Some(from), Some(to)) if time >= from && time < to
            )
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.trim().to_ascii_uppercase().as_str() {
        "MONDAY" => Some(Weekday::Mon),
        "TUESDAY" => Some(Weekday::Tue),
        "WEDNESDAY" => Some(Weekday::Wed),
        "THURSDAY" => Some(Weekday::Thu),
        "FRIDAY" => Some(Weekday::Fri),
        "SATURDAY" => Some(Weekday::Sat),
        "SUNDAY" => Some(Weekday::Sun),
        _ => None,
    }
}
