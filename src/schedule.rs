use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::WEEKDAY_LABELS;

pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 18; // exclusive
pub const LUNCH_HOUR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct DayOption {
    pub date: NaiveDate,
    pub label: String,
    pub available: bool,
}

/// Sundays are closed and past dates cannot be booked. The comparison is
/// date-level only, so "today" stays bookable for the whole day.
pub fn is_date_available(date: NaiveDate, today: NaiveDate) -> bool {
    date.weekday() != Weekday::Sun && date >= today
}

/// The slot grid for one day: half-hour slots from opening to closing,
/// with the lunch hour blocked. The grid is a static template, it does not
/// reflect existing bookings.
pub fn generate_time_slots(date: NaiveDate) -> Vec<TimeSlot> {
    if date.weekday() == Weekday::Sun {
        return Vec::new();
    }
    let mut slots = Vec::with_capacity(((CLOSING_HOUR - OPENING_HOUR) * 2) as usize);
    for hour in OPENING_HOUR..CLOSING_HOUR {
        for minute in [0, 30] {
            slots.push(TimeSlot {
                time: format!("{hour:02}:{minute:02}"),
                available: hour != LUNCH_HOUR,
            });
        }
    }
    slots
}

/// Day picker strip starting at `today`.
pub fn upcoming_days(today: NaiveDate, count: usize) -> Vec<DayOption> {
    (0..count)
        .map(|offset| {
            let date = today + Duration::days(offset as i64);
            DayOption {
                date,
                label: day_label(date, today),
                available: is_date_available(date, today),
            }
        })
        .collect()
}

/// "Hoje", "Amanhã" or "Sex 21".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Hoje".to_string(),
        1 => "Amanhã".to_string(),
        _ => format!("{} {}", weekday_label(date), date.day()),
    }
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_monday() as usize]
}
