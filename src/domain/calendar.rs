use chrono::{Datelike, NaiveDate};

use super::types::DayType;

/// Calendar facts for one simulated year, precomputed so the hot loops never
/// touch chrono.
#[derive(Debug, Clone)]
pub struct SimYear {
    pub year: i32,
    pub days: usize,
    day_types: Vec<DayType>,
    months: Vec<u32>,
}

impl SimYear {
    pub fn new(year: i32) -> Self {
        let leap = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
        let days = if leap { 366 } else { 365 };
        let mut day_types = Vec::with_capacity(days);
        let mut months = Vec::with_capacity(days);
        for ordinal in 1..=days as u32 {
            // Ordinals 1..=days are always valid for this year.
            let date = NaiveDate::from_yo_opt(year, ordinal)
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date"));
            day_types.push(DayType::from_weekday(date.weekday()));
            months.push(date.month());
        }
        Self {
            year,
            days,
            day_types,
            months,
        }
    }

    pub fn is_leap(&self) -> bool {
        self.days == 366
    }

    /// Day type of a zero-based day-of-year index.
    pub fn day_type(&self, day: usize) -> DayType {
        self.day_types[day]
    }

    /// Month (1..=12) of a zero-based day-of-year index.
    pub fn month(&self, day: usize) -> u32 {
        self.months[day]
    }

    pub fn total_minutes(&self) -> usize {
        self.days * super::types::MINUTES_PER_DAY
    }

    pub fn total_slots(&self) -> usize {
        self.days * super::types::SLOTS_PER_DAY
    }

    /// Zero-based day-of-year for a date, or `None` outside this year.
    pub fn day_of(&self, date: NaiveDate) -> Option<usize> {
        if date.year() != self.year {
            return None;
        }
        Some(date.ordinal0() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_has_366_days() {
        assert_eq!(SimYear::new(2020).days, 366);
        assert!(SimYear::new(2020).is_leap());
        assert_eq!(SimYear::new(2019).days, 365);
        assert!(!SimYear::new(2019).is_leap());
    }

    #[test]
    fn day_types_follow_the_calendar() {
        // 2019-01-01 was a Tuesday; the first weekend day is Jan 5.
        let year = SimYear::new(2019);
        assert_eq!(year.day_type(0), DayType::Weekday);
        assert_eq!(year.day_type(4), DayType::Weekend);
        assert_eq!(year.day_type(5), DayType::Weekend);
        assert_eq!(year.day_type(6), DayType::Weekday);
    }

    #[test]
    fn months_cover_the_year() {
        let year = SimYear::new(2019);
        assert_eq!(year.month(0), 1);
        assert_eq!(year.month(31), 2);
        assert_eq!(year.month(364), 12);
    }

    #[test]
    fn day_of_maps_dates() {
        let year = SimYear::new(2019);
        let date = NaiveDate::from_ymd_opt(2019, 2, 1).unwrap();
        assert_eq!(year.day_of(date), Some(31));
        let other = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(year.day_of(other), None);
    }
}
