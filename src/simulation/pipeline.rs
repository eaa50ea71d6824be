//! Shift, aggregation and normalization over minute-resolution buffers.

use crate::domain::{SimYear, MINUTES_PER_DAY};

/// Rotate a whole year buffer by a signed number of minutes. Positive moves
/// samples later in the day (a lag), negative earlier (a lead). Used for the
/// bounded per-end-use desynchronization offset.
pub fn apply_offset(buffer: &mut [f64], offset_minutes: i64) {
    if buffer.is_empty() || offset_minutes == 0 {
        return;
    }
    let len = buffer.len() as i64;
    let shift = offset_minutes.rem_euclid(len) as usize;
    buffer.rotate_right(shift);
}

/// Rotate each day's 1440-minute slice independently by that day's lead
/// minutes (positive = activity moves earlier).
pub fn shift_days(buffer: &mut [f64], year: &SimYear, lead_minutes: impl Fn(usize) -> i32) {
    for day in 0..year.days {
        let slice = &mut buffer[day * MINUTES_PER_DAY..(day + 1) * MINUTES_PER_DAY];
        let lead = lead_minutes(day);
        if lead == 0 {
            continue;
        }
        let shift = (lead as i64).rem_euclid(MINUTES_PER_DAY as i64) as usize;
        slice.rotate_left(shift);
    }
}

/// Sum each group of `timestep_minutes` consecutive minutes.
pub fn aggregate(minutes: &[f64], timestep_minutes: usize) -> Vec<f64> {
    minutes
        .chunks(timestep_minutes)
        .map(|chunk| chunk.iter().sum())
        .collect()
}

/// Divide by the series' own maximum; an all-zero series stays all-zero.
pub fn normalize_to_peak(values: &mut [f64]) {
    let peak = values.iter().cloned().fold(0.0, f64::max);
    if peak <= 0.0 {
        return;
    }
    for value in values.iter_mut() {
        *value /= peak;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn aggregate_hourly() {
        assert_eq!(aggregate(&[1.0; 120], 60), vec![60.0, 60.0]);
    }

    #[test]
    fn aggregate_five_minute_groups() {
        assert_eq!(aggregate(&[3.0; 10], 5), vec![15.0, 15.0]);
    }

    #[test]
    fn normalization_guards_all_zero() {
        let mut values = vec![0.0; 8];
        normalize_to_peak(&mut values);
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn offset_rotates_forward_and_back() {
        let mut buffer = vec![0.0; 10];
        buffer[0] = 1.0;
        apply_offset(&mut buffer, 3);
        assert_eq!(buffer[3], 1.0);
        apply_offset(&mut buffer, -3);
        assert_eq!(buffer[0], 1.0);
    }

    #[test]
    fn day_shift_moves_activity_earlier() {
        let year = SimYear::new(2019);
        let mut buffer = vec![0.0; year.total_minutes()];
        // A pulse at 08:00 on day 0 and day 1.
        buffer[480] = 1.0;
        buffer[1440 + 480] = 1.0;
        shift_days(&mut buffer, &year, |day| if day == 0 { 60 } else { 0 });
        assert_eq!(buffer[420], 1.0); // day 0 led by an hour
        assert_eq!(buffer[1440 + 480], 1.0); // day 1 untouched
    }

    proptest! {
        #[test]
        fn aggregation_preserves_totals(values in proptest::collection::vec(0.0f64..10.0, 1440)) {
            let aggregated = aggregate(&values, 15);
            let before: f64 = values.iter().sum();
            let after: f64 = aggregated.iter().sum();
            prop_assert!((before - after).abs() < 1e-6);
        }

        #[test]
        fn normalized_values_stay_in_unit_range(mut values in proptest::collection::vec(0.0f64..100.0, 1..200)) {
            normalize_to_peak(&mut values);
            prop_assert!(values.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }
}
