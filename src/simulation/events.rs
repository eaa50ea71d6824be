//! Shared machinery for the event/cluster synthesizers: availability-mask
//! bookkeeping, onset-weighted cluster placement, and pulse stamping.

use tracing::debug;

use crate::domain::{MINUTES_PER_SLOT, SLOTS_PER_DAY};
use crate::rng::BuildingRng;

/// Contiguous runs of `true` in a slot mask, as (start, length) pairs.
pub fn blocks(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &active) in mask.iter().enumerate() {
        match (active, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, mask.len() - s));
    }
    runs
}

/// Sample a cluster start slot within one day.
///
/// Eligible slots are weighted by the hourly onset curve, renormalized, and
/// drawn; the chosen slot is consumed so the next cluster of the day cannot
/// reuse it. Returns `None` when nothing is eligible (nobody in the relevant
/// state all day, or every slot already consumed).
pub fn place_cluster(
    rng: &mut BuildingRng,
    day_mask: &mut [bool],
    hourly_onset: &[f64],
) -> Option<usize> {
    debug_assert_eq!(day_mask.len(), SLOTS_PER_DAY);

    let mut eligible = Vec::new();
    let mut weights = Vec::new();
    let mut total = 0.0;
    for (slot, &available) in day_mask.iter().enumerate() {
        if !available {
            continue;
        }
        let hour = slot * MINUTES_PER_SLOT / 60;
        let weight = hourly_onset[hour];
        if weight > 0.0 {
            eligible.push(slot);
            weights.push(weight);
            total += weight;
        }
    }
    if eligible.is_empty() || total <= 0.0 {
        debug!("no eligible onset slot for cluster, skipping");
        return None;
    }
    for weight in weights.iter_mut() {
        *weight /= total;
    }

    let slot = eligible[rng.weighted(&weights)];
    day_mask[slot] = false;
    Some(slot)
}

/// Stamp `value` over `duration` consecutive minutes, clamped at the year
/// boundary. Returns the first minute past the stamped pulse.
pub fn stamp(buffer: &mut [f64], start_minute: usize, duration: usize, value: f64) -> usize {
    let len = buffer.len();
    let end = (start_minute + duration).min(len);
    for sample in &mut buffer[start_minute.min(len)..end] {
        *sample = value;
    }
    end
}

/// A pulse may be placed only if the buffer is silent from `gap` minutes
/// before its start to `gap` minutes past its end. With `gap == 1` the
/// leading edge is the plain refractory condition (previous minute inactive);
/// checking both sides keeps the gap honest even though clusters within a day
/// are placed in random slot order.
pub fn can_place(buffer: &[f64], minute: usize, duration: usize, gap: usize) -> bool {
    if minute >= buffer.len() {
        return false;
    }
    let gap = gap.max(1);
    let from = minute.saturating_sub(gap);
    let to = (minute + duration + gap).min(buffer.len());
    buffer[from..to].iter().all(|&v| v == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_find_runs() {
        let mask = [false, true, true, false, true, false];
        assert_eq!(blocks(&mask), vec![(1, 2), (4, 1)]);
    }

    #[test]
    fn blocks_handle_trailing_run() {
        let mask = [true, false, true, true];
        assert_eq!(blocks(&mask), vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn placement_consumes_the_chosen_slot() {
        let mut rng = BuildingRng::new(1);
        let mut mask = vec![false; SLOTS_PER_DAY];
        mask[40] = true;
        let onset = vec![1.0; 24];
        assert_eq!(place_cluster(&mut rng, &mut mask, &onset), Some(40));
        assert_eq!(place_cluster(&mut rng, &mut mask, &onset), None);
    }

    #[test]
    fn placement_ignores_zero_weight_hours(){
        let mut rng = BuildingRng::new(2);
        let mut mask = vec![true; SLOTS_PER_DAY];
        let mut onset = vec![0.0; 24];
        onset[18] = 1.0; // only 18:00-19:00 eligible
        for _ in 0..20 {
            if let Some(slot) = place_cluster(&mut rng, &mut mask, &onset) {
                assert_eq!(slot * MINUTES_PER_SLOT / 60, 18);
            }
        }
    }

    #[test]
    fn stamp_clamps_at_year_boundary() {
        let mut buffer = vec![0.0; 10];
        let end = stamp(&mut buffer, 8, 5, 2.0);
        assert_eq!(end, 10);
        assert_eq!(buffer[8..], [2.0, 2.0]);
        // A start past the end stamps nothing.
        assert_eq!(stamp(&mut buffer, 12, 5, 2.0), 10);
        assert_eq!(buffer[..8], [0.0; 8]);
    }

    #[test]
    fn gap_blocks_close_placements_on_both_sides() {
        let mut buffer = vec![0.0; 100];
        stamp(&mut buffer, 20, 5, 1.0);
        // Too close after the existing pulse.
        assert!(!can_place(&buffer, 27, 5, 10));
        // Far enough after it.
        assert!(can_place(&buffer, 35, 5, 10));
        // Would end too close before the existing pulse.
        assert!(!can_place(&buffer, 5, 10, 10));
        assert!(can_place(&buffer, 2, 5, 10));
    }
}
