//! Interval arithmetic over half-open `[start, end)` times of day.

use crate::models::time_slot::{TimeSlot, add_minutes};

/// Sorts intervals and merges the ones that overlap.
///
/// Intervals that merely touch (`a.end == b.start`) stay separate so that a booking
/// can never straddle two distinct working windows.
pub fn merge_overlapping(mut intervals: Vec<TimeSlot>) -> Vec<TimeSlot> {
    intervals.retain(|i| i.start < i.end);
    intervals.sort();

    let mut merged: Vec<TimeSlot> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start < last.end => {
                if interval.end > last.end {
                    last.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Removes every occupied interval from the given windows.
pub fn subtract(windows: &[TimeSlot], occupied: &[TimeSlot]) -> Vec<TimeSlot> {
    let occupied = merge_overlapping(occupied.to_vec());
    let mut free = Vec::new();

    for window in windows {
        let mut cursor = window.start;
        for busy in &occupied {
            if busy.end <= cursor {
                continue;
            }
            if busy.start >= window.end {
                break;
            }
            if busy.start > cursor {
                free.push(TimeSlot::new(cursor, busy.start));
            }
            if busy.end > cursor {
                cursor = busy.end;
            }
            if cursor >= window.end {
                break;
            }
        }
        if cursor < window.end {
            free.push(TimeSlot::new(cursor, window.end));
        }
    }
    free
}

/// Steps through each free window from its start, emitting every slot of
/// `duration_minutes` that fits entirely inside the window.
pub fn slots_within(free: &[TimeSlot], duration_minutes: u32, step_minutes: u32) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if duration_minutes == 0 || step_minutes == 0 {
        return slots;
    }

    for window in free {
        let mut start = window.start;
        loop {
            let Some(end) = add_minutes(start, i64::from(duration_minutes)) else {
                break;
            };
            if end > window.end {
                break;
            }
            slots.push(TimeSlot::new(start, end));
            match add_minutes(start, i64::from(step_minutes)) {
                Some(next) => start = next,
                None => break,
            }
        }
    }
    slots
}
