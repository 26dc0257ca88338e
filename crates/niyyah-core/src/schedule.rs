use crate::time::{TimeOfDay, MINUTES_PER_DAY};
use crate::types::DayType;
use serde::{Deserialize, Serialize};

/// A recurring daily activity assigned to a persona.
///
/// `end_time <= start_time` is a valid block that runs past midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: i64,
    pub persona_id: i64,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub activity: String,
    #[serde(default)]
    pub day_type: DayType,
    #[serde(default)]
    pub is_prayer_block: bool,
    #[serde(default)]
    pub order: i32,
}

impl ScheduleBlock {
    pub fn wraps_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Length in minutes, always in `1..=1440`. `start == end` is a full day.
    pub fn duration(&self) -> u16 {
        let start = self.start_time.minutes();
        let end = self.end_time.minutes();
        let d = if end > start {
            end - start
        } else {
            MINUTES_PER_DAY - start + end
        };
        if d == 0 {
            MINUTES_PER_DAY
        } else {
            d
        }
    }

    /// Strict containment on a circular clock: `now` lies in `[start, end)`.
    ///
    /// Unlike [`resolve_active_block`], a wrapping block stops containing
    /// `now` once the next day's `end` has passed.
    pub fn contains(&self, now: TimeOfDay) -> bool {
        self.start_time.minutes_until(now) < self.duration()
    }
}

// ---------------------------------------------------------------------------
// Time-block resolver
// ---------------------------------------------------------------------------

/// Pick the block that is "current" at `now`.
///
/// Blocks are stable-sorted by start time and scanned from the latest start
/// at or before `now` backwards:
///
/// - a non-wrapping block matches only while `now < end`;
/// - a wrapping block matches as soon as its start has been reached, for the
///   rest of the day (its next-day end is not checked);
/// - when nothing matches, the earliest-starting block is returned.
///
/// Among blocks sharing a start time the one given last wins. Returns `None`
/// only for an empty slice. The input is never reordered.
pub fn resolve_active_block(blocks: &[ScheduleBlock], now: TimeOfDay) -> Option<&ScheduleBlock> {
    debug_assert!(now.minutes() < MINUTES_PER_DAY);

    let mut sorted: Vec<&ScheduleBlock> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.start_time);

    for block in sorted.iter().rev() {
        if now < block.start_time {
            continue;
        }
        if block.wraps_midnight() || now < block.end_time {
            return Some(block);
        }
    }
    sorted.first().copied()
}

// ---------------------------------------------------------------------------
// Day-progress projector
// ---------------------------------------------------------------------------

/// Share of the day elapsed at `now`, as a percentage in `[0, 100)`.
pub fn day_progress(now: TimeOfDay) -> f64 {
    debug_assert!(now.minutes() < MINUTES_PER_DAY);
    f64::from(now.minutes()) / f64::from(MINUTES_PER_DAY) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockProgress {
    /// Minutes since the block started, wrapping past midnight.
    pub elapsed: u16,
    pub duration: u16,
    /// `elapsed / duration`, clamped to `[0, 1]`.
    pub fraction: f64,
    /// Whole minutes left, never negative.
    pub remaining: u16,
}

pub fn block_progress(block: &ScheduleBlock, now: TimeOfDay) -> BlockProgress {
    debug_assert!(now.minutes() < MINUTES_PER_DAY);

    let elapsed = block.start_time.minutes_until(now);
    let duration = block.duration();
    let fraction = (f64::from(elapsed) / f64::from(duration)).clamp(0.0, 1.0);
    let remaining = duration.saturating_sub(elapsed);
    BlockProgress {
        elapsed,
        duration,
        fraction,
        remaining,
    }
}

/// Position of a block on a 24-hour bar, in day percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSegment {
    pub left: f64,
    pub width: f64,
}

pub fn timeline_segment(block: &ScheduleBlock) -> TimelineSegment {
    let day = f64::from(MINUTES_PER_DAY);
    TimelineSegment {
        left: f64::from(block.start_time.minutes()) / day * 100.0,
        width: f64::from(block.duration()) / day * 100.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
