use serde::Serialize;

use crate::domain::{Announcement, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub events: usize,
    pub urgent: usize,
    pub academic: usize,
}

impl Stats {
    fn tally<'a>(announcements: impl Iterator<Item = &'a Announcement>) -> Self {
        announcements.fold(Stats::default(), |mut stats, a| {
            stats.total += 1;
            match a.category {
                Category::Event => stats.events += 1,
                Category::Urgent => stats.urgent += 1,
                Category::Academic => stats.academic += 1,
                Category::General => {}
            }
            stats
        })
    }

    /// Counts over the whole collection.
    pub fn for_admin(announcements: &[Announcement]) -> Self {
        Self::tally(announcements.iter())
    }

    /// Counts over what students can see (faculty-only excluded).
    pub fn for_students(announcements: &[Announcement]) -> Self {
        Self::tally(announcements.iter().filter(|a| a.is_visible_to_students()))
    }
}

pub const FRAME_MS: u64 = 16;
pub const DEFAULT_DURATION_MS: u64 = 1000;

/// Frames of the linear count-up shown on stat cards.
///
/// Each frame adds `target / (duration / 16)` and shows the floor; the last
/// frame is always exactly `target`.
#[derive(Debug, Clone)]
pub struct CountUp {
    current: f64,
    increment: f64,
    target: u64,
    done: bool,
}

impl CountUp {
    pub fn new(target: u64, duration_ms: u64) -> Self {
        let steps = (duration_ms as f64 / FRAME_MS as f64).max(1.0);
        Self {
            current: 0.0,
            increment: target as f64 / steps,
            target,
            done: false,
        }
    }

    pub fn frames(target: u64) -> Vec<u64> {
        Self::new(target, DEFAULT_DURATION_MS).collect()
    }
}

impl Iterator for CountUp {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }
        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.done = true;
            return Some(self.target);
        }
        Some(self.current.floor() as u64)
    }
}
