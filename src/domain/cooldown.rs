//! Rename cooldown gate.
//!
//! A successful rename opens a window of fixed length starting at
//! `last_name_change_at`; no further rename is allowed until it closes.
//! Every evaluation takes a single `now` so the "allowed" flag and the
//! remaining hours shown next to it always agree.

use chrono::{DateTime, Duration, Utc};

use super::profile::Profile;

pub const DEFAULT_COOLDOWN_HOURS: i64 = 24;

const SECONDS_PER_HOUR: i64 = 3600;

/// Result of one cooldown evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    pub can_change_name: bool,
    pub remaining_hours: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameCooldown {
    duration: Duration,
}

impl Default for RenameCooldown {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_COOLDOWN_HOURS))
    }
}

impl RenameCooldown {
    /// Negative durations are treated as zero.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration: duration.max(Duration::zero()),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn status(&self, profile: &Profile, now: DateTime<Utc>) -> CooldownStatus {
        let remaining = self.remaining(profile, now);
        CooldownStatus {
            can_change_name: remaining <= Duration::zero(),
            remaining_hours: ceil_hours(remaining),
        }
    }

    pub fn can_change_name(&self, profile: &Profile, now: DateTime<Utc>) -> bool {
        self.status(profile, now).can_change_name
    }

    pub fn remaining_cooldown_hours(&self, profile: &Profile, now: DateTime<Utc>) -> u64 {
        self.status(profile, now).remaining_hours
    }

    fn remaining(&self, profile: &Profile, now: DateTime<Utc>) -> Duration {
        let Some(last) = profile.last_name_change_at() else {
            return Duration::zero();
        };
        // A timestamp ahead of `now` counts as a rename that just happened
        let elapsed = (now - last).max(Duration::zero());
        self.duration - elapsed
    }
}

fn ceil_hours(remaining: Duration) -> u64 {
    if remaining <= Duration::zero() {
        return 0;
    }
    let seconds = remaining.num_seconds();
    // Sub-second remainders still round up to the next hour
    let seconds = if remaining > Duration::seconds(seconds) {
        seconds + 1
    } else {
        seconds
    };
    ((seconds + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR) as u64
}
