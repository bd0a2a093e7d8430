//! Countdown clock with one-second resolution.
//!
//! The countdown is a value owned by the in-progress session state. A tick
//! consumes it and either hands it back or reports expiry, so a countdown
//! can expire at most once and cannot tick after the session leaves
//! `InProgress`.

/// Remaining time for one session.
#[derive(Debug, PartialEq, Eq)]
pub struct Countdown {
    limit_secs: u64,
    remaining_secs: u64,
}

/// Result of advancing a countdown by one second.
#[derive(Debug, PartialEq, Eq)]
pub enum Tick {
    /// Time is left; the countdown continues.
    Running(Countdown),
    /// The countdown reached zero. Carries the seconds that elapsed.
    Expired { elapsed_secs: u64 },
}

impl Countdown {
    pub fn new(limit_secs: u64) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn limit_secs(&self) -> u64 {
        self.limit_secs
    }

    /// Seconds ticked so far.
    pub fn elapsed_secs(&self) -> u64 {
        self.limit_secs - self.remaining_secs
    }

    /// Returns `true` once no time is left. Only a zero limit produces an
    /// expired countdown that was never ticked.
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Advance by one second.
    pub fn tick(self) -> Tick {
        let remaining_secs = self.remaining_secs.saturating_sub(1);
        if remaining_secs == 0 {
            Tick::Expired {
                elapsed_secs: self.limit_secs,
            }
        } else {
            Tick::Running(Self {
                remaining_secs,
                ..self
            })
        }
    }
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render a limit in minutes as `H h M min` or `M min`.
pub fn format_duration_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours} h {mins} min")
    } else {
        format!("{mins} min")
    }
}
