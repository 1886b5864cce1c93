//! Clock decisions and penalty descriptions.
//!
//! A [`ClockDecision`] is the rules engine's instruction to the clock for
//! one play. It is produced fresh per play and never stored.

use serde::{Deserialize, Serialize};

use crate::enums::{PenaltyImpact, PlayClockDuration, RestartTrigger, StopReason, Team};

/// How the clock must react to a play.
///
/// When `should_stop` is set, at most one of `restart_on_ready` and
/// `restart_on_snap` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockDecision {
    /// Whether the game clock stops after the play.
    pub should_stop: bool,
    /// Why the clock stopped, if it did.
    pub stop_reason: Option<StopReason>,
    /// Restart the game clock on the ready-for-play signal.
    pub restart_on_ready: bool,
    /// Restart the game clock at the next snap.
    pub restart_on_snap: bool,
    /// Whether the play clock resets for the next snap.
    pub play_clock_reset: bool,
    /// Which play-clock length applies after the reset.
    pub play_clock_duration: PlayClockDuration,
}

impl ClockDecision {
    /// The clock keeps running; the play clock resets to its normal length.
    pub const fn keep_running() -> Self {
        Self {
            should_stop: false,
            stop_reason: None,
            restart_on_ready: false,
            restart_on_snap: false,
            play_clock_reset: true,
            play_clock_duration: PlayClockDuration::Normal,
        }
    }

    /// No clock consequence at all, not even a play-clock reset.
    pub const fn no_change() -> Self {
        Self {
            play_clock_reset: false,
            ..Self::keep_running()
        }
    }

    /// Stop the clock for `reason` and restart on `restart`, if any.
    pub const fn stop(reason: StopReason, restart: Option<RestartTrigger>) -> Self {
        Self {
            should_stop: true,
            stop_reason: Some(reason),
            restart_on_ready: matches!(restart, Some(RestartTrigger::OnReady)),
            restart_on_snap: matches!(restart, Some(RestartTrigger::OnSnap)),
            play_clock_reset: true,
            play_clock_duration: PlayClockDuration::Normal,
        }
    }

    /// Same decision with the 25-second play clock.
    #[must_use]
    pub const fn with_short_play_clock(mut self) -> Self {
        self.play_clock_duration = PlayClockDuration::Short;
        self
    }

    /// The restart trigger encoded by the two restart flags.
    ///
    /// `OnSnap` wins if both are somehow set.
    pub const fn restart_trigger(&self) -> Option<RestartTrigger> {
        if self.restart_on_snap {
            Some(RestartTrigger::OnSnap)
        } else if self.restart_on_ready {
            Some(RestartTrigger::OnReady)
        } else {
            None
        }
    }
}

impl Default for ClockDecision {
    fn default() -> Self {
        Self::keep_running()
    }
}

/// A penalty as seen by the clock: yardage, clock impact, offender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyInfo {
    /// Yards assessed.
    pub yards: u8,
    /// Clock consequence.
    pub impact: PenaltyImpact,
    /// The team that committed the foul.
    pub committed_by: Team,
}

impl PenaltyInfo {
    /// Create a penalty description.
    pub const fn new(yards: u8, impact: PenaltyImpact, committed_by: Team) -> Self {
        Self {
            yards,
            impact,
            committed_by,
        }
    }
}

/// Extended penalty description used for untimed-down eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyDetails {
    /// Yardage, clock impact, and offender.
    pub info: PenaltyInfo,
    /// Foul committed by the defense.
    pub defensive: bool,
    /// The foul carries an automatic first down.
    pub automatic_first_down: bool,
    /// Human-readable foul name (e.g. "defensive holding").
    pub name: String,
}

impl PenaltyDetails {
    /// Create extended penalty details.
    pub fn new(
        name: impl Into<String>,
        info: PenaltyInfo,
        defensive: bool,
        automatic_first_down: bool,
    ) -> Self {
        Self {
            info,
            defensive,
            automatic_first_down,
            name: name.into(),
        }
    }

    /// Whether this foul, occurring as time expires at the end of a half,
    /// extends the half by one untimed down.
    pub const fn grants_untimed_down(&self) -> bool {
        self.defensive && self.automatic_first_down
    }
}
