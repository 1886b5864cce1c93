//! Serializable point-in-time view of a game clock.

use chrono::{DateTime, Utc};
use gridiron_types::{
    ClockState, GameId, GameState, PlayClockDuration, PlayClockState, Quarter, RestartTrigger,
    StopReason, Team,
};
use serde::{Deserialize, Serialize};

use crate::clock::GameClock;

/// A consistent copy of every field a scoreboard or log line needs.
///
/// Taken under the clock's lock by
/// [`SharedGameClock::snapshot`](crate::shared::SharedGameClock::snapshot),
/// so all fields describe the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// The game.
    pub game_id: GameId,
    /// Current period.
    pub quarter: Quarter,
    /// Seconds left in the period.
    pub time_remaining: u32,
    /// Seconds left as `MM:SS`.
    pub display: String,
    /// Lifecycle state.
    pub game_state: GameState,
    /// Game clock run state.
    pub clock_state: ClockState,
    /// Legacy run flag.
    pub is_running: bool,
    /// Seconds on the play clock.
    pub play_clock: u32,
    /// Play clock sub-state.
    pub play_clock_state: PlayClockState,
    /// Play clock length in use.
    pub play_clock_duration: PlayClockDuration,
    /// Game seconds per tick.
    pub speed_multiplier: u32,
    /// Two-minute warning flags per regulation quarter.
    pub two_minute_warning_given: [bool; 4],
    /// Game seconds since kickoff.
    pub total_elapsed: u64,
    /// Current down.
    pub down: u8,
    /// Yards to gain.
    pub distance: u8,
    /// Team with the ball.
    pub possession: Team,
    /// Home timeouts left.
    pub home_timeouts: u8,
    /// Away timeouts left.
    pub away_timeouts: u8,
    /// Why the clock last stopped.
    pub last_stop_reason: Option<StopReason>,
    /// Restart trigger waiting to fire.
    pub pending_restart: Option<RestartTrigger>,
    /// Plays run so far.
    pub plays_run: u32,
    /// Wall-clock time the snapshot was taken.
    pub captured_at: DateTime<Utc>,
}

impl ClockSnapshot {
    /// Copy the state of `clock`.
    pub fn capture(clock: &GameClock) -> Self {
        let situation = clock.situation();
        Self {
            game_id: clock.id(),
            quarter: clock.quarter(),
            time_remaining: clock.time_remaining(),
            display: clock.formatted_time(),
            game_state: clock.game_state(),
            clock_state: clock.clock_state(),
            is_running: clock.is_running(),
            play_clock: clock.play_clock(),
            play_clock_state: clock.play_clock_state(),
            play_clock_duration: clock.play_clock_duration(),
            speed_multiplier: clock.clock_speed().multiplier(),
            two_minute_warning_given: clock.two_minute_warning_given,
            total_elapsed: clock.total_elapsed(),
            down: situation.down,
            distance: situation.distance,
            possession: situation.possession,
            home_timeouts: situation.home_timeouts,
            away_timeouts: situation.away_timeouts,
            last_stop_reason: clock.last_stop_reason(),
            pending_restart: clock.pending_restart(),
            plays_run: clock.play_count(),
            captured_at: Utc::now(),
        }
    }
}
