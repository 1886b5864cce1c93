//! Multi-caller access to a single game clock.
//!
//! [`SharedGameClock`] wraps a [`GameClock`] in `Arc<Mutex<_>>`. Every
//! method takes the lock exactly once, calls the matching `&mut self`
//! method on the clock, and releases the lock on return. The clock's own
//! methods never lock, so no call can re-enter the mutex.
//!
//! A panic while the lock is held poisons the mutex. The clock is left in
//! a consistent state between statements, so a poisoned lock is recovered
//! and the state re-synchronized rather than propagated.

use std::sync::{Arc, Mutex, MutexGuard};

use gridiron_types::{
    ClockDecision, ClockSpeed, GameState, PenaltyDetails, PlayCall, PlayClockDuration,
    PlayContext, Quarter, StopReason, Team,
};
use tracing::warn;

use crate::clock::GameClock;
use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::play::PlaySummary;
use crate::snapshot::ClockSnapshot;

/// A cloneable, thread-safe handle to one [`GameClock`].
#[derive(Debug, Clone)]
pub struct SharedGameClock {
    /// The guarded clock.
    inner: Arc<Mutex<GameClock>>,
}

impl SharedGameClock {
    /// Wrap `clock` for shared use.
    pub fn new(clock: GameClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(clock)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameClock> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("game clock lock poisoned, recovering");
                let mut guard = poisoned.into_inner();
                guard.sync_clocks();
                guard
            }
        }
    }

    /// Run `f` against the clock under the lock, for consistent
    /// multi-field reads.
    pub fn with_clock<R>(&self, f: impl FnOnce(&GameClock) -> R) -> R {
        let guard = self.lock();
        f(&guard)
    }

    // -----------------------------------------------------------------------
    // Clock control
    // -----------------------------------------------------------------------

    /// See [`GameClock::start`].
    pub fn start(&self) -> Result<(), ClockError> {
        self.lock().start()
    }

    /// See [`GameClock::stop`].
    pub fn stop(&self) -> Result<(), ClockError> {
        self.lock().stop()
    }

    /// See [`GameClock::stop_with_reason`].
    pub fn stop_with_reason(&self, reason: StopReason) {
        self.lock().stop_with_reason(reason);
    }

    /// See [`GameClock::tick`].
    pub fn tick(&self) {
        self.lock().tick();
    }

    /// See [`GameClock::advanced_tick`].
    pub fn advanced_tick(&self, ticks: u32) {
        self.lock().advanced_tick(ticks);
    }

    /// See [`GameClock::reset`].
    pub fn reset(&self) {
        self.lock().reset();
    }

    /// See [`GameClock::set_time_remaining`].
    pub fn set_time_remaining(&self, seconds: u32) -> Result<(), ClockError> {
        self.lock().set_time_remaining(seconds)
    }

    /// See [`GameClock::start_overtime`].
    pub fn start_overtime(&self) -> Result<(), ClockError> {
        self.lock().start_overtime()
    }

    /// See [`GameClock::trigger_two_minute_warning`].
    pub fn trigger_two_minute_warning(&self) -> bool {
        self.lock().trigger_two_minute_warning()
    }

    // -----------------------------------------------------------------------
    // Play clock and speed
    // -----------------------------------------------------------------------

    /// See [`GameClock::reset_play_clock`].
    pub fn reset_play_clock(&self) {
        self.lock().reset_play_clock();
    }

    /// See [`GameClock::set_play_clock`].
    pub fn set_play_clock(&self, seconds: u32) -> Result<(), ClockError> {
        self.lock().set_play_clock(seconds)
    }

    /// See [`GameClock::set_play_clock_duration`].
    pub fn set_play_clock_duration(&self, duration: PlayClockDuration) {
        self.lock().set_play_clock_duration(duration);
    }

    /// See [`GameClock::start_play_clock`].
    pub fn start_play_clock(&self) {
        self.lock().start_play_clock();
    }

    /// See [`GameClock::stop_play_clock`].
    pub fn stop_play_clock(&self) {
        self.lock().stop_play_clock();
    }

    /// See [`GameClock::set_clock_speed`].
    pub fn set_clock_speed(&self, speed: ClockSpeed) {
        self.lock().set_clock_speed(speed);
    }

    /// See [`GameClock::set_custom_clock_speed`].
    pub fn set_custom_clock_speed(&self, multiplier: u32) {
        self.lock().set_custom_clock_speed(multiplier);
    }

    // -----------------------------------------------------------------------
    // Plays
    // -----------------------------------------------------------------------

    /// See [`GameClock::process_play`].
    pub fn process_play(&self, call: PlayCall) -> Result<PlaySummary, ClockError> {
        self.lock().process_play(call)
    }

    /// See [`GameClock::process_play_with_context`].
    pub fn process_play_with_context(
        &self,
        call: PlayCall,
        context: &PlayContext,
    ) -> Result<PlaySummary, ClockError> {
        self.lock().process_play_with_context(call, context)
    }

    /// See [`GameClock::call_timeout`].
    pub fn call_timeout(&self, team: Team) -> Result<u8, ClockError> {
        self.lock().call_timeout(team)
    }

    /// See [`GameClock::report_injury`].
    pub fn report_injury(&self) -> Result<ClockDecision, ClockError> {
        self.lock().report_injury()
    }

    /// See [`GameClock::apply_penalty`].
    pub fn apply_penalty(&self, penalty: &PenaltyDetails) -> Result<ClockDecision, ClockError> {
        self.lock().apply_penalty(penalty)
    }

    // -----------------------------------------------------------------------
    // Configuration and recovery
    // -----------------------------------------------------------------------

    /// See [`GameClock::update_config`].
    pub fn update_config(&self, config: ClockConfig) -> Result<(), ClockError> {
        self.lock().update_config(config)
    }

    /// See [`GameClock::validate_state`].
    pub fn validate_state(&self) -> Result<(), ClockError> {
        self.lock().validate_state()
    }

    /// See [`GameClock::recover_from_error`].
    pub fn recover_from_error(&self, error: &ClockError) {
        self.lock().recover_from_error(error);
    }

    /// See [`GameClock::reset_to_valid_state`].
    pub fn reset_to_valid_state(&self) {
        self.lock().reset_to_valid_state();
    }

    /// See [`GameClock::sync_clocks`].
    pub fn sync_clocks(&self) {
        self.lock().sync_clocks();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Seconds left in the current period.
    pub fn time_remaining(&self) -> u32 {
        self.lock().time_remaining()
    }

    /// Current period.
    pub fn quarter(&self) -> Quarter {
        self.lock().quarter()
    }

    /// Lifecycle state of the game.
    pub fn game_state(&self) -> GameState {
        self.lock().game_state()
    }

    /// Whether the game clock is running.
    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    /// Seconds on the play clock.
    pub fn play_clock(&self) -> u32 {
        self.lock().play_clock()
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.lock().is_game_over()
    }

    /// Time left as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        self.lock().formatted_time()
    }

    /// Consistent point-in-time copy of the clock.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.lock().snapshot()
    }
}

impl From<GameClock> for SharedGameClock {
    fn from(clock: GameClock) -> Self {
        Self::new(clock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn handle_is_send_and_sync() {
        assert_send_sync::<SharedGameClock>();
    }

    #[test]
    fn clones_share_one_clock() {
        let shared = SharedGameClock::new(GameClock::new());
        let other = shared.clone();
        shared.start().unwrap();
        assert!(other.is_running());
        assert_eq!(other.start(), Err(ClockError::ClockAlreadyRunning));
    }

    #[test]
    fn with_clock_reads_consistently() {
        let shared = SharedGameClock::new(GameClock::new());
        shared.start().unwrap();
        shared.advanced_tick(60);
        let (time, elapsed) = shared.with_clock(|c| (c.time_remaining(), c.total_elapsed()));
        assert_eq!(u64::from(900 - time), elapsed);
    }

    #[test]
    #[allow(clippy::panic)]
    fn poisoned_lock_is_recovered() {
        let shared = SharedGameClock::new(GameClock::new());
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            poisoner.with_clock(|_| panic!("poison the lock"));
        })
        .join();
        assert!(shared.inner.is_poisoned());
        shared.start().unwrap();
        assert!(shared.is_running());
    }
}
