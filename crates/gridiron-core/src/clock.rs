//! The game clock state machine.
//!
//! [`GameClock`] is the single authority over game time. It owns the game
//! clock and the play clock, counts down on every tick, moves the game from
//! period to period, fires the two-minute warning, and applies the
//! decisions of the [`RulesEngine`] after every play.
//!
//! # Design Principles
//!
//! - All time arithmetic is saturating; no value can wrap.
//! - Every mutator takes `&mut self` and never calls back into a lock, so
//!   [`SharedGameClock`](crate::shared::SharedGameClock) can hold its mutex
//!   for exactly one call.
//! - `is_running` and `clock_state` are always written together.
//!
//! Play processing lives in [`crate::play`] and validation in
//! [`crate::validation`]; both extend this type.

use gridiron_rules::{GameSituation, RulesEngine};
use gridiron_types::{
    ClockSpeed, ClockState, GameId, GameState, PlayClockDuration, PlayClockState, Quarter,
    RestartTrigger, StopReason,
};
use tracing::{debug, info};

use crate::config::{ClockConfig, MAX_PLAY_CLOCK, MAX_SIMULATION_SPEED, rescale};
use crate::error::ClockError;
use crate::provider::{PlayOutcomeProvider, RandomPlayProvider};
use crate::snapshot::ClockSnapshot;

/// Seconds left in a half when the two-minute warning fires.
pub const TWO_MINUTE_WARNING_SECONDS: u32 = 120;

/// Seconds per minute, for display.
const SECONDS_PER_MINUTE: u32 = 60;

/// The game clock state machine.
///
/// Construct with [`GameClock::new`], [`GameClock::with_config`], or
/// [`GameClockBuilder`](crate::builder::GameClockBuilder).
#[derive(Debug)]
pub struct GameClock {
    /// Identifier of the game this clock belongs to.
    pub(crate) id: GameId,
    /// Validated configuration in force.
    pub(crate) config: ClockConfig,
    /// Seconds left in the current period.
    pub(crate) time_remaining: u32,
    /// Current period.
    pub(crate) quarter: Quarter,
    /// Lifecycle state of the game.
    pub(crate) game_state: GameState,
    /// Run state of the game clock.
    pub(crate) clock_state: ClockState,
    /// Legacy run flag, always equal to `clock_state == Running`.
    pub(crate) is_running: bool,
    /// Seconds on the play clock.
    pub(crate) play_clock: u32,
    /// Sub-state of the play clock.
    pub(crate) play_clock_state: PlayClockState,
    /// Which play-clock length applies to the next reset.
    pub(crate) play_clock_duration: PlayClockDuration,
    /// Game seconds per tick.
    pub(crate) clock_speed: ClockSpeed,
    /// Two-minute warning flags, one per regulation quarter.
    pub(crate) two_minute_warning_given: [bool; 4],
    /// Game seconds run off since kickoff.
    pub(crate) total_elapsed: u64,
    /// Rules engine, owned exclusively by this clock.
    pub(crate) rules: RulesEngine,
    /// Source of play results.
    pub(crate) provider: Box<dyn PlayOutcomeProvider>,
    /// When a stopped clock restarts on its own.
    pub(crate) pending_restart: Option<RestartTrigger>,
    /// Why the clock last stopped.
    pub(crate) last_stop_reason: Option<StopReason>,
    /// Plays run so far.
    pub(crate) plays_run: u32,
}

impl GameClock {
    /// Create a clock for a standard regular-season game.
    pub fn new() -> Self {
        let config = ClockConfig::default();
        let provider = provider_for(&config);
        Self::from_parts(config, provider)
    }

    /// Create a clock from a configuration.
    ///
    /// In deterministic mode the play provider is seeded from
    /// `config.seed`; otherwise it draws from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if the configuration
    /// fails validation.
    pub fn with_config(config: ClockConfig) -> Result<Self, ClockError> {
        config.validate()?;
        let provider = provider_for(&config);
        Ok(Self::from_parts(config, provider))
    }

    /// Create a clock with an explicit play provider.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if the configuration
    /// fails validation.
    pub fn with_provider(
        config: ClockConfig,
        provider: Box<dyn PlayOutcomeProvider>,
    ) -> Result<Self, ClockError> {
        config.validate()?;
        Ok(Self::from_parts(config, provider))
    }

    /// Assemble a clock at the opening kickoff. `config` must be valid.
    pub(crate) fn from_parts(config: ClockConfig, provider: Box<dyn PlayOutcomeProvider>) -> Self {
        let rules = RulesEngine::new(config.rules_config());
        Self {
            id: GameId::new(),
            time_remaining: config.quarter_length,
            quarter: Quarter::Q1,
            game_state: GameState::PreGame,
            clock_state: ClockState::Stopped,
            is_running: false,
            play_clock: config.play_clock_normal,
            play_clock_state: PlayClockState::Inactive,
            play_clock_duration: PlayClockDuration::Normal,
            clock_speed: config.clock_speed(),
            two_minute_warning_given: [false; 4],
            total_elapsed: 0,
            rules,
            provider,
            pending_restart: None,
            last_stop_reason: None,
            plays_run: 0,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Clock control
    // -----------------------------------------------------------------------

    /// Start the game clock.
    ///
    /// Kicks the game off from `PreGame` and resumes it from `Halftime`.
    /// Clears any pending restart trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ClockAlreadyRunning`] if the clock is running,
    /// or [`ClockError::GameAlreadyEnded`] if the game is over.
    pub fn start(&mut self) -> Result<(), ClockError> {
        if self.is_running {
            return Err(ClockError::ClockAlreadyRunning);
        }
        if self.game_state == GameState::EndGame {
            return Err(ClockError::GameAlreadyEnded);
        }
        if self.game_state != GameState::InProgress {
            info!(game_id = %self.id, from = ?self.game_state, quarter = %self.quarter, "game in progress");
            self.game_state = GameState::InProgress;
        }
        self.pending_restart = None;
        self.run();
        info!(
            quarter = %self.quarter,
            time_remaining = self.time_remaining,
            "game clock started"
        );
        Ok(())
    }

    /// Stop the game clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ClockNotRunning`] if the clock is stopped.
    pub fn stop(&mut self) -> Result<(), ClockError> {
        if !self.is_running {
            return Err(ClockError::ClockNotRunning);
        }
        self.halt();
        info!(
            quarter = %self.quarter,
            time_remaining = self.time_remaining,
            "game clock stopped"
        );
        Ok(())
    }

    /// Stop the clock and record why. A two-minute-warning reason goes
    /// through [`GameClock::trigger_two_minute_warning`].
    pub fn stop_with_reason(&mut self, reason: StopReason) {
        if reason == StopReason::TwoMinuteWarning {
            self.trigger_two_minute_warning();
            return;
        }
        self.halt();
        self.last_stop_reason = Some(reason);
        debug!(reason = reason.as_str(), time_remaining = self.time_remaining, "clock stopped");
    }

    /// Advance one tick.
    ///
    /// Does nothing while the clock is stopped. Otherwise the play clock
    /// loses one second, the game clock loses the speed multiplier (never
    /// more than is left), and the period ends if the game clock hits zero.
    pub fn tick(&mut self) {
        if !self.is_running {
            return;
        }
        self.tick_play_clock(1);
        let step = self.clock_speed.multiplier().min(self.time_remaining);
        self.run_off(step);
        if self.time_remaining == 0 {
            self.clock_state = ClockState::Expired;
            self.advance_period();
        }
    }

    /// Advance `ticks` ticks at once.
    ///
    /// The game clock loses `ticks` times the speed multiplier. A step that
    /// would skip past the two-minute mark stops at 2:00 so the warning
    /// fires exactly there.
    pub fn advanced_tick(&mut self, ticks: u32) {
        if !self.is_running || ticks == 0 {
            return;
        }
        if self.trigger_two_minute_warning() {
            return;
        }
        self.tick_play_clock(ticks);
        let mut step = ticks
            .saturating_mul(self.clock_speed.multiplier())
            .min(self.time_remaining);

        if self.warning_pending()
            && self.time_remaining > TWO_MINUTE_WARNING_SECONDS
            && self.time_remaining.saturating_sub(step) < TWO_MINUTE_WARNING_SECONDS
        {
            step = self.time_remaining.saturating_sub(TWO_MINUTE_WARNING_SECONDS);
        }
        self.run_off(step);

        self.trigger_two_minute_warning();
        if self.time_remaining == 0 {
            self.clock_state = ClockState::Expired;
            self.advance_period();
        }
    }

    /// Return to the opening kickoff, keeping the configuration and game id.
    pub fn reset(&mut self) {
        self.time_remaining = self.config.quarter_length;
        self.quarter = Quarter::Q1;
        self.game_state = GameState::PreGame;
        self.clock_state = ClockState::Stopped;
        self.is_running = false;
        self.play_clock_duration = PlayClockDuration::Normal;
        self.reset_play_clock();
        self.clock_speed = self.config.clock_speed();
        self.two_minute_warning_given = [false; 4];
        self.total_elapsed = 0;
        self.rules = RulesEngine::new(self.config.rules_config());
        self.pending_restart = None;
        self.last_stop_reason = None;
        self.plays_run = 0;
        if self.config.deterministic_mode {
            self.provider.reseed(self.config.seed);
        }
        info!(game_id = %self.id, "game clock reset");
    }

    /// Set the seconds left in the current period.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidTimeRemaining`] if `seconds` exceeds
    /// the period length.
    pub fn set_time_remaining(&mut self, seconds: u32) -> Result<(), ClockError> {
        let max = self.period_length();
        if seconds > max {
            return Err(ClockError::InvalidTimeRemaining { seconds, max });
        }
        self.time_remaining = seconds;
        if seconds > 0 && self.clock_state == ClockState::Expired {
            self.clock_state = ClockState::Stopped;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Periods
    // -----------------------------------------------------------------------

    /// End the current period and set up the next one.
    pub(crate) fn advance_period(&mut self) {
        let from = self.quarter;
        self.halt();
        self.pending_restart = None;
        self.play_clock_duration = PlayClockDuration::Normal;
        self.reset_play_clock();

        match from {
            Quarter::Q1 | Quarter::Q2 | Quarter::Q3 => {
                self.sync_rules();
                self.rules.advance_quarter();
                self.quarter = from.next();
                self.time_remaining = self.config.quarter_length;
                self.clock_state = ClockState::Stopped;
                match from {
                    Quarter::Q2 => {
                        self.game_state = GameState::Halftime;
                        info!(game_id = %self.id, "halftime");
                    }
                    Quarter::Q3 if self.game_state == GameState::Halftime => {
                        self.game_state = GameState::InProgress;
                    }
                    _ => {}
                }
                info!(
                    from = %from,
                    to = %self.quarter,
                    time_remaining = self.time_remaining,
                    "period ended"
                );
            }
            Quarter::Q4 | Quarter::Overtime => {
                self.game_state = GameState::EndGame;
                self.clock_state = ClockState::Expired;
                info!(
                    game_id = %self.id,
                    quarter = %from,
                    total_elapsed = self.total_elapsed,
                    "game over"
                );
            }
        }
    }

    /// Start an overtime period.
    ///
    /// Legal at the end of the 4th quarter, and under playoff rules at the
    /// end of an overtime period. The clock is left stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidQuarter`] anywhere else.
    pub fn start_overtime(&mut self) -> Result<(), ClockError> {
        let allowed = self.time_remaining == 0
            && match self.quarter {
                Quarter::Q4 => true,
                Quarter::Overtime => self.config.playoff_rules,
                Quarter::Q1 | Quarter::Q2 | Quarter::Q3 => false,
            };
        if !allowed {
            return Err(ClockError::InvalidQuarter {
                quarter: self.quarter,
                time_remaining: self.time_remaining,
            });
        }

        self.halt();
        self.sync_rules();
        self.rules.advance_quarter();
        self.quarter = Quarter::Overtime;
        self.time_remaining = self.config.active_overtime_length();
        self.game_state = GameState::InProgress;
        self.clock_state = ClockState::Stopped;
        self.pending_restart = None;
        self.play_clock_duration = PlayClockDuration::Normal;
        self.reset_play_clock();
        info!(
            game_id = %self.id,
            overtime_period = self.rules.situation().overtime_period,
            time_remaining = self.time_remaining,
            playoff_rules = self.config.playoff_rules,
            "overtime started"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Two-minute warning
    // -----------------------------------------------------------------------

    /// Whether the two-minute warning is due now: 2nd or 4th quarter, 2:00
    /// or less left, and not yet given this quarter.
    pub fn should_trigger_two_minute_warning(&self) -> bool {
        self.warning_pending() && self.time_remaining <= TWO_MINUTE_WARNING_SECONDS
    }

    /// Fire the two-minute warning if it is due. Returns whether it fired.
    pub fn trigger_two_minute_warning(&mut self) -> bool {
        if !self.should_trigger_two_minute_warning() {
            return false;
        }
        self.halt();
        if let Some(given) = self.two_minute_warning_given.get_mut(self.quarter.index()) {
            *given = true;
        }
        self.last_stop_reason = Some(StopReason::TwoMinuteWarning);
        self.pending_restart = Some(RestartTrigger::OnSnap);
        self.sync_rules();
        info!(
            quarter = %self.quarter,
            time_remaining = self.time_remaining,
            "two-minute warning"
        );
        true
    }

    /// Warning enabled, in a half-ending quarter, and not yet given.
    fn warning_pending(&self) -> bool {
        self.config.features.two_minute_warning
            && self.quarter.ends_half()
            && !self.two_minute_warning_given(self.quarter)
    }

    // -----------------------------------------------------------------------
    // Play clock
    // -----------------------------------------------------------------------

    /// Reset the play clock to the current duration and stop it.
    pub const fn reset_play_clock(&mut self) {
        self.play_clock = self.config.play_clock_seconds(self.play_clock_duration);
        self.play_clock_state = PlayClockState::Inactive;
    }

    /// Put `seconds` on the play clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidPlayClock`] if `seconds` exceeds 40.
    pub const fn set_play_clock(&mut self, seconds: u32) -> Result<(), ClockError> {
        if seconds > MAX_PLAY_CLOCK {
            return Err(ClockError::InvalidPlayClock { seconds });
        }
        self.play_clock = seconds;
        if self.play_clock_state.is_counting() {
            self.play_clock_state = PlayClockState::for_running_clock(seconds);
        }
        Ok(())
    }

    /// Choose the play-clock length. A stopped play clock is reset to it.
    pub const fn set_play_clock_duration(&mut self, duration: PlayClockDuration) {
        self.play_clock_duration = duration;
        if !self.play_clock_state.is_counting() {
            self.reset_play_clock();
        }
    }

    /// The ready-for-play signal.
    ///
    /// Starts the play clock at the current duration. If the last stoppage
    /// restarts the game clock on the ready signal, the game clock starts
    /// too.
    pub fn start_play_clock(&mut self) {
        self.play_clock = self.config.play_clock_seconds(self.play_clock_duration);
        self.play_clock_state = PlayClockState::for_running_clock(self.play_clock);
        if self.pending_restart == Some(RestartTrigger::OnReady) {
            self.restart_if_live(RestartTrigger::OnReady);
        }
    }

    /// Stop the play clock where it is.
    pub const fn stop_play_clock(&mut self) {
        self.play_clock_state = PlayClockState::Inactive;
    }

    fn tick_play_clock(&mut self, seconds: u32) {
        if !self.play_clock_state.is_counting() {
            return;
        }
        self.play_clock = self.play_clock.saturating_sub(seconds);
        self.play_clock_state = PlayClockState::for_running_clock(self.play_clock);
        if self.play_clock_state == PlayClockState::Expired {
            debug!(quarter = %self.quarter, time_remaining = self.time_remaining, "play clock expired");
        }
    }

    // -----------------------------------------------------------------------
    // Speed and configuration
    // -----------------------------------------------------------------------

    /// Set the simulation speed.
    pub const fn set_clock_speed(&mut self, speed: ClockSpeed) {
        self.clock_speed = speed;
    }

    /// Set an arbitrary multiplier, clamped into `1..=60`.
    pub fn set_custom_clock_speed(&mut self, multiplier: u32) {
        self.clock_speed = ClockSpeed::Custom(multiplier.clamp(1, MAX_SIMULATION_SPEED));
    }

    /// Swap in a new configuration mid-game.
    ///
    /// Time left in a regulation period is rescaled to the new quarter
    /// length; time left in overtime is clamped to the new overtime length.
    /// The play clock is clamped to its new length.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if `config` is invalid
    /// or the swap is not allowed in the current state.
    pub fn update_config(&mut self, config: ClockConfig) -> Result<(), ClockError> {
        config.validate()?;
        if !ClockConfig::is_compatible_change(&self.config, &config, self.time_remaining) {
            return Err(ClockError::InvalidConfiguration {
                reason: format!(
                    "change not allowed in {} with {}s remaining",
                    self.quarter, self.time_remaining
                ),
            });
        }

        let before = self.time_remaining;
        self.time_remaining = if self.quarter.is_regulation() {
            rescale(before, self.config.quarter_length, config.quarter_length)
        } else {
            before.min(config.active_overtime_length())
        };
        self.play_clock = self
            .play_clock
            .min(config.play_clock_seconds(self.play_clock_duration));
        if self.play_clock_state.is_counting() {
            self.play_clock_state = PlayClockState::for_running_clock(self.play_clock);
        }
        self.clock_speed = config.clock_speed();
        self.rules.set_config(config.rules_config());
        if config.deterministic_mode && !self.config.deterministic_mode {
            self.provider.reseed(config.seed);
        }
        self.config = config;
        self.sync_rules();

        info!(
            quarter = %self.quarter,
            before,
            after = self.time_remaining,
            speed = self.clock_speed.multiplier(),
            "configuration updated"
        );
        Ok(())
    }

    /// Replace the play provider.
    pub fn set_provider(&mut self, provider: Box<dyn PlayOutcomeProvider>) {
        self.provider = provider;
    }

    // -----------------------------------------------------------------------
    // Internal helpers (never lock, never call a locking method)
    // -----------------------------------------------------------------------

    /// Set both run flags to running.
    pub(crate) const fn run(&mut self) {
        self.is_running = true;
        self.clock_state = ClockState::Running;
    }

    /// Set both run flags to stopped. An expired clock stays expired.
    pub(crate) fn halt(&mut self) {
        self.is_running = false;
        if self.clock_state == ClockState::Running {
            self.clock_state = ClockState::Stopped;
        }
    }

    /// Restart a stopped clock on `trigger` if the game is live.
    pub(crate) fn restart_if_live(&mut self, trigger: RestartTrigger) {
        self.pending_restart = None;
        if !self.is_running && self.game_state == GameState::InProgress && self.time_remaining > 0 {
            self.run();
            debug!(?trigger, time_remaining = self.time_remaining, "game clock restarted");
        }
    }

    /// Take up to `seconds` off the game clock. Returns the seconds removed.
    pub(crate) fn run_off(&mut self, seconds: u32) -> u32 {
        let taken = seconds.min(self.time_remaining);
        self.time_remaining = self.time_remaining.saturating_sub(taken);
        self.total_elapsed = self.total_elapsed.saturating_add(u64::from(taken));
        taken
    }

    /// Push the clock's period, time, and warning state into the rules engine.
    pub(crate) fn sync_rules(&mut self) {
        let given = self.two_minute_warning_given(self.quarter);
        self.rules.sync_clock(self.quarter, self.time_remaining, given);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Identifier of this game.
    pub const fn id(&self) -> GameId {
        self.id
    }

    /// Configuration in force.
    pub const fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Seconds left in the current period.
    pub const fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Current period.
    pub const fn quarter(&self) -> Quarter {
        self.quarter
    }

    /// Lifecycle state of the game.
    pub const fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Run state of the game clock.
    pub const fn clock_state(&self) -> ClockState {
        self.clock_state
    }

    /// Whether the game clock is running.
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Seconds on the play clock.
    pub const fn play_clock(&self) -> u32 {
        self.play_clock
    }

    /// Sub-state of the play clock.
    pub const fn play_clock_state(&self) -> PlayClockState {
        self.play_clock_state
    }

    /// Play-clock length in use.
    pub const fn play_clock_duration(&self) -> PlayClockDuration {
        self.play_clock_duration
    }

    /// Simulation speed.
    pub const fn clock_speed(&self) -> ClockSpeed {
        self.clock_speed
    }

    /// Game seconds run off since kickoff.
    pub const fn total_elapsed(&self) -> u64 {
        self.total_elapsed
    }

    /// Full length of the current period.
    pub const fn period_length(&self) -> u32 {
        self.config.period_length(self.quarter)
    }

    /// Seconds played in the current period.
    pub const fn elapsed_in_quarter(&self) -> u32 {
        self.period_length().saturating_sub(self.time_remaining)
    }

    /// Time left as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        let minutes = self.time_remaining.checked_div(SECONDS_PER_MINUTE).unwrap_or(0);
        let seconds = self.time_remaining.checked_rem(SECONDS_PER_MINUTE).unwrap_or(0);
        format!("{minutes:02}:{seconds:02}")
    }

    /// Play clock as `:SS`.
    pub fn formatted_play_clock(&self) -> String {
        format!(":{:02}", self.play_clock)
    }

    /// Period label: `1st`, `2nd`, `3rd`, `4th`, or `OT`.
    pub const fn quarter_string(&self) -> &'static str {
        self.quarter.label()
    }

    /// Whether the current period has no time left.
    pub const fn is_quarter_ended(&self) -> bool {
        self.time_remaining == 0
    }

    /// Whether a half just ended.
    pub const fn is_half_over(&self) -> bool {
        (self.quarter.ends_half() && self.time_remaining == 0)
            || matches!(self.game_state, GameState::Halftime)
    }

    /// Whether the game is over.
    pub const fn is_game_over(&self) -> bool {
        matches!(self.game_state, GameState::EndGame)
    }

    /// Whether the two-minute warning was given in `quarter`. Always false
    /// for overtime.
    pub fn two_minute_warning_given(&self, quarter: Quarter) -> bool {
        self.two_minute_warning_given
            .get(quarter.index())
            .copied()
            .unwrap_or(false)
    }

    /// Why the clock last stopped.
    pub const fn last_stop_reason(&self) -> Option<StopReason> {
        self.last_stop_reason
    }

    /// Restart trigger waiting to fire.
    pub const fn pending_restart(&self) -> Option<RestartTrigger> {
        self.pending_restart
    }

    /// Plays run so far.
    pub const fn play_count(&self) -> u32 {
        self.plays_run
    }

    /// The rules engine.
    pub const fn rules(&self) -> &RulesEngine {
        &self.rules
    }

    /// The rules engine's view of the game.
    pub const fn situation(&self) -> &GameSituation {
        self.rules.situation()
    }

    /// Point-in-time copy of the clock for display or serialization.
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot::capture(self)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider matching the configuration's determinism setting.
pub(crate) fn provider_for(config: &ClockConfig) -> Box<dyn PlayOutcomeProvider> {
    if config.deterministic_mode {
        Box::new(RandomPlayProvider::seeded(config.seed))
    } else {
        Box::new(RandomPlayProvider::from_entropy())
    }
}
