//! Priority-ordered clock rules.
//!
//! [`RulesEngine::process_play_extended`] evaluates a play outcome in a
//! strict order, and the first rule that applies decides:
//!
//! 1. A previously granted untimed down, played with no time left, ends
//!    the half.
//! 2. Scores stop the clock until the kickoff.
//! 3. Time has expired: a defensive automatic-first-down foul at the end of
//!    a half grants an untimed down; anything else ends the period.
//! 4. The two-minute warning.
//! 5. The per-outcome rule table.
//!
//! Penalties resolved on their own go through
//! [`RulesEngine::process_penalty`], which handles ten-second runoffs.

use gridiron_types::{
    ClockDecision, PenaltyDetails, PenaltyImpact, PenaltyInfo, PlayOutcome, Quarter,
    RestartTrigger, StopReason, Team,
};
use tracing::{debug, info};

use crate::error::RulesError;
use crate::situation::{
    FIRST_DOWN_DISTANCE, GameSituation, PLAYOFF_OVERTIME_TIMEOUTS, REGULATION_TIMEOUTS,
    RulesConfig,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Seconds left in a half at or below which a ten-second runoff applies.
const RUNOFF_WINDOW_SECONDS: u32 = 60;

/// Seconds taken off the clock by a ten-second runoff.
const RUNOFF_SECONDS: u32 = 10;

/// Longest distance tracked for down and distance.
const MAX_DISTANCE: i32 = 99;

/// What a down-and-distance update produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownResult {
    /// The line to gain was reached.
    FirstDown,
    /// Fourth down failed; the other team takes over.
    TurnoverOnDowns,
    /// Play moves to the next down.
    NextDown,
}

/// The NFL clock-management rules engine.
///
/// Owns a [`GameSituation`] and turns play outcomes into
/// [`ClockDecision`]s. Single-owner; carries no synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesEngine {
    /// Period lengths and rule flags.
    config: RulesConfig,
    /// Current situation.
    situation: GameSituation,
}

impl RulesEngine {
    /// Create an engine positioned at the opening kickoff.
    pub const fn new(config: RulesConfig) -> Self {
        Self {
            situation: GameSituation::new(&config),
            config,
        }
    }

    /// Return the active configuration.
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Return the current situation.
    pub const fn situation(&self) -> &GameSituation {
        &self.situation
    }

    /// Replace the configuration. The situation keeps its state except for
    /// the playoff flag.
    pub const fn set_config(&mut self, config: RulesConfig) {
        self.config = config;
        self.situation.playoff_rules = config.playoff_rules;
    }

    /// Align the situation with the authoritative game clock.
    ///
    /// The clock calls this before every evaluation so the rules see the
    /// clock's period, time, and two-minute-warning state.
    pub const fn sync_clock(&mut self, quarter: Quarter, time_remaining: u32, warning_given: bool) {
        self.situation.quarter = quarter;
        self.situation.is_overtime = !quarter.is_regulation();
        self.situation.time_remaining = time_remaining;
        self.situation.two_minute_drill = warning_given;
    }

    /// Run `seconds` off the situation's clock. Returns the seconds
    /// actually removed.
    pub const fn consume_time(&mut self, seconds: u32) -> u32 {
        let taken = if seconds < self.situation.time_remaining {
            seconds
        } else {
            self.situation.time_remaining
        };
        self.situation.time_remaining = self.situation.time_remaining.saturating_sub(taken);
        taken
    }

    // -----------------------------------------------------------------------
    // Play evaluation
    // -----------------------------------------------------------------------

    /// Decide how the clock reacts to `outcome`.
    pub fn process_play(&mut self, outcome: &PlayOutcome) -> ClockDecision {
        self.process_play_extended(outcome, None)
    }

    /// Decide how the clock reacts to `outcome`, taking into account a
    /// penalty flagged on the same play.
    ///
    /// Only the untimed-down flag and the cached penalty are mutated.
    pub fn process_play_extended(
        &mut self,
        outcome: &PlayOutcome,
        penalty: Option<&PenaltyDetails>,
    ) -> ClockDecision {
        let decision = self.evaluate(outcome, penalty);
        debug!(
            quarter = %self.situation.quarter,
            time_remaining = self.situation.time_remaining,
            outcome = ?outcome,
            should_stop = decision.should_stop,
            stop_reason = decision.stop_reason.map(StopReason::as_str),
            "play evaluated"
        );
        decision
    }

    fn evaluate(&mut self, outcome: &PlayOutcome, penalty: Option<&PenaltyDetails>) -> ClockDecision {
        let time_remaining = self.situation.time_remaining;

        if self.situation.untimed_down_available && time_remaining == 0 {
            self.situation.untimed_down_available = false;
            info!(quarter = %self.situation.quarter, "untimed down played, half over");
            return ClockDecision::stop(StopReason::QuarterEnd, None);
        }

        if outcome.is_scoring() {
            return ClockDecision::stop(StopReason::Score, None);
        }

        if time_remaining == 0 {
            if let Some(foul) = penalty
                && foul.grants_untimed_down()
                && self.situation.quarter.ends_half()
            {
                self.situation.untimed_down_available = true;
                self.situation.last_penalty = Some(foul.clone());
                info!(
                    quarter = %self.situation.quarter,
                    foul = foul.name,
                    "untimed down granted"
                );
                return ClockDecision::stop(StopReason::Penalty, Some(RestartTrigger::OnSnap));
            }
            return ClockDecision::stop(StopReason::QuarterEnd, None);
        }

        if self.two_minute_warning_due() {
            self.situation.two_minute_drill = true;
            info!(quarter = %self.situation.quarter, time_remaining, "two-minute warning");
            return ClockDecision::stop(StopReason::TwoMinuteWarning, Some(RestartTrigger::OnSnap));
        }

        self.apply_rule_table(outcome, penalty)
    }

    /// Whether the two-minute warning fires on this play.
    pub const fn two_minute_warning_due(&self) -> bool {
        self.config.two_minute_warning
            && self.situation.inside_two_minutes()
            && !self.situation.two_minute_drill
    }

    fn apply_rule_table(
        &mut self,
        outcome: &PlayOutcome,
        penalty: Option<&PenaltyDetails>,
    ) -> ClockDecision {
        match outcome {
            PlayOutcome::IncompletePass => {
                ClockDecision::stop(StopReason::IncompletePass, Some(RestartTrigger::OnSnap))
            }
            PlayOutcome::PassOutOfBounds
            | PlayOutcome::RunOutOfBounds
            | PlayOutcome::FumbleOutOfBounds => self.out_of_bounds(),
            PlayOutcome::PassInbounds { first_down }
            | PlayOutcome::RunInbounds { first_down }
            | PlayOutcome::Sack { first_down } => self.inbounds(*first_down),
            PlayOutcome::Timeout { .. } => {
                ClockDecision::stop(StopReason::Timeout, Some(RestartTrigger::OnSnap))
                    .with_short_play_clock()
            }
            PlayOutcome::Injury => {
                ClockDecision::stop(StopReason::Injury, Some(RestartTrigger::OnReady))
                    .with_short_play_clock()
            }
            PlayOutcome::Penalty(info) => {
                self.cache_penalty(info, penalty);
                ClockDecision::stop(StopReason::Penalty, Some(RestartTrigger::OnReady))
            }
            PlayOutcome::Punt
            | PlayOutcome::Kickoff
            | PlayOutcome::FumbleInbounds
            | PlayOutcome::Interception => {
                ClockDecision::stop(StopReason::ChangeOfPossession, Some(RestartTrigger::OnSnap))
            }
            PlayOutcome::QuarterEnd => ClockDecision::stop(StopReason::QuarterEnd, None),
            // Caught by the scoring rule above; kept so the table stays exhaustive.
            PlayOutcome::Touchdown | PlayOutcome::FieldGoalAttempt | PlayOutcome::Safety => {
                ClockDecision::stop(StopReason::Score, None)
            }
        }
    }

    const fn out_of_bounds(&self) -> ClockDecision {
        let restart = if self.situation.inside_two_minutes() {
            RestartTrigger::OnSnap
        } else {
            RestartTrigger::OnReady
        };
        ClockDecision::stop(StopReason::OutOfBounds, Some(restart))
    }

    const fn inbounds(&self, first_down: bool) -> ClockDecision {
        if first_down && self.situation.inside_two_minutes() {
            ClockDecision::stop(StopReason::FirstDown, Some(RestartTrigger::OnReady))
        } else {
            ClockDecision::keep_running()
        }
    }

    fn cache_penalty(&mut self, info: &PenaltyInfo, details: Option<&PenaltyDetails>) {
        let cached = details.cloned().unwrap_or_else(|| {
            PenaltyDetails::new(
                "penalty",
                *info,
                info.committed_by != self.situation.possession,
                false,
            )
        });
        self.situation.last_penalty = Some(cached);
    }

    // -----------------------------------------------------------------------
    // Penalties
    // -----------------------------------------------------------------------

    /// Decide how the clock reacts to an enforced penalty.
    ///
    /// A ten-second runoff only takes effect inside the final minute of the
    /// 2nd or 4th quarter; if it drains the clock the period ends.
    pub fn process_penalty(&mut self, info: &PenaltyInfo) -> ClockDecision {
        self.cache_penalty(info, None);
        match info.impact {
            PenaltyImpact::NoImpact => ClockDecision::no_change(),
            PenaltyImpact::StopClock => {
                ClockDecision::stop(StopReason::Penalty, Some(RestartTrigger::OnReady))
            }
            PenaltyImpact::ResetPlayClock => ClockDecision::keep_running(),
            PenaltyImpact::TenSecondRunoff => self.ten_second_runoff(),
        }
    }

    fn ten_second_runoff(&mut self) -> ClockDecision {
        let before = self.situation.time_remaining;
        if before > RUNOFF_WINDOW_SECONDS || !self.situation.quarter.ends_half() {
            debug!(
                quarter = %self.situation.quarter,
                time_remaining = before,
                "ten-second runoff not applicable"
            );
            return ClockDecision::stop(StopReason::Penalty, Some(RestartTrigger::OnReady));
        }

        self.situation.time_remaining = before.saturating_sub(RUNOFF_SECONDS);
        info!(
            quarter = %self.situation.quarter,
            before,
            after = self.situation.time_remaining,
            "ten-second runoff"
        );

        if self.situation.time_remaining == 0 {
            ClockDecision::stop(StopReason::QuarterEnd, None)
        } else {
            ClockDecision::stop(StopReason::Penalty, Some(RestartTrigger::OnReady))
        }
    }

    // -----------------------------------------------------------------------
    // Timeouts
    // -----------------------------------------------------------------------

    /// Whether `team` has a timeout left.
    pub const fn can_call_timeout(&self, team: Team) -> bool {
        self.situation.timeouts(team) > 0
    }

    /// Charge `team` a timeout. Returns the timeouts left afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::NoTimeoutsRemaining`] if the team has none left.
    pub fn use_timeout(&mut self, team: Team) -> Result<u8, RulesError> {
        let remaining = self.situation.timeouts_mut(team);
        let left = remaining
            .checked_sub(1)
            .ok_or(RulesError::NoTimeoutsRemaining { team })?;
        *remaining = left;
        info!(%team, remaining = left, "timeout charged");
        Ok(left)
    }

    // -----------------------------------------------------------------------
    // Periods
    // -----------------------------------------------------------------------

    /// Move to the next period and reset period-scoped state.
    ///
    /// Entering the 3rd quarter restores three timeouts per team. Entering
    /// overtime sets the overtime flag; playoff overtime periods also give
    /// each team two timeouts.
    pub fn advance_quarter(&mut self) {
        let next = self.situation.quarter.next();
        let s = &mut self.situation;
        s.quarter = next;
        s.two_minute_drill = false;
        s.untimed_down_available = false;

        match next {
            Quarter::Q3 => {
                s.home_timeouts = REGULATION_TIMEOUTS;
                s.away_timeouts = REGULATION_TIMEOUTS;
                s.time_remaining = self.config.quarter_length;
            }
            Quarter::Overtime => {
                s.is_overtime = true;
                s.overtime_period = s.overtime_period.saturating_add(1);
                if self.config.playoff_rules {
                    s.home_timeouts = PLAYOFF_OVERTIME_TIMEOUTS;
                    s.away_timeouts = PLAYOFF_OVERTIME_TIMEOUTS;
                }
                s.time_remaining = self.config.active_overtime_length();
            }
            Quarter::Q1 | Quarter::Q2 | Quarter::Q4 => {
                s.time_remaining = self.config.quarter_length;
            }
        }

        info!(
            quarter = %s.quarter,
            overtime_period = s.overtime_period,
            time_remaining = s.time_remaining,
            "rules advanced to next period"
        );
    }

    /// Whether the game is over on time.
    ///
    /// Playoff overtime never ends on time alone. Regular-season overtime
    /// ends when its clock runs out (ties allowed). Regulation ends after
    /// the 4th quarter unless playoff rules force overtime.
    pub const fn is_game_over(&self) -> bool {
        let s = &self.situation;
        match s.quarter {
            Quarter::Overtime => !s.playoff_rules && s.time_remaining == 0,
            Quarter::Q4 => !s.playoff_rules && s.time_remaining == 0,
            Quarter::Q1 | Quarter::Q2 | Quarter::Q3 => false,
        }
    }

    /// Whether a half just ended (2nd or 4th quarter with no time left).
    pub const fn is_half_over(&self) -> bool {
        self.situation.at_end_of_half()
    }

    // -----------------------------------------------------------------------
    // Down and distance
    // -----------------------------------------------------------------------

    /// Apply a play's yardage to down and distance.
    pub fn update_down_and_distance(&mut self, yards: i32) -> DownResult {
        let s = &mut self.situation;
        let distance = i32::from(s.distance);

        if yards >= distance {
            s.down = 1;
            s.distance = FIRST_DOWN_DISTANCE;
            return DownResult::FirstDown;
        }

        if s.down >= 4 {
            s.possession = s.possession.opponent();
            s.down = 1;
            s.distance = FIRST_DOWN_DISTANCE;
            info!(possession = %s.possession, "turnover on downs");
            return DownResult::TurnoverOnDowns;
        }

        s.down = s.down.saturating_add(1);
        let to_go = distance.saturating_sub(yards).clamp(0, MAX_DISTANCE);
        s.distance = u8::try_from(to_go).unwrap_or(FIRST_DOWN_DISTANCE);
        DownResult::NextDown
    }

    /// Give `team` the ball with a fresh set of downs.
    pub const fn new_possession(&mut self, team: Team) {
        self.situation.possession = team;
        self.situation.down = 1;
        self.situation.distance = FIRST_DOWN_DISTANCE;
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Engine positioned at `quarter` with `time_remaining` seconds left.
    fn engine_at(quarter: Quarter, time_remaining: u32) -> RulesEngine {
        let mut engine = RulesEngine::default();
        engine.sync_clock(quarter, time_remaining, false);
        engine
    }

    fn defensive_holding() -> PenaltyDetails {
        PenaltyDetails::new(
            "defensive holding",
            PenaltyInfo::new(5, PenaltyImpact::StopClock, Team::Away),
            true,
            true,
        )
    }

    #[test]
    fn incomplete_pass_stops_and_restarts_on_snap() {
        let mut engine = engine_at(Quarter::Q1, 600);
        let d = engine.process_play(&PlayOutcome::IncompletePass);
        assert!(d.should_stop);
        assert_eq!(d.stop_reason, Some(StopReason::IncompletePass));
        assert!(d.restart_on_snap);
        assert!(!d.restart_on_ready);
    }

    #[test]
    fn inbounds_run_keeps_clock_running() {
        let mut engine = engine_at(Quarter::Q3, 400);
        let d = engine.process_play(&PlayOutcome::RunInbounds { first_down: true });
        assert!(!d.should_stop);
        assert_eq!(d.stop_reason, None);
        assert!(d.play_clock_reset);
    }

    #[test]
    fn first_down_inside_two_minutes_stops() {
        let mut engine = engine_at(Quarter::Q4, 90);
        engine.sync_clock(Quarter::Q4, 90, true);
        let d = engine.process_play(&PlayOutcome::PassInbounds { first_down: true });
        assert!(d.should_stop);
        assert_eq!(d.stop_reason, Some(StopReason::FirstDown));
        assert!(d.restart_on_ready);

        let d = engine.process_play(&PlayOutcome::PassInbounds { first_down: false });
        assert!(!d.should_stop);
    }

    #[test]
    fn sack_is_treated_as_a_run() {
        let mut engine = engine_at(Quarter::Q1, 500);
        let d = engine.process_play(&PlayOutcome::Sack { first_down: false });
        assert!(!d.should_stop);
    }

    #[test]
    fn out_of_bounds_restart_depends_on_two_minutes() {
        let mut engine = engine_at(Quarter::Q2, 500);
        let d = engine.process_play(&PlayOutcome::RunOutOfBounds);
        assert_eq!(d.stop_reason, Some(StopReason::OutOfBounds));
        assert!(d.restart_on_ready);

        engine.sync_clock(Quarter::Q2, 100, true);
        let d = engine.process_play(&PlayOutcome::PassOutOfBounds);
        assert!(d.restart_on_snap);
        assert!(!d.restart_on_ready);

        let d = engine.process_play(&PlayOutcome::FumbleOutOfBounds);
        assert_eq!(d.stop_reason, Some(StopReason::OutOfBounds));
    }

    #[test]
    fn timeout_and_injury_use_short_play_clock() {
        let mut engine = engine_at(Quarter::Q1, 700);
        let d = engine.process_play(&PlayOutcome::Timeout { team: Team::Home });
        assert_eq!(d.stop_reason, Some(StopReason::Timeout));
        assert!(d.restart_on_snap);
        assert_eq!(d.play_clock_duration, gridiron_types::PlayClockDuration::Short);

        let d = engine.process_play(&PlayOutcome::Injury);
        assert_eq!(d.stop_reason, Some(StopReason::Injury));
        assert!(d.restart_on_ready);
        assert_eq!(d.play_clock_duration, gridiron_types::PlayClockDuration::Short);
    }

    #[test]
    fn possession_changes_restart_on_snap() {
        let mut engine = engine_at(Quarter::Q3, 300);
        for outcome in [
            PlayOutcome::Punt,
            PlayOutcome::Kickoff,
            PlayOutcome::Interception,
            PlayOutcome::FumbleInbounds,
        ] {
            let d = engine.process_play(&outcome);
            assert_eq!(d.stop_reason, Some(StopReason::ChangeOfPossession));
            assert!(d.restart_on_snap);
        }
    }

    #[test]
    fn penalty_outcome_caches_details() {
        let mut engine = engine_at(Quarter::Q1, 800);
        let info = PenaltyInfo::new(10, PenaltyImpact::StopClock, Team::Home);
        let d = engine.process_play(&PlayOutcome::Penalty(info));
        assert_eq!(d.stop_reason, Some(StopReason::Penalty));
        assert!(d.restart_on_ready);
        let cached = engine.situation().last_penalty.clone().unwrap();
        assert_eq!(cached.info, info);
        // Home has the ball, so a home foul is offensive.
        assert!(!cached.defensive);
    }

    #[test]
    fn scores_beat_everything_but_untimed_downs() {
        let mut engine = engine_at(Quarter::Q4, 0);
        let d = engine.process_play(&PlayOutcome::Touchdown);
        assert_eq!(d.stop_reason, Some(StopReason::Score));
        assert!(!d.restart_on_ready && !d.restart_on_snap);

        let mut engine = engine_at(Quarter::Q2, 100);
        let d = engine.process_play(&PlayOutcome::FieldGoalAttempt);
        assert_eq!(d.stop_reason, Some(StopReason::Score));
        assert!(!engine.situation().two_minute_drill);
    }

    #[test]
    fn expired_time_ends_the_period() {
        let mut engine = engine_at(Quarter::Q1, 0);
        let d = engine.process_play(&PlayOutcome::RunInbounds { first_down: false });
        assert_eq!(d.stop_reason, Some(StopReason::QuarterEnd));
        assert!(!d.restart_on_ready && !d.restart_on_snap);
    }

    #[test]
    fn untimed_down_granted_then_consumed() {
        let mut engine = engine_at(Quarter::Q2, 0);
        let foul = defensive_holding();
        let d = engine.process_play_extended(&PlayOutcome::IncompletePass, Some(&foul));
        assert_eq!(d.stop_reason, Some(StopReason::Penalty));
        assert!(d.restart_on_snap);
        assert!(engine.situation().untimed_down_available);
        assert_eq!(engine.situation().last_penalty, Some(foul));

        let d = engine.process_play(&PlayOutcome::RunInbounds { first_down: false });
        assert_eq!(d.stop_reason, Some(StopReason::QuarterEnd));
        assert!(!engine.situation().untimed_down_available);
    }

    #[test]
    fn untimed_down_not_granted_outside_end_of_half() {
        let mut engine = engine_at(Quarter::Q3, 0);
        let d = engine.process_play_extended(&PlayOutcome::IncompletePass, Some(&defensive_holding()));
        assert_eq!(d.stop_reason, Some(StopReason::QuarterEnd));
        assert!(!engine.situation().untimed_down_available);
    }

    #[test]
    fn untimed_down_requires_defensive_automatic_first_down() {
        let mut engine = engine_at(Quarter::Q4, 0);
        let offside = PenaltyDetails::new(
            "offside",
            PenaltyInfo::new(5, PenaltyImpact::StopClock, Team::Away),
            true,
            false,
        );
        let d = engine.process_play_extended(&PlayOutcome::IncompletePass, Some(&offside));
        assert_eq!(d.stop_reason, Some(StopReason::QuarterEnd));
    }

    #[test]
    fn two_minute_warning_fires_once_per_half() {
        let mut engine = engine_at(Quarter::Q2, 130);
        assert!(!engine.two_minute_warning_due());

        engine.sync_clock(Quarter::Q2, 118, false);
        let d = engine.process_play(&PlayOutcome::RunInbounds { first_down: false });
        assert_eq!(d.stop_reason, Some(StopReason::TwoMinuteWarning));
        assert!(!d.restart_on_ready);
        assert!(engine.situation().two_minute_drill);

        let d = engine.process_play(&PlayOutcome::RunInbounds { first_down: false });
        assert!(!d.should_stop);
    }

    #[test]
    fn two_minute_warning_never_in_first_third_or_overtime() {
        for quarter in [Quarter::Q1, Quarter::Q3, Quarter::Overtime] {
            let mut engine = engine_at(quarter, 100);
            let d = engine.process_play(&PlayOutcome::RunInbounds { first_down: false });
            assert_ne!(d.stop_reason, Some(StopReason::TwoMinuteWarning));
        }
    }

    #[test]
    fn two_minute_warning_can_be_disabled() {
        let mut engine = RulesEngine::new(RulesConfig {
            two_minute_warning: false,
            ..RulesConfig::default()
        });
        engine.sync_clock(Quarter::Q4, 100, false);
        assert!(!engine.two_minute_warning_due());
    }

    #[test]
    fn ten_second_runoff_in_final_minute() {
        let mut engine = engine_at(Quarter::Q4, 45);
        let info = PenaltyInfo::new(5, PenaltyImpact::TenSecondRunoff, Team::Home);
        let d = engine.process_penalty(&info);
        assert_eq!(engine.situation().time_remaining, 35);
        assert_eq!(d.stop_reason, Some(StopReason::Penalty));

        let mut engine = engine_at(Quarter::Q4, 5);
        let d = engine.process_penalty(&info);
        assert_eq!(engine.situation().time_remaining, 0);
        assert_eq!(d.stop_reason, Some(StopReason::QuarterEnd));
    }

    #[test]
    fn ten_second_runoff_ignored_outside_window() {
        let info = PenaltyInfo::new(5, PenaltyImpact::TenSecondRunoff, Team::Home);

        let mut engine = engine_at(Quarter::Q4, 61);
        engine.process_penalty(&info);
        assert_eq!(engine.situation().time_remaining, 61);

        let mut engine = engine_at(Quarter::Q3, 30);
        engine.process_penalty(&info);
        assert_eq!(engine.situation().time_remaining, 30);
    }

    #[test]
    fn penalty_impacts() {
        let mut engine = engine_at(Quarter::Q1, 500);

        let d = engine.process_penalty(&PenaltyInfo::new(5, PenaltyImpact::NoImpact, Team::Home));
        assert!(!d.should_stop);
        assert!(!d.play_clock_reset);

        let d = engine.process_penalty(&PenaltyInfo::new(5, PenaltyImpact::StopClock, Team::Home));
        assert!(d.should_stop);
        assert!(d.restart_on_ready);

        let d =
            engine.process_penalty(&PenaltyInfo::new(5, PenaltyImpact::ResetPlayClock, Team::Away));
        assert!(!d.should_stop);
        assert!(d.play_clock_reset);
    }

    #[test]
    fn timeouts_run_out() {
        let mut engine = RulesEngine::default();
        assert_eq!(engine.use_timeout(Team::Away).unwrap(), 2);
        assert_eq!(engine.use_timeout(Team::Away).unwrap(), 1);
        assert_eq!(engine.use_timeout(Team::Away).unwrap(), 0);
        assert!(!engine.can_call_timeout(Team::Away));
        assert_eq!(
            engine.use_timeout(Team::Away),
            Err(RulesError::NoTimeoutsRemaining { team: Team::Away })
        );
        assert!(engine.can_call_timeout(Team::Home));
    }

    #[test]
    fn second_half_restores_timeouts() {
        let mut engine = RulesEngine::default();
        engine.use_timeout(Team::Home).unwrap();
        engine.advance_quarter();
        assert_eq!(engine.situation().quarter, Quarter::Q2);
        assert_eq!(engine.situation().home_timeouts, 2);
        engine.advance_quarter();
        assert_eq!(engine.situation().quarter, Quarter::Q3);
        assert_eq!(engine.situation().home_timeouts, 3);
        assert_eq!(engine.situation().time_remaining, 900);
    }

    #[test]
    fn regular_season_overtime_is_sudden_death() {
        let mut engine = RulesEngine::default();
        for _ in 0..4 {
            engine.advance_quarter();
        }
        let s = engine.situation();
        assert_eq!(s.quarter, Quarter::Overtime);
        assert!(s.is_overtime);
        assert_eq!(s.time_remaining, 600);
        assert_eq!(s.overtime_period, 1);

        engine.sync_clock(Quarter::Overtime, 0, false);
        assert!(engine.is_game_over());
    }

    #[test]
    fn playoff_overtime_never_ends_on_time() {
        let mut engine = RulesEngine::new(RulesConfig {
            playoff_rules: true,
            ..RulesConfig::default()
        });
        engine.sync_clock(Quarter::Q4, 0, true);
        assert!(!engine.is_game_over());

        engine.advance_quarter();
        let s = engine.situation();
        assert_eq!(s.time_remaining, 900);
        assert_eq!((s.home_timeouts, s.away_timeouts), (2, 2));

        engine.sync_clock(Quarter::Overtime, 0, false);
        assert!(!engine.is_game_over());
        engine.advance_quarter();
        assert_eq!(engine.situation().overtime_period, 2);
    }

    #[test]
    fn regulation_ends_after_fourth() {
        let mut engine = engine_at(Quarter::Q4, 0);
        assert!(engine.is_game_over());
        assert!(engine.is_half_over());
        engine.sync_clock(Quarter::Q3, 0, false);
        assert!(!engine.is_game_over());
        assert!(!engine.is_half_over());
    }

    #[test]
    fn down_and_distance_progression() {
        let mut engine = RulesEngine::default();
        assert_eq!(engine.update_down_and_distance(4), DownResult::NextDown);
        assert_eq!((engine.situation().down, engine.situation().distance), (2, 6));
        assert_eq!(engine.update_down_and_distance(-3), DownResult::NextDown);
        assert_eq!((engine.situation().down, engine.situation().distance), (3, 9));
        assert_eq!(engine.update_down_and_distance(9), DownResult::FirstDown);
        assert_eq!((engine.situation().down, engine.situation().distance), (1, 10));
    }

    #[test]
    fn fourth_down_failure_flips_possession() {
        let mut engine = RulesEngine::default();
        for _ in 0..3 {
            engine.update_down_and_distance(1);
        }
        assert_eq!(engine.situation().down, 4);
        assert_eq!(engine.update_down_and_distance(2), DownResult::TurnoverOnDowns);
        let s = engine.situation();
        assert_eq!(s.possession, Team::Away);
        assert_eq!((s.down, s.distance), (1, 10));
    }

    #[test]
    fn new_possession_resets_downs() {
        let mut engine = RulesEngine::default();
        engine.update_down_and_distance(3);
        engine.new_possession(Team::Away);
        let s = engine.situation();
        assert_eq!(s.possession, Team::Away);
        assert_eq!((s.down, s.distance), (1, 10));
    }

    #[test]
    fn consume_time_saturates() {
        let mut engine = engine_at(Quarter::Q1, 10);
        assert_eq!(engine.consume_time(6), 6);
        assert_eq!(engine.consume_time(6), 4);
        assert_eq!(engine.situation().time_remaining, 0);
    }

    #[test]
    fn identical_inputs_give_identical_decisions() {
        let outcomes = [
            PlayOutcome::RunInbounds { first_down: false },
            PlayOutcome::IncompletePass,
            PlayOutcome::PassOutOfBounds,
            PlayOutcome::Punt,
        ];
        let mut a = engine_at(Quarter::Q2, 200);
        let mut b = engine_at(Quarter::Q2, 200);
        for outcome in &outcomes {
            assert_eq!(a.process_play(outcome), b.process_play(outcome));
        }
        assert_eq!(a, b);
    }
}
