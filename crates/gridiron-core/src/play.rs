//! Running plays through the clock.
//!
//! A play is a snap, a result from the [`PlayOutcomeProvider`], a
//! classification of that result into a [`PlayOutcome`], a
//! [`ClockDecision`] from the rules engine, and finally the time the play
//! took coming off both clocks. Period ends are left to the next tick.
//!
//! [`PlayOutcomeProvider`]: crate::provider::PlayOutcomeProvider

use gridiron_rules::DownResult;
use gridiron_types::{
    ClockDecision, GameState, PenaltyDetails, PlayCall, PlayClockDuration, PlayClockState,
    PlayContext, PlayOutcome, PlayResult, PlayType, RestartTrigger, SpecialOutcome, StopReason,
    Team,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::GameClock;
use crate::error::ClockError;

/// Everything that happened on one play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySummary {
    /// The call that was run.
    pub call: PlayCall,
    /// What the provider said happened.
    pub result: PlayResult,
    /// Clock-relevant category of the result.
    pub outcome: PlayOutcome,
    /// How the clock reacted.
    pub decision: ClockDecision,
    /// Game seconds the play took off the clock.
    pub time_consumed: u32,
}

/// Map a raw play result onto the category the rules engine evaluates.
pub fn classify(result: &PlayResult) -> PlayOutcome {
    if result.special == Some(SpecialOutcome::Safety) {
        return PlayOutcome::Safety;
    }
    if result.touchdown {
        return PlayOutcome::Touchdown;
    }
    let first_down = result.first_down;
    match result.play_type {
        PlayType::FieldGoal => PlayOutcome::FieldGoalAttempt,
        PlayType::Punt => PlayOutcome::Punt,
        PlayType::Kickoff => PlayOutcome::Kickoff,
        PlayType::Pass | PlayType::Spike => match result.special {
            Some(SpecialOutcome::Interception) => PlayOutcome::Interception,
            Some(SpecialOutcome::Sack) => PlayOutcome::Sack { first_down },
            Some(SpecialOutcome::Fumble) => classify_fumble(result),
            _ if !result.pass_completed => PlayOutcome::IncompletePass,
            _ if result.out_of_bounds => PlayOutcome::PassOutOfBounds,
            _ => PlayOutcome::PassInbounds { first_down },
        },
        PlayType::Run | PlayType::Kneel => match result.special {
            Some(SpecialOutcome::Fumble) => classify_fumble(result),
            _ if result.turnover => PlayOutcome::FumbleInbounds,
            _ if result.out_of_bounds => PlayOutcome::RunOutOfBounds,
            _ => PlayOutcome::RunInbounds { first_down },
        },
    }
}

const fn classify_fumble(result: &PlayResult) -> PlayOutcome {
    if result.turnover {
        PlayOutcome::FumbleInbounds
    } else if result.out_of_bounds {
        PlayOutcome::FumbleOutOfBounds
    } else {
        PlayOutcome::RunInbounds {
            first_down: result.first_down,
        }
    }
}

/// Scale `seconds` by `pct` percent. A play that took any time takes at
/// least one second.
fn scale_time(seconds: u32, pct: u32) -> u32 {
    if seconds == 0 {
        return 0;
    }
    seconds
        .saturating_mul(pct)
        .checked_div(100)
        .unwrap_or(seconds)
        .max(1)
}

impl GameClock {
    /// Run `call` and apply the result to the clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::GameNotStarted`] before kickoff,
    /// [`ClockError::GameAlreadyEnded`] after the game, or
    /// [`ClockError::Provider`] if no result could be produced.
    pub fn process_play(&mut self, call: PlayCall) -> Result<PlaySummary, ClockError> {
        self.run_play(call, None)
    }

    /// Run `call` with hurry-up, weather, and flagged penalties taken into
    /// account.
    ///
    /// Penalties are enforced before the play itself. The first one is
    /// also shown to the rules engine with the play, so a defensive
    /// automatic-first-down foul at the end of a half grants an untimed
    /// down.
    ///
    /// # Errors
    ///
    /// Same as [`GameClock::process_play`].
    pub fn process_play_with_context(
        &mut self,
        call: PlayCall,
        context: &PlayContext,
    ) -> Result<PlaySummary, ClockError> {
        self.run_play(call, Some(context))
    }

    fn run_play(
        &mut self,
        call: PlayCall,
        context: Option<&PlayContext>,
    ) -> Result<PlaySummary, ClockError> {
        self.ensure_playable()?;
        self.snap();
        self.sync_rules();

        let result = self.provider.generate(call, self.rules.situation())?;
        let time_consumed = context.map_or(result.time_consumed, |ctx| {
            scale_time(result.time_consumed, ctx.time_factor_pct())
        });

        let penalties = context.map_or(&[][..], |ctx| ctx.penalties.as_slice());
        for penalty in penalties {
            let decision = self.rules.process_penalty(&penalty.info);
            self.mirror_rules_time();
            self.apply_decision(decision);
            info!(
                foul = penalty.name,
                yards = penalty.info.yards,
                committed_by = %penalty.info.committed_by,
                time_remaining = self.time_remaining,
                "penalty enforced"
            );
        }

        let outcome = classify(&result);
        let decision = self
            .rules
            .process_play_extended(&outcome, penalties.first());
        self.apply_decision(decision);

        let taken = self.run_off(time_consumed);
        self.rules.consume_time(taken);
        self.update_possession(&outcome, result.yards_gained);
        self.plays_run = self.plays_run.saturating_add(1);

        self.sync_rules();
        self.trigger_two_minute_warning();

        debug!(
            play = self.plays_run,
            ?call,
            ?outcome,
            yards = result.yards_gained,
            time_consumed = taken,
            time_remaining = self.time_remaining,
            running = self.is_running,
            "play processed"
        );

        Ok(PlaySummary {
            call,
            result,
            outcome,
            decision,
            time_consumed: taken,
        })
    }

    /// Charge `team` a timeout and stop the clock. Returns the team's
    /// timeouts left.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Rules`] if the team has none left, or the
    /// usual not-started/ended errors.
    pub fn call_timeout(&mut self, team: Team) -> Result<u8, ClockError> {
        self.ensure_playable()?;
        self.sync_rules();
        let left = self.rules.use_timeout(team)?;
        let decision = self.rules.process_play(&PlayOutcome::Timeout { team });
        self.apply_decision(decision);
        Ok(left)
    }

    /// Stop the clock for an injury.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::GameNotStarted`] or
    /// [`ClockError::GameAlreadyEnded`].
    pub fn report_injury(&mut self) -> Result<ClockDecision, ClockError> {
        self.ensure_playable()?;
        self.sync_rules();
        let decision = self.rules.process_play(&PlayOutcome::Injury);
        self.apply_decision(decision);
        Ok(decision)
    }

    /// Enforce a penalty outside of a play, including ten-second runoffs.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::GameNotStarted`] or
    /// [`ClockError::GameAlreadyEnded`].
    pub fn apply_penalty(&mut self, penalty: &PenaltyDetails) -> Result<ClockDecision, ClockError> {
        self.ensure_playable()?;
        self.sync_rules();
        let decision = self.rules.process_penalty(&penalty.info);
        self.mirror_rules_time();
        self.apply_decision(decision);
        info!(
            foul = penalty.name,
            impact = ?penalty.info.impact,
            time_remaining = self.time_remaining,
            "penalty enforced"
        );
        Ok(decision)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    const fn ensure_playable(&self) -> Result<(), ClockError> {
        match self.game_state {
            GameState::PreGame => Err(ClockError::GameNotStarted),
            GameState::EndGame => Err(ClockError::GameAlreadyEnded),
            GameState::InProgress | GameState::Halftime => Ok(()),
        }
    }

    /// The ball is snapped: halftime is over, any pending restart fires,
    /// and the play clock stops. A snap implies the ready signal.
    fn snap(&mut self) {
        if self.game_state == GameState::Halftime {
            self.game_state = GameState::InProgress;
            info!(quarter = %self.quarter, "second half under way");
        }
        if let Some(trigger) = self.pending_restart {
            self.restart_if_live(trigger);
        }
        self.play_clock_state = PlayClockState::Inactive;
    }

    /// Apply a rules decision to the run state and the play clock.
    pub(crate) fn apply_decision(&mut self, decision: ClockDecision) {
        if decision.should_stop {
            if decision.stop_reason == Some(StopReason::TwoMinuteWarning) {
                self.trigger_two_minute_warning();
            } else {
                self.halt();
                self.last_stop_reason = decision.stop_reason;
                self.pending_restart = decision.restart_trigger();
            }
        }

        if decision.play_clock_reset {
            self.play_clock_duration = decision.play_clock_duration;
            self.reset_play_clock();
            if !decision.should_stop && self.is_running {
                self.play_clock_state = PlayClockState::for_running_clock(self.play_clock);
            }
        }

        if decision.play_clock_duration == PlayClockDuration::Short {
            debug!(
                reason = decision.stop_reason.map(StopReason::as_str),
                "short play clock"
            );
        }
    }

    /// Copy a runoff from the rules engine onto the game clock.
    fn mirror_rules_time(&mut self) {
        let ruled = self.rules.situation().time_remaining;
        if ruled < self.time_remaining {
            let runoff = self.time_remaining.saturating_sub(ruled);
            self.run_off(runoff);
        }
    }

    fn update_possession(&mut self, outcome: &PlayOutcome, yards: i32) {
        let offense = self.rules.situation().possession;
        match outcome {
            PlayOutcome::Punt
            | PlayOutcome::Kickoff
            | PlayOutcome::FumbleInbounds
            | PlayOutcome::Interception => {
                self.rules.new_possession(offense.opponent());
            }
            // The scoring side kicks off next; possession flips on the kick.
            PlayOutcome::Touchdown
            | PlayOutcome::FieldGoalAttempt
            | PlayOutcome::Safety
            | PlayOutcome::Timeout { .. }
            | PlayOutcome::Injury
            | PlayOutcome::Penalty(_)
            | PlayOutcome::QuarterEnd => {}
            PlayOutcome::IncompletePass
            | PlayOutcome::PassInbounds { .. }
            | PlayOutcome::PassOutOfBounds
            | PlayOutcome::RunInbounds { .. }
            | PlayOutcome::RunOutOfBounds
            | PlayOutcome::Sack { .. }
            | PlayOutcome::FumbleOutOfBounds => {
                if self.rules.update_down_and_distance(yards) == DownResult::TurnoverOnDowns {
                    info!(team = %offense, "turnover on downs");
                }
            }
        }
    }
}
