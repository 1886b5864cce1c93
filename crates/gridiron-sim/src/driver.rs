//! Play calling and the game loop.
//!
//! [`choose_play`] is a pure policy over the rules engine's situation.
//! [`run_game`] drives a [`SharedGameClock`] from kickoff to the final
//! whistle: it restarts the clock the way an official would, runs the
//! huddle between snaps as clock ticks, and rolls periods over when time
//! runs out.

use gridiron_core::{ClockError, ClockSnapshot, SharedGameClock};
use gridiron_rules::GameSituation;
use gridiron_types::{
    GameState, PenaltyDetails, PenaltyImpact, PenaltyInfo, PlayCall, PlayContext, Quarter, Team,
    Weather,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::SimError;

// -----------------------------------------------------------------------
// Settings
// -----------------------------------------------------------------------

/// Simulator settings, read from the `simulation` section of
/// `gridiron-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimSettings {
    /// Give up after this many snaps.
    #[serde(default = "default_max_plays")]
    pub max_plays: u32,

    /// Game seconds between plays in a normal huddle.
    #[serde(default = "default_huddle_seconds")]
    pub huddle_seconds: u32,

    /// Game seconds between plays in the hurry-up.
    #[serde(default = "default_hurry_up_huddle_seconds")]
    pub hurry_up_huddle_seconds: u32,

    /// Weather for the whole game.
    #[serde(default)]
    pub weather: Weather,

    /// Flag a penalty every this many plays; 0 disables.
    #[serde(default = "default_penalty_interval")]
    pub penalty_interval: u32,

    /// Stop for an injury every this many plays; 0 disables.
    #[serde(default = "default_injury_interval")]
    pub injury_interval: u32,

    /// Play overtime when regulation ends.
    #[serde(default = "default_true")]
    pub overtime: bool,

    /// Most overtime periods to play.
    #[serde(default = "default_max_overtime_periods")]
    pub max_overtime_periods: u8,

    /// The defense spends its timeouts inside two minutes.
    #[serde(default = "default_true")]
    pub late_timeouts: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            max_plays: default_max_plays(),
            huddle_seconds: default_huddle_seconds(),
            hurry_up_huddle_seconds: default_hurry_up_huddle_seconds(),
            weather: Weather::default(),
            penalty_interval: default_penalty_interval(),
            injury_interval: default_injury_interval(),
            overtime: true,
            max_overtime_periods: default_max_overtime_periods(),
            late_timeouts: true,
        }
    }
}

const fn default_max_plays() -> u32 {
    400
}

const fn default_huddle_seconds() -> u32 {
    25
}

const fn default_hurry_up_huddle_seconds() -> u32 {
    8
}

const fn default_penalty_interval() -> u32 {
    13
}

const fn default_injury_interval() -> u32 {
    47
}

const fn default_max_overtime_periods() -> u8 {
    1
}

const fn default_true() -> bool {
    true
}

// -----------------------------------------------------------------------
// Report
// -----------------------------------------------------------------------

/// Totals for a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    /// Snaps run, kickoffs included.
    pub plays: u32,
    /// Timeouts charged.
    pub timeouts: u32,
    /// Penalties enforced.
    pub penalties: u32,
    /// Injury stoppages.
    pub injuries: u32,
    /// Overtime periods started.
    pub overtime_periods: u8,
    /// Clock state at the final whistle.
    pub final_state: ClockSnapshot,
}

// -----------------------------------------------------------------------
// Policy
// -----------------------------------------------------------------------

/// Seconds left at which the offense spikes to stop a running clock.
const SPIKE_WINDOW: u32 = 30;

/// Seconds left at which a field goal is the only sensible call.
const LAST_KICK_WINDOW: u32 = 5;

/// Pick the offense's next call.
pub const fn choose_play(
    situation: &GameSituation,
    clock_running: bool,
    kickoff_due: bool,
) -> PlayCall {
    if kickoff_due {
        return PlayCall::Kickoff;
    }
    let late = situation.inside_two_minutes();
    let time = situation.time_remaining;

    if late && time <= LAST_KICK_WINDOW {
        return PlayCall::FieldGoal;
    }
    if situation.down >= 4 {
        return if late {
            PlayCall::FieldGoal
        } else if situation.distance <= 1 {
            PlayCall::Run
        } else {
            PlayCall::Punt
        };
    }
    if late && clock_running && time <= SPIKE_WINDOW {
        return match situation.quarter {
            Quarter::Q2 => PlayCall::Kneel,
            _ => PlayCall::Spike,
        };
    }
    if late {
        return match situation.down {
            1 | 3 => PlayCall::ShortPass,
            _ => PlayCall::DeepPass,
        };
    }
    match (situation.down, situation.distance) {
        (1, _) | (_, 0..=3) => PlayCall::Run,
        (2, _) => PlayCall::ShortPass,
        (_, 4..=6) => PlayCall::Screen,
        _ => PlayCall::DeepPass,
    }
}

/// The team that burns a timeout now, if any.
pub const fn timeout_caller(situation: &GameSituation, clock_running: bool) -> Option<Team> {
    let defense = situation.possession.opponent();
    if clock_running && situation.inside_two_minutes() && situation.timeouts(defense) > 0 {
        Some(defense)
    } else {
        None
    }
}

/// The foul flagged on play number `play`, alternating offense and defense.
fn flagged_penalty(play: u32, offense: Team) -> PenaltyDetails {
    if play.checked_rem(2) == Some(0) {
        PenaltyDetails::new(
            "defensive holding",
            PenaltyInfo::new(5, PenaltyImpact::ResetPlayClock, offense.opponent()),
            true,
            true,
        )
    } else {
        PenaltyDetails::new(
            "offensive holding",
            PenaltyInfo::new(10, PenaltyImpact::StopClock, offense),
            false,
            false,
        )
    }
}

/// Whether play number `play` lands on a nonzero `interval`.
fn every(play: u32, interval: u32) -> bool {
    play > 0 && play.checked_rem(interval) == Some(0)
}

// -----------------------------------------------------------------------
// Game loop
// -----------------------------------------------------------------------

/// One consistent read of the clock between snaps.
struct View {
    over: bool,
    running: bool,
    pending_restart: bool,
    state: GameState,
    time_remaining: u32,
    speed: u32,
    situation: GameSituation,
}

fn view(clock: &SharedGameClock) -> View {
    clock.with_clock(|c| View {
        over: c.is_game_over(),
        running: c.is_running(),
        pending_restart: c.pending_restart().is_some(),
        state: c.game_state(),
        time_remaining: c.time_remaining(),
        speed: c.clock_speed().multiplier(),
        situation: c.situation().clone(),
    })
}

/// Running totals for the report.
#[derive(Debug, Default)]
struct Tally {
    plays: u32,
    timeouts: u32,
    penalties: u32,
    injuries: u32,
    overtime_periods: u8,
    kickoff_due: bool,
}

/// Play a full game on `clock`.
///
/// # Errors
///
/// Returns [`SimError::Clock`] if the clock rejects an operation, or
/// [`SimError::Stalled`] if the game does not finish within
/// [`SimSettings::max_plays`] snaps.
pub fn run_game(clock: &SharedGameClock, settings: &SimSettings) -> Result<GameReport, SimError> {
    let mut tally = Tally {
        kickoff_due: true,
        ..Tally::default()
    };

    loop {
        let now = view(clock);

        if now.over {
            if settings.overtime && tally.overtime_periods < settings.max_overtime_periods {
                match clock.start_overtime() {
                    Ok(()) => {
                        tally.overtime_periods = tally.overtime_periods.saturating_add(1);
                        tally.kickoff_due = true;
                        continue;
                    }
                    Err(ClockError::InvalidQuarter { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            break;
        }

        // Time ran out on the last snap; the next tick ends the period.
        if now.time_remaining == 0 && !now.situation.untimed_down_available {
            if !now.running {
                clock.start()?;
            }
            clock.tick();
            continue;
        }

        if tally.plays >= settings.max_plays {
            return Err(SimError::Stalled { plays: tally.plays });
        }
        if now.state == GameState::Halftime {
            tally.kickoff_due = true;
        }
        snap(clock, settings, &now, &mut tally)?;
        huddle(clock, settings, &now);
    }

    let final_state = clock.snapshot();
    info!(
        plays = tally.plays,
        timeouts = tally.timeouts,
        penalties = tally.penalties,
        injuries = tally.injuries,
        overtime_periods = tally.overtime_periods,
        total_elapsed = final_state.total_elapsed,
        "game complete"
    );
    Ok(GameReport {
        plays: tally.plays,
        timeouts: tally.timeouts,
        penalties: tally.penalties,
        injuries: tally.injuries,
        overtime_periods: tally.overtime_periods,
        final_state,
    })
}

/// Signal ready, run one play, and handle the stoppages that follow it.
fn snap(
    clock: &SharedGameClock,
    settings: &SimSettings,
    now: &View,
    tally: &mut Tally,
) -> Result<(), SimError> {
    // A clock stopped with nothing pending starts on this snap, as at the
    // start of a period or after a score.
    clock.start_play_clock();
    if !now.running && !now.pending_restart {
        clock.start()?;
    }

    let call = choose_play(&now.situation, clock.is_running(), tally.kickoff_due);
    let mut context = PlayContext {
        hurry_up: now.situation.inside_two_minutes(),
        weather: settings.weather,
        penalties: Vec::new(),
    };
    let number = tally.plays.saturating_add(1);
    if every(number, settings.penalty_interval) && call != PlayCall::Kickoff {
        context
            .penalties
            .push(flagged_penalty(number, now.situation.possession));
        tally.penalties = tally.penalties.saturating_add(1);
    }

    let summary = clock.process_play_with_context(call, &context)?;
    tally.plays = number;
    tally.kickoff_due = summary.outcome.is_scoring();
    debug!(
        play = number,
        ?call,
        outcome = ?summary.outcome,
        time_consumed = summary.time_consumed,
        "snap"
    );

    if every(number, settings.injury_interval) {
        clock.report_injury()?;
        tally.injuries = tally.injuries.saturating_add(1);
    }

    let after = view(clock);
    if settings.late_timeouts
        && let Some(team) = timeout_caller(&after.situation, after.running)
    {
        clock.call_timeout(team)?;
        tally.timeouts = tally.timeouts.saturating_add(1);
    }
    Ok(())
}

/// Let the huddle run off the clock, in ticks at the clock's speed.
fn huddle(clock: &SharedGameClock, settings: &SimSettings, before: &View) {
    let seconds = if before.situation.inside_two_minutes() {
        settings.hurry_up_huddle_seconds
    } else {
        settings.huddle_seconds
    };
    let ticks = seconds.checked_div(before.speed).unwrap_or(seconds).max(1);
    clock.advanced_tick(ticks);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridiron_core::{ClockConfig, GameClock, GameClockBuilder};
    use gridiron_rules::RulesConfig;

    use super::*;

    fn situation(quarter: Quarter, time: u32, down: u8, distance: u8) -> GameSituation {
        let mut s = GameSituation::new(&RulesConfig::default());
        s.quarter = quarter;
        s.time_remaining = time;
        s.down = down;
        s.distance = distance;
        s
    }

    #[test]
    fn kickoff_comes_first() {
        let s = situation(Quarter::Q1, 900, 1, 10);
        assert_eq!(choose_play(&s, false, true), PlayCall::Kickoff);
    }

    #[test]
    fn fourth_down_calls() {
        assert_eq!(
            choose_play(&situation(Quarter::Q1, 600, 4, 1), true, false),
            PlayCall::Run
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q1, 600, 4, 8), true, false),
            PlayCall::Punt
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q4, 90, 4, 8), true, false),
            PlayCall::FieldGoal
        );
    }

    #[test]
    fn late_half_clock_management() {
        assert_eq!(
            choose_play(&situation(Quarter::Q4, 20, 2, 10), true, false),
            PlayCall::Spike
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q2, 20, 2, 10), true, false),
            PlayCall::Kneel
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q4, 20, 2, 10), false, false),
            PlayCall::DeepPass
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q2, 3, 1, 10), false, false),
            PlayCall::FieldGoal
        );
    }

    #[test]
    fn early_downs_mix_run_and_pass() {
        assert_eq!(
            choose_play(&situation(Quarter::Q1, 800, 1, 10), true, false),
            PlayCall::Run
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q1, 800, 2, 7), true, false),
            PlayCall::ShortPass
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q3, 800, 3, 5), true, false),
            PlayCall::Screen
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q3, 800, 3, 12), true, false),
            PlayCall::DeepPass
        );
        assert_eq!(
            choose_play(&situation(Quarter::Q3, 800, 3, 2), true, false),
            PlayCall::Run
        );
    }

    #[test]
    fn defense_spends_timeouts_late() {
        let s = situation(Quarter::Q4, 100, 1, 10);
        assert_eq!(timeout_caller(&s, true), Some(s.possession.opponent()));
        assert_eq!(timeout_caller(&s, false), None);
        assert_eq!(timeout_caller(&situation(Quarter::Q3, 100, 1, 10), true), None);
    }

    #[test]
    fn interval_helper() {
        assert!(!every(0, 5));
        assert!(every(10, 5));
        assert!(!every(10, 0));
    }

    #[test]
    fn seeded_game_runs_to_completion() {
        let clock = SharedGameClock::new(
            GameClock::with_config(ClockConfig::testing(2024)).unwrap(),
        );
        let report = run_game(&clock, &SimSettings::default()).unwrap();

        assert!(report.plays > 0);
        assert_eq!(report.final_state.game_state, GameState::EndGame);
        assert!(report.final_state.total_elapsed >= 3600);
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let play = || {
            let clock = SharedGameClock::new(
                GameClock::with_config(ClockConfig::testing(8)).unwrap(),
            );
            let report = run_game(&clock, &SimSettings::default()).unwrap();
            (report.plays, report.timeouts, report.final_state.total_elapsed)
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn play_limit_stops_a_runaway_game() {
        let clock = SharedGameClock::new(GameClock::with_config(ClockConfig::testing(1)).unwrap());
        let settings = SimSettings {
            max_plays: 5,
            ..SimSettings::default()
        };
        assert!(matches!(
            run_game(&clock, &settings),
            Err(SimError::Stalled { plays: 5 })
        ));
    }

    #[test]
    fn overtime_is_played_when_enabled() {
        let clock = SharedGameClock::new(
            GameClockBuilder::new()
                .seed(3)
                .start_quarter(Quarter::Q4)
                .build()
                .unwrap(),
        );
        let report = run_game(&clock, &SimSettings::default()).unwrap();
        assert_eq!(report.overtime_periods, 1);
        assert_eq!(report.final_state.quarter, Quarter::Overtime);
    }

    #[test]
    fn settings_parse_with_defaults() {
        let settings: SimSettings = serde_yml::from_str("max_plays: 10\nweather: snow\n").unwrap();
        assert_eq!(settings.max_plays, 10);
        assert_eq!(settings.weather, Weather::Snow);
        assert_eq!(settings.huddle_seconds, 25);
        assert!(settings.overtime);
    }
}
