//! Situational state the clock rules depend on.

use gridiron_types::{PenaltyDetails, Quarter, Team};
use serde::{Deserialize, Serialize};

/// Timeouts each team has per half in regulation.
pub const REGULATION_TIMEOUTS: u8 = 3;

/// Timeouts each team has per playoff overtime period.
pub const PLAYOFF_OVERTIME_TIMEOUTS: u8 = 2;

/// Yards needed for a fresh set of downs.
pub const FIRST_DOWN_DISTANCE: u8 = 10;

/// Seconds left in a half at which the final-two-minutes rules apply.
pub const TWO_MINUTES: u32 = 120;

/// Period lengths and rule flags the engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Regulation quarter length in seconds.
    pub quarter_length: u32,
    /// Regular-season (sudden-death) overtime length in seconds.
    pub overtime_length: u32,
    /// Playoff overtime period length in seconds.
    pub playoff_overtime_length: u32,
    /// Playoff overtime format: periods repeat, no ties.
    pub playoff_rules: bool,
    /// Whether the two-minute warning is in effect.
    pub two_minute_warning: bool,
}

impl RulesConfig {
    /// Length of an overtime period under the active format.
    pub const fn active_overtime_length(&self) -> u32 {
        if self.playoff_rules {
            self.playoff_overtime_length
        } else {
            self.overtime_length
        }
    }

    /// Full length of `quarter` under this configuration.
    pub const fn period_length(&self, quarter: Quarter) -> u32 {
        if quarter.is_regulation() {
            self.quarter_length
        } else {
            self.active_overtime_length()
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            quarter_length: 900,
            overtime_length: 600,
            playoff_overtime_length: 900,
            playoff_rules: false,
            two_minute_warning: true,
        }
    }
}

/// The rules engine's complete situational snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSituation {
    /// Current period.
    pub quarter: Quarter,
    /// Overtime period number (0 in regulation, 1 for the first overtime).
    pub overtime_period: u8,
    /// Seconds left in the period.
    pub time_remaining: u32,
    /// Current down (1-4).
    pub down: u8,
    /// Yards to go for a first down.
    pub distance: u8,
    /// Whether the game is in overtime.
    pub is_overtime: bool,
    /// Home team timeouts left.
    pub home_timeouts: u8,
    /// Away team timeouts left.
    pub away_timeouts: u8,
    /// Team with the ball.
    pub possession: Team,
    /// The two-minute warning has been given this half.
    pub two_minute_drill: bool,
    /// A defensive foul at the end of a half granted one untimed down.
    pub untimed_down_available: bool,
    /// Playoff overtime format in effect.
    pub playoff_rules: bool,
    /// Most recently enforced penalty.
    pub last_penalty: Option<PenaltyDetails>,
}

impl GameSituation {
    /// Opening-kickoff situation for the given configuration.
    pub const fn new(config: &RulesConfig) -> Self {
        Self {
            quarter: Quarter::Q1,
            overtime_period: 0,
            time_remaining: config.quarter_length,
            down: 1,
            distance: FIRST_DOWN_DISTANCE,
            is_overtime: false,
            home_timeouts: REGULATION_TIMEOUTS,
            away_timeouts: REGULATION_TIMEOUTS,
            possession: Team::Home,
            two_minute_drill: false,
            untimed_down_available: false,
            playoff_rules: config.playoff_rules,
            last_penalty: None,
        }
    }

    /// Timeouts left for `team`.
    pub const fn timeouts(&self, team: Team) -> u8 {
        match team {
            Team::Home => self.home_timeouts,
            Team::Away => self.away_timeouts,
        }
    }

    /// Whether the final-two-minutes rules apply (2nd or 4th quarter,
    /// two minutes or less).
    pub const fn inside_two_minutes(&self) -> bool {
        self.quarter.ends_half() && self.time_remaining <= TWO_MINUTES
    }

    /// Whether the half ends when this period's time runs out.
    pub const fn at_end_of_half(&self) -> bool {
        self.quarter.ends_half() && self.time_remaining == 0
    }

    pub(crate) const fn timeouts_mut(&mut self, team: Team) -> &mut u8 {
        match team {
            Team::Home => &mut self.home_timeouts,
            Team::Away => &mut self.away_timeouts,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridiron_types::{PenaltyImpact, PenaltyInfo};

    use super::*;

    #[test]
    fn new_situation_matches_opening_kickoff() {
        let cfg = RulesConfig::default();
        let s = GameSituation::new(&cfg);
        assert_eq!(s.quarter, Quarter::Q1);
        assert_eq!(s.time_remaining, 900);
        assert_eq!((s.down, s.distance), (1, 10));
        assert_eq!(s.timeouts(Team::Home), 3);
        assert_eq!(s.timeouts(Team::Away), 3);
        assert!(!s.is_overtime);
    }

    #[test]
    fn two_minute_window_only_in_second_and_fourth() {
        let cfg = RulesConfig::default();
        let mut s = GameSituation::new(&cfg);
        s.time_remaining = 100;
        assert!(!s.inside_two_minutes());
        s.quarter = Quarter::Q2;
        assert!(s.inside_two_minutes());
        s.time_remaining = 121;
        assert!(!s.inside_two_minutes());
    }

    #[test]
    fn overtime_length_follows_format() {
        let mut cfg = RulesConfig::default();
        assert_eq!(cfg.period_length(Quarter::Overtime), 600);
        cfg.playoff_rules = true;
        assert_eq!(cfg.period_length(Quarter::Overtime), 900);
        assert_eq!(cfg.period_length(Quarter::Q3), 900);
    }

    #[test]
    fn situation_survives_json() {
        let cfg = RulesConfig {
            playoff_rules: true,
            ..RulesConfig::default()
        };
        let mut s = GameSituation::new(&cfg);
        s.quarter = Quarter::Q4;
        s.time_remaining = 0;
        s.possession = Team::Away;
        s.untimed_down_available = true;
        s.last_penalty = Some(PenaltyDetails::new(
            "defensive pass interference",
            PenaltyInfo::new(15, PenaltyImpact::StopClock, Team::Home),
            true,
            true,
        ));

        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""quarter":"q4""#));
        assert!(json.contains(r#""possession":"away""#));
        let back: GameSituation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let cfg_back: RulesConfig =
            serde_json::from_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
        assert_eq!(cfg_back, cfg);
    }
}
