//! Play outcome providers.
//!
//! When the clock runs a play it asks a [`PlayOutcomeProvider`] what
//! happened. The provider is a pluggable capability: the clock only reads
//! the returned [`PlayResult`], so a random simulator, a scripted replay,
//! or a human-driven source are interchangeable.
//!
//! [`RandomPlayProvider`] draws results from per-call distributions using a
//! seedable [`StdRng`]; the same seed and the same calls always produce the
//! same results. [`ScriptedPlayProvider`] replays a fixed queue and is the
//! usual choice in tests.

use std::collections::VecDeque;

use gridiron_rules::GameSituation;
use gridiron_types::{PlayCall, PlayResult, PlayType, SpecialOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Yard line of the goal the offense is attacking.
const GOAL_LINE: i32 = 100;

/// Yard line after a touchback.
const TOUCHBACK_LINE: u8 = 25;

/// Yard line after a punt or turnover carries into the end zone.
const END_ZONE_TOUCHBACK_LINE: u8 = 20;

/// Errors that can occur while generating a play.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// A scripted provider ran out of results.
    #[error("play script exhausted")]
    Exhausted,

    /// An internal error in the provider.
    #[error("play provider error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of play results.
///
/// Implementations receive the play call and the rules engine's view of
/// the situation, and return what happened on the field.
pub trait PlayOutcomeProvider: Send + std::fmt::Debug {
    /// Produce the result of `call` in `situation`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if no result can be produced.
    fn generate(
        &mut self,
        call: PlayCall,
        situation: &GameSituation,
    ) -> Result<PlayResult, ProviderError>;

    /// Restart the provider's randomness from `seed`. Providers without
    /// randomness ignore this.
    fn reseed(&mut self, seed: u64);
}

// ---------------------------------------------------------------------------
// Random provider
// ---------------------------------------------------------------------------

/// Draws play results from simple per-call distributions.
///
/// Tracks the ball's yard line between plays so touchdowns and safeties
/// follow from field position.
#[derive(Debug, Clone)]
pub struct RandomPlayProvider {
    /// Random source.
    rng: StdRng,
    /// Current line of scrimmage, from the offense's own goal line.
    ball_on: u8,
}

impl RandomPlayProvider {
    /// Create a provider seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            ball_on: TOUCHBACK_LINE,
        }
    }

    /// Create a reproducible provider.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ball_on: TOUCHBACK_LINE,
        }
    }

    /// Current line of scrimmage.
    pub const fn ball_on(&self) -> u8 {
        self.ball_on
    }

    fn run(&mut self, result: &mut PlayResult) {
        result.yards_gained = self.rng.random_range(-3..=12);
        if self.rng.random_bool(0.02) {
            result.special = Some(SpecialOutcome::Fumble);
            result.turnover = self.rng.random_bool(0.5);
        }
        result.out_of_bounds = self.rng.random_bool(0.15);
        result.time_consumed = self.rng.random_range(4..=7);
    }

    fn pass(&mut self, result: &mut PlayResult, completion: f64, yards: (i32, i32)) {
        if self.rng.random_bool(0.06) {
            result.special = Some(SpecialOutcome::Sack);
            result.yards_gained = self.rng.random_range(-9..=-2);
            result.time_consumed = self.rng.random_range(4..=7);
            return;
        }
        if self.rng.random_bool(0.03) {
            result.special = Some(SpecialOutcome::Interception);
            result.turnover = true;
            result.time_consumed = self.rng.random_range(5..=9);
            return;
        }
        result.pass_completed = self.rng.random_bool(completion);
        if result.pass_completed {
            result.yards_gained = self.rng.random_range(yards.0..=yards.1);
            result.out_of_bounds = self.rng.random_bool(0.2);
            result.time_consumed = self.rng.random_range(5..=9);
        } else {
            result.time_consumed = self.rng.random_range(4..=6);
        }
    }

    fn punt(&mut self, result: &mut PlayResult) {
        result.yards_gained = self.rng.random_range(35..=55);
        result.turnover = true;
        if self.rng.random_bool(0.01) {
            result.special = Some(SpecialOutcome::BlockedKick);
            result.yards_gained = 0;
        }
        result.time_consumed = self.rng.random_range(8..=12);
    }

    fn field_goal(&mut self, result: &mut PlayResult) {
        if self.rng.random_bool(0.02) {
            result.special = Some(SpecialOutcome::BlockedKick);
        }
        result.turnover = true;
        result.time_consumed = self.rng.random_range(4..=6);
    }

    fn kickoff(&mut self, result: &mut PlayResult) {
        result.time_consumed = if self.rng.random_bool(0.6) {
            0
        } else {
            self.rng.random_range(5..=8)
        };
    }

    /// Resolve scoring and field position from the yardage drawn.
    fn settle(&mut self, result: &mut PlayResult, situation: &GameSituation) {
        let start = i32::from(self.ball_on);
        let end = start.saturating_add(result.yards_gained);

        if matches!(result.play_type, PlayType::Run | PlayType::Pass) && !result.turnover {
            if end >= GOAL_LINE {
                result.yards_gained = GOAL_LINE.saturating_sub(start);
                result.touchdown = true;
            } else if end <= 0 {
                result.special = Some(SpecialOutcome::Safety);
            }
        }
        result.first_down =
            !result.touchdown && result.yards_gained >= i32::from(situation.distance);

        self.ball_on = if result.touchdown
            || result.special == Some(SpecialOutcome::Safety)
            || matches!(result.play_type, PlayType::FieldGoal | PlayType::Kickoff)
        {
            TOUCHBACK_LINE
        } else if result.turnover && end >= GOAL_LINE {
            END_ZONE_TOUCHBACK_LINE
        } else if result.turnover {
            // The other side now drives toward the opposite goal.
            to_yard_line(GOAL_LINE.saturating_sub(end))
        } else {
            to_yard_line(end)
        };
        result.field_position = self.ball_on;
    }
}

impl Default for RandomPlayProvider {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl PlayOutcomeProvider for RandomPlayProvider {
    fn generate(
        &mut self,
        call: PlayCall,
        situation: &GameSituation,
    ) -> Result<PlayResult, ProviderError> {
        let mut result = PlayResult::new(call.play_type(), 0);
        match call {
            PlayCall::Run => self.run(&mut result),
            PlayCall::ShortPass => self.pass(&mut result, 0.68, (1, 14)),
            PlayCall::DeepPass => self.pass(&mut result, 0.38, (15, 45)),
            PlayCall::Screen => self.pass(&mut result, 0.8, (-2, 10)),
            PlayCall::Kneel => {
                result.yards_gained = -1;
                result.time_consumed = 2;
            }
            PlayCall::Spike => {
                result.time_consumed = 1;
            }
            PlayCall::Punt => self.punt(&mut result),
            PlayCall::FieldGoal => self.field_goal(&mut result),
            PlayCall::Kickoff => self.kickoff(&mut result),
        }
        self.settle(&mut result, situation);
        Ok(result)
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.ball_on = TOUCHBACK_LINE;
    }
}

fn to_yard_line(value: i32) -> u8 {
    u8::try_from(value.clamp(1, 99)).unwrap_or(TOUCHBACK_LINE)
}

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// Replays a fixed sequence of results, ignoring the play call.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayProvider {
    /// Results not yet handed out.
    script: VecDeque<PlayResult>,
}

impl ScriptedPlayProvider {
    /// Create a provider that will return `results` in order.
    pub fn new(results: impl IntoIterator<Item = PlayResult>) -> Self {
        Self {
            script: results.into_iter().collect(),
        }
    }

    /// Append a result to the end of the script.
    pub fn push(&mut self, result: PlayResult) {
        self.script.push_back(result);
    }

    /// Results left in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl PlayOutcomeProvider for ScriptedPlayProvider {
    fn generate(
        &mut self,
        _call: PlayCall,
        _situation: &GameSituation,
    ) -> Result<PlayResult, ProviderError> {
        self.script.pop_front().ok_or(ProviderError::Exhausted)
    }

    fn reseed(&mut self, _seed: u64) {}
}
