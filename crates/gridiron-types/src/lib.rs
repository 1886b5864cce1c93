//! Shared type definitions for the Gridiron game clock.
//!
//! This crate is the single source of truth for the vocabulary shared by the
//! rules engine, the clock state machine, and the simulation driver.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for game identifiers
//! - [`enums`] -- Periods, game/clock states, speeds, teams, stop reasons
//! - [`plays`] -- Play calls, play results, and classified play outcomes
//! - [`decision`] -- Clock decisions and penalty descriptions

pub mod decision;
pub mod enums;
pub mod ids;
pub mod plays;

// Re-export all public types at crate root for convenience.
pub use decision::{ClockDecision, PenaltyDetails, PenaltyInfo};
pub use enums::{
    ClockSpeed, ClockState, GameState, PenaltyImpact, PlayClockDuration, PlayClockState, Quarter,
    RestartTrigger, StopReason, Team, Weather,
};
pub use ids::GameId;
pub use plays::{PlayCall, PlayContext, PlayOutcome, PlayResult, PlayType, SpecialOutcome};
