//! NFL clock-management rules engine for the Gridiron game clock.
//!
//! The engine evaluates a play outcome against the current game situation
//! and returns a [`ClockDecision`] telling the clock whether to stop, when
//! to restart, and how to reset the play clock. It also owns the
//! situational bookkeeping (timeouts, down and distance, possession,
//! period transitions) the rules depend on.
//!
//! The engine is a plain single-owner value with no internal locking.
//!
//! # Modules
//!
//! - [`engine`] -- [`RulesEngine`] and its priority-ordered rule evaluation
//! - [`error`] -- [`RulesError`]
//! - [`situation`] -- [`GameSituation`] and [`RulesConfig`]
//!
//! [`ClockDecision`]: gridiron_types::ClockDecision

pub mod engine;
pub mod error;
pub mod situation;

pub use engine::{DownResult, RulesEngine};
pub use error::RulesError;
pub use situation::{GameSituation, RulesConfig};
