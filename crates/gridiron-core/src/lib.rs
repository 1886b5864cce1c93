//! Game clock state machine for the Gridiron simulator.
//!
//! This crate owns the game clock and play clock, moves the game through
//! its periods, and applies the decisions of the rules engine to every
//! play.
//!
//! # Modules
//!
//! - [`clock`] -- [`GameClock`]: countdown, periods, two-minute warning,
//!   play clock, and configuration updates.
//! - [`play`] -- Running plays through the clock and the rules engine.
//! - [`validation`] -- Read-only validators and deterministic recovery.
//! - [`builder`] -- [`GameClockBuilder`] for fluent construction.
//! - [`config`] -- Configuration loading from `gridiron-config.yaml` into
//!   strongly-typed structs.
//! - [`provider`] -- [`PlayOutcomeProvider`] trait with random and
//!   scripted implementations.
//! - [`shared`] -- [`SharedGameClock`], the mutex-guarded handle for
//!   multiple callers.
//! - [`snapshot`] -- Serializable point-in-time copies of the clock.
//! - [`error`] -- [`ClockError`].

pub mod builder;
pub mod clock;
pub mod config;
pub mod error;
pub mod play;
pub mod provider;
pub mod shared;
pub mod snapshot;
pub mod validation;

pub use builder::GameClockBuilder;
pub use clock::GameClock;
pub use config::{ClockConfig, ConfigError, FeatureFlags};
pub use error::ClockError;
pub use play::{PlaySummary, classify};
pub use provider::{PlayOutcomeProvider, ProviderError, RandomPlayProvider, ScriptedPlayProvider};
pub use shared::SharedGameClock;
pub use snapshot::ClockSnapshot;
