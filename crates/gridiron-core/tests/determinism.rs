//! Seeded games replay identically.

#![allow(clippy::unwrap_used)]

use gridiron_core::{ClockConfig, GameClock, PlaySummary};
use gridiron_types::{PlayCall, PlayContext, Weather};

const CALLS: [PlayCall; 12] = [
    PlayCall::Kickoff,
    PlayCall::Run,
    PlayCall::ShortPass,
    PlayCall::DeepPass,
    PlayCall::Screen,
    PlayCall::Run,
    PlayCall::Punt,
    PlayCall::Run,
    PlayCall::ShortPass,
    PlayCall::Run,
    PlayCall::FieldGoal,
    PlayCall::Kickoff,
];

fn run_drive(clock: &mut GameClock, context: &PlayContext) -> Vec<PlaySummary> {
    clock.start().unwrap();
    CALLS
        .iter()
        .map(|&call| {
            clock.start_play_clock();
            clock.process_play_with_context(call, context).unwrap()
        })
        .collect()
}

#[test]
fn same_seed_same_game() {
    let context = PlayContext::default();
    let mut first = GameClock::with_config(ClockConfig::testing(7)).unwrap();
    let mut second = GameClock::with_config(ClockConfig::testing(7)).unwrap();

    let a = run_drive(&mut first, &context);
    let b = run_drive(&mut second, &context);

    assert_eq!(a, b);
    assert_eq!(first.time_remaining(), second.time_remaining());
    assert_eq!(first.situation(), second.situation());
}

#[test]
fn different_seeds_diverge() {
    let context = PlayContext::default();
    let mut first = GameClock::with_config(ClockConfig::testing(1)).unwrap();
    let mut second = GameClock::with_config(ClockConfig::testing(2)).unwrap();

    let a = run_drive(&mut first, &context);
    let b = run_drive(&mut second, &context);

    assert_ne!(
        a.iter().map(|s| &s.result).collect::<Vec<_>>(),
        b.iter().map(|s| &s.result).collect::<Vec<_>>()
    );
}

#[test]
fn reset_replays_the_seeded_game() {
    let context = PlayContext {
        hurry_up: true,
        weather: Weather::Rain,
        penalties: Vec::new(),
    };
    let mut clock = GameClock::with_config(ClockConfig::testing(99)).unwrap();
    let before = run_drive(&mut clock, &context);
    clock.reset();
    let after = run_drive(&mut clock, &context);
    assert_eq!(before, after);
}
