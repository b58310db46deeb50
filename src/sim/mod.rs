//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-coupled tick, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod balls;
pub mod collision;
pub mod countdown;
pub mod paddles;
pub mod powerups;
pub mod scoring;
pub mod state;
pub mod tick;

pub use balls::{BallSet, BallStep, MAX_BALLS, Pickup};
pub use collision::{Aabb, circles_touch, hit_ratio};
pub use countdown::{Countdown, CountdownTick, FULL_COUNTDOWN, GO_ONLY, PendingServe};
pub use paddles::Paddles;
pub use powerups::PowerUpManager;
pub use scoring::{PointOutcome, award_point};
pub use state::{
    Ball, BallView, EffectDuration, GameEvent, GamePhase, MatchContext, MatchState, MatchSummary,
    Paddle, PaddleView, PlayerModifiers, PowerUp, PowerUpEffect, PowerUpKind, Side, Snapshot,
};
pub use tick::Match;
