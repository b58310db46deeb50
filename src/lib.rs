//! Cyber Pong - simulation core for a two-paddle arcade ball game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (balls, paddles, power-ups, scoring, match phases)
//! - `settings`: Runtime tuning and difficulty selection
//!
//! Rendering, audio and input capture live outside this crate. They drive a
//! [`sim::Match`] through its commands and consume its snapshots and events.

pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Tuning, TuningError};
pub use sim::{GameEvent, GamePhase, Match, Side, Snapshot};

/// Game configuration constants
///
/// Geometry is expressed on the reference 800x500 field. One tick is one
/// display refresh; all speeds are pixels per tick.
pub mod consts {
    /// Playing field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Paddle defaults (1.2% of width, 15% of height)
    pub const PADDLE_WIDTH: f32 = FIELD_WIDTH * 0.012;
    pub const PADDLE_HEIGHT: f32 = FIELD_HEIGHT * 0.15;
    /// Gap between a paddle and its goal edge
    pub const PADDLE_MARGIN: f32 = FIELD_WIDTH * 0.03;

    /// Ball defaults (square bounding box side)
    pub const BALL_SIZE: f32 = FIELD_WIDTH * 0.015;
    pub const BASE_BALL_SPEED: f32 = 6.0;
    /// Base speed used by the mobile preset
    pub const MOBILE_BALL_SPEED: f32 = 3.0;
    /// Horizontal speed-up applied on every paddle hit (multiplicative)
    pub const PADDLE_HIT_BOOST: f32 = 1.05;
    /// Outgoing vy = base speed * multiplier * hit ratio * this
    pub const HIT_DEFLECTION: f32 = 0.7;
    /// Positions kept in each ball's trail
    pub const TRAIL_LENGTH: usize = 10;

    /// AI paddle
    pub const BASE_AI_SPEED: f32 = 4.0;
    pub const AI_DEAD_ZONE: f32 = 5.0;

    /// Player paddle follow factors (fraction of remaining distance per tick)
    pub const FOLLOW_FACTOR: f32 = 0.7;
    pub const QUICK_FOLLOW_FACTOR: f32 = 1.0;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.002;
    pub const MAX_POWERUPS: usize = 2;
    /// Vertical keep-out from the top and bottom walls when spawning
    pub const POWERUP_EDGE_MARGIN: f32 = 50.0;
    pub const ENLARGE_TICKS: u32 = 300;
    pub const QUICKEN_TICKS: u32 = 300;
    pub const SLOW_TICKS: u32 = 200;
    pub const ENLARGE_FACTOR: f32 = 1.5;
    pub const SLOW_FACTOR: f32 = 0.5;
    /// Balls added by one MultiBall activation
    pub const MULTIBALL_EXTRA: usize = 2;

    /// Scoring and progression
    pub const WINNING_SCORE: u32 = 10;
    pub const POINTS_PER_LEVEL: u32 = 3;
    pub const SPEED_STEP: f32 = 0.05;

    /// Serve countdown timing (milliseconds)
    pub const COUNTDOWN_STEP_MS: f32 = 700.0;
    pub const COUNTDOWN_HOLD_MS: f32 = 500.0;
}
