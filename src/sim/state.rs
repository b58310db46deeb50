//! Match state and core simulation types
//!
//! Everything a presentation layer reads (and everything needed to restore a
//! scoreboard) lives here.

use std::collections::VecDeque;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::settings::{Difficulty, Tuning};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first Start command
    Idle,
    /// Serve pending; balls are placed but motionless
    Countdown,
    /// Active gameplay
    Playing,
    /// Gameplay suspended by the player
    Paused,
    /// Someone reached the winning score
    GameOver,
}

/// Which end of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Left paddle, driven by pointer input
    Player,
    /// Right paddle, driven by the built-in opponent
    Ai,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Horizontal sign of a ball travelling toward this side's goal
    pub fn toward(self) -> f32 {
        match self {
            Side::Player => -1.0,
            Side::Ai => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Ai => "AI",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ball entity. `pos` is the top-left corner of its square bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// False between placement and the end of the serve countdown
    pub served: bool,
    /// Recent positions, oldest first (cosmetic)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// Motionless ball waiting for its serve
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            served: false,
            trail: VecDeque::new(),
        }
    }

    /// Ball already in flight (MultiBall spawns)
    pub fn in_flight(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            served: true,
            trail: VecDeque::new(),
        }
    }

    /// Record current position, evicting the oldest beyond `cap`
    pub fn record_trail(&mut self, cap: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }

    #[inline]
    pub fn bounds(&self, size: f32) -> Aabb {
        Aabb::from_corner(self.pos, Vec2::splat(size))
    }

    #[inline]
    pub fn center(&self, size: f32) -> Vec2 {
        self.pos + Vec2::splat(size / 2.0)
    }
}

/// A paddle. Only the vertical position moves; x is fixed by its side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Top edge
    pub y: f32,
    pub base_height: f32,
}

impl Paddle {
    /// Paddle vertically centered in the field
    pub fn centered(side: Side, tuning: &Tuning) -> Self {
        Self {
            side,
            y: (tuning.field_height - tuning.paddle_height) / 2.0,
            base_height: tuning.paddle_height,
        }
    }

    pub fn x(&self, tuning: &Tuning) -> f32 {
        match self.side {
            Side::Player => tuning.player_paddle_x(),
            Side::Ai => tuning.ai_paddle_x(),
        }
    }

    /// Keep the paddle inside [0, field_height - height]
    pub fn clamp(&mut self, field_height: f32, height: f32) {
        self.y = self.y.clamp(0.0, (field_height - height).max(0.0));
    }

    pub fn bounds(&self, tuning: &Tuning, height: f32) -> Aabb {
        Aabb::from_corner(
            Vec2::new(self.x(tuning), self.y),
            Vec2::new(tuning.paddle_width, height),
        )
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    EnlargePaddle,
    QuickenPaddle,
    SlowBall,
    MultiBall,
}

/// How long an activated effect lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectDuration {
    Ticks(u32),
    /// Active until every ball has drained out of play
    UntilDrained,
}

/// Effect of a power-up: lifetime plus the value it scales
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpEffect {
    pub duration: EffectDuration,
    /// Paddle height scale, follow factor, ball speed scale, or extra balls
    pub magnitude: f32,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::EnlargePaddle,
        PowerUpKind::QuickenPaddle,
        PowerUpKind::SlowBall,
        PowerUpKind::MultiBall,
    ];

    pub fn effect(&self, tuning: &Tuning) -> PowerUpEffect {
        match self {
            PowerUpKind::EnlargePaddle => PowerUpEffect {
                duration: EffectDuration::Ticks(tuning.enlarge_ticks),
                magnitude: tuning.enlarge_factor,
            },
            PowerUpKind::QuickenPaddle => PowerUpEffect {
                duration: EffectDuration::Ticks(tuning.quicken_ticks),
                magnitude: tuning.quick_follow_factor,
            },
            PowerUpKind::SlowBall => PowerUpEffect {
                duration: EffectDuration::Ticks(tuning.slow_ticks),
                magnitude: tuning.slow_factor,
            },
            PowerUpKind::MultiBall => PowerUpEffect {
                duration: EffectDuration::UntilDrained,
                magnitude: crate::consts::MULTIBALL_EXTRA as f32,
            },
        }
    }

    /// HUD indicator text
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::EnlargePaddle => "Big Paddle!",
            PowerUpKind::QuickenPaddle => "Fast Paddle!",
            PowerUpKind::SlowBall => "Slow Ball!",
            PowerUpKind::MultiBall => "Multi-Ball!",
        }
    }
}

/// An uncollected power-up. `pos` is its center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: f32,
    /// Cosmetic spin (radians)
    pub rotation: f32,
    /// Cosmetic pulse phase (radians)
    pub pulse_phase: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            rotation: 0.0,
            pulse_phase: 0.0,
        }
    }

    pub fn animate(&mut self) {
        self.rotation += 0.05;
        self.pulse_phase += 0.1;
    }
}

/// Active power-up effects on the player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerModifiers {
    pub enlarge_ticks: u32,
    pub quicken_ticks: u32,
    pub slow_ticks: u32,
    pub multiball: bool,
}

impl PlayerModifiers {
    pub fn enlarged(&self) -> bool {
        self.enlarge_ticks > 0
    }

    pub fn quickened(&self) -> bool {
        self.quicken_ticks > 0
    }

    pub fn slowed(&self) -> bool {
        self.slow_ticks > 0
    }

    /// Count every timed effect down by one tick
    pub fn expire(&mut self) {
        self.enlarge_ticks = self.enlarge_ticks.saturating_sub(1);
        self.quicken_ticks = self.quicken_ticks.saturating_sub(1);
        self.slow_ticks = self.slow_ticks.saturating_sub(1);
    }

    /// Remaining-duration counter for a timed kind
    pub fn counter_mut(&mut self, kind: PowerUpKind) -> Option<&mut u32> {
        match kind {
            PowerUpKind::EnlargePaddle => Some(&mut self.enlarge_ticks),
            PowerUpKind::QuickenPaddle => Some(&mut self.quicken_ticks),
            PowerUpKind::SlowBall => Some(&mut self.slow_ticks),
            PowerUpKind::MultiBall => None,
        }
    }

    /// Player paddle height with the enlarge effect applied
    pub fn player_paddle_height(&self, tuning: &Tuning) -> f32 {
        if self.enlarged() {
            tuning.paddle_height * PowerUpKind::EnlargePaddle.effect(tuning).magnitude
        } else {
            tuning.paddle_height
        }
    }

    pub fn follow_factor(&self, tuning: &Tuning) -> f32 {
        if self.quickened() {
            PowerUpKind::QuickenPaddle.effect(tuning).magnitude
        } else {
            tuning.follow_factor
        }
    }

    /// Scale applied to every ball's per-tick step
    pub fn ball_step_scale(&self, tuning: &Tuning) -> f32 {
        if self.slowed() {
            PowerUpKind::SlowBall.effect(tuning).magnitude
        } else {
            1.0
        }
    }
}

/// Scoreboard, progression and phase (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub player_score: u32,
    pub ai_score: u32,
    pub level: u32,
    /// Never decreases within a match
    pub speed_multiplier: f32,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    pub modifiers: PlayerModifiers,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl MatchState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            player_score: 0,
            ai_score: 0,
            level: 1,
            speed_multiplier: 1.0,
            difficulty,
            phase: GamePhase::Idle,
            modifiers: PlayerModifiers::default(),
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Ai => self.ai_score,
        }
    }

    /// True before any point of the match has been scored
    pub fn fresh(&self) -> bool {
        self.player_score == 0 && self.ai_score == 0
    }

    /// Current serve speed (base speed scaled by progression)
    pub fn serve_speed(&self, tuning: &Tuning) -> f32 {
        tuning.base_ball_speed * self.speed_multiplier
    }

    /// HUD speed readout, e.g. "1.1x"
    pub fn speed_label(&self) -> String {
        format!("{:.1}x", self.speed_multiplier)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Read-only view of the match handed to each component step
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub tuning: &'a Tuning,
    pub state: &'a MatchState,
    pub player: &'a Paddle,
    pub ai: &'a Paddle,
}

/// Final result of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub winner: Side,
    pub player_score: u32,
    pub ai_score: u32,
    pub level: u32,
    pub speed_multiplier: f32,
    pub difficulty: Difficulty,
}

impl MatchSummary {
    pub fn from_state(winner: Side, state: &MatchState) -> Self {
        Self {
            winner,
            player_score: state.player_score,
            ai_score: state.ai_score,
            level: state.level,
            speed_multiplier: state.speed_multiplier,
            difficulty: state.difficulty,
        }
    }

    /// Multi-line stats block for the game over screen
    pub fn describe(&self) -> String {
        let headline = match self.winner {
            Side::Player => "You Win!",
            Side::Ai => "AI Wins!",
        };
        format!(
            "{headline}\nFinal Score: {} - {}\nLevel Reached: {}\nFinal Speed: {:.1}x\n\
             Difficulty: {}",
            self.player_score, self.ai_score, self.level, self.speed_multiplier, self.difficulty
        )
    }
}

/// Discrete simulation events for audio/particle collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A serve countdown began; `steps` are the labels to show in order
    CountdownStarted {
        serve_id: u64,
        steps: &'static [&'static str],
    },
    /// Next countdown label is due (only from [`super::Match::advance_countdown`])
    CountdownStep { serve_id: u64, label: &'static str },
    /// Balls received their serve velocity
    Served { serve_id: u64, direction: f32 },
    WallBounce { pos: Vec2 },
    PaddleHit { side: Side, pos: Vec2 },
    /// A ball touched a power-up on its way off the player paddle
    Pickup { kind: PowerUpKind, pos: Vec2 },
    /// A picked-up power-up took effect (duplicate MultiBall does not)
    PowerUpActivated { kind: PowerUpKind },
    PowerUpSpawned { kind: PowerUpKind, pos: Vec2 },
    ScoreChanged {
        side: Side,
        player_score: u32,
        ai_score: u32,
    },
    LevelUp { level: u32, speed_multiplier: f32 },
    GameOver(MatchSummary),
}

/// Read-only view of a ball for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Oldest first
    pub trail: Vec<Vec2>,
}

/// Read-only view of a paddle for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the presentation layer needs after a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub state: MatchState,
    pub balls: Vec<BallView>,
    pub player_paddle: PaddleView,
    pub ai_paddle: PaddleView,
    pub powerups: Vec<PowerUp>,
}
