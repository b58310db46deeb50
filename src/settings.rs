//! Game tuning and difficulty selection
//!
//! Defaults come from [`crate::consts`]. Hosts may override any subset of the
//! numbers with a JSON document; missing fields keep their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// AI opponent difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }

    /// Scale applied to the AI paddle's base speed
    pub fn multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Medium => 0.8,
            Difficulty::Hard => 1.0,
            Difficulty::Insane => 1.3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_margin: f32,
    pub follow_factor: f32,
    pub quick_follow_factor: f32,
    pub base_ai_speed: f32,
    pub ai_dead_zone: f32,

    // === Ball ===
    pub ball_size: f32,
    pub base_ball_speed: f32,
    pub paddle_hit_boost: f32,
    pub hit_deflection: f32,
    pub trail_length: usize,

    // === Power-ups ===
    pub powerup_size: f32,
    pub powerup_spawn_chance: f32,
    pub max_powerups: usize,
    pub powerup_edge_margin: f32,
    pub enlarge_ticks: u32,
    pub quicken_ticks: u32,
    pub slow_ticks: u32,
    pub enlarge_factor: f32,
    pub slow_factor: f32,

    // === Scoring ===
    pub winning_score: u32,
    pub points_per_level: u32,
    pub speed_step: f32,

    // === Countdown ===
    pub countdown_step_ms: f32,
    pub countdown_hold_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_margin: PADDLE_MARGIN,
            follow_factor: FOLLOW_FACTOR,
            quick_follow_factor: QUICK_FOLLOW_FACTOR,
            base_ai_speed: BASE_AI_SPEED,
            ai_dead_zone: AI_DEAD_ZONE,

            ball_size: BALL_SIZE,
            base_ball_speed: BASE_BALL_SPEED,
            paddle_hit_boost: PADDLE_HIT_BOOST,
            hit_deflection: HIT_DEFLECTION,
            trail_length: TRAIL_LENGTH,

            powerup_size: POWERUP_SIZE,
            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,
            max_powerups: MAX_POWERUPS,
            powerup_edge_margin: POWERUP_EDGE_MARGIN,
            enlarge_ticks: ENLARGE_TICKS,
            quicken_ticks: QUICKEN_TICKS,
            slow_ticks: SLOW_TICKS,
            enlarge_factor: ENLARGE_FACTOR,
            slow_factor: SLOW_FACTOR,

            winning_score: WINNING_SCORE,
            points_per_level: POINTS_PER_LEVEL,
            speed_step: SPEED_STEP,

            countdown_step_ms: COUNTDOWN_STEP_MS,
            countdown_hold_ms: COUNTDOWN_HOLD_MS,
        }
    }
}

impl Tuning {
    /// Touch-device preset: slower base ball speed
    pub fn mobile() -> Self {
        Self {
            base_ball_speed: MOBILE_BALL_SPEED,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        serde_json::to_string_pretty(self).map_err(TuningError::Parse)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_size", self.ball_size),
            ("base_ball_speed", self.base_ball_speed),
            ("base_ai_speed", self.base_ai_speed),
            ("powerup_size", self.powerup_size),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::invalid(field, "must be greater than zero"));
            }
        }

        if !(0.0..=1.0).contains(&self.powerup_spawn_chance) {
            return Err(TuningError::invalid(
                "powerup_spawn_chance",
                "must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.follow_factor)
            || !(0.0..=1.0).contains(&self.quick_follow_factor)
        {
            return Err(TuningError::invalid(
                "follow_factor",
                "follow factors must be within [0, 1]",
            ));
        }
        if self.winning_score == 0 {
            return Err(TuningError::invalid("winning_score", "must be at least 1"));
        }
        if self.points_per_level == 0 {
            return Err(TuningError::invalid("points_per_level", "must be at least 1"));
        }
        if self.paddle_height * self.enlarge_factor >= self.field_height {
            return Err(TuningError::invalid(
                "paddle_height",
                "enlarged paddle must be shorter than the field",
            ));
        }
        if self.field_height <= 2.0 * self.powerup_edge_margin {
            return Err(TuningError::invalid(
                "powerup_edge_margin",
                "spawn band must leave room inside the field",
            ));
        }
        Ok(())
    }

    /// X coordinate of the player paddle's left edge
    pub fn player_paddle_x(&self) -> f32 {
        self.paddle_margin
    }

    /// X coordinate of the AI paddle's left edge
    pub fn ai_paddle_x(&self) -> f32 {
        self.field_width - self.paddle_margin - self.paddle_width
    }
}

/// Configuration loading failures
#[derive(Debug)]
pub enum TuningError {
    /// JSON could not be parsed or produced
    Parse(serde_json::Error),
    /// A value is out of its usable range
    Invalid { field: &'static str, reason: &'static str },
}

impl TuningError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        TuningError::Invalid { field, reason }
    }
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "invalid tuning JSON: {err}"),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("Insane"), Some(Difficulty::Insane));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_multipliers() {
        let multipliers: Vec<f32> = Difficulty::ALL.iter().map(|d| d.multiplier()).collect();
        assert_eq!(multipliers, vec![0.6, 0.8, 1.0, 1.3]);
    }

    #[test]
    fn test_default_geometry() {
        let tuning = Tuning::default();
        assert!((tuning.paddle_height - 75.0).abs() < 1e-4);
        assert!((tuning.paddle_margin - 24.0).abs() < 1e-4);
        assert!((tuning.ball_size - 12.0).abs() < 1e-4);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "winning_score": 5, "base_ball_speed": 3.0 }"#)
            .expect("partial override should parse");
        assert_eq!(tuning.winning_score, 5);
        assert_eq!(tuning.base_ball_speed, 3.0);
        assert_eq!(tuning.max_powerups, MAX_POWERUPS);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "powerup_spawn_chance": 2.0 }"#),
            Err(TuningError::Invalid { field: "powerup_spawn_chance", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "winning_score": 0 }"#),
            Err(TuningError::Invalid { field: "winning_score", .. })
        ));
    }

    #[test]
    fn test_mobile_preset() {
        assert_eq!(Tuning::mobile().base_ball_speed, MOBILE_BALL_SPEED);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::mobile();
        let json = tuning.to_json().expect("serialize tuning");
        assert_eq!(Tuning::from_json(&json).expect("parse tuning"), tuning);
    }
}
