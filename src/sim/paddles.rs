//! Paddle control: pointer-following player paddle and reactive AI paddle

use serde::{Deserialize, Serialize};

use super::balls::BallSet;
use super::state::{Paddle, PlayerModifiers, Side};
use crate::settings::{Difficulty, Tuning};

/// Both paddles plus the player's latest pointer target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddles {
    pub player: Paddle,
    pub ai: Paddle,
    /// Field-space y the player paddle is easing toward
    target: Option<f32>,
}

impl Paddles {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: Paddle::centered(Side::Player, tuning),
            ai: Paddle::centered(Side::Ai, tuning),
            target: None,
        }
    }

    /// Recenter both paddles and forget the pointer target
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    pub fn set_player_target(&mut self, y: f32) {
        self.target = Some(y);
    }

    pub fn player_target(&self) -> Option<f32> {
        self.target
    }

    /// Ease the player paddle toward its target, then clamp.
    ///
    /// `y += (target - height/2 - y) * follow`, where height and follow factor
    /// reflect the active EnlargePaddle/QuickenPaddle effects.
    pub fn follow(&mut self, tuning: &Tuning, modifiers: &PlayerModifiers) {
        let height = modifiers.player_paddle_height(tuning);
        if let Some(target) = self.target {
            let follow = modifiers.follow_factor(tuning);
            self.player.y += (target - height / 2.0 - self.player.y) * follow;
        }
        self.player.clamp(tuning.field_height, height);
    }

    /// Re-clamp the player paddle after its height changed mid-tick
    pub fn clamp_player(&mut self, tuning: &Tuning, modifiers: &PlayerModifiers) {
        self.player
            .clamp(tuning.field_height, modifiers.player_paddle_height(tuning));
    }

    /// Step the AI paddle toward the most threatening ball.
    ///
    /// Picks the ball horizontally closest to the AI paddle and moves a fixed
    /// difficulty-scaled step toward it, holding still inside the dead-zone.
    /// Returns false when there was nothing to track or no move was needed.
    pub fn step_ai(&mut self, tuning: &Tuning, difficulty: Difficulty, balls: &BallSet) -> bool {
        let goal_line = tuning.ai_paddle_x();
        let Some(target) = balls.iter().min_by(|a, b| {
            let da = (a.pos.x - goal_line).abs();
            let db = (b.pos.x - goal_line).abs();
            da.total_cmp(&db)
        }) else {
            log::trace!("AI idle: no ball to track");
            return false;
        };

        let ai_center = self.ai.y + tuning.paddle_height / 2.0;
        let ball_center = target.center(tuning.ball_size).y;
        let speed = tuning.base_ai_speed * difficulty.multiplier();

        let moved = if (ai_center - ball_center).abs() > tuning.ai_dead_zone {
            if ai_center < ball_center {
                self.ai.y += speed;
            } else {
                self.ai.y -= speed;
            }
            true
        } else {
            false
        };

        self.ai.clamp(tuning.field_height, tuning.paddle_height);
        moved
    }
}
