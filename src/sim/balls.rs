//! Ball set: integration, wall and paddle contact, scoring exits
//!
//! Holds every live ball (one after a serve, up to three while MultiBall is
//! running). Balls are kept sorted by id so iteration order is stable.

use glam::Vec2;
use rand::Rng;

use super::collision::hit_ratio;
use super::powerups::PowerUpManager;
use super::state::{Ball, GameEvent, MatchContext, PowerUpKind, Side};
use crate::settings::Tuning;

/// Hard cap: one served ball plus one MultiBall activation
pub const MAX_BALLS: usize = 1 + crate::consts::MULTIBALL_EXTRA;

/// A power-up collected during a ball update, with the ball that took it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: PowerUpKind,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
}

/// What happened to the set during one update
#[derive(Debug, Clone, Default)]
pub struct BallStep {
    /// Power-ups touched on the way off the player paddle, in order
    pub pickups: Vec<Pickup>,
    /// Side credited for each ball that left the field, in order
    pub scored: Vec<Side>,
}

#[derive(Debug, Clone)]
pub struct BallSet {
    balls: Vec<Ball>,
    next_id: u32,
}

impl Default for BallSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BallSet {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(MAX_BALLS),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    /// Mutable access for hosts and tests that stage a specific layout
    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn clear(&mut self) {
        self.balls.clear();
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the set with one motionless ball at field center
    pub fn reset(&mut self, tuning: &Tuning) {
        self.balls.clear();
        let id = self.next_entity_id();
        let pos = Vec2::new(
            tuning.field_width / 2.0 - tuning.ball_size / 2.0,
            tuning.field_height / 2.0 - tuning.ball_size / 2.0,
        );
        self.balls.push(Ball::new(id, pos));
    }

    /// Add a ball already in flight; ignored once the set is full
    pub fn push_in_flight(&mut self, pos: Vec2, vel: Vec2) -> Option<u32> {
        if self.balls.len() >= MAX_BALLS {
            log::warn!("Ball set full ({MAX_BALLS}), not adding another ball");
            return None;
        }
        let id = self.next_entity_id();
        self.balls.push(Ball::in_flight(id, pos, vel));
        Some(id)
    }

    /// Give every waiting ball its serve velocity.
    ///
    /// `direction` is the horizontal sign (-1 toward the player, +1 toward the
    /// AI); vertical speed is a random fraction in [-0.5, 0.5) of `speed`.
    pub fn serve<R: Rng>(&mut self, direction: f32, speed: f32, rng: &mut R) -> usize {
        let mut served = 0;
        for ball in self.balls.iter_mut().filter(|b| !b.served) {
            ball.vel = Vec2::new(speed * direction, speed * rng.random_range(-0.5..0.5));
            ball.served = true;
            served += 1;
        }
        served
    }

    /// Split off `extra` balls from `source`, jittering vx by +-20% and
    /// picking a fresh vy. Returns how many balls were added.
    pub fn spawn_multiball<R: Rng>(
        &mut self,
        source: &Pickup,
        extra: usize,
        speed: f32,
        rng: &mut R,
    ) -> usize {
        let mut added = 0;
        for _ in 0..extra {
            let vel = Vec2::new(
                source.ball_vel.x * rng.random_range(0.8..1.2),
                (rng.random::<f32>() - 0.5) * speed,
            );
            if self.push_in_flight(source.ball_pos, vel).is_some() {
                added += 1;
            }
        }
        added
    }

    /// Advance every served ball by one tick.
    ///
    /// Emits wall and paddle events, removes touched power-ups from `powerups`,
    /// and drops balls that left the field. Scoring consequences are left to
    /// the caller through the returned [`BallStep`].
    pub fn update(
        &mut self,
        ctx: &MatchContext<'_>,
        powerups: &mut PowerUpManager,
        events: &mut Vec<GameEvent>,
    ) -> BallStep {
        let tuning = ctx.tuning;
        let mods = &ctx.state.modifiers;
        let size = tuning.ball_size;
        let step_scale = mods.ball_step_scale(tuning);
        let rally_speed = ctx.state.serve_speed(tuning);

        let player_box = ctx
            .player
            .bounds(tuning, mods.player_paddle_height(tuning));
        let ai_box = ctx.ai.bounds(tuning, tuning.paddle_height);

        let mut step = BallStep::default();

        self.balls.retain_mut(|ball| {
            if !ball.served {
                return true;
            }

            ball.record_trail(tuning.trail_length);
            ball.pos += ball.vel * step_scale;

            // Top and bottom walls
            if ball.pos.y <= 0.0 {
                ball.pos.y = 0.0;
                ball.vel.y = ball.vel.y.abs();
                events.push(GameEvent::WallBounce {
                    pos: ball.center(size),
                });
            }
            if ball.pos.y + size >= tuning.field_height {
                ball.pos.y = tuning.field_height - size;
                ball.vel.y = -ball.vel.y.abs();
                events.push(GameEvent::WallBounce {
                    pos: ball.center(size),
                });
            }

            // Player paddle: only while moving left
            if ball.vel.x < 0.0 && ball.bounds(size).overlaps(&player_box) {
                ball.pos.x = player_box.max.x;
                ball.vel.x = ball.vel.x.abs() * tuning.paddle_hit_boost;
                let ratio = hit_ratio(ball.center(size).y, &player_box);
                ball.vel.y = rally_speed * ratio * tuning.hit_deflection;
                events.push(GameEvent::PaddleHit {
                    side: Side::Player,
                    pos: Vec2::new(ball.pos.x, ball.center(size).y),
                });

                for powerup in powerups.take_touching(ball.center(size), size / 2.0) {
                    events.push(GameEvent::Pickup {
                        kind: powerup.kind,
                        pos: powerup.pos,
                    });
                    step.pickups.push(Pickup {
                        kind: powerup.kind,
                        ball_pos: ball.pos,
                        ball_vel: ball.vel,
                    });
                }
            }

            // AI paddle: only while moving right, never enlarged
            if ball.vel.x > 0.0 && ball.bounds(size).overlaps(&ai_box) {
                ball.pos.x = ai_box.min.x - size;
                ball.vel.x = -ball.vel.x.abs() * tuning.paddle_hit_boost;
                let ratio = hit_ratio(ball.center(size).y, &ai_box);
                ball.vel.y = rally_speed * ratio * tuning.hit_deflection;
                events.push(GameEvent::PaddleHit {
                    side: Side::Ai,
                    pos: Vec2::new(ball.pos.x + size, ball.center(size).y),
                });
            }

            // Goal exits
            if ball.pos.x < -size {
                step.scored.push(Side::Ai);
                return false;
            }
            if ball.pos.x > tuning.field_width {
                step.scored.push(Side::Player);
                return false;
            }
            true
        });

        step
    }
}
