//! Power-up spawning, pickup and activation
//!
//! Uncollected power-ups sit in the middle band of the field until a ball
//! coming off the player's paddle touches one. Activation writes the effect's
//! duration into [`PlayerModifiers`]; MultiBall instead splits the ball.

use glam::Vec2;
use rand::Rng;

use super::balls::{BallSet, Pickup};
use super::collision::circles_touch;
use super::state::{EffectDuration, PlayerModifiers, PowerUp, PowerUpKind};
use crate::settings::Tuning;

/// Owns every uncollected power-up
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    powerups: Vec<PowerUp>,
    next_id: u32,
}

impl Default for PowerUpManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self {
            powerups: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.powerups.iter()
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
    }

    /// Place a power-up at `pos` (center) and return its id
    pub fn spawn_at(&mut self, kind: PowerUpKind, pos: Vec2, size: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.powerups.push(PowerUp::new(id, kind, pos, size));
        id
    }

    /// Roll the per-tick spawn chance.
    ///
    /// Spawns a uniformly random kind inside the 30-70% width band, keeping
    /// the configured margin from the top and bottom walls. Nothing spawns
    /// while the field already holds `max_powerups`.
    pub fn maybe_spawn<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) -> Option<&PowerUp> {
        if rng.random::<f32>() >= tuning.powerup_spawn_chance {
            return None;
        }
        if self.powerups.len() >= tuning.max_powerups {
            log::trace!("Power-up spawn skipped: {} already on field", self.powerups.len());
            return None;
        }

        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let margin = tuning.powerup_edge_margin;
        let pos = Vec2::new(
            tuning.field_width * 0.3 + rng.random::<f32>() * tuning.field_width * 0.4,
            margin + rng.random::<f32>() * (tuning.field_height - 2.0 * margin),
        );
        self.spawn_at(kind, pos, tuning.powerup_size);
        log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.powerups.last()
    }

    /// Advance cosmetic spin/pulse
    pub fn animate(&mut self) {
        for powerup in &mut self.powerups {
            powerup.animate();
        }
    }

    /// Remove and return every power-up a ball centered at `center` touches
    pub fn take_touching(&mut self, center: Vec2, ball_radius: f32) -> Vec<PowerUp> {
        let mut taken = Vec::new();
        self.powerups.retain(|powerup| {
            if circles_touch(powerup.pos, center, powerup.size / 2.0 + ball_radius) {
                taken.push(powerup.clone());
                false
            } else {
                true
            }
        });
        taken
    }
}

/// Apply a collected power-up. Returns false when the pickup had no effect.
///
/// Timed kinds (re)start their counter at full duration. MultiBall only fires
/// when it is not already running and exactly one ball is live; `speed` is
/// the current serve speed used for the new balls' vertical velocity.
pub fn activate<R: Rng>(
    pickup: &Pickup,
    tuning: &Tuning,
    modifiers: &mut PlayerModifiers,
    balls: &mut BallSet,
    speed: f32,
    rng: &mut R,
) -> bool {
    let effect = pickup.kind.effect(tuning);
    match effect.duration {
        EffectDuration::Ticks(ticks) => match modifiers.counter_mut(pickup.kind) {
            Some(counter) => {
                *counter = ticks;
                log::debug!("{:?} active for {} ticks", pickup.kind, ticks);
                true
            }
            None => false,
        },
        EffectDuration::UntilDrained => {
            if modifiers.multiball {
                log::debug!("MultiBall already active, pickup ignored");
                return false;
            }
            if balls.len() != 1 {
                log::debug!("MultiBall needs exactly one live ball (have {})", balls.len());
                return false;
            }
            modifiers.multiball = true;
            let added = balls.spawn_multiball(pickup, effect.magnitude as usize, speed, rng);
            log::debug!("MultiBall split into {} balls", 1 + added);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pickup(kind: PowerUpKind) -> Pickup {
        Pickup {
            kind,
            ball_pos: Vec2::new(40.0, 200.0),
            ball_vel: Vec2::new(6.3, 1.0),
        }
    }

    /// Activation side of the match: modifiers, balls and RNG
    struct Player {
        tuning: Tuning,
        mods: PlayerModifiers,
        balls: BallSet,
        rng: Pcg32,
    }

    impl Player {
        fn new(seed: u64) -> Self {
            Self {
                tuning: Tuning::default(),
                mods: PlayerModifiers::default(),
                balls: BallSet::new(),
                rng: Pcg32::seed_from_u64(seed),
            }
        }

        fn collect(&mut self, kind: PowerUpKind) -> bool {
            activate(
                &pickup(kind),
                &self.tuning,
                &mut self.mods,
                &mut self.balls,
                6.0,
                &mut self.rng,
            )
        }
    }

    #[test]
    fn test_spawn_respects_cap_and_band() {
        let tuning = Tuning {
            powerup_spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let mut manager = PowerUpManager::new();

        for _ in 0..10 {
            manager.maybe_spawn(&tuning, &mut rng);
        }
        assert_eq!(manager.len(), tuning.max_powerups);

        for powerup in manager.iter() {
            assert!(powerup.pos.x >= 240.0 && powerup.pos.x <= 560.0);
            assert!(powerup.pos.y >= 50.0 && powerup.pos.y <= 450.0);
            assert_eq!(powerup.size, tuning.powerup_size);
        }
    }

    #[test]
    fn test_spawn_never_with_zero_chance() {
        let tuning = Tuning {
            powerup_spawn_chance: 0.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut manager = PowerUpManager::new();
        for _ in 0..5_000 {
            assert!(manager.maybe_spawn(&tuning, &mut rng).is_none());
        }
        assert!(manager.is_empty());
    }

    #[test]
    fn test_take_touching() {
        let mut manager = PowerUpManager::new();
        manager.spawn_at(PowerUpKind::EnlargePaddle, Vec2::new(100.0, 100.0), 20.0);
        manager.spawn_at(PowerUpKind::SlowBall, Vec2::new(300.0, 100.0), 20.0);

        assert!(manager.take_touching(Vec2::new(120.0, 100.0), 6.0).is_empty());
        let taken = manager.take_touching(Vec2::new(110.0, 100.0), 6.0);
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].kind, PowerUpKind::EnlargePaddle);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_timed_activation_restarts_counter() {
        let mut player = Player::new(1);

        assert!(player.collect(PowerUpKind::QuickenPaddle));
        assert_eq!(player.mods.quicken_ticks, 300);
        player.mods.expire();
        assert!(player.collect(PowerUpKind::QuickenPaddle));
        assert_eq!(player.mods.quicken_ticks, 300);

        assert!(player.collect(PowerUpKind::SlowBall));
        assert_eq!(player.mods.slow_ticks, 200);
    }

    #[test]
    fn test_enlarge_lasts_duration() {
        let mut player = Player::new(1);
        player.collect(PowerUpKind::EnlargePaddle);

        // Active on the pickup tick and the 299 ticks after it
        let mut active_ticks = 1;
        loop {
            player.mods.expire();
            if !player.mods.enlarged() {
                break;
            }
            active_ticks += 1;
        }
        assert_eq!(active_ticks, 300);
        assert_eq!(
            player.mods.player_paddle_height(&player.tuning),
            player.tuning.paddle_height
        );
    }

    #[test]
    fn test_multiball_once() {
        let mut player = Player::new(9);
        player
            .balls
            .push_in_flight(Vec2::new(40.0, 200.0), Vec2::new(6.3, 1.0));

        assert!(player.collect(PowerUpKind::MultiBall));
        assert!(player.mods.multiball);
        assert_eq!(player.balls.len(), 3);

        // Second activation while running is a no-op
        assert!(!player.collect(PowerUpKind::MultiBall));
        assert_eq!(player.balls.len(), 3);
    }

    #[test]
    fn test_multiball_needs_single_ball() {
        let mut player = Player::new(9);
        player
            .balls
            .push_in_flight(Vec2::new(40.0, 200.0), Vec2::new(6.3, 1.0));
        player
            .balls
            .push_in_flight(Vec2::new(400.0, 200.0), Vec2::new(-6.0, 1.0));

        assert!(!player.collect(PowerUpKind::MultiBall));
        assert!(!player.mods.multiball);
        assert_eq!(player.balls.len(), 2);
    }
}
