//! Match orchestration: commands, phase machine and the per-tick step
//!
//! A [`Match`] is the single owner of every entity. Hosts call its commands
//! (start, pause, restart, pointer target), run [`Match::tick`] once per
//! display refresh, and read [`Match::snapshot`] / [`Match::take_events`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::balls::BallSet;
use super::countdown::{Countdown, CountdownTick, PendingServe};
use super::paddles::Paddles;
use super::powerups::{self, PowerUpManager};
use super::scoring::{PointOutcome, award_point};
use super::state::{
    BallView, GameEvent, GamePhase, MatchContext, MatchState, MatchSummary, PaddleView, PowerUp,
    Side, Snapshot,
};
use crate::settings::{Difficulty, Tuning};

/// A whole match: scoreboard, entities, RNG and pending serve
#[derive(Debug, Clone)]
pub struct Match {
    tuning: Tuning,
    state: MatchState,
    balls: BallSet,
    paddles: Paddles,
    powerups: PowerUpManager,
    countdown: Countdown,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Tick invocations since construction (paused ticks included)
    ticks: u64,
    /// Presentation-only flag for the audio collaborator
    muted: bool,
}

impl Match {
    /// Idle match with the given tuning and RNG seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            paddles: Paddles::new(&tuning),
            tuning,
            state: MatchState::default(),
            balls: BallSet::new(),
            powerups: PowerUpManager::new(),
            countdown: Countdown::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            ticks: 0,
            muted: false,
        }
    }

    /// Idle match with default tuning
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Tuning::default(), seed)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn balls(&self) -> &BallSet {
        &self.balls
    }

    /// Staging access for hosts and tests
    pub fn balls_mut(&mut self) -> &mut BallSet {
        &mut self.balls
    }

    pub fn paddles(&self) -> &Paddles {
        &self.paddles
    }

    pub fn paddles_mut(&mut self) -> &mut Paddles {
        &mut self.paddles
    }

    pub fn powerups(&self) -> &PowerUpManager {
        &self.powerups
    }

    pub fn powerups_mut(&mut self) -> &mut PowerUpManager {
        &mut self.powerups
    }

    /// Countdown waiting to be completed, if any
    pub fn pending_serve(&self) -> Option<&PendingServe> {
        self.countdown.pending()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Events emitted since the last [`Match::take_events`]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pointer/touch target in field coordinates
    pub fn set_player_target(&mut self, y: f32) {
        self.paddles.set_player_target(y);
    }

    /// Idle -> Countdown: fresh scoreboard and entities, random serve side
    pub fn start(&mut self, difficulty: Difficulty) -> bool {
        if self.state.phase != GamePhase::Idle {
            log::warn!("Start ignored in {:?}", self.state.phase);
            return false;
        }

        self.clear_entities();
        self.state = MatchState::new(difficulty);
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        log::info!("Match started ({difficulty})");
        self.begin_serve(direction);
        true
    }

    /// Discard everything in flight and start over with the same difficulty.
    ///
    /// Any pending countdown is cancelled first, so its id can no longer
    /// complete a serve.
    pub fn restart(&mut self) -> bool {
        if self.state.phase == GamePhase::Idle {
            log::warn!("Restart ignored: match not started");
            return false;
        }

        let difficulty = self.state.difficulty;
        self.clear_entities();
        self.state.phase = GamePhase::Idle;
        log::info!("Match restarted");
        self.start(difficulty)
    }

    /// Playing <-> Paused; ignored in any other phase
    pub fn pause_toggle(&mut self) -> bool {
        self.state.phase = match self.state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => {
                log::warn!("Pause toggle ignored in {other:?}");
                return false;
            }
        };
        log::info!("Phase -> {:?}", self.state.phase);
        true
    }

    /// Countdown completion callback.
    ///
    /// Serves the waiting ball(s) and enters Playing. Returns false (and
    /// changes nothing) for a stale id or when no countdown is running.
    pub fn countdown_finished(&mut self, serve_id: u64) -> bool {
        if self.state.phase != GamePhase::Countdown {
            log::warn!(
                "Serve #{serve_id} completed outside countdown ({:?}), ignored",
                self.state.phase
            );
            return false;
        }
        let Some(serve) = self.countdown.claim(serve_id) else {
            log::warn!("Stale serve #{serve_id} ignored");
            return false;
        };

        let speed = self.state.serve_speed(&self.tuning);
        self.balls.serve(serve.direction, speed, &mut self.rng);
        self.state.phase = GamePhase::Playing;
        self.events.push(GameEvent::Served {
            serve_id,
            direction: serve.direction,
        });
        log::info!(
            "Serve #{serve_id} toward {}",
            if serve.direction < 0.0 { Side::Player } else { Side::Ai }
        );
        true
    }

    /// Drive the countdown from the tick clock instead of an external timer
    pub fn advance_countdown(&mut self, elapsed_ms: f32) {
        if self.state.phase != GamePhase::Countdown {
            return;
        }
        let progress = self.countdown.advance(
            elapsed_ms,
            self.tuning.countdown_step_ms,
            self.tuning.countdown_hold_ms,
        );
        for tick in progress {
            match tick {
                CountdownTick::Step(label) => {
                    if let Some(serve) = self.countdown.pending() {
                        self.events.push(GameEvent::CountdownStep {
                            serve_id: serve.serve_id,
                            label,
                        });
                    }
                }
                CountdownTick::Ready(serve_id) => {
                    self.countdown_finished(serve_id);
                }
            }
        }
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self) {
        self.ticks += 1;
        match self.state.phase {
            GamePhase::Playing => self.step_playing(),
            // Let the player line up while the serve is pending
            GamePhase::Countdown => self.paddles.follow(&self.tuning, &self.state.modifiers),
            GamePhase::Idle | GamePhase::Paused | GamePhase::GameOver => {}
        }
    }

    fn step_playing(&mut self) {
        // 1. Power-up timers and spawning
        self.state.modifiers.expire();
        self.powerups.animate();
        if let Some(powerup) = self.powerups.maybe_spawn(&self.tuning, &mut self.rng) {
            self.events.push(GameEvent::PowerUpSpawned {
                kind: powerup.kind,
                pos: powerup.pos,
            });
        }

        // 2. Player paddle follows its target
        self.paddles.follow(&self.tuning, &self.state.modifiers);

        // 3. Balls
        let ctx = MatchContext {
            tuning: &self.tuning,
            state: &self.state,
            player: &self.paddles.player,
            ai: &self.paddles.ai,
        };
        let step = self
            .balls
            .update(&ctx, &mut self.powerups, &mut self.events);

        let speed = self.state.serve_speed(&self.tuning);
        for pickup in &step.pickups {
            let applied = powerups::activate(
                pickup,
                &self.tuning,
                &mut self.state.modifiers,
                &mut self.balls,
                speed,
                &mut self.rng,
            );
            if applied {
                self.events
                    .push(GameEvent::PowerUpActivated { kind: pickup.kind });
            }
        }
        self.paddles
            .clamp_player(&self.tuning, &self.state.modifiers);

        // 4. Scoring
        for &side in &step.scored {
            let outcome = award_point(&mut self.state, side, &self.tuning);
            self.events.push(GameEvent::ScoreChanged {
                side,
                player_score: self.state.player_score,
                ai_score: self.state.ai_score,
            });
            match outcome {
                PointOutcome::Won(winner) => {
                    self.finish(winner);
                    return;
                }
                PointOutcome::Continue { level_up: true } => {
                    self.events.push(GameEvent::LevelUp {
                        level: self.state.level,
                        speed_multiplier: self.state.speed_multiplier,
                    });
                }
                PointOutcome::Continue { level_up: false } => {}
            }
        }
        let last_scorer = step.scored.last().copied();
        if let Some(last) = last_scorer.filter(|_| self.balls.is_empty()) {
            self.state.modifiers.multiball = false;
            // Serve toward whoever lost the point
            self.begin_serve(last.opponent().toward());
        }

        // 5. AI paddle, tracking the fresh ball after a re-serve
        self.paddles
            .step_ai(&self.tuning, self.state.difficulty, &self.balls);
    }

    /// Place a fresh ball and enter Countdown
    fn begin_serve(&mut self, direction: f32) {
        self.balls.reset(&self.tuning);
        let fresh = self.state.fresh();
        let serve = self.countdown.begin(direction, fresh);
        self.events.push(GameEvent::CountdownStarted {
            serve_id: serve.serve_id,
            steps: serve.steps,
        });
        log::debug!("Serve #{} pending ({} steps)", serve.serve_id, serve.steps.len());
        self.state.phase = GamePhase::Countdown;
    }

    fn finish(&mut self, winner: Side) {
        self.balls.clear();
        self.countdown.cancel();
        self.state.modifiers.multiball = false;
        self.state.phase = GamePhase::GameOver;
        let summary = MatchSummary::from_state(winner, &self.state);
        log::info!(
            "Game over: {} wins {}-{} (level {}, speed {})",
            winner,
            self.state.player_score,
            self.state.ai_score,
            self.state.level,
            self.state.speed_label()
        );
        self.events.push(GameEvent::GameOver(summary));
    }

    fn clear_entities(&mut self) {
        self.countdown.cancel();
        self.balls.clear();
        self.powerups.clear();
        self.paddles.reset(&self.tuning);
        self.state.modifiers = Default::default();
    }

    /// Read-only view of the completed tick
    pub fn snapshot(&self) -> Snapshot {
        let tuning = &self.tuning;
        let paddle_view = |x: f32, y: f32, height: f32| PaddleView {
            x,
            y,
            width: tuning.paddle_width,
            height,
        };
        Snapshot {
            tick: self.ticks,
            state: self.state.clone(),
            balls: self
                .balls
                .iter()
                .map(|ball| BallView {
                    id: ball.id,
                    pos: ball.pos,
                    vel: ball.vel,
                    size: tuning.ball_size,
                    trail: ball.trail.iter().copied().collect(),
                })
                .collect(),
            player_paddle: paddle_view(
                tuning.player_paddle_x(),
                self.paddles.player.y,
                self.state.modifiers.player_paddle_height(tuning),
            ),
            ai_paddle: paddle_view(tuning.ai_paddle_x(), self.paddles.ai.y, tuning.paddle_height),
            powerups: self.powerups.iter().cloned().collect::<Vec<PowerUp>>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUpKind;
    use glam::Vec2;

    fn playing_match() -> Match {
        let mut game = Match::with_seed(12345);
        assert!(game.start(Difficulty::Medium));
        let id = game.pending_serve().map(|s| s.serve_id).expect("pending serve");
        assert!(game.countdown_finished(id));
        game.take_events();
        game
    }

    #[test]
    fn test_start_enters_countdown_with_motionless_ball() {
        let mut game = Match::with_seed(1);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.start(Difficulty::Hard));
        assert_eq!(game.phase(), GamePhase::Countdown);
        assert_eq!(game.balls().len(), 1);

        // Ticks during the countdown never move the ball
        for _ in 0..30 {
            game.tick();
        }
        let ball = game.balls().iter().next().expect("ball");
        assert_eq!(ball.vel, Vec2::ZERO);
        assert!(matches!(
            game.events()[0],
            GameEvent::CountdownStarted { steps, .. } if steps.len() == 4
        ));
    }

    #[test]
    fn test_start_rejected_outside_idle() {
        let mut game = playing_match();
        assert!(!game.start(Difficulty::Easy));
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_serve_sets_velocity() {
        let game = playing_match();
        assert_eq!(game.phase(), GamePhase::Playing);
        let ball = game.balls().iter().next().expect("ball");
        assert_eq!(ball.vel.x.abs(), game.tuning().base_ball_speed);
        assert!(ball.served);
    }

    #[test]
    fn test_tick_pause() {
        let mut game = playing_match();
        game.tick();
        let before = game.balls().iter().next().map(|b| b.pos);

        assert!(game.pause_toggle());
        assert_eq!(game.phase(), GamePhase::Paused);
        for _ in 0..10 {
            game.tick();
        }
        assert_eq!(game.balls().iter().next().map(|b| b.pos), before);

        assert!(game.pause_toggle());
        assert_eq!(game.phase(), GamePhase::Playing);
        game.tick();
        assert_ne!(game.balls().iter().next().map(|b| b.pos), before);
    }

    #[test]
    fn test_pause_rejected_during_countdown() {
        let mut game = Match::with_seed(2);
        game.start(Difficulty::Medium);
        assert!(!game.pause_toggle());
        assert_eq!(game.phase(), GamePhase::Countdown);
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut game = Match::with_seed(seed);
            game.start(Difficulty::Medium);
            for i in 0..600 {
                game.set_player_target(100.0 + (i % 300) as f32);
                game.advance_countdown(1000.0 / 60.0);
                game.tick();
            }
            game.snapshot()
        };
        let a = run(99999);
        let b = run(99999);
        assert_eq!(a.state, b.state);
        assert_eq!(a.balls.len(), b.balls.len());
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_player_point_reserves_toward_ai() {
        let mut game = playing_match();
        let ball = &mut game.balls_mut().balls_mut()[0];
        ball.pos = Vec2::new(795.0, 20.0);
        ball.vel = Vec2::new(8.0, 0.0);
        game.tick();

        assert_eq!(game.state().player_score, 1);
        assert_eq!(game.phase(), GamePhase::Countdown);
        let serve = game.pending_serve().expect("re-serve pending");
        assert_eq!(serve.direction, 1.0);
        assert_eq!(serve.steps.len(), 1);
    }

    #[test]
    fn test_ai_steps_on_reserve_tick() {
        let mut game = playing_match();
        game.paddles_mut().ai.y = 0.0;
        let ball = &mut game.balls_mut().balls_mut()[0];
        ball.pos = Vec2::new(795.0, 20.0);
        ball.vel = Vec2::new(8.0, 0.0);
        game.tick();

        assert_eq!(game.phase(), GamePhase::Countdown);
        // Moved one Medium step toward the center ball
        let step = game.tuning().base_ai_speed * Difficulty::Medium.multiplier();
        assert_eq!(game.paddles().ai.y, step);
    }

    #[test]
    fn test_snapshot_reports_effective_paddle() {
        let mut game = playing_match();
        assert_eq!(game.snapshot().player_paddle.height, game.tuning().paddle_height);

        // Ball comes off the player paddle through an EnlargePaddle
        game.paddles_mut().player.y = 200.0;
        let id = game
            .powerups_mut()
            .spawn_at(PowerUpKind::EnlargePaddle, Vec2::new(40.0, 237.5), 20.0);
        let ball = &mut game.balls_mut().balls_mut()[0];
        ball.pos = Vec2::new(36.0, 231.5);
        ball.vel = Vec2::new(-6.0, 0.0);
        game.tick();

        assert!(game.state().modifiers.enlarged());
        let snapshot = game.snapshot();
        assert_eq!(
            snapshot.player_paddle.height,
            game.tuning().paddle_height * game.tuning().enlarge_factor
        );
        assert!(snapshot.powerups.iter().all(|p| p.id != id));
    }
}
