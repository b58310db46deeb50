//! Score bookkeeping, level/speed progression and win detection

use super::state::{MatchState, Side};
use crate::settings::Tuning;

/// Result of crediting one point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// Match goes on; `level_up` is set when this point advanced the level
    Continue { level_up: bool },
    /// The scorer reached the winning score
    Won(Side),
}

/// Credit a point to `side`.
///
/// Win detection comes first. Otherwise every `points_per_level`-th player
/// point bumps the level and raises the speed multiplier by `speed_step`;
/// AI points never change progression.
pub fn award_point(state: &mut MatchState, side: Side, tuning: &Tuning) -> PointOutcome {
    let score = match side {
        Side::Player => {
            state.player_score += 1;
            state.player_score
        }
        Side::Ai => {
            state.ai_score += 1;
            state.ai_score
        }
    };

    if score >= tuning.winning_score {
        return PointOutcome::Won(side);
    }

    let level_up = side == Side::Player && score % tuning.points_per_level == 0;
    if level_up {
        state.level += 1;
        state.speed_multiplier += tuning.speed_step;
        log::info!(
            "Level {} reached, speed {}",
            state.level,
            state.speed_label()
        );
    }
    PointOutcome::Continue { level_up }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use proptest::prelude::*;

    #[test]
    fn test_level_up_every_third_player_point() {
        let tuning = Tuning::default();
        let mut state = MatchState::new(Difficulty::Medium);

        assert_eq!(
            award_point(&mut state, Side::Player, &tuning),
            PointOutcome::Continue { level_up: false }
        );
        award_point(&mut state, Side::Player, &tuning);
        assert_eq!(
            award_point(&mut state, Side::Player, &tuning),
            PointOutcome::Continue { level_up: true }
        );
        assert_eq!(state.level, 2);
        assert!((state.speed_multiplier - 1.05).abs() < 1e-6);
    }

    #[test]
    fn test_ai_points_do_not_progress() {
        let tuning = Tuning::default();
        let mut state = MatchState::new(Difficulty::Medium);
        for _ in 0..6 {
            award_point(&mut state, Side::Ai, &tuning);
        }
        assert_eq!(state.level, 1);
        assert_eq!(state.speed_multiplier, 1.0);
        assert_eq!(state.ai_score, 6);
    }

    #[test]
    fn test_win_detection() {
        let tuning = Tuning::default();
        let mut state = MatchState::new(Difficulty::Medium);
        state.ai_score = 8;
        assert_eq!(
            award_point(&mut state, Side::Ai, &tuning),
            PointOutcome::Continue { level_up: false }
        );
        assert_eq!(
            award_point(&mut state, Side::Ai, &tuning),
            PointOutcome::Won(Side::Ai)
        );
        assert_eq!(state.ai_score, 10);
    }

    #[test]
    fn test_win_beats_level_up() {
        let tuning = Tuning {
            winning_score: 9,
            ..Tuning::default()
        };
        let mut state = MatchState::new(Difficulty::Medium);
        state.player_score = 8;
        state.level = 3;
        assert_eq!(
            award_point(&mut state, Side::Player, &tuning),
            PointOutcome::Won(Side::Player)
        );
        // Winning point is not also a level-up
        assert_eq!(state.level, 3);
    }

    proptest! {
        #[test]
        fn prop_speed_multiplier_tracks_player_points(
            points in proptest::collection::vec(any::<bool>(), 0..18),
        ) {
            let tuning = Tuning::default();
            let mut state = MatchState::new(Difficulty::Medium);
            for player_point in points {
                let before = state.speed_multiplier;
                let side = if player_point { Side::Player } else { Side::Ai };
                if let PointOutcome::Won(_) = award_point(&mut state, side, &tuning) {
                    break;
                }
                prop_assert!(state.speed_multiplier >= before);
                let stepped = (state.speed_multiplier - before - tuning.speed_step).abs() < 1e-6;
                let expect_step = player_point && state.player_score % 3 == 0;
                prop_assert_eq!(stepped, expect_step);
                if !expect_step {
                    prop_assert_eq!(state.speed_multiplier, before);
                }
            }
        }
    }
}
