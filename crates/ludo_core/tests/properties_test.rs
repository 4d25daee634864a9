//! Property tests for geometry and the engine.

use ludo_core::{
    Color, Game, InvariantSet, LudoInvariants, MAX_PLAYERS, Phase, PlayerSpec, Progress,
    SAFE_SQUARES, coordinate_for, global_index, is_safe_square,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn coordinate_lookup_is_total_and_deterministic(player in 0..MAX_PLAYERS, raw in -1i8..=57) {
        let progress = Progress::new(raw);
        let first = coordinate_for(player, progress);
        prop_assert_eq!(first, coordinate_for(player, progress));
        prop_assert!((0..15).contains(&first.row));
        prop_assert!((0..15).contains(&first.col));
    }

    #[test]
    fn home_coordinate_is_clamped(player in 0..MAX_PLAYERS, raw in 57i8..=i8::MAX) {
        prop_assert_eq!(
            coordinate_for(player, Progress::new(raw)),
            coordinate_for(player, Progress::HOME)
        );
    }

    #[test]
    fn global_index_agrees_with_coordinates(a in 0..MAX_PLAYERS, b in 0..MAX_PLAYERS, x in 0i8..52, y in 0i8..52) {
        let (pa, pb) = (Progress::new(x), Progress::new(y));
        let same_square = global_index(a, pa) == global_index(b, pb);
        prop_assert_eq!(same_square, coordinate_for(a, pa) == coordinate_for(b, pb));
    }

    #[test]
    fn random_games_preserve_invariants(seed in any::<u64>(), seats in 2..=MAX_PLAYERS, choices in prop::collection::vec(0usize..4, 1..400)) {
        let mut game = Game::seeded(seed);
        for color in [Color::Green, Color::Red, Color::Blue, Color::Yellow].into_iter().take(seats) {
            game.add_player(PlayerSpec::bot(color.to_string(), color)).unwrap();
        }

        for choice in choices {
            if game.phase() == Phase::GameOver {
                break;
            }
            let before: Vec<Vec<Progress>> = game
                .players()
                .iter()
                .map(|p| p.pieces().to_vec())
                .collect();
            let mover = game.current_player();

            let roll = game.roll_dice(mover).unwrap();
            let mut safe_landing = false;
            if !roll.is_forfeited() {
                let legal = game.legal_moves(mover, roll.value());
                prop_assert!(!legal.is_empty());
                let piece = legal[choice % legal.len()];
                let outcome = game.make_move(mover, piece).unwrap();
                safe_landing = global_index(mover, outcome.to)
                    .is_some_and(|_| is_safe_square(coordinate_for(mover, outcome.to)));

                let expected_next = if outcome.winner.is_some() || roll.value() == 6 {
                    mover
                } else {
                    (mover + 1) % seats
                };
                prop_assert_eq!(game.current_player(), expected_next);
            }

            prop_assert!(LudoInvariants::check_all(&game).is_ok());
            for square in game.occupancy().squares() {
                prop_assert_eq!(square.count() == 0, square.occupant().is_none());
            }
            for (player, pieces) in game.players().iter().zip(&before) {
                for (now, then) in player.pieces().iter().zip(pieces) {
                    prop_assert!(now >= then || *now == Progress::BASE);
                    if safe_landing && *player.id() != mover {
                        prop_assert_eq!(now, then);
                    }
                }
            }
        }
    }
}

#[test]
fn test_exactly_eight_safe_squares() {
    assert_eq!(SAFE_SQUARES.len(), 8);
    let on_track = (0..52)
        .map(|offset| coordinate_for(0, Progress::new(offset)))
        .filter(|coord| is_safe_square(*coord))
        .count();
    assert_eq!(on_track, 8);
}
