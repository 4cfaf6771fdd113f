// Cross-module properties of the search and the evaluation


use crate::game_repr::Position;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Positions reached by seeded random play from the start, stopping early
/// if a game ends.
fn random_positions(seed: u64, count: usize, plies: usize) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut pos = Position::default();
            for _ in 0..plies {
                let moves = pos.legal_moves(false);
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                pos.make_move(mv);
            }
            Position::from_board(*pos.board())
        })
        .collect()
}
