use super::*;


// ==================== HELPER FUNCTIONS ====================

/// Parse a FEN that the test knows to be valid
pub fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

/// Play a list of UCI moves, panicking on the first illegal one
pub fn play(pos: &mut Position, moves: &[&str]) {
    for uci in moves {
        let mv = pos
            .find_move(uci)
            .unwrap_or_else(|| panic!("{uci} is not legal here"));
        pos.make_move(mv);
    }
}
