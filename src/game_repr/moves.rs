use chess::{Board, ChessMove, Piece};
use std::fmt;

/*-------ARCHITECTURE--------*/

// | ChessMove | moving piece | captured piece |
// | from/to/promotion from the rules engine   |
//
// The rules engine move only knows squares. Search needs to know what moves
// and what gets taken (MVV-LVA, quiet-move checks, reversible-ply counting),
// so both are looked up once when the move is generated.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    raw: ChessMove,
    piece: Piece,
    captured: Option<Piece>,
}

impl Move {
    /// Wrap a legal rules-engine move generated from `board`.
    pub fn new(board: &Board, raw: ChessMove) -> Move {
        let from = raw.get_source();
        let to = raw.get_dest();
        let Some(piece) = board.piece_on(from) else {
            unreachable!("legal move {raw} has no piece on its source square");
        };

        let captured = match board.piece_on(to) {
            Some(victim) => Some(victim),
            // A pawn changing file onto an empty square is an en passant capture
            None if piece == Piece::Pawn && from.get_file() != to.get_file() => Some(Piece::Pawn),
            None => None,
        };

        Self { raw, piece, captured }
    }

    pub fn raw(&self) -> ChessMove {
        self.raw
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    pub fn promotion(&self) -> Option<Piece> {
        self.raw.get_promotion()
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Neither a capture nor a promotion.
    pub fn is_quiet(&self) -> bool {
        self.captured.is_none() && self.promotion().is_none()
    }
}

impl PartialEq<ChessMove> for Move {
    fn eq(&self, other: &ChessMove) -> bool {
        self.raw == *other
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
