use super::Move;
use chess::{BitBoard, Board, Color, MoveGen, Piece, EMPTY};
use smallvec::SmallVec;
use std::str::FromStr;
use thiserror::Error;

/*
 * MODULE IS RESPONSIBLE FOR
 * THE BOARD STATE THE SEARCH WALKS OVER
 *
 * Move generation and hashing come from the `chess` crate. Make/undo is an
 * arena of board snapshots, one per ply, so a subtree always restores the
 * exact board it started from.
 */

/// Plies without a capture or pawn move after which the game is drawn.
const FIFTY_MOVE_PLIES: usize = 100;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    board: Board,
    reversible_plies: usize,
}

#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    /// Boards replaced by `make_move`, popped by `undo_move`
    frames: Vec<Frame>,
    /// Hash of every position reached so far, current one last
    history: Vec<u64>,
    /// Plies since the last capture or pawn move
    reversible_plies: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self::from_board(Board::default())
    }
}

impl Position {
    pub fn from_board(board: Board) -> Position {
        Self {
            board,
            frames: Vec::new(),
            history: vec![board.get_hash()],
            reversible_plies: 0,
        }
    }

    /// Parse a FEN string. The halfmove clock field, when present, seeds
    /// the fifty-move counter.
    pub fn from_fen(fen: &str) -> Result<Position, PositionError> {
        let board = Board::from_str(fen).map_err(|e| PositionError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e:?}"),
        })?;

        let mut pos = Self::from_board(board);
        pos.reversible_plies = fen
            .split_whitespace()
            .nth(4)
            .and_then(|clock| clock.parse().ok())
            .unwrap_or(0);
        Ok(pos)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn hash(&self) -> u64 {
        self.board.get_hash()
    }

    /// Number of moves made on this position object (null moves included).
    pub fn ply(&self) -> usize {
        self.frames.len()
    }

    pub fn is_in_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    pub fn piece_bitboard(&self, piece: Piece, color: Color) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(color)
    }

    /// Legal moves in generator order. With `captures_only` the list is
    /// restricted to captures (en passant included) and promotions.
    pub fn legal_moves(&self, captures_only: bool) -> SmallVec<[Move; 64]> {
        MoveGen::new_legal(&self.board)
            .map(|raw| Move::new(&self.board, raw))
            .filter(|mv| !captures_only || !mv.is_quiet())
            .collect()
    }

    pub fn has_legal_moves(&self) -> bool {
        MoveGen::new_legal(&self.board).len() > 0
    }

    /// Look up a legal move by its UCI text (`e2e4`, `e7e8q`).
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        self.legal_moves(false)
            .into_iter()
            .find(|mv| mv.to_string() == uci)
    }

    pub fn make_move(&mut self, mv: Move) {
        self.frames.push(Frame {
            board: self.board,
            reversible_plies: self.reversible_plies,
        });
        self.board = self.board.make_move_new(mv.raw());
        self.reversible_plies = if mv.is_capture() || mv.piece() == Piece::Pawn {
            0
        } else {
            self.reversible_plies + 1
        };
        self.history.push(self.board.get_hash());
    }

    /// Pass the turn. Refused (returns false) while in check.
    pub fn make_null_move(&mut self) -> bool {
        let Some(next) = self.board.null_move() else {
            return false;
        };

        self.frames.push(Frame {
            board: self.board,
            reversible_plies: self.reversible_plies,
        });
        self.board = next;
        // Repetitions across a null move are not real repetitions
        self.reversible_plies = 0;
        self.history.push(self.board.get_hash());
        true
    }

    /// Undo the last `make_move` or successful `make_null_move`.
    pub fn undo_move(&mut self) {
        debug_assert!(!self.frames.is_empty(), "undo_move without a matching make_move");
        if let Some(frame) = self.frames.pop() {
            self.board = frame.board;
            self.reversible_plies = frame.reversible_plies;
            self.history.pop();
        }
    }

    /// True when the current position already occurred since the last
    /// irreversible move.
    pub fn is_repeated_position(&self) -> bool {
        let current = self.hash();
        let last = self.history.len() - 1;
        let window = self.reversible_plies.min(last);

        // Same side to move only every second ply
        (2..=window)
            .step_by(2)
            .any(|back| self.history[last - back] == current)
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.reversible_plies >= FIFTY_MOVE_PLIES
    }

    /// Bare kings, or king and a single minor piece against a bare king.
    pub fn is_insufficient_material(&self) -> bool {
        match self.board.combined().popcnt() {
            2 => true,
            3 => {
                let minors = *self.board.pieces(Piece::Knight) | *self.board.pieces(Piece::Bishop);
                minors.popcnt() == 1
            }
            _ => false,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.is_repeated_position() || self.is_fifty_move_draw() || self.is_insufficient_material()
    }

    /// Side to move owns something besides pawns and its king.
    pub fn has_non_pawn_material(&self) -> bool {
        let own = *self.board.color_combined(self.side_to_move());
        let kings_and_pawns = *self.board.pieces(Piece::King) | *self.board.pieces(Piece::Pawn);
        (own & !kings_and_pawns) != EMPTY
    }
}
