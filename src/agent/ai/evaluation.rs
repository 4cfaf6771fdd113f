// Position evaluation function
// Returns score in centipawns (positive = good for side to move)
//
// Tapered evaluation: every term carries a middlegame and an endgame value,
// blended by the game phase (24 = all minor and major pieces on the board,
// 0 = kings and pawns only).

use super::piece_square_tables::PST;
use crate::game_repr::Position;
use chess::{get_adjacent_files, get_file, BitBoard, Board, Color, Piece, EMPTY};

/// Phase contribution per piece: pawn, knight, bishop, rook, queen, king
const PHASE_WEIGHTS: [i32; 6] = [0, 1, 1, 2, 4, 0];

/// Phase of the starting position, and the cap
pub const MAX_PHASE: i32 = 24;

/// Material per piece: pawn, knight, bishop, rook, queen, king
pub const MATERIAL: [TaperedScore; 6] = [
    TaperedScore::new(100, 120),
    TaperedScore::new(320, 290),
    TaperedScore::new(330, 310),
    TaperedScore::new(500, 530),
    TaperedScore::new(900, 940),
    TaperedScore::new(0, 0),
];

/// Tapered evaluation score with middlegame and endgame components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaperedScore {
    pub mg: i32, // Middlegame score
    pub eg: i32, // Endgame score
}

impl TaperedScore {
    pub const fn new(mg: i32, eg: i32) -> Self {
        Self { mg, eg }
    }

    /// Interpolate between middlegame and endgame scores based on game phase
    /// phase: 0 (endgame) to 24 (opening)
    pub fn interpolate(&self, phase: i32) -> i32 {
        (self.mg * phase + self.eg * (MAX_PHASE - phase)) / MAX_PHASE
    }

    /// Add another tapered score
    pub fn add(&mut self, other: TaperedScore) {
        self.mg += other.mg;
        self.eg += other.eg;
    }

    /// Subtract another tapered score
    pub fn sub(&mut self, other: TaperedScore) {
        self.mg -= other.mg;
        self.eg -= other.eg;
    }
}

// Pawn structure weights (tapered: mg/eg)
const DOUBLED_PAWN_PENALTY: TaperedScore = TaperedScore::new(15, 20);
const ISOLATED_PAWN_PENALTY: TaperedScore = TaperedScore::new(20, 25);
/// Passed pawn bonus by rank counted from the pawn's own side
const PASSED_PAWN_BONUS: [TaperedScore; 8] = [
    TaperedScore::new(0, 0),
    TaperedScore::new(5, 10),
    TaperedScore::new(10, 15),
    TaperedScore::new(15, 25),
    TaperedScore::new(25, 45),
    TaperedScore::new(40, 70),
    TaperedScore::new(60, 110),
    TaperedScore::new(0, 0),
];

const BISHOP_PAIR_BONUS: TaperedScore = TaperedScore::new(40, 50);

/// Get material value for a piece type (middlegame weight)
///
/// The king counts as zero: it is never captured, and a king capture in a
/// legal move list is always safe.
pub fn piece_value(piece: Piece) -> i32 {
    MATERIAL[piece.to_index()].mg
}

/// Calculate game phase based on remaining pieces
/// Returns value from 0 (endgame) to 24 (opening), capped at 24 when
/// promotions push the count higher
pub fn game_phase(board: &Board) -> i32 {
    let phase: i32 = chess::ALL_PIECES
        .iter()
        .map(|&piece| PHASE_WEIGHTS[piece.to_index()] * board.pieces(piece).popcnt() as i32)
        .sum();
    phase.min(MAX_PHASE)
}

/// Material and piece-square terms, White minus Black
fn evaluate_material_and_position(board: &Board) -> TaperedScore {
    let mut score = TaperedScore::default();

    for color in chess::ALL_COLORS {
        for piece in chess::ALL_PIECES {
            let placed = *board.pieces(piece) & *board.color_combined(color);
            for square in placed {
                let value = PST.get(piece, color, square);
                match color {
                    Color::White => score.add(value),
                    Color::Black => score.sub(value),
                }
            }
        }
    }

    score
}

/// Evaluate bishop pair bonus, White minus Black
fn evaluate_bishop_pair(board: &Board) -> TaperedScore {
    let mut score = TaperedScore::default();
    let bishops = *board.pieces(Piece::Bishop);

    if (bishops & *board.color_combined(Color::White)).popcnt() >= 2 {
        score.add(BISHOP_PAIR_BONUS);
    }
    if (bishops & *board.color_combined(Color::Black)).popcnt() >= 2 {
        score.sub(BISHOP_PAIR_BONUS);
    }

    score
}

/// All squares on ranks in front of `rank` as seen by `color`
fn ranks_ahead(color: Color, rank: usize) -> BitBoard {
    BitBoard(match color {
        Color::White if rank < 7 => u64::MAX << (8 * (rank + 1)),
        Color::Black if rank > 0 => u64::MAX >> (8 * (8 - rank)),
        _ => 0,
    })
}

/// Doubled, isolated and passed pawns of one side
fn evaluate_pawn_side(own: BitBoard, enemy: BitBoard, color: Color) -> TaperedScore {
    let mut score = TaperedScore::default();

    for square in own {
        let file = get_file(square.get_file());
        let neighbours = get_adjacent_files(square.get_file());
        let rank = square.get_rank().to_index();

        if (own & file).popcnt() > 1 {
            score.sub(DOUBLED_PAWN_PENALTY);
        }

        if own & neighbours == EMPTY {
            score.sub(ISOLATED_PAWN_PENALTY);
        }

        let front_span = (file | neighbours) & ranks_ahead(color, rank);
        if enemy & front_span == EMPTY {
            let relative_rank = match color {
                Color::White => rank,
                Color::Black => 7 - rank,
            };
            score.add(PASSED_PAWN_BONUS[relative_rank]);
        }
    }

    score
}

/// Evaluate pawn structure, White minus Black
///
/// Depends on the two pawn bitboards only, which is what makes it cacheable.
pub fn evaluate_pawn_structure(white_pawns: BitBoard, black_pawns: BitBoard) -> TaperedScore {
    let mut score = evaluate_pawn_side(white_pawns, black_pawns, Color::White);
    score.sub(evaluate_pawn_side(black_pawns, white_pawns, Color::Black));
    score
}

fn pawn_bitboards(pos: &Position) -> (BitBoard, BitBoard) {
    (
        pos.piece_bitboard(Piece::Pawn, Color::White),
        pos.piece_bitboard(Piece::Pawn, Color::Black),
    )
}

/// Blend everything and turn it to the side to move's point of view
fn finish(pos: &Position, pawns: TaperedScore) -> i32 {
    let board = pos.board();
    let mut total = evaluate_material_and_position(board);
    total.add(pawns);
    total.add(evaluate_bishop_pair(board));

    let score = total.interpolate(game_phase(board));
    match pos.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

/// Main evaluation function
/// Returns score in centipawns from the perspective of the side to move
/// Positive score = good for side to move
pub fn evaluate(pos: &Position) -> i32 {
    let (white, black) = pawn_bitboards(pos);
    finish(pos, evaluate_pawn_structure(white, black))
}

#[derive(Clone, Copy, Debug)]
struct PawnEntry {
    white: u64,
    black: u64,
    score: TaperedScore,
}

/// Small always-replace cache of pawn structure scores.
///
/// Keyed by both pawn bitboards, which are stored in full and compared on
/// lookup, so a hit is never a collision. Scores are White-relative; the
/// side to move is applied afterwards.
pub struct PawnCache {
    entries: Vec<Option<PawnEntry>>,
    mask: u64,
    pub hits: u64,
    pub misses: u64,
}

impl PawnCache {
    pub fn with_size_log2(bits: u32) -> Self {
        let slots = 1usize << bits;
        Self {
            entries: vec![None; slots],
            mask: (slots - 1) as u64,
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    fn index(&self, white: u64, black: u64) -> usize {
        let key = (white ^ black.rotate_left(29)).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        ((key >> 32) & self.mask) as usize
    }

    pub fn get_or_compute(&mut self, white: BitBoard, black: BitBoard) -> TaperedScore {
        let idx = self.index(white.0, black.0);
        if let Some(entry) = self.entries[idx] {
            if entry.white == white.0 && entry.black == black.0 {
                self.hits += 1;
                return entry.score;
            }
        }

        self.misses += 1;
        let score = evaluate_pawn_structure(white, black);
        self.entries[idx] = Some(PawnEntry {
            white: white.0,
            black: black.0,
            score,
        });
        score
    }
}

/// Evaluation with a pawn cache attached.
pub struct Evaluator {
    pawn_cache: PawnCache,
}

impl Evaluator {
    pub fn new(pawn_cache_size_log2: u32) -> Self {
        Self {
            pawn_cache: PawnCache::with_size_log2(pawn_cache_size_log2),
        }
    }

    /// Same result as [`evaluate`], with the pawn term memoised.
    pub fn evaluate(&mut self, pos: &Position) -> i32 {
        let (white, black) = pawn_bitboards(pos);
        let pawns = self.pawn_cache.get_or_compute(white, black);
        finish(pos, pawns)
    }

    pub fn pawn_cache(&self) -> &PawnCache {
        &self.pawn_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn pawn_score(fen: &str) -> TaperedScore {
        let (white, black) = pawn_bitboards(&pos(fen));
        evaluate_pawn_structure(white, black)
    }

    #[test]
    fn test_starting_position_is_equal() {
        assert_eq!(evaluate(&Position::default()), 0);
    }

    #[test]
    fn test_starting_phase_is_full() {
        assert_eq!(game_phase(Position::default().board()), MAX_PHASE);
        assert_eq!(game_phase(pos("4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1").board()), 0);
    }

    #[test]
    fn test_phase_is_capped() {
        // Three extra white queens
        let p = pos("rnbqkbnr/pppppppp/8/8/8/8/QQQPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(game_phase(p.board()), MAX_PHASE);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let s = TaperedScore::new(100, -40);
        assert_eq!(s.interpolate(MAX_PHASE), 100);
        assert_eq!(s.interpolate(0), -40);
        assert_eq!(s.interpolate(12), 30);
    }

    #[test]
    fn test_doubled_pawns_penalty() {
        let doubled = pawn_score("4k3/8/8/4p3/4P3/4P3/8/4K3 w - - 0 1");
        let normal = pawn_score("4k3/8/8/4p3/3P4/4P3/8/4K3 w - - 0 1");
        assert!(doubled.interpolate(MAX_PHASE) < normal.interpolate(MAX_PHASE));
    }

    #[test]
    fn test_passed_pawn_bonus() {
        // White pawn on e4 with no Black pawns to stop it
        let score = pawn_score("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        let isolated_only = TaperedScore::new(-ISOLATED_PAWN_PENALTY.mg, -ISOLATED_PAWN_PENALTY.eg);
        assert!(score.mg > isolated_only.mg && score.eg > isolated_only.eg);
    }

    #[test]
    fn test_guarded_pawn_is_not_passed() {
        let (w, b) = pawn_bitboards(&pos("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1"));
        let free = evaluate_pawn_side(w, b, Color::White);

        // d6 controls e5, so e4 has an enemy pawn in its front span
        let (w, b) = pawn_bitboards(&pos("4k3/8/3p4/8/4P3/8/8/4K3 w - - 0 1"));
        let guarded = evaluate_pawn_side(w, b, Color::White);

        assert_eq!(guarded, TaperedScore::new(-ISOLATED_PAWN_PENALTY.mg, -ISOLATED_PAWN_PENALTY.eg));
        assert!(guarded.eg < free.eg);
    }

    #[test]
    fn test_isolated_pawn_penalty() {
        let isolated = pawn_score("4k3/8/8/8/P7/8/8/4K3 w - - 0 1");
        let connected = pawn_score("4k3/8/8/8/PP6/8/8/4K3 w - - 0 1");
        assert!(isolated.interpolate(MAX_PHASE) < connected.interpolate(MAX_PHASE));
    }

    #[test]
    fn test_edge_file_pawn_sees_only_one_neighbour() {
        // b6 stops the a-pawn; a pawn on h7 far away does not
        let (w, b) = pawn_bitboards(&pos("4k3/7p/1p6/8/P7/8/8/4K3 w - - 0 1"));
        let blocked = evaluate_pawn_side(w, b, Color::White);
        assert_eq!(blocked, TaperedScore::new(-ISOLATED_PAWN_PENALTY.mg, -ISOLATED_PAWN_PENALTY.eg));

        let (w, b) = pawn_bitboards(&pos("4k3/7p/8/8/P7/8/8/4K3 w - - 0 1"));
        let free = evaluate_pawn_side(w, b, Color::White);
        assert!(free.eg > blocked.eg);
    }

    #[test]
    fn test_black_passed_pawn_mirrors_white() {
        let white = pawn_score("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        let black = pawn_score("4k3/8/8/4p3/8/8/8/4K3 w - - 0 1");
        assert_eq!(white.mg, -black.mg);
        assert_eq!(white.eg, -black.eg);
    }

    #[test]
    fn test_perspective_flip() {
        let white = evaluate(&pos("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        let black = evaluate(&pos("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1"));
        assert_eq!(white, -black);
        assert!(white > 0);
    }

    #[test]
    fn test_material_advantage() {
        // Black is missing the queen
        let score = evaluate(&pos("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(score > 800, "extra queen: {}", score);
    }

    #[test]
    fn test_king_centralises_in_endgame() {
        let central = evaluate(&pos("7k/8/8/8/3K4/8/8/8 w - - 0 1"));
        let corner = evaluate(&pos("7k/8/8/8/8/8/8/6K1 w - - 0 1"));
        assert!(central > corner);
    }

    #[test]
    fn test_bishop_pair() {
        let pair = evaluate_bishop_pair(pos("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").board());
        assert_eq!(pair, BISHOP_PAIR_BONUS);
        let single = evaluate_bishop_pair(pos("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").board());
        assert_eq!(single, TaperedScore::default());
    }

    #[test]
    fn test_cached_matches_uncached() {
        let mut evaluator = Evaluator::new(6);
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "4k3/8/3p4/8/4P3/8/8/4K3 b - - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        ];

        for fen in fens {
            let p = pos(fen);
            assert_eq!(evaluator.evaluate(&p), evaluate(&p), "{fen}");
            assert_eq!(evaluator.evaluate(&p), evaluate(&p), "{fen} (cached)");
        }
        assert_eq!(evaluator.pawn_cache().hits, 3);
        assert_eq!(evaluator.pawn_cache().misses, 3);
    }
}
