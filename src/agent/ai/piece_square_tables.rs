// Piece-square tables for positional evaluation
// All values in centipawns (100 = 1 pawn)
//
// Tables ship packed: one u64 per rank (rank 1 first, from White's point of
// view), one signed byte per file with the a-file in the low byte. They are
// decoded once, on first use, into a flat table that already includes the
// material value and the vertical flip for Black.

use super::evaluation::{TaperedScore, MATERIAL};
use chess::{Color, Piece, Square};
use once_cell::sync::Lazy;

const MG_PACKED: [[u64; 8]; 6] = [
    [
        0x0000000000000000, 0x050A0AECEC0A0A05,
        0x05FBF60000F6FB05, 0x0000051414050000,
        0x05050A19190A0505, 0x0A0F141E1E140F0A,
        0x3232323232323232, 0x0000000000000000,
    ],
    [
        0xCEDDE2E2E2E2DDCE, 0xD8EC00050500ECD8,
        0xE2050A0F0F0A05E2, 0xE2000F14140F00E2,
        0xE2050F14140F05E2, 0xE2000A0F0F0A00E2,
        0xD8EC00000000ECD8, 0xCED8E2E2E2E2D8CE,
    ],
    [
        0xECF6F4F6F6F4F6EC, 0xF60A000000000AF6,
        0xF60A0A0A0A0A0AF6, 0xF6000A0A0A0A00F6,
        0xF605050A0A0505F6, 0xF600050A0A0500F6,
        0xF6000000000000F6, 0xECF6F6F6F6F6F6EC,
    ],
    [
        0x0000050A0A050000, 0xFB000000000000FB,
        0xFB000000000000FB, 0xFB000000000000FB,
        0xFB000000000000FB, 0xFB000000000000FB,
        0x050A0A0A0A0A0A05, 0x0000000000000000,
    ],
    [
        0xECF6F6FBFBF6F6EC, 0xF6000000000500F6,
        0xF6000505050505F6, 0xFB00050505050000,
        0xFB000505050500FB, 0xF6000505050500F6,
        0xF6000000000000F6, 0xECF6F6FBFBF6F6EC,
    ],
    [
        0x141E0A00000A1E14, 0x1414000000001414,
        0xF6ECECECECECECF6, 0xECE2E2D8D8E2E2EC,
        0xE2D8D8CECED8D8E2, 0xE2D8D8CECED8D8E2,
        0xE2D8D8CECED8D8E2, 0xE2D8D8CECED8D8E2,
    ],
];
const EG_PACKED: [[u64; 8]; 6] = [
    [
        0x0000000000000000, 0x0A0A0A0A0A0A0A0A,
        0x0A0A0A0A0A0A0A0A, 0x1414141414141414,
        0x2323232323232323, 0x3C3C3C3C3C3C3C3C,
        0x6464646464646464, 0x0000000000000000,
    ],
    [
        0xCED8E2E7E7E2D8CE, 0xD8ECFB0000FBECD8,
        0xE2FB0A0F0F0AFBE2, 0xE7000F14140F00E7,
        0xE7000F14140F00E7, 0xE2FB0A0F0F0AFBE2,
        0xD8ECFB0000FBECD8, 0xCED8E2E7E7E2D8CE,
    ],
    [
        0xF1F6FBFBFBFBF6F1, 0xF6000000000000F6,
        0xFB000505050500FB, 0xFB00050A0A0500FB,
        0xFB00050A0A0500FB, 0xFB000505050500FB,
        0xF6000000000000F6, 0xF1F6FBFBFBFBF6F1,
    ],
    [
        0x0000000000000000, 0x0000000000000000,
        0x0000000000000000, 0x0000000000000000,
        0x0505050505050505, 0x0505050505050505,
        0x0F0F0F0F0F0F0F0F, 0x0A0A0A0A0A0A0A0A,
    ],
    [
        0xE2ECF6F6F6F6ECE2, 0xECF600000000F6EC,
        0xF6000A0F0F0A00F6, 0xF6000F14140F00F6,
        0xF6000F14140F00F6, 0xF6000A0F0F0A00F6,
        0xECF600000000F6EC, 0xE2ECF6F6F6F6ECE2,
    ],
    [
        0xCEE2E2E2E2E2E2CE, 0xE2E200000000E2E2,
        0xE2F6141E1E14F6E2, 0xE2F61E28281EF6E2,
        0xE2F61E28281EF6E2, 0xE2F6141E1E14F6E2,
        0xE2ECF60000F6ECE2, 0xCED8E2ECECE2D8CE,
    ],
];

/// Decoded tables, indexed `[color][piece][square]`
pub struct PieceSquareTables {
    scores: [[[TaperedScore; 64]; 6]; 2],
}

pub static PST: Lazy<PieceSquareTables> = Lazy::new(PieceSquareTables::decode);

/// Signed byte `file` of a packed rank.
#[inline]
fn unpack(row: u64, file: usize) -> i32 {
    (row >> (8 * file)) as u8 as i8 as i32
}

/// Positional bonus only (no material), from White's point of view.
pub fn packed_value(piece: Piece, square: usize) -> TaperedScore {
    let (rank, file) = (square / 8, square % 8);
    let p = piece.to_index();
    TaperedScore::new(
        unpack(MG_PACKED[p][rank], file),
        unpack(EG_PACKED[p][rank], file),
    )
}

impl PieceSquareTables {
    fn decode() -> Self {
        let mut scores = [[[TaperedScore::default(); 64]; 6]; 2];

        for piece in chess::ALL_PIECES {
            let p = piece.to_index();
            for square in 0..64 {
                let mut white = packed_value(piece, square);
                white.add(MATERIAL[p]);

                scores[Color::White.to_index()][p][square] = white;
                // Black reads the table upside down
                scores[Color::Black.to_index()][p][square ^ 56] = white;
            }
        }

        Self { scores }
    }

    /// Material plus positional value of `piece` of `color` on `square`.
    #[inline]
    pub fn get(&self, piece: Piece, color: Color, square: Square) -> TaperedScore {
        self.scores[color.to_index()][piece.to_index()][square.to_index()]
    }
}
