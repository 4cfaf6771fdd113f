mod moves;
mod position;

#[cfg(test)]
mod tests;

pub use moves::*;
pub use position::*;

pub use chess::{BitBoard, Color, Piece, Square};
