pub mod agent;
pub mod clock;
pub mod game_repr;

pub use agent::{Engine, SearchConfig, SearchResult};
pub use clock::{Clock, TurnClock};
pub use game_repr::{Move, Position, PositionError};
