use anyhow::{bail, Context, Result};
use chess_bot::agent::{Difficulty, GameResult, NegamaxPlayer, Player, RandomPlayer};
use chess_bot::clock::TurnClock;
use chess_bot::game_repr::{Color, Position};
use chess_bot::{Engine, SearchConfig};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chess_bot", version, about = "Time-budgeted negamax chess engine")]
struct Cli {
    /// Transposition table size as log2 of the entry count
    #[arg(
        long,
        default_value_t = 23,
        global = true,
        value_parser = clap::value_parser!(u32).range(8..=30)
    )]
    tt_bits: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the engine's move for a position
    Bestmove {
        /// Position in FEN (defaults to the starting position)
        #[arg(long)]
        fen: Option<String>,
        /// Time left on the engine's clock
        #[arg(long, default_value_t = 60_000)]
        remaining_ms: u64,
        /// Search depth cap
        #[arg(long)]
        depth: Option<u8>,
    },
    /// Play complete games and report the results
    Selfplay {
        #[arg(long, default_value_t = 1)]
        games: u32,
        /// Starting clock of each side
        #[arg(long, default_value_t = 60_000)]
        remaining_ms: u64,
        /// Who plays Black against the engine
        #[arg(long, value_enum, default_value_t = Opponent::Engine)]
        opponent: Opponent,
        /// Engine strength for both engine players
        #[arg(long, value_enum, default_value_t = Level::Hard)]
        level: Level,
        /// Random opponent seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop a game after this many plies
        #[arg(long, default_value_t = 300)]
        max_plies: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    Engine,
    Random,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
            Level::Expert => Difficulty::Expert,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let base = SearchConfig::default().with_tt_size_log2(cli.tt_bits);

    match cli.command {
        Command::Bestmove {
            fen,
            remaining_ms,
            depth,
        } => bestmove(base, fen.as_deref(), remaining_ms, depth),
        Command::Selfplay {
            games,
            remaining_ms,
            opponent,
            level,
            seed,
            max_plies,
        } => selfplay(
            base,
            games,
            remaining_ms,
            opponent,
            level.into(),
            seed,
            max_plies,
        ),
    }
}

fn bestmove(base: SearchConfig, fen: Option<&str>, remaining_ms: u64, depth: Option<u8>) -> Result<()> {
    let mut pos = match fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::default(),
    };
    let config = match depth {
        Some(depth) => base.with_max_depth(depth),
        None => base,
    };

    let mut engine = Engine::new(config);
    let clock = TurnClock::start(remaining_ms);
    let Some(mv) = engine.choose_move(&mut pos, &clock) else {
        bail!("no legal move in this position");
    };
    println!("bestmove {}", mv);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn selfplay(
    base: SearchConfig,
    games: u32,
    remaining_ms: u64,
    opponent: Opponent,
    difficulty: Difficulty,
    seed: u64,
    max_plies: u32,
) -> Result<()> {
    let mut white = NegamaxPlayer::new(difficulty, base.clone(), "White".to_string());
    let mut black: Box<dyn Player> = match opponent {
        Opponent::Engine => Box::new(NegamaxPlayer::new(difficulty, base, "Black".to_string())),
        Opponent::Random => Box::new(RandomPlayer::new(seed)),
    };

    let (mut white_wins, mut black_wins, mut draws) = (0, 0, 0);
    for game in 1..=games {
        let result = play_game(&mut white, black.as_mut(), remaining_ms, max_plies)
            .with_context(|| format!("game {game}"))?;
        match result {
            Some(GameResult::WhiteWins) => white_wins += 1,
            Some(GameResult::BlackWins) => black_wins += 1,
            _ => draws += 1,
        }
        println!("game {}: {}", game, describe(result));
    }

    println!(
        "{} - {} - {} (white wins, black wins, draws)",
        white_wins, black_wins, draws
    );
    Ok(())
}

/// One game with a chess clock per side. `None` if the ply cap ended it.
fn play_game<'a>(
    white: &mut (dyn Player + 'a),
    black: &mut (dyn Player + 'a),
    remaining_ms: u64,
    max_plies: u32,
) -> Result<Option<GameResult>> {
    let mut pos = Position::default();
    let mut clocks = [remaining_ms, remaining_ms];
    white.new_game();
    black.new_game();

    for _ in 0..max_plies {
        if let Some(result) = GameResult::of(&pos) {
            white.game_ended(result);
            black.game_ended(result);
            return Ok(Some(result));
        }

        let side = pos.side_to_move();
        let (player, left) = match side {
            Color::White => (&mut *white, &mut clocks[0]),
            Color::Black => (&mut *black, &mut clocks[1]),
        };

        let started = Instant::now();
        let clock = TurnClock::start(*left);
        let Some(mv) = player.get_move(&mut pos, &clock) else {
            bail!("{} returned no move in a live position", player.name());
        };
        let spent = started.elapsed().as_millis() as u64;
        if spent > *left {
            warn!("{} flagged after {} ms", player.name(), spent);
            let result = GameResult::from_winner(!side);
            return Ok(Some(result));
        }
        *left -= spent;

        info!("{} plays {} ({} ms, {} ms left)", player.name(), mv, spent, *left);
        pos.make_move(mv);
    }

    Ok(None)
}

fn describe(result: Option<GameResult>) -> &'static str {
    match result {
        Some(GameResult::WhiteWins) => "1-0",
        Some(GameResult::BlackWins) => "0-1",
        Some(GameResult::Draw) => "1/2-1/2 (draw)",
        Some(GameResult::Stalemate) => "1/2-1/2 (stalemate)",
        None => "unfinished (ply limit)",
    }
}
