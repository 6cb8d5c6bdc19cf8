//! Self-play game generation.
//!
//! Plays full games between two random players through the [`Game`]
//! controller and records placements, action sets, and the combat log of
//! every turn. Useful for soak-testing the rules and for producing replay
//! data.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::board::{BattleStats, PerPlayer, Placement, PlannedAction, PlayerSlot, ALL_PLAYERS};
use crate::config::{ConfigError, GameConfig};
use crate::error::GameError;
use crate::game::Game;
use crate::movegen::{random_actions, random_placement};
use crate::resolve::CombatEvent;

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Turns after which an unfinished game is abandoned.
    pub max_turns: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Rules configuration shared by every game. Its seed is replaced per game.
    pub game: GameConfig,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: 100,
            threads: 4,
            seed: 0,
            game: GameConfig::default(),
            quiet: false,
        }
    }
}

/// Errors that abort a self-play run.
#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error("invalid game config: {0}")]
    Config(#[from] ConfigError),

    #[error("game {game_id} rejected a generated submission: {source}")]
    Rules { game_id: usize, source: GameError },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("self-play worker thread panicked")]
    WorkerPanicked,
}

/// One resolved turn of a self-play game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    /// Action sets submitted by each player.
    pub actions: PerPlayer<Vec<PlannedAction>>,
    /// Combat log produced by resolution, rift included.
    pub events: Vec<CombatEvent>,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Engine seed the game ran with; replaying it reproduces every rift.
    pub seed: u64,
    pub placements: PerPlayer<Vec<Placement>>,
    /// All turn records in order.
    pub turns: Vec<TurnRecord>,
    /// The winning player, if a single commander survived.
    pub winner: Option<PlayerSlot>,
    /// False when the game hit the turn limit.
    pub finished: bool,
    /// Last turn that was resolved.
    pub final_turn: u32,
    pub stats: BattleStats,
}

fn rules_error(game_id: usize) -> impl Fn(GameError) -> SelfPlayError {
    move |source| SelfPlayError::Rules { game_id, source }
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, SelfPlayError> {
    let seed: u64 = rng.gen();
    let mut game = Game::new(config.game.clone().with_seed(seed))?;

    let mut placements: PerPlayer<Vec<Placement>> = PerPlayer::default();
    for player in ALL_PLAYERS {
        placements[player] = random_placement(player, &game.state().grid, rng);
        game.submit_placement(player, &placements[player])
            .map_err(rules_error(game_id))?;
    }

    let mut turns = Vec::new();
    while !game.state().is_finished() && game.state().turn_number <= config.max_turns {
        let mut actions: PerPlayer<Vec<PlannedAction>> = PerPlayer::default();
        for player in ALL_PLAYERS {
            actions[player] = random_actions(player, game.state(), rng);
            game.submit_moves(player, actions[player].clone())
                .map_err(rules_error(game_id))?;
        }

        let report = game.advance().map_err(rules_error(game_id))?;
        turns.push(TurnRecord { turn: report.turn, actions, events: report.events });
    }

    let state = game.into_state();
    Ok(GameRecord {
        game_id,
        seed,
        placements,
        final_turn: turns.last().map_or(0, |t: &TurnRecord| t.turn),
        turns,
        winner: state.winner,
        finished: state.is_finished(),
        stats: state.stats,
    })
}

/// Seeds the generator for game `i`. Each game gets its own stream so the
/// output does not depend on the thread count.
fn game_rng(config: &SelfPlayConfig, i: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(i as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn outcome_label(game: &GameRecord) -> String {
    match (game.winner, game.finished) {
        (Some(w), _) => format!("{w} wins"),
        (None, true) => "draw".to_string(),
        (None, false) => "turn limit".to_string(),
    }
}

/// Runs self-play generation, producing multiple game records ordered by ID.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    })?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs self-play generation, calling `on_game` with each completed game record.
///
/// This allows the caller to process games incrementally (e.g. write to disk)
/// rather than waiting for all games to finish. In parallel mode games
/// arrive in completion order.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    config.game.validate()?;
    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game_start = Instant::now();
        let mut rng = game_rng(config, i);
        let game = play_game(config, i, &mut rng)?;
        if !config.quiet {
            info!(
                "Game {}/{}: {} after {} turns ({:.2}s)",
                i + 1,
                config.num_games,
                outcome_label(&game),
                game.final_turn,
                game_start.elapsed().as_secs_f64(),
            );
        }
        on_game(game);
    }
    Ok(())
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker threads.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel::<Result<GameRecord, SelfPlayError>>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        let completed = AtomicUsize::new(0);
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let mut rng = game_rng(&config_clone, i);
                    let game_start = Instant::now();
                    let result = play_game(&config_clone, i, &mut rng);
                    if let (Ok(game), false) = (&result, config_clone.quiet) {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        info!(
                            "Game {}/{}: {} after {} turns ({:.2}s)",
                            n,
                            config_clone.num_games,
                            outcome_label(game),
                            game.final_turn,
                            game_start.elapsed().as_secs_f64(),
                        );
                    }
                    let _ = tx.send(result);
                });
        });
    });

    // Receive completed games on the calling thread and pass to callback.
    let mut first_error = None;
    for result in rx {
        match result {
            Ok(game) => on_game(game),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    handle.join().map_err(|_| SelfPlayError::WorkerPanicked)?;
    first_error.map_or(Ok(()), Err)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        write_game_json(game, out)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Writes a single game record as a JSON object.
pub fn write_game_json<W: Write>(game: &GameRecord, out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, game)?;
    Ok(())
}

/// Logs a summary of self-play results.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    let mut wins = PerPlayer::new(0usize, 0usize);
    let mut draws = 0usize;
    let mut unfinished = 0usize;
    let mut total_turns = 0u64;
    let mut total_rifts = 0u64;

    for game in games {
        total_turns += u64::from(game.final_turn);
        total_rifts += u64::from(game.stats.rifts);
        match (game.winner, game.finished) {
            (Some(w), _) => wins[w] += 1,
            (None, true) => draws += 1,
            (None, false) => unfinished += 1,
        }
    }

    let denom = total.max(1) as f64;
    info!("=== Self-Play Summary ===");
    info!("Games: {}", total);
    info!("Avg turns/game: {:.1}", total_turns as f64 / denom);
    info!("Avg rifts/game: {:.1}", total_rifts as f64 / denom);
    info!("Draws: {}", draws);
    info!("Hit turn limit: {}", unfinished);
    for (player, count) in wins.iter() {
        info!("  {:>10}: {} ({:.1}%)", player.to_string(), count, 100.0 * *count as f64 / denom);
    }
}
