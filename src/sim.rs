//! Headless random-play runner.
//!
//! Plays an optional scripted opening, then uniformly random legal moves,
//! through the public [`GameState`] API.
//! Useful as a smoke test for the engine and for eyeballing score
//! distributions; it is not meant to play well.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Board, Move};
use crate::game::GameState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub score: u64,
    pub highest_tile: u32,
    pub moves: u32,
    /// Reached game over (as opposed to hitting the move cap).
    pub finished: bool,
    pub board: Board,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub games: usize,
    pub mean_score: f64,
    pub max_score: u64,
    pub mean_moves: f64,
    /// Highest tile reached -> number of games.
    pub highest_tiles: BTreeMap<u32, usize>,
}

impl SimReport {
    pub fn from_summaries(summaries: &[GameSummary]) -> Self {
        let games = summaries.len();
        let denom = games.max(1) as f64;
        let mut highest_tiles = BTreeMap::new();
        for s in summaries {
            *highest_tiles.entry(s.highest_tile).or_insert(0) += 1;
        }
        SimReport {
            games,
            mean_score: summaries.iter().map(|s| s.score as f64).sum::<f64>() / denom,
            max_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
            mean_moves: summaries.iter().map(|s| s.moves as f64).sum::<f64>() / denom,
            highest_tiles,
        }
    }
}

/// Play `opening` in order, then random legal moves, from a fresh game until
/// game over or `max_moves` effective moves.
///
/// Blocked opening moves are no-ops, exactly as for a player.
pub fn play_random<R: Rng + ?Sized>(rng: &mut R, opening: &[Move], max_moves: Option<u32>) -> GameState {
    let mut state = GameState::new(rng);
    for &dir in opening {
        if state.is_over() || max_moves.is_some_and(|cap| state.moves >= cap) {
            return state;
        }
        state = state.step(dir, rng).state;
    }
    while !state.is_over() {
        if max_moves.is_some_and(|cap| state.moves >= cap) {
            break;
        }
        let legal = state.board.legal_moves();
        let Some(&dir) = legal.choose(rng) else { break };
        state = state.step(dir, rng).state;
    }
    state
}

/// One reproducible game from `seed`.
pub fn simulate_game(seed: u64, opening: &[Move], max_moves: Option<u32>) -> GameSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let state = play_random(&mut rng, opening, max_moves);
    debug!(seed, score = state.score, moves = state.moves, "simulated game");
    GameSummary {
        seed,
        score: state.score,
        highest_tile: state.board.highest_tile(),
        moves: state.moves,
        finished: state.is_over(),
        board: state.board,
    }
}

/// Run `games` independent games in parallel; game `i` uses seed `seed + i`.
///
/// `on_done` is called from worker threads as each game finishes. Results
/// come back in seed order regardless of completion order.
pub fn simulate_many<F>(games: u64, seed: u64, opening: &[Move], max_moves: Option<u32>, on_done: F) -> Vec<GameSummary>
where
    F: Fn(&GameSummary) + Sync,
{
    (0..games)
        .into_par_iter()
        .map(|i| {
            let summary = simulate_game(seed.wrapping_add(i), opening, max_moves);
            on_done(&summary);
            summary
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn random_game_runs_to_completion() {
        let s = simulate_game(42, &[], None);
        assert!(s.finished);
        assert!(s.moves > 0);
        assert!(s.highest_tile >= 4);
        assert!(s.score > 0);
    }

    #[test]
    fn simulate_game_is_deterministic() {
        assert_eq!(simulate_game(1234, &[], None), simulate_game(1234, &[], None));
    }

    #[test]
    fn move_cap_is_respected() {
        let s = simulate_game(5, &[], Some(3));
        assert_eq!(s.moves, 3);
        assert!(!s.finished);
    }

    #[test]
    fn simulate_many_matches_sequential() {
        let calls = AtomicUsize::new(0);
        let par = simulate_many(8, 100, &[], Some(200), |_| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 8);
        let seq: Vec<GameSummary> = (0..8).map(|i| simulate_game(100 + i, &[], Some(200))).collect();
        assert_eq!(par, seq);
    }

    #[test]
    fn opening_is_played_before_random_moves() {
        let opening = [Move::Left, Move::Left, Move::Up, Move::Right];

        // Fresh game plus the opening, by hand.
        let mut rng = StdRng::seed_from_u64(17);
        let mut expected = GameState::new(&mut rng);
        for &dir in &opening {
            expected = expected.step(dir, &mut rng).state;
        }
        assert!(expected.moves > 0);

        // Capping at the opening's effective moves leaves no room for random play.
        let mut rng = StdRng::seed_from_u64(17);
        let played = play_random(&mut rng, &opening, Some(expected.moves));
        assert_eq!(played, expected);
    }

    #[test]
    fn summary_carries_final_board() {
        let s = simulate_game(9, &[], None);
        assert!(s.board.is_terminal());
        assert_eq!(s.board.highest_tile(), s.highest_tile);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["board"].as_array().map(|rows| rows.len()), Some(4));
        let back: GameSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn report_aggregates() {
        let summaries = vec![
            GameSummary { seed: 0, score: 100, highest_tile: 64, moves: 50, finished: true, board: Board::EMPTY },
            GameSummary { seed: 1, score: 300, highest_tile: 128, moves: 150, finished: true, board: Board::EMPTY },
            GameSummary { seed: 2, score: 200, highest_tile: 64, moves: 100, finished: false, board: Board::EMPTY },
        ];
        let r = SimReport::from_summaries(&summaries);
        assert_eq!(r.games, 3);
        assert_eq!(r.max_score, 300);
        assert!((r.mean_score - 200.0).abs() < 1e-9);
        assert!((r.mean_moves - 100.0).abs() < 1e-9);
        assert_eq!(r.highest_tiles.get(&64), Some(&2));
        assert_eq!(r.highest_tiles.get(&128), Some(&1));

        let empty = SimReport::from_summaries(&[]);
        assert_eq!(empty.games, 0);
        assert_eq!(empty.mean_score, 0.0);
    }
}
