//! Explicit game state and its Playing/GameOver state machine.
//!
//! A [`GameState`] is a plain `Copy` value. Transitions take `&self` and hand
//! back a new state, so the frontend owns the only mutable binding and simply
//! re-renders whatever it gets back.

use rand::Rng;
use tracing::{debug, info, trace};

use crate::engine::{Board, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub score: u64,
    pub phase: Phase,
    /// Effective moves made in this game.
    pub moves: u32,
}

/// What happened when a direction was applied to a [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub state: GameState,
    /// The move changed the board (and a tile was spawned).
    pub moved: bool,
    pub score_delta: u64,
    /// Set only on the step that entered [`Phase::GameOver`].
    pub game_over: bool,
}

impl GameState {
    /// Fresh game: empty board seeded with two random tiles, score 0.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let board = Board::EMPTY.with_random_tile(rng).with_random_tile(rng);
        info!(cells = ?board.cells(), "new game");
        GameState { board, score: 0, phase: Phase::Playing, moves: 0 }
    }

    /// Resume from an arbitrary position.
    ///
    /// The phase is always `Playing`; game over is only ever entered by a move.
    pub fn from_board(board: Board, score: u64) -> Self {
        GameState { board, score, phase: Phase::Playing, moves: 0 }
    }

    /// Throw the current game away and start over.
    pub fn restart<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        info!(previous_score = self.score, previous_moves = self.moves, "restart");
        GameState::new(rng)
    }

    #[inline]
    pub fn is_over(&self) -> bool { self.phase == Phase::GameOver }

    /// Apply one directional input.
    ///
    /// Blocked moves and any input after game over are no-ops: the state is
    /// returned unchanged, nothing is spawned and no terminal check runs.
    /// An effective move spawns one tile and then checks for game over.
    ///
    /// ```
    /// use twenty48::engine::{Board, Move};
    /// use twenty48::game::GameState;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(5);
    /// let s = GameState::from_board(Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]), 0);
    /// let out = s.step(Move::Left, &mut rng);
    /// assert!(out.moved);
    /// assert_eq!(out.state.score, 4);
    /// ```
    pub fn step<R: Rng + ?Sized>(&self, dir: Move, rng: &mut R) -> StepOutcome {
        if self.is_over() {
            trace!(%dir, "input after game over ignored");
            return self.unchanged();
        }
        let outcome = self.board.apply(dir);
        if !outcome.moved {
            trace!(%dir, "blocked move ignored");
            return self.unchanged();
        }

        let mut board = outcome.board;
        board.spawn_random_tile(rng);
        let mut next = GameState {
            board,
            score: self.score + outcome.score_delta,
            phase: Phase::Playing,
            moves: self.moves + 1,
        };
        debug!(%dir, score_delta = outcome.score_delta, score = next.score, "move");

        let game_over = board.is_terminal();
        if game_over {
            next.phase = Phase::GameOver;
            info!(score = next.score, highest_tile = board.highest_tile(), moves = next.moves, "game over");
        }
        StepOutcome { state: next, moved: true, score_delta: outcome.score_delta, game_over }
    }

    fn unchanged(&self) -> StepOutcome {
        StepOutcome { state: *self, moved: false, score_delta: 0, game_over: false }
    }
}
