//! twenty48: a single-player 2048 game
//!
//! This crate provides:
//! - A `Board` type with the pure rules (`apply_move`, `collapse_line`, `is_terminal`, ...)
//! - An explicit `GameState` value with the Playing/GameOver state machine (`game` module)
//! - Key mapping and a crossterm frontend (`input`, `tui` modules)
//! - A headless random-play runner (`sim` module)
//!
//! Quick start:
//! ```
//! use twenty48::engine::{Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let out = b0.apply(Move::Left);
//! assert_eq!(out.board.tile_sum(), b0.tile_sum());
//! ```
//!
//! Full loop
//! ```
//! use twenty48::engine::Move;
//! use twenty48::game::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut state = GameState::new(&mut rng);
//! let mut turns = 0;
//! while !state.is_over() && turns < 16 {
//!     let out = state.step(Move::ALL[turns % 4], &mut rng);
//!     if out.game_over {
//!         println!("Game Over! score {}", out.state.score);
//!     }
//!     state = out.state;
//!     turns += 1;
//! }
//! assert!(state.moves > 0);
//! ```
//!
pub mod engine;
pub mod game;
pub mod input;
pub mod sim;
pub mod tui;
