//! threes-ai: a Threes game engine + deck-aware Expectimax policy
//!
//! This crate provides:
//! - A packed `Board` type with the Threes shift/merge rules (`engine`)
//! - The card ladder tables (`cards`) and the deck model (`deck`)
//! - Hand-coded board evaluators behind a small trait (`eval`)
//! - A deck-aware Expectimax search and a bot facade (`expectimax`, `bot`)
//! - Self-play simulation and a binary run-trace format (`selfplay`, `trace`)
//!
//! Quick start:
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use threes_ai::bot::Bot;
//! use threes_ai::eval::Openness;
//! use threes_ai::selfplay::Game;
//!
//! // Keep doctests fast: a shallow search is plenty to demonstrate flow.
//! let bot = Bot::new(2, 1, Box::new(Openness)).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::new(&mut rng);
//!
//! let mut moves = 0u32;
//! while !game.is_over() && moves < 4 {
//!     match bot.get_next_move(game.board(), game.deck(), game.hint()) {
//!         Some(dir) => {
//!             game.advance(dir, &mut rng);
//!             moves += 1;
//!         }
//!         None => break,
//!     }
//! }
//! assert!(moves > 0);
//! let _final_score = game.score();
//! ```
//!
//! The search itself is deterministic; randomness only enters through the
//! self-play simulation's RNG. For reproducible games seed the RNG as above.
//!
//! Driving the search directly (no simulation):
//! ```
//! use threes_ai::deck::{DeckCounter, NextCard};
//! use threes_ai::engine::Board;
//! use threes_ai::eval::OpennessMatthew;
//! use threes_ai::expectimax::Expectimax;
//!
//! let search = Expectimax::new(3, 2, Box::new(OpennessMatthew)).unwrap();
//! let board = Board::from_values([
//!     1, 2, 0, 0, //
//!     0, 6, 0, 0, //
//!     3, 0, 0, 0, //
//!     0, 0, 0, 12,
//! ])
//! .unwrap();
//! let best = search.best_move(board, DeckCounter::FULL, NextCard::Three).unwrap();
//! assert!(!board.shift(best.dir).0.is_game_over());
//! ```

pub mod bot;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod eval;
pub mod expectimax;
pub mod selfplay;
pub mod trace;
