//! Deck-aware Expectimax search for Threes.
//!
//! The search alternates MAX plies (the player picks a direction) with
//! CHANCE plies (the game places the incoming card) down to a fixed depth.
//! The top-level chance ply uses the public next-card hint; deeper plies
//! average over the deck counter while the depth descended from the root is
//! within the card-count horizon, and collapse to a deterministic recursion
//! beyond it.
//!
//! The root MAX node is forked into exactly two rayon tasks ({Left, Right}
//! and {Up, Down}); everything below runs sequentially with all per-node
//! state passed by value on the stack.
//!
//! Quick start
//! ```
//! use threes_ai::deck::{DeckCounter, NextCard};
//! use threes_ai::engine::Board;
//! use threes_ai::eval::Openness;
//! use threes_ai::expectimax::Expectimax;
//!
//! let search = Expectimax::new(3, 2, Box::new(Openness)).unwrap();
//! let board = Board::from_values([
//!     1, 2, 0, 0, //
//!     0, 3, 0, 0, //
//!     0, 0, 0, 0, //
//!     0, 0, 6, 0,
//! ])
//! .unwrap();
//! let best = search.best_move(board, DeckCounter::FULL, NextCard::Two);
//! assert!(best.is_some());
//! ```

mod search;

pub use search::{BestMove, Expectimax};

/// Invalid search configuration, reported synchronously at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search depth must be at least 1, got {0}")]
    DepthOutOfRange(u32),
    #[error("card-count horizon must be between 1 and the search depth {depth}, got {horizon}")]
    HorizonOutOfRange { depth: u32, horizon: u32 },
}
