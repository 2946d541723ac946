//! The bot facade front-ends talk to.
//!
//! Wraps [`Expectimax`] behind the small surface the assistant and self-play
//! harnesses need: hand in a board snapshot, a deck snapshot and the public
//! next-card hint, get back a direction (or nothing at game over).

use crate::deck::{DeckCounter, NextCard};
use crate::engine::{Board, Move};
use crate::eval::Evaluator;
use crate::expectimax::{Expectimax, SearchError};

/// A configured Threes player.
///
/// ```
/// use threes_ai::bot::Bot;
/// use threes_ai::deck::{DeckCounter, NextCard};
/// use threes_ai::engine::Board;
/// use threes_ai::eval::OpennessMatthew;
///
/// let bot = Bot::new(3, 2, Box::new(OpennessMatthew)).unwrap();
/// let board = Board::from_values([
///     1, 2, 0, 0, //
///     0, 6, 0, 0, //
///     0, 0, 3, 0, //
///     0, 0, 0, 0,
/// ])
/// .unwrap();
/// let dir = bot.get_next_move(board, DeckCounter::FULL, NextCard::One);
/// assert!(dir.is_some());
/// assert_eq!(bot.describe(), "3 / 2 / OpennessMatthew");
/// ```
pub struct Bot {
    search: Expectimax,
}

impl Bot {
    /// Build a bot searching `depth` plies with the given card-count
    /// horizon and evaluator. Fails synchronously on an invalid
    /// configuration.
    pub fn new(
        depth: u32,
        horizon: u32,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<Self, SearchError> {
        Ok(Bot {
            search: Expectimax::new(depth, horizon, evaluator)?,
        })
    }

    /// Best direction for the position, or `None` when nothing moves.
    pub fn get_next_move(
        &self,
        board: Board,
        deck: DeckCounter,
        next: NextCard,
    ) -> Option<Move> {
        self.search.best_move(board, deck, next).map(|best| best.dir)
    }

    /// Like [`Self::get_next_move`], also reporting the number of shifted
    /// positions the search evaluated.
    pub fn get_next_move_counted(
        &self,
        board: Board,
        deck: DeckCounter,
        next: NextCard,
    ) -> (Option<Move>, u64) {
        let (best, evals) = self.search.best_move_counted(board, deck, next);
        (best.map(|b| b.dir), evals)
    }

    /// Human-readable "depth / horizon / evaluator" string for logs and run
    /// traces.
    pub fn describe(&self) -> String {
        format!(
            "{} / {} / {}",
            self.search.depth(),
            self.search.horizon(),
            self.search.evaluator_name()
        )
    }
}
