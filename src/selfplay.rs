//! Self-play game simulation.
//!
//! Drives full games of Threes against the real dealing rules: a nine-card
//! opening, basic cards drawn from the bag the [`DeckCounter`] models, and
//! the occasional high-value bonus card once a 48 is on the board. The bot
//! only ever sees what a human player would: the board, the deck counts and
//! the public next-card hint.
//!
//! All randomness comes through a caller-supplied RNG, so games are
//! deterministic under a seeded `StdRng`.
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use threes_ai::selfplay::Game;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let game = Game::new(&mut rng);
//! assert_eq!(game.board().count_occupied(), 9);
//! ```

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards;
use crate::deck::{DeckCounter, NextCard};
use crate::engine::{Board, Move, SpawnCell};

/// Lowest card index that can appear as a bonus card (face value 6).
const BONUS_MIN_INDEX: u8 = 4;

/// Bonus cards start appearing once this card is on the board (a 48).
const BONUS_THRESHOLD_INDEX: u8 = 7;

/// One bonus draw in this many, once eligible.
const BONUS_ODDS: u32 = 21;

/// Cards dealt before the first move.
const OPENING_CARDS: usize = 9;

/// A Threes game in progress.
///
/// The game knows the concrete next card; [`Self::hint`] narrows it to the
/// information the player (and therefore the bot) is allowed to see.
#[derive(Debug, Clone, Copy)]
pub struct Game {
    board: Board,
    deck: DeckCounter,
    next_card: u8,
}

impl Game {
    /// Deal a fresh game: nine basic cards from a full bag onto distinct
    /// random cells, then draw the first next-card.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        crate::engine::new();
        let mut deck = DeckCounter::FULL;
        let mut board = Board::EMPTY;
        let mut cells: [u8; 16] = std::array::from_fn(|i| i as u8);
        cells.shuffle(rng);
        for &cell in cells.iter().take(OPENING_CARDS) {
            let card = draw_basic(deck, rng);
            deck.remove(card);
            board = board.set((cell % 4) as usize, (cell / 4) as usize, card);
        }
        let next_card = draw_next(board, deck, rng);
        Game {
            board,
            deck,
            next_card,
        }
    }

    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn deck(&self) -> DeckCounter {
        self.deck
    }

    /// The public hint for the next card.
    #[inline]
    pub fn hint(&self) -> NextCard {
        NextCard::from_card_index(self.next_card)
    }

    /// True when no direction moves.
    pub fn is_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn score(&self) -> u64 {
        self.board.total_score()
    }

    /// Face value of the highest card on the board.
    pub fn highest_card(&self) -> u32 {
        cards::value(self.board.max_card_index())
    }

    /// Shift in `dir`, drop the pending card into a random candidate cell
    /// and draw the following one. Returns false (leaving the game
    /// untouched) when the shift does not move.
    pub fn advance<R: Rng + ?Sized>(&mut self, dir: Move, rng: &mut R) -> bool {
        let (shifted, spawns) = self.board.shift(dir);
        if shifted == self.board {
            return false;
        }
        let mut candidates = [SpawnCell::NONE; 4];
        let mut n = 0;
        for cell in spawns {
            if !cell.is_none() {
                candidates[n] = cell;
                n += 1;
            }
        }
        let cell = candidates[rng.gen_range(0..n)];
        self.board = shifted.set(cell.x as usize, cell.y as usize, self.next_card);
        self.deck.remove(self.next_card);
        self.next_card = draw_next(self.board, self.deck, rng);
        true
    }
}

/// Pick a basic card from the bag without removing it, weighted by the
/// remaining counts. The counter invariant keeps the bag non-empty.
fn draw_basic<R: Rng + ?Sized>(deck: DeckCounter, rng: &mut R) -> u8 {
    let pick = rng.gen_range(0..deck.total());
    if pick < deck.ones() {
        1
    } else if pick < deck.ones() + deck.twos() {
        2
    } else {
        3
    }
}

/// Draw the card that will follow the current one: usually a basic card
/// from the bag, occasionally a bonus once the board carries a 48. The
/// bonus value is fixed at draw time, uniform over the legal range.
fn draw_next<R: Rng + ?Sized>(board: Board, deck: DeckCounter, rng: &mut R) -> u8 {
    let max = board.max_card_index();
    if max >= BONUS_THRESHOLD_INDEX && rng.gen_range(0..BONUS_ODDS) == 0 {
        return rng.gen_range(BONUS_MIN_INDEX..=max - 3);
    }
    draw_basic(deck, rng)
}
