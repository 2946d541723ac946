use crate::deck::{DeckCounter, NextCard};
use crate::engine::{self, Board, Move, SpawnCells};
use crate::eval::Evaluator;

use super::SearchError;

/// Smallest card index a bonus card can take (face value 6).
const BONUS_MIN_INDEX: u8 = 4;

/// The chosen direction and its expected quality.
#[derive(Debug, Clone, Copy)]
pub struct BestMove {
    pub dir: Move,
    pub quality: f32,
}

/// Depth-limited Expectimax with a partial-knowledge deck model.
///
/// Holds only configuration; every call is independent and keeps no state
/// between moves. Construction validates depth and horizon and warms the
/// engine tables.
pub struct Expectimax {
    depth: u32,
    horizon: u32,
    evaluator: Box<dyn Evaluator>,
}

impl Expectimax {
    /// Build a search with `depth` MAX plies and deck-aware chance plies for
    /// the first `horizon` cards (1 <= horizon <= depth).
    pub fn new(
        depth: u32,
        horizon: u32,
        evaluator: Box<dyn Evaluator>,
    ) -> Result<Self, SearchError> {
        if depth < 1 {
            return Err(SearchError::DepthOutOfRange(depth));
        }
        if horizon < 1 || horizon > depth {
            return Err(SearchError::HorizonOutOfRange { depth, horizon });
        }
        engine::new();
        Ok(Expectimax {
            depth,
            horizon,
            evaluator,
        })
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    #[inline]
    pub fn evaluator_name(&self) -> &'static str {
        self.evaluator.name()
    }

    /// Best direction for the current position, or `None` when no direction
    /// changes the board (game over).
    #[inline]
    pub fn best_move(
        &self,
        board: Board,
        deck: DeckCounter,
        next: NextCard,
    ) -> Option<BestMove> {
        self.best_move_counted(board, deck, next).0
    }

    /// Like [`Self::best_move`], also reporting how many shifted positions
    /// the search evaluated.
    pub fn best_move_counted(
        &self,
        board: Board,
        deck: DeckCounter,
        next: NextCard,
    ) -> (Option<BestMove>, u64) {
        // Fork once at the root and join; each worker carries its own
        // evaluation counter so nothing is shared inside the recursion.
        let (lr, ud) = rayon::join(
            || self.root_worker(board, deck, next, [Move::Left, Move::Right]),
            || self.root_worker(board, deck, next, [Move::Up, Move::Down]),
        );
        let best = match (lr.0, ud.0) {
            // Ties go to the earlier direction in Left, Right, Up, Down
            // order, which is always the left/right worker's pick.
            (Some(a), Some(b)) => Some(if b.quality > a.quality { b } else { a }),
            (a, b) => a.or(b),
        };
        (best, lr.1 + ud.1)
    }

    fn root_worker(
        &self,
        board: Board,
        deck: DeckCounter,
        next: NextCard,
        dirs: [Move; 2],
    ) -> (Option<BestMove>, u64) {
        let mut evals = 0u64;
        let mut best: Option<BestMove> = None;
        for dir in dirs {
            if let Some(quality) = self.root_move(board, deck, next, dir, &mut evals) {
                if best.map_or(true, |b| quality > b.quality) {
                    best = Some(BestMove { dir, quality });
                }
            }
        }
        (best, evals)
    }

    /// Expand one root direction: shift, then resolve the top-level chance
    /// ply from the hint. Returns `None` when the shift does not move.
    fn root_move(
        &self,
        board: Board,
        deck: DeckCounter,
        next: NextCard,
        dir: Move,
        evals: &mut u64,
    ) -> Option<f32> {
        let (shifted, spawns) = board.shift(dir);
        if shifted == board {
            return None;
        }
        *evals += 1;
        let depth_left = self.depth - 1;
        let horizon_left = self.horizon - 1;

        let quality = match next.card_index() {
            Some(card) => {
                // The hint card comes out of the same bag deeper plies
                // average over.
                let mut deck = deck;
                deck.remove(card);
                let mut sum = 0.0f32;
                let mut placements = 0u32;
                for cell in spawns.iter().filter(|c| !c.is_none()) {
                    let placed = shifted.set(cell.x as usize, cell.y as usize, card);
                    sum += self.max_node(placed, deck, depth_left, horizon_left, evals);
                    placements += 1;
                }
                sum / placements as f32
            }
            None => {
                // Bonus card: any index from 6 up to an eighth of the
                // current maximum, uniform over (value, cell) pairs. The
                // deck is not consulted.
                let top = board.max_card_index().saturating_sub(3);
                let mut sum = 0.0f32;
                let mut placements = 0u32;
                for card in BONUS_MIN_INDEX..=top {
                    for cell in spawns.iter().filter(|c| !c.is_none()) {
                        let placed = shifted.set(cell.x as usize, cell.y as usize, card);
                        sum += self.max_node(placed, deck, depth_left, horizon_left, evals);
                        placements += 1;
                    }
                }
                if placements == 0 {
                    // No representable bonus below a 48; recurse once on the
                    // bare shifted board instead of dividing by zero.
                    self.max_node(shifted, deck, depth_left, horizon_left, evals)
                } else {
                    sum / placements as f32
                }
            }
        };
        Some(quality)
    }

    /// MAX ply: best of the legal directions, or the evaluator when the
    /// depth is exhausted or no direction moves.
    fn max_node(
        &self,
        board: Board,
        deck: DeckCounter,
        depth_left: u32,
        horizon_left: u32,
        evals: &mut u64,
    ) -> f32 {
        if depth_left == 0 {
            return self.evaluator.evaluate(board);
        }
        let mut best: Option<f32> = None;
        for dir in Move::ALL {
            let (shifted, spawns) = board.shift(dir);
            if shifted == board {
                continue;
            }
            *evals += 1;
            let q = self.chance_node(shifted, &spawns, deck, depth_left - 1, horizon_left, evals);
            best = Some(best.map_or(q, |b| b.max(q)));
        }
        best.unwrap_or_else(|| self.evaluator.evaluate(board))
    }

    /// CHANCE ply below the root: the next card is unknown. Within the
    /// card-count horizon, average over the deck's card values (weighted by
    /// their remaining counts) and every spawn cell; beyond it, the
    /// placement is treated as deterministic and the recursion continues on
    /// the bare shifted board.
    fn chance_node(
        &self,
        board: Board,
        spawns: &SpawnCells,
        deck: DeckCounter,
        depth_left: u32,
        horizon_left: u32,
        evals: &mut u64,
    ) -> f32 {
        if horizon_left == 0 {
            return self.max_node(board, deck, depth_left, 0, evals);
        }
        let mut sum = 0.0f32;
        let mut weight = 0.0f32;
        for card in 1..=3u8 {
            let count = deck.count(card);
            if count == 0 {
                continue;
            }
            let mut next_deck = deck;
            next_deck.remove(card);
            let w = count as f32;
            for cell in spawns.iter().filter(|c| !c.is_none()) {
                let placed = board.set(cell.x as usize, cell.y as usize, card);
                sum += w * self.max_node(placed, next_deck, depth_left, horizon_left - 1, evals);
                weight += w;
            }
        }
        // A successful shift guarantees a spawn cell and the deck never
        // goes empty, so the weight is positive.
        sum / weight
    }
}
