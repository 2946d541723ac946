//! Board quality evaluators.
//!
//! Every evaluator is a pure function from a packed board to a quality
//! score. The search calls them from multiple rayon workers at once, so the
//! trait demands `Send + Sync` and implementations keep no state.

use crate::engine::{self, Board};

/// A board-quality capability: packed board in, scalar quality out.
pub trait Evaluator: Send + Sync {
    /// Short name for diagnostic strings ("depth / horizon / evaluator").
    fn name(&self) -> &'static str;

    /// Quality of `board`. Pure: equal boards give bitwise-equal results.
    fn evaluate(&self, board: Board) -> f32;
}

/// Always zero. Baseline for tests: with no signal, the search must still
/// pick the first legal direction in tie-break order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Zero;

impl Evaluator for Zero {
    fn name(&self) -> &'static str {
        "Zero"
    }

    fn evaluate(&self, _board: Board) -> f32 {
        0.0
    }
}

/// The board's end-of-game score.
#[derive(Debug, Default, Clone, Copy)]
pub struct TotalScore;

impl Evaluator for TotalScore {
    fn name(&self) -> &'static str {
        "TotalScore"
    }

    fn evaluate(&self, board: Board) -> f32 {
        board.total_score() as f32
    }
}

/// Number of empty cells.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySpaces;

impl Evaluator for EmptySpaces {
    fn name(&self) -> &'static str {
        "EmptySpaces"
    }

    fn evaluate(&self, board: Board) -> f32 {
        board.count_empty() as f32
    }
}

/// Weights shared by the two openness evaluators.
struct OpennessWeights {
    empty: i32,
    mergeable_neighbor: i32,
    trapped_axis: i32,
    next_up_neighbor: i32,
}

/// Prefers empty cells, mergeable neighbors, an unbroken ladder, and cells
/// that are not walled in on an axis.
#[derive(Debug, Default, Clone, Copy)]
pub struct Openness;

impl Evaluator for Openness {
    fn name(&self) -> &'static str {
        "Openness"
    }

    fn evaluate(&self, board: Board) -> f32 {
        openness_base(
            board,
            &OpennessWeights {
                empty: 2,
                mergeable_neighbor: 1,
                trapped_axis: -1,
                next_up_neighbor: 1,
            },
        ) as f32
    }
}

/// Openness with heavier weights plus edge-hugging bonuses for the top of
/// the ladder: the highest card wants a wall (ideally a corner), its two
/// predecessors want to sit next to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpennessMatthew;

impl Evaluator for OpennessMatthew {
    fn name(&self) -> &'static str {
        "OpennessMatthew"
    }

    fn evaluate(&self, board: Board) -> f32 {
        let mut total = openness_base(
            board,
            &OpennessWeights {
                empty: 3,
                mergeable_neighbor: 2,
                trapped_axis: -5,
                next_up_neighbor: 2,
            },
        );

        let max = board.max_card_index();
        if max > 4 {
            for y in 0..4 {
                for x in 0..4 {
                    let card = board.get(x, y);
                    if card == max {
                        total += 3 * edges_touched(x, y);
                    } else if card == max - 1 && has_neighbor(board, x, y, max) {
                        total += 1 + edges_touched(x, y);
                    } else if card == max - 2 && near_ladder_top(board, x, y, max) {
                        total += 1;
                    }
                }
            }
        }
        total as f32
    }
}

fn openness_base(board: Board, weights: &OpennessWeights) -> i32 {
    let mut total = 0;
    for y in 0..4 {
        for x in 0..4 {
            let card = board.get(x, y);
            if card == 0 {
                total += weights.empty;
                continue;
            }
            for (nx, ny) in neighbors(x, y) {
                let other = board.get(nx, ny);
                if other != 0 && engine::can_cards_merge(other, card) {
                    total += weights.mergeable_neighbor;
                }
            }
            if trapped(board, card, x, y, 1, 0) {
                total += weights.trapped_axis;
            }
            if trapped(board, card, x, y, 0, 1) {
                total += weights.trapped_axis;
            }
            if card >= 3 && has_neighbor(board, x, y, card + 1) {
                total += weights.next_up_neighbor;
            }
        }
    }
    total
}

/// Blocked on both sides of an axis, by the wall or by a larger card that
/// cannot merge with this one (index >= 3 and greater than ours).
fn trapped(board: Board, card: u8, x: usize, y: usize, dx: usize, dy: usize) -> bool {
    let blocked = |nx: Option<usize>, ny: Option<usize>| match (nx, ny) {
        (Some(nx), Some(ny)) if nx < 4 && ny < 4 => {
            let other = board.get(nx, ny);
            other >= 3 && other > card
        }
        _ => true, // off the board
    };
    blocked(x.checked_sub(dx), y.checked_sub(dy)) && blocked(x.checked_add(dx), y.checked_add(dy))
}

fn has_neighbor(board: Board, x: usize, y: usize, card: u8) -> bool {
    neighbors(x, y).any(|(nx, ny)| board.get(nx, ny) == card)
}

/// True for a cell two rungs below the top whose max-1 neighbor itself
/// touches the max card.
fn near_ladder_top(board: Board, x: usize, y: usize, max: u8) -> bool {
    neighbors(x, y)
        .any(|(nx, ny)| board.get(nx, ny) == max - 1 && has_neighbor(board, nx, ny, max))
}

fn edges_touched(x: usize, y: usize) -> i32 {
    let mut edges = 0;
    if x == 0 || x == 3 {
        edges += 1;
    }
    if y == 0 || y == 3 {
        edges += 1;
    }
    edges
}

fn neighbors(x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
    const OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if (0..4).contains(&nx) && (0..4).contains(&ny) {
            Some((nx as usize, ny as usize))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;

    fn b(values: [u32; 16]) -> Board {
        Board::from_values(values).unwrap()
    }

    #[test]
    fn zero_is_zero() {
        engine::new();
        assert_eq!(Zero.evaluate(Board::EMPTY), 0.0);
        assert_eq!(Zero.evaluate(Board::from_raw(u64::MAX)), 0.0);
    }

    #[test]
    fn empty_spaces_extremes() {
        engine::new();
        assert_eq!(EmptySpaces.evaluate(Board::EMPTY), 16.0);
        let full = b([
            1, 2, 1, 2, //
            2, 1, 2, 1, //
            1, 2, 1, 2, //
            2, 1, 2, 1,
        ]);
        assert_eq!(EmptySpaces.evaluate(full), 0.0);
    }

    #[test]
    fn total_score_matches_board() {
        engine::new();
        let board = b([
            3, 6, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 96, //
            0, 0, 0, 0,
        ]);
        assert_eq!(TotalScore.evaluate(board), (3 + 9 + 729) as f32);
    }

    #[test]
    fn openness_empty_board() {
        engine::new();
        // 16 empty cells at +2 each.
        assert_eq!(Openness.evaluate(Board::EMPTY), 32.0);
    }

    #[test]
    fn openness_single_pair() {
        engine::new();
        // A 1 and a 2 side by side at the top-left corner.
        let board = b([
            1, 2, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ]);
        // 14 empties (+28); each card has one mergeable neighbor (+2);
        // nothing is trapped (no larger cards anywhere); no ladder bonus
        // below index 3.
        assert_eq!(Openness.evaluate(board), 30.0);
    }

    #[test]
    fn openness_trapped_cell() {
        engine::new();
        // The 1 sits between the wall and a 6: horizontally trapped.
        let board = b([
            1, 6, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ]);
        // 14 empties (+28), no mergeable pairs, the 1 loses its horizontal
        // axis (-1). The 6 is not trapped: its right neighbor is empty.
        assert_eq!(Openness.evaluate(board), 27.0);
    }

    #[test]
    fn openness_ladder_bonus() {
        engine::new();
        // 6 next to 12: the 6 sees its next rung (+1). They cannot merge.
        let board = b([
            6, 12, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ]);
        // 14 empties (+28); the 6 is horizontally trapped by wall+12 (-1)
        // but gains the ladder bonus (+1); the 12 is not trapped and has no
        // rung above it on the board.
        assert_eq!(Openness.evaluate(board), 28.0);
    }

    #[test]
    fn openness_matthew_edge_bonuses() {
        engine::new();
        // Max card 24 (index 6) in the corner, 12 next to it, 6 below the 12.
        let board = b([
            24, 12, 0, 0, //
            0, 6, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ]);
        // Base: 13 empties (+39); no mergeable pairs (24/12 and 12/6 do not
        // merge); no cell is trapped (every card has an empty cell or a
        // smaller card on one side of each axis).
        // Ladder: 12 sees 24 (+2), 6 sees 12 (+2).
        // Top-of-ladder extras (max 24 at (0,0)): corner touches two edges
        // (+6); the 12 neighbors the max (+1) and touches the top edge (+1);
        // the 6 neighbors a 12 which touches the 24 (+1).
        assert_eq!(OpennessMatthew.evaluate(board), 39.0 + 2.0 + 2.0 + 6.0 + 1.0 + 1.0 + 1.0);
    }

    #[test]
    fn evaluators_are_pure() {
        engine::new();
        let board = b([
            1, 2, 3, 6, //
            0, 12, 0, 0, //
            0, 0, 48, 0, //
            2, 0, 0, 96,
        ]);
        let evals: [&dyn Evaluator; 5] =
            [&Zero, &TotalScore, &EmptySpaces, &Openness, &OpennessMatthew];
        for eval in evals {
            let a = eval.evaluate(board);
            let b = eval.evaluate(board);
            assert_eq!(a.to_bits(), b.to_bits(), "{}", eval.name());
        }
    }
}
