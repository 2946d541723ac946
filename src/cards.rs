//! The Threes card ladder.
//!
//! Cards are stored everywhere else in the crate as 4-bit indices. Index 0 is
//! an empty cell, indices 1 and 2 are the 1 and 2 cards, and index k >= 3 is
//! the card with face value `3 * 2^(k-3)`. These tables are the authoritative
//! mapping between the three representations (index, face value, score).

/// Number of distinct cell encodings (empty + 15 cards).
pub const NUM_CARDS: usize = 16;

/// Index of the highest card representable in a 4-bit cell (face value 12288).
pub const MAX_CARD_INDEX: u8 = 15;

/// Face value for each card index.
pub const VALUES: [u32; NUM_CARDS] = [
    0, 1, 2, 3, 6, 12, 24, 48, 96, 192, 384, 768, 1536, 3072, 6144, 12288,
];

/// End-of-game score for each card index: 0 below the 3 card, 3^(k-2) from
/// there up.
pub const SCORES: [u64; NUM_CARDS] = [
    0, 0, 0, 3, 9, 27, 81, 243, 729, 2187, 6561, 19683, 59049, 177147, 531441, 1594323,
];

/// Face value of a card index.
#[inline]
pub fn value(index: u8) -> u32 {
    VALUES[index as usize]
}

/// End-of-game score of a card index.
#[inline]
pub fn score(index: u8) -> u64 {
    SCORES[index as usize]
}

/// Reverse lookup: face value to card index. Returns `None` for values not on
/// the ladder (0 maps to index 0, the empty cell).
#[inline]
pub fn index_of_value(value: u32) -> Option<u8> {
    VALUES.iter().position(|&v| v == value).map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_doubles_from_three() {
        for k in 4..NUM_CARDS {
            assert_eq!(VALUES[k], VALUES[k - 1] * 2, "index {}", k);
        }
        assert_eq!(value(3), 3);
        assert_eq!(value(15), 12288);
    }

    #[test]
    fn scores_are_powers_of_three() {
        assert_eq!(score(0), 0);
        assert_eq!(score(1), 0);
        assert_eq!(score(2), 0);
        for k in 3..NUM_CARDS {
            assert_eq!(SCORES[k], 3u64.pow(k as u32 - 2), "index {}", k);
        }
    }

    #[test]
    fn reverse_lookup_round_trips() {
        for idx in 0..NUM_CARDS as u8 {
            assert_eq!(index_of_value(value(idx)), Some(idx));
        }
        assert_eq!(index_of_value(4), None);
        assert_eq!(index_of_value(5), None);
        assert_eq!(index_of_value(24576), None);
    }
}
