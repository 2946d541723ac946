//! The bag of basic cards and the public next-card hint.
//!
//! Threes draws 1/2/3 cards from a twelve-card bag without replacement and
//! reshuffles when the bag empties. The search only needs the three counts,
//! so the whole deck model is a copy-by-value triple.

/// Counts of the basic cards left in the bag.
///
/// Invariant: the counter never goes empty. Any removal that would drain the
/// last card refills the bag to four of each, mirroring the reshuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckCounter {
    ones: u8,
    twos: u8,
    threes: u8,
}

impl DeckCounter {
    /// A freshly shuffled bag: four of each basic card.
    pub const FULL: DeckCounter = DeckCounter {
        ones: 4,
        twos: 4,
        threes: 4,
    };

    pub fn new(ones: u8, twos: u8, threes: u8) -> Self {
        DeckCounter { ones, twos, threes }.refilled()
    }

    /// Count the 1/2/3 cards in a logical deck of face values. Other values
    /// (bonus cards) are ignored.
    pub fn from_values(values: &[u32]) -> Self {
        let mut deck = DeckCounter {
            ones: 0,
            twos: 0,
            threes: 0,
        };
        for &v in values {
            match v {
                1 => deck.ones += 1,
                2 => deck.twos += 1,
                3 => deck.threes += 1,
                _ => {}
            }
        }
        deck.refilled()
    }

    #[inline]
    pub fn ones(self) -> u8 {
        self.ones
    }

    #[inline]
    pub fn twos(self) -> u8 {
        self.twos
    }

    #[inline]
    pub fn threes(self) -> u8 {
        self.threes
    }

    /// Cards left in the bag.
    #[inline]
    pub fn total(self) -> u8 {
        self.ones + self.twos + self.threes
    }

    /// Count for a card index in 1..=3; zero for anything else.
    #[inline]
    pub fn count(self, card: u8) -> u8 {
        match card {
            1 => self.ones,
            2 => self.twos,
            3 => self.threes,
            _ => 0,
        }
    }

    pub fn remove_one(&mut self) {
        self.ones = self.ones.saturating_sub(1);
        *self = self.refilled();
    }

    pub fn remove_two(&mut self) {
        self.twos = self.twos.saturating_sub(1);
        *self = self.refilled();
    }

    pub fn remove_three(&mut self) {
        self.threes = self.threes.saturating_sub(1);
        *self = self.refilled();
    }

    /// Remove one card by index. Indices outside 1..=3 (the empty cell and
    /// bonus cards) are a no-op, so callers can feed every drawn card
    /// through here.
    pub fn remove(&mut self, card: u8) {
        match card {
            1 => self.remove_one(),
            2 => self.remove_two(),
            3 => self.remove_three(),
            _ => {}
        }
    }

    #[inline]
    fn refilled(self) -> Self {
        if self.total() == 0 {
            DeckCounter::FULL
        } else {
            self
        }
    }
}

impl Default for DeckCounter {
    fn default() -> Self {
        DeckCounter::FULL
    }
}

/// What the game publicly reveals about the next card: its value when it is
/// a basic card, otherwise only the fact that a bonus card is coming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextCard {
    One,
    Two,
    Three,
    Bonus,
}

impl NextCard {
    /// The known card index for a basic hint; `None` for a bonus card.
    #[inline]
    pub fn card_index(self) -> Option<u8> {
        match self {
            NextCard::One => Some(1),
            NextCard::Two => Some(2),
            NextCard::Three => Some(3),
            NextCard::Bonus => None,
        }
    }

    /// Hint for a concrete card index: basic indices map to themselves,
    /// anything higher is a bonus.
    #[inline]
    pub fn from_card_index(card: u8) -> Self {
        match card {
            1 => NextCard::One,
            2 => NextCard::Two,
            3 => NextCard::Three,
            _ => NextCard::Bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_last_card_refills() {
        let mut deck = DeckCounter::new(1, 0, 0);
        deck.remove_one();
        assert_eq!(deck, DeckCounter::FULL);
    }

    #[test]
    fn draining_any_start_ends_full() {
        for ones in 0..=4u8 {
            for twos in 0..=4u8 {
                for threes in 0..=4u8 {
                    if ones + twos + threes == 0 {
                        continue;
                    }
                    let mut deck = DeckCounter::new(ones, twos, threes);
                    for card in 1..=3u8 {
                        for _ in 0..4 {
                            if deck.count(card) > 0 && deck.total() > 1 {
                                deck.remove(card);
                            }
                        }
                    }
                    // One card left; removing it triggers the refill.
                    assert_eq!(deck.total(), 1);
                    for card in 1..=3 {
                        if deck.count(card) == 1 {
                            deck.remove(card);
                        }
                    }
                    assert_eq!(deck, DeckCounter::FULL);
                }
            }
        }
    }

    #[test]
    fn remove_ignores_non_basic_indices() {
        let mut deck = DeckCounter::new(2, 3, 4);
        deck.remove(0);
        deck.remove(4);
        deck.remove(15);
        assert_eq!(deck, DeckCounter::new(2, 3, 4));
        deck.remove(2);
        assert_eq!(deck.twos(), 2);
    }

    #[test]
    fn from_values_counts_basics_only() {
        let deck = DeckCounter::from_values(&[1, 1, 2, 3, 3, 3, 6, 48]);
        assert_eq!((deck.ones(), deck.twos(), deck.threes()), (2, 1, 3));
        // An all-bonus logical deck still yields a usable bag.
        assert_eq!(DeckCounter::from_values(&[6, 12]), DeckCounter::FULL);
    }

    #[test]
    fn hint_round_trip() {
        assert_eq!(NextCard::One.card_index(), Some(1));
        assert_eq!(NextCard::Two.card_index(), Some(2));
        assert_eq!(NextCard::Three.card_index(), Some(3));
        assert_eq!(NextCard::Bonus.card_index(), None);
        for card in 1..=3u8 {
            assert_eq!(NextCard::from_card_index(card).card_index(), Some(card));
        }
        assert_eq!(NextCard::from_card_index(7), NextCard::Bonus);
    }
}
